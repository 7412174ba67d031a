//! Request dispatch layer.
//!
//! Every outbound API call goes through a [`Dispatcher`]. It attaches the
//! bearer token from the session store, classifies the response and
//! normalizes every failure into a [`DispatchError`](crate::DispatchError).
//!
//! ## Contract
//!
//! - A `Content-Type: application/json` header is sent unless the caller
//!   overrides it.
//! - Authenticated calls without a stored token fail with status 401 before
//!   anything is sent.
//! - A 401 response clears the session and fires the login redirect.
//! - Other non-2xx responses carry the server's status and error body.
//! - Transport failures carry status 0.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lead_console::{Dispatcher, SessionStore};
//!
//! # async fn run() -> lead_console::Result<()> {
//! let session = Arc::new(SessionStore::in_memory());
//! let dispatcher = Dispatcher::new(session)
//!     .with_base_url("http://localhost:4000".parse().unwrap());
//!
//! let leads: serde_json::Value = dispatcher.get_json("/api/leads").await?;
//! println!("{leads}");
//! # Ok(())
//! # }
//! ```

mod dispatcher;
mod navigator;
mod request;

pub use dispatcher::{Dispatched, Dispatcher};
pub use navigator::{LoginPrompt, Navigator};
pub use request::RequestDescriptor;
