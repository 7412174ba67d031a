//! # lead-console
//!
//! Client-side session and request layer for the loan-lead admin API.
//!
//! Every outbound call goes through one [`Dispatcher`], which reads the
//! bearer token from a [`SessionStore`], turns a 401 into a cleared session
//! plus a login redirect, and normalizes every failure into a
//! [`DispatchError`] carrying a message, an HTTP status (0 for transport
//! failures) and the decoded error body.
//!
//! ## Features
//!
//! - **Session store**: token, expiry and cached admin profile over a
//!   pluggable [`SessionStorage`] (in-memory or a private JSON file)
//! - **Dispatcher**: bearer injection, 401 handling, uniform errors
//! - **Resource APIs**: leads, users, testimonial moderation, dashboard
//! - **Console helpers**: sorting, pagination, form validation
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use lead_console::{AdminApi, Dispatcher, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> lead_console::Result<()> {
//!     lead_console::logging::try_init().ok();
//!
//!     let session = Arc::new(SessionStore::in_memory());
//!     let dispatcher = Dispatcher::new(session)
//!         .with_base_url("http://localhost:4000".parse().unwrap())
//!         .with_navigator(Arc::new(|| eprintln!("please sign in again")));
//!     let api = AdminApi::new(dispatcher);
//!
//!     let admin = api.auth().login("admin", "S3cret!pass").await?;
//!     println!("signed in as {}", admin.username);
//!
//!     let stats = api.dashboard().await?;
//!     println!("{} leads, {} today", stats.total_leads, stats.today_leads);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use api::{AdminApi, AdminUser, DashboardStats, Lead, LeadStatus, Testimonial};
pub use config::{Config, ConfigError};
pub use client::{Dispatched, Dispatcher, LoginPrompt, Navigator, RequestDescriptor};
pub use error::{DispatchError, ErrorKind, Result, StorageError};
pub use session::{
    Clock, FileStorage, ManualClock, MemoryStorage, SessionStorage, SessionStore, SystemClock,
};
