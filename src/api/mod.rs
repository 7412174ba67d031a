//! Typed access to the loan-lead REST API.
//!
//! All calls go through a [`Dispatcher`], so they share its authentication
//! and error contract.
//!
//! ## Endpoints
//!
//! ### Auth
//! - `POST /api/auth/login` - Obtain a token (no auth)
//!
//! ### Leads
//! - `GET /api/leads` - List leads
//! - `PATCH /api/leads/{id}/status` - Change status
//! - `PATCH /api/leads/{id}/assign` - Assign or unassign
//!
//! ### Users
//! - `GET /api/users` - List admin users
//! - `POST /api/users` - Create
//! - `PATCH /api/users/{id}` - Update role, email or password
//! - `DELETE /api/users/{id}` - Delete
//!
//! ### Testimonials
//! - `GET /api/testimonials/moderation` - Moderation queue
//! - `PATCH /api/testimonials/{id}/approve` - Approve
//! - `PATCH /api/testimonials/{id}/reject` - Reject
//! - `DELETE /api/testimonials/{id}` - Delete
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lead_console::{AdminApi, Dispatcher, SessionStore};
//!
//! # async fn run() -> lead_console::Result<()> {
//! let dispatcher = Dispatcher::new(Arc::new(SessionStore::in_memory()))
//!     .with_base_url("http://localhost:4000".parse().unwrap());
//! let api = AdminApi::new(dispatcher);
//!
//! api.auth().login("admin", "S3cret!pass").await?;
//! for lead in api.leads().list().await? {
//!     println!("{} {}", lead.id, lead.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod dashboard;
pub mod endpoints;
pub mod leads;
pub mod testimonials;
pub mod types;
pub mod users;

use crate::client::Dispatcher;
use crate::error::Result;

pub use auth::AuthApi;
pub use dashboard::{dashboard_stats, dashboard_stats_on};
pub use leads::LeadsApi;
pub use testimonials::TestimonialsApi;
pub use types::{
    AdminUser, Assignment, DashboardStats, Lead, LeadStatus, LoginRequest, LoginResponse,
    NewUser, StatusUpdate, Testimonial, TestimonialStatus, UnknownStatus, UserUpdate,
};
pub use users::UsersApi;

/// Default token lifetime when the login response does not carry one.
pub const DEFAULT_TTL: &str = "7d";

/// Entry point to the resource APIs.
#[derive(Debug, Clone)]
pub struct AdminApi {
    dispatcher: Dispatcher,
    default_ttl: String,
}

impl AdminApi {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            default_ttl: DEFAULT_TTL.to_string(),
        }
    }

    /// Lifetime given to tokens whose login response states none.
    pub fn with_default_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.default_ttl = ttl.into();
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.dispatcher, &self.default_ttl)
    }

    pub fn leads(&self) -> LeadsApi<'_> {
        LeadsApi::new(&self.dispatcher)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(&self.dispatcher)
    }

    pub fn testimonials(&self) -> TestimonialsApi<'_> {
        TestimonialsApi::new(&self.dispatcher)
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        dashboard_stats(&self.dispatcher).await
    }
}
