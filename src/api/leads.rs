//! Lead operations.

use tracing::info;

use super::endpoints;
use super::types::{Assignment, Lead, LeadStatus, StatusUpdate};
use crate::client::Dispatcher;
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct LeadsApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> LeadsApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Every lead, in server order.
    pub async fn list(&self) -> Result<Vec<Lead>> {
        self.dispatcher.get_json(endpoints::LEADS).await
    }

    pub async fn update_status(&self, id: &str, status: LeadStatus) -> Result<()> {
        self.dispatcher
            .patch(&endpoints::lead_status(id), Some(&StatusUpdate { status }))
            .await?;
        info!(lead = id, %status, "lead status updated");
        Ok(())
    }

    /// Assign a lead to an admin user, or unassign it with `None`.
    pub async fn assign(&self, id: &str, user_id: Option<&str>) -> Result<()> {
        let body = Assignment {
            user_id: user_id.map(str::to_string),
        };
        self.dispatcher
            .patch(&endpoints::lead_assign(id), Some(&body))
            .await?;
        info!(lead = id, user = user_id.unwrap_or("-"), "lead assignment updated");
        Ok(())
    }
}
