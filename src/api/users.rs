//! Admin user CRUD.

use tracing::info;

use super::endpoints;
use super::types::{AdminUser, NewUser, UserUpdate};
use crate::client::Dispatcher;
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Vec<AdminUser>> {
        self.dispatcher.get_json(endpoints::USERS).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<AdminUser> {
        let created: AdminUser = self.dispatcher.post_json(endpoints::USERS, Some(user)).await?;
        info!(user = %created.id, username = %created.username, "user created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<AdminUser> {
        let updated: AdminUser = self
            .dispatcher
            .patch_json(&endpoints::user(id), Some(update))
            .await?;
        info!(user = id, "user updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.dispatcher.delete(&endpoints::user(id)).await?;
        info!(user = id, "user deleted");
        Ok(())
    }
}
