//! Login and logout.

use tracing::info;

use super::endpoints;
use super::types::{AdminUser, LoginRequest, LoginResponse};
use crate::client::{Dispatcher, RequestDescriptor};
use crate::error::{DispatchError, Result};

/// Session lifecycle operations.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    dispatcher: &'a Dispatcher,
    default_ttl: &'a str,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher, default_ttl: &'a str) -> Self {
        Self {
            dispatcher,
            default_ttl,
        }
    }

    /// Exchange credentials for a token and start a session.
    ///
    /// The token lives for the server-supplied `expiresIn`, or the
    /// configured default lifetime when the server does not say.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(DispatchError::network)?;

        let request = RequestDescriptor::post(endpoints::LOGIN)
            .public()
            .with_body(body);
        let response: LoginResponse = self.dispatcher.dispatch_json(request).await?;

        let ttl = response.expires_in.as_deref().unwrap_or(self.default_ttl);
        let session = self.dispatcher.session();
        session.set_token(&response.token, ttl);
        session.set_user(&response.user);

        info!(username = %response.user.username, ttl, "logged in");
        Ok(response.user)
    }

    /// End the session locally.
    pub fn logout(&self) {
        self.dispatcher.session().clear();
        info!("logged out");
    }

    /// Profile cached at login, if the session is still valid.
    pub fn current_user(&self) -> Option<AdminUser> {
        self.dispatcher.session().get_user()
    }
}
