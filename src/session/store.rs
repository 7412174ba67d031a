//! Session storage and expiry enforcement.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::storage::{MemoryStorage, SessionStorage};
use super::ttl::parse_ttl_millis;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "adminToken";

/// Storage key holding the serialized user profile.
pub const USER_KEY: &str = "adminUser";

/// Storage key holding the expiry, epoch milliseconds as a decimal string.
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, USER_KEY, TOKEN_EXPIRY_KEY];

/// Client-side store for the single authenticated session.
///
/// Expiry is enforced when the token is read: reading an expired token
/// clears the whole session. A store without backing storage is *detached*
/// and every operation on it is a no-op that reports no session.
///
/// Storage failures never escape; they are logged and read as absence.
pub struct SessionStore {
    storage: Option<Arc<dyn SessionStorage>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Create a store over the given storage backend.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage: Some(storage),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Create a store with no backing storage.
    pub fn detached() -> Self {
        Self {
            storage: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Whether this store has backing storage.
    pub fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    /// Store a token valid for `ttl`, a day count such as `"7d"`.
    ///
    /// A `ttl` without a leading number stores the token already expired.
    pub fn set_token(&self, token: &str, ttl: &str) {
        let Some(storage) = &self.storage else {
            return;
        };

        let now = self.clock.now_millis();
        let expires_at = match parse_ttl_millis(ttl) {
            Some(millis) => now.saturating_add(millis),
            None => {
                warn!(ttl, "unparseable token lifetime, session stored as expired");
                now.saturating_sub(1)
            }
        };

        if let Err(e) = storage.set(TOKEN_KEY, token) {
            warn!(error = %e, "failed to store token");
            return;
        }
        if let Err(e) = storage.set(TOKEN_EXPIRY_KEY, &expires_at.to_string()) {
            // An expiry left by an earlier session must not outlive this token.
            warn!(error = %e, "failed to store token expiry, clearing session");
            self.clear();
            return;
        }
        info!(expires_at, "session token stored");
    }

    /// Return the token if one is stored and has not expired.
    ///
    /// An expired token, or one with a missing or unreadable expiry, clears
    /// the whole session.
    pub fn get_token(&self) -> Option<String> {
        let storage = self.storage.as_ref()?;

        let token = match storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read token");
                return None;
            }
        };

        let expires_at = match storage.get(TOKEN_EXPIRY_KEY) {
            Ok(raw) => raw.and_then(|raw| raw.trim().parse::<i64>().ok()),
            Err(e) => {
                warn!(error = %e, "failed to read token expiry");
                None
            }
        };

        match expires_at {
            Some(expires_at) if self.clock.now_millis() <= expires_at => Some(token),
            Some(expires_at) => {
                info!(expires_at, "session token expired");
                self.clear();
                None
            }
            None => {
                warn!("token stored without a valid expiry");
                self.clear();
                None
            }
        }
    }

    /// Expiry of the current session in epoch milliseconds, if it is valid.
    pub fn expires_at(&self) -> Option<i64> {
        self.get_token()?;
        self.storage
            .as_ref()?
            .get(TOKEN_EXPIRY_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse().ok())
    }

    /// Cache a user profile alongside the session.
    pub fn set_user<T: Serialize>(&self, profile: &T) {
        let Some(storage) = &self.storage else {
            return;
        };

        let json = match serde_json::to_string(profile) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize user profile");
                return;
            }
        };

        if let Err(e) = storage.set(USER_KEY, &json) {
            warn!(error = %e, "failed to store user profile");
        }
    }

    /// Return the cached user profile of the current session.
    ///
    /// Returns `None` without a valid token, or when the stored profile
    /// does not deserialize into `T`.
    pub fn get_user<T: DeserializeOwned>(&self) -> Option<T> {
        self.get_token()?;

        let raw = match self.storage.as_ref()?.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read user profile");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "failed to parse user profile");
                None
            }
        }
    }

    /// Remove token, expiry and user together.
    pub fn clear(&self) {
        let Some(storage) = &self.storage else {
            return;
        };

        match storage.remove_all(&SESSION_KEYS) {
            Ok(()) => debug!("session cleared"),
            Err(e) => warn!(error = %e, "failed to clear session"),
        }
    }

    /// Whether a valid token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}
