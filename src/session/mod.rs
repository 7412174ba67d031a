//! Session management module.
//!
//! Holds the bearer token, its expiry and the cached admin profile in a
//! pluggable key/value storage, enforcing expiry whenever the token is read.

mod clock;
mod storage;
mod store;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{SessionStore, TOKEN_EXPIRY_KEY, TOKEN_KEY, USER_KEY};
pub use ttl::{parse_ttl_millis, DAY_MILLIS};
