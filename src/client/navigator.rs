//! Login redirect capability.

use std::io::Write;

/// Sends the user back to the login entry point.
///
/// Installed on a dispatcher only when an interactive context exists. The
/// dispatcher calls it at most once per failing call.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

impl<F> Navigator for F
where
    F: Fn() + Send + Sync,
{
    fn redirect_to_login(&self) {
        self()
    }
}

/// Terminal navigator: tells the user how to sign in again.
#[derive(Debug, Clone)]
pub struct LoginPrompt {
    command: String,
}

impl LoginPrompt {
    /// `command` is the invocation shown to the user, e.g. `lead-console login`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn message(&self) -> String {
        format!("Session missing or expired. Sign in with `{}`.", self.command)
    }
}

impl Navigator for LoginPrompt {
    fn redirect_to_login(&self) {
        let _ = writeln!(std::io::stderr(), "{}", self.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_navigator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let nav = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        nav.redirect_to_login();
        nav.redirect_to_login();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_login_prompt_message() {
        let prompt = LoginPrompt::new("lead-console login");
        assert!(prompt.message().contains("`lead-console login`"));
    }
}
