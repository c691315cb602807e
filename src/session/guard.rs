use crate::config::routes;
use crate::session::{ReturnUrlTracker, SessionStore};
use crate::storage::SharedBackend;

/// Outcome of a guarded navigation. `RedirectToLogin` replaces the history
/// entry so back-navigation cannot return to the denied view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    RedirectToLogin { replace_history: bool },
}

/// Entry check for protected views. Two states, authorized and
/// unauthorized; the transition back to authorized happens only through a
/// successful login, and expiry is discovered lazily at the next check
/// rather than by polling.
#[derive(Clone)]
pub struct SessionGuard {
    store: SessionStore,
    return_urls: ReturnUrlTracker,
}

impl SessionGuard {
    pub fn new(store: SessionStore, backend: SharedBackend) -> Self {
        Self { store, return_urls: ReturnUrlTracker::new(backend) }
    }

    /// Evaluate access to `path`. Denied navigations record the target so
    /// the user lands there after logging in.
    pub fn check(&self, path: &str) -> GuardDecision {
        if self.store.is_authenticated(Some(path)) {
            GuardDecision::Render
        } else {
            GuardDecision::RedirectToLogin { replace_history: true }
        }
    }

    /// Where to go after a successful login: the recorded target if one is
    /// pending, the dashboard otherwise. Consuming, so it fires once.
    pub fn post_login_target(&self) -> String {
        self.return_urls.consume()
    }

    pub fn login_route(&self) -> &'static str { routes::LOGIN }

    pub fn store(&self) -> &SessionStore { &self.store }
}
