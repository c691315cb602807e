use crate::config::{keys, routes};
use crate::storage::SharedBackend;

/// The single pending post-login redirect target. At most one value is
/// stored at a time; a second save overwrites the first.
#[derive(Clone)]
pub struct ReturnUrlTracker {
    backend: SharedBackend,
}

impl ReturnUrlTracker {
    pub fn new(backend: SharedBackend) -> Self { Self { backend } }

    /// Remember `path` as the place to land after login. Paths targeting
    /// the login route itself are ignored, otherwise a failed login could
    /// redirect straight back to the login screen forever.
    pub fn save(&self, path: &str) {
        if path.is_empty() || path == routes::LOGIN || path.contains("/login") {
            return;
        }
        let _ = self.backend.set(keys::RETURN_URL, path);
    }

    /// Read-then-delete: the stored path is returned exactly once; callers
    /// after that (or with nothing stored) get the default landing route.
    pub fn consume(&self) -> String {
        let stored = self.backend.get(keys::RETURN_URL);
        let _ = self.backend.remove(keys::RETURN_URL);
        stored.unwrap_or_else(|| routes::DASHBOARD.to_string())
    }

    /// Non-destructive peek, for callers that only want to display the
    /// pending target.
    pub fn peek(&self) -> Option<String> {
        self.backend.get(keys::RETURN_URL)
    }
}
