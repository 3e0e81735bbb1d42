use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Last-request-wins gate. A response is applied only if its token is still
/// the newest one issued.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: AtomicU64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every earlier one.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            id => Some(RequestToken(id)),
        }
    }

    /// `Some(value)` if `token` is still current, otherwise drop it.
    pub fn accept<T>(&self, token: RequestToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            tracing::debug!(
                token = token.0,
                latest = self.latest.load(Ordering::SeqCst),
                "Discarding stale response"
            );
            None
        }
    }
}
