//! Request tickets for discarding superseded apply results.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// Hands out increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
pub struct RequestClock {
    latest: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub issued_at: DateTime<Utc>,
}

impl RequestClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestTicket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            seq,
            issued_at: Utc::now(),
        }
    }

    /// No newer ticket has been issued since `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.seq
    }
}
