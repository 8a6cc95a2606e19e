//! Client-side id generation for local-only records.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::UserId;

/// Hands out strictly increasing integer ids seeded from the wall clock in
/// milliseconds, so ids created in the same millisecond (or after the clock
/// steps backwards) still differ.
#[derive(Debug, Default)]
pub struct IdSource {
    last: u64,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for which `taken` returns false.
    pub fn next(&mut self, taken: impl Fn(&UserId) -> bool) -> UserId {
        let mut candidate = now_millis().max(self.last.saturating_add(1));
        while taken(&UserId::Int(candidate)) {
            candidate = candidate.saturating_add(1);
        }
        self.last = candidate;
        UserId::Int(candidate)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
