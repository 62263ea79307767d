//! Counters for one or more sync passes.

use std::ops::AddAssign;

use crate::error::FantasyWearError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub num_updates: u64,
    pub num_parse_exceptions: u64,
    pub num_auth_exceptions: u64,
    pub num_io_exceptions: u64,
}

impl SyncStats {
    /// Count a failed pass under its category. Cancellation is not counted.
    pub fn record_error(&mut self, error: &FantasyWearError) {
        if error.is_cancellation() {
            return;
        }
        if error.is_parse_failure() {
            self.num_parse_exceptions += 1;
        } else if error.is_auth_failure() {
            self.num_auth_exceptions += 1;
        } else {
            self.num_io_exceptions += 1;
        }
    }

    pub fn has_error(&self) -> bool {
        self.num_parse_exceptions + self.num_auth_exceptions + self.num_io_exceptions > 0
    }
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, other: Self) {
        self.num_updates += other.num_updates;
        self.num_parse_exceptions += other.num_parse_exceptions;
        self.num_auth_exceptions += other.num_auth_exceptions;
        self.num_io_exceptions += other.num_io_exceptions;
    }
}
