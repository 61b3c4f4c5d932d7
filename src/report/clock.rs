//! Time source for report timestamps.

use chrono::{DateTime, Utc};

/// Provides the render time stamped into a report header.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Used to make output reproducible.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // Only constructed by tests
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
