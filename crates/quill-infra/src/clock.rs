//! System clock adapter.

use chrono::{DateTime, Utc};

use quill_core::ports::Clock;

/// Wall-clock implementation of the [`Clock`] port.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
