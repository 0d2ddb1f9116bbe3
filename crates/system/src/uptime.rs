use crate::paths::{read_counter, SysRoot};
use dial_core::{DialError, Result};
use std::fmt;

/// Time since boot, from the first field of `/proc/uptime`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uptime {
    pub total_secs: f64,
}

impl Uptime {
    pub fn read(root: &SysRoot) -> Result<Self> {
        let path = root.proc("uptime");
        let raw = read_counter(&path)?;
        let first = raw.split_whitespace().next().unwrap_or_default();
        let total_secs = first
            .parse()
            .map_err(|_| DialError::Parse(format!("uptime '{first}'")))?;
        Ok(Self { total_secs })
    }

    /// `(days, hours, minutes, seconds)`.
    pub fn parts(&self) -> (u64, u64, u64, f64) {
        let whole = self.total_secs.max(0.0).trunc() as u64;
        let seconds = self.total_secs.max(0.0) - (whole - whole % 60) as f64;
        let minutes = whole / 60;
        let hours = minutes / 60;
        (hours / 24, hours % 24, minutes % 60, seconds)
    }
}

impl fmt::Display for Uptime {
    /// `days: 1, hours: 2, minutes: 3, seconds: 4`, leading zero units omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (days, hours, minutes, seconds) = self.parts();
        let mut started = false;
        for (label, value) in [("days", days), ("hours", hours), ("minutes", minutes)] {
            if started || value > 0 {
                write!(f, "{label}: {value}, ")?;
                started = true;
            }
        }
        write!(f, "seconds: {}", seconds.trunc() as u64)
    }
}
