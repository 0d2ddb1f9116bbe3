use dial_core::DialError;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Remembers which gauges are failing so each failure is logged once at
/// `warn` instead of on every frame.
#[derive(Debug, Default)]
pub struct FaultLog {
    failing: Mutex<HashSet<String>>,
}

impl FaultLog {
    pub fn report(&self, gauge: &str, err: &DialError) {
        let mut failing = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing.insert(gauge.to_owned()) {
            warn!(gauge, "gauge unavailable: {err}");
        } else {
            debug!(gauge, "gauge still unavailable: {err}");
        }
    }

    pub fn clear(&self, gauge: &str) {
        let mut failing = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing.remove(gauge) {
            info!(gauge, "gauge recovered");
        }
    }

    pub fn is_failing(&self, gauge: &str) -> bool {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(gauge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_then_clear() {
        let log = FaultLog::default();
        let err = DialError::Config("battery 'BAT1' was not found".into());

        log.report("battery", &err);
        log.report("battery", &err);
        assert!(log.is_failing("battery"));
        assert!(!log.is_failing("cpu"));

        log.clear("battery");
        assert!(!log.is_failing("battery"));
    }
}
