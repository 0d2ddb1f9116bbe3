use crate::window::RollingWindow;
use dial_config::Averaging;
use dial_core::{DialError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One metric's sampling state: interval, averaging mode and rolling window.
///
/// The window sits behind a mutex held only for the append+trim or the read,
/// so readers never observe a half-trimmed window.  The single writer is the
/// metric's own worker.
#[derive(Debug)]
pub struct SampleSource<T> {
    name:      &'static str,
    interval:  Duration,
    averaging: Averaging,
    window:    Mutex<RollingWindow<T>>,
}

impl<T> SampleSource<T> {
    /// `interval_secs == 0` leaves the metric permanently disabled.
    pub fn new(name: &'static str, interval_secs: u64, capacity: usize, averaging: Averaging) -> Self {
        Self {
            name,
            interval: Duration::from_secs(interval_secs),
            averaging,
            window: Mutex::new(RollingWindow::new(capacity)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    pub fn push(&self, sample: T) {
        self.lock().push(sample);
    }

    /// Mean of `key` over the current window.
    ///
    /// Fails with [`DialError::Config`] when the metric is disabled.
    pub fn average_by(&self, key: impl Fn(&T) -> f64) -> Result<f64> {
        if !self.is_enabled() {
            return Err(DialError::Config(format!(
                "{0}_interval must be 1 or higher to read {0}",
                self.name
            )));
        }
        Ok(self.lock().mean_by(self.averaging, key))
    }

    fn lock(&self) -> MutexGuard<'_, RollingWindow<T>> {
        // A panicking reader cannot leave the window half-written.
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> SampleSource<T> {
    /// Consistent copy of the current window.
    pub fn snapshot(&self) -> RollingWindow<T> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_source_refuses_to_average() {
        let src: SampleSource<f64> = SampleSource::new("cpu", 0, 5, Averaging::Filled);
        assert!(!src.is_enabled());
        assert!(matches!(src.average_by(|v| *v), Err(DialError::Config(_))));
    }

    #[test]
    fn enabled_source_without_samples_reads_zero() {
        let src: SampleSource<f64> = SampleSource::new("cpu", 1, 5, Averaging::Filled);
        assert_eq!(src.average_by(|v| *v).unwrap(), 0.0);
    }

    #[test]
    fn snapshot_is_detached_from_later_pushes() {
        let src = SampleSource::new("net", 1, 2, Averaging::Filled);
        src.push(1u64);
        let snap = src.snapshot();
        src.push(2);
        src.push(3);
        assert_eq!(snap.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(src.snapshot().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn concurrent_readers_see_bounded_windows() {
        use std::sync::Arc;

        let src = Arc::new(SampleSource::new("cpu", 1, 5, Averaging::Filled));
        let writer = {
            let src = Arc::clone(&src);
            std::thread::spawn(move || {
                for v in 0..10_000 {
                    src.push(v as f64);
                }
            })
        };
        for _ in 0..1_000 {
            let snap = src.snapshot();
            assert!(snap.len() <= 5);
            let values: Vec<f64> = snap.iter().copied().collect();
            assert!(values.windows(2).all(|w| w[1] == w[0] + 1.0));
        }
        writer.join().unwrap();
    }
}
