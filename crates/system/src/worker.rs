use crate::source::SampleSource;
use dial_core::{DialError, Result};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Level};

/// Raw counters a sampling worker reads twice per interval.
pub trait CounterSource: Send + 'static {
    /// Point-in-time counter snapshot.
    type Counters: Send;
    /// Value derived from a before/after pair.
    type Sample: Debug + Send + 'static;

    fn read(&mut self) -> Result<Self::Counters>;

    fn derive(&self, before: &Self::Counters, after: &Self::Counters, interval: Duration) -> Self::Sample;
}

/// Sample `counters` into `source` until `shutdown` flips to `true` (or its
/// sender is dropped).
///
/// Each cycle reads, sleeps one interval, reads again and pushes the derived
/// value.  A failed read skips that cycle only; see [`skip_level`] for how
/// it is logged.
///
/// [`CounterSource::read`] is plain blocking `std::fs` on a few bytes of
/// procfs/sysfs.  Workers run on the sampler's own runtime, apart from the
/// UI executor, so a slow read only delays other samplers.
pub(crate) async fn run_worker<S: CounterSource>(
    mut counters: S,
    source: Arc<SampleSource<S::Sample>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let metric = source.name();
    let interval = source.interval();
    info!(metric, ?interval, "sampler started");

    let mut failing = false;
    loop {
        let before = counters.read();
        if !pause(interval, &mut shutdown).await {
            break;
        }
        let after = counters.read();

        match (before, after) {
            (Ok(before), Ok(after)) => {
                if failing {
                    info!(metric, "counters readable again");
                    failing = false;
                }
                let sample = counters.derive(&before, &after, interval);
                debug!(metric, ?sample, "sample");
                source.push(sample);
            }
            (Err(e), _) | (_, Err(e)) => {
                if failing {
                    debug!(metric, "still skipping samples: {e}");
                } else if skip_level(&e) == Level::WARN {
                    warn!(metric, "skipping sample: {e}");
                } else {
                    error!(metric, "counters unusable, skipping sample: {e}");
                }
                failing = true;
            }
        }
    }

    info!(metric, "sampler stopped");
}

/// Level of the first log line for a skipped cycle.  A vanished counter
/// file may come back (a detached device); anything else will keep failing
/// until the config or the machine changes.
fn skip_level(err: &DialError) -> Level {
    if err.is_transient() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

/// Sleep one interval; `false` if shutdown was requested meanwhile.
async fn pause(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(interval) => true,
        _ = shutdown.changed() => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial_config::Averaging;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Replays a fixed script of counter reads, then repeats the last one.
    struct Scripted {
        reads: VecDeque<Result<u64>>,
        last:  u64,
    }

    impl Scripted {
        fn new(reads: Vec<Result<u64>>) -> Self {
            Self { reads: reads.into(), last: 0 }
        }
    }

    impl CounterSource for Scripted {
        type Counters = u64;
        type Sample = u64;

        fn read(&mut self) -> Result<u64> {
            match self.reads.pop_front() {
                Some(Ok(v)) => {
                    self.last = v;
                    Ok(v)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self.last),
            }
        }

        fn derive(&self, before: &u64, after: &u64, _interval: Duration) -> u64 {
            after - before
        }
    }

    fn vanished() -> DialError {
        DialError::TransientRead {
            path:   PathBuf::from("/sys/class/net/usb0/statistics/rx_bytes"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }

    fn values(source: &SampleSource<u64>) -> Vec<u64> {
        source.snapshot().iter().copied().collect()
    }

    #[tokio::test(start_paused = true)]
    async fn pushes_one_delta_per_interval() {
        let source = Arc::new(SampleSource::new("test", 1, 5, Averaging::Filled));
        let (tx, rx) = watch::channel(false);
        let counters = Scripted::new(vec![Ok(0), Ok(10), Ok(10), Ok(30)]);
        let worker = tokio::spawn(run_worker(counters, Arc::clone(&source), rx));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(values(&source), vec![10, 20]);

        tx.send(true).unwrap();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_read_skips_only_that_cycle() {
        let source = Arc::new(SampleSource::new("test", 1, 5, Averaging::Filled));
        let (tx, rx) = watch::channel(false);
        let counters = Scripted::new(vec![Ok(0), Err(vanished()), Ok(5), Ok(9)]);
        let worker = tokio::spawn(run_worker(counters, Arc::clone(&source), rx));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(values(&source), vec![4]);
        assert!(!worker.is_finished());

        tx.send(true).unwrap();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_counters_skip_without_stopping() {
        let source = Arc::new(SampleSource::new("test", 1, 5, Averaging::Filled));
        let (tx, rx) = watch::channel(false);
        let malformed = DialError::Parse("rx_bytes = 'garbage'".into());
        let counters = Scripted::new(vec![Ok(0), Err(malformed), Ok(5), Ok(9)]);
        let worker = tokio::spawn(run_worker(counters, Arc::clone(&source), rx));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(values(&source), vec![4]);
        assert!(!worker.is_finished());

        tx.send(true).unwrap();
        worker.await.unwrap();
    }

    #[test]
    fn only_vanished_counters_log_as_warnings() {
        assert_eq!(skip_level(&vanished()), Level::WARN);
        assert_eq!(skip_level(&DialError::Parse("x".into())), Level::ERROR);
        assert_eq!(skip_level(&DialError::Config("gone".into())), Level::ERROR);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_mid_sleep_on_shutdown() {
        let source = Arc::new(SampleSource::new("test", 3_600, 5, Averaging::Filled));
        let (tx, rx) = watch::channel(false);
        let worker = tokio::spawn(run_worker(Scripted::new(vec![]), Arc::clone(&source), rx));

        tokio::task::yield_now().await;
        tx.send(true).unwrap();
        worker.await.unwrap();
        assert!(values(&source).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_sender_also_stops_the_worker() {
        let source = Arc::new(SampleSource::new("test", 1, 5, Averaging::Filled));
        let (tx, rx) = watch::channel(false);
        let worker = tokio::spawn(run_worker(Scripted::new(vec![]), source, rx));
        drop(tx);
        worker.await.unwrap();
    }
}
