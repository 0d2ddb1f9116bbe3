use dial_config::Averaging;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent samples.
///
/// Appending beyond capacity silently drops the oldest entry; entries are
/// never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow<T> {
    samples:  VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// A window holding at most `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    /// Mean of `key` over the window.
    ///
    /// With [`Averaging::Capacity`] the sum is divided by the capacity even
    /// while the window is still filling.  An empty window averages to `0`.
    pub fn mean_by(&self, mode: Averaging, key: impl Fn(&T) -> f64) -> f64 {
        let divisor = match mode {
            Averaging::Filled   => self.samples.len(),
            Averaging::Capacity => self.capacity,
        };
        if divisor == 0 {
            return 0.0;
        }
        self.samples.iter().map(key).sum::<f64>() / divisor as f64
    }
}

impl RollingWindow<f64> {
    pub fn mean(&self, mode: Averaging) -> f64 {
        self.mean_by(mode, |v| *v)
    }
}
