use crate::paths::{read_value, SysRoot};
use crate::worker::CounterSource;
use dial_core::{DialError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Number of network samples kept for the rolling average.
pub const NET_SAMPLES: usize = 2;

/// Bytes moved during one sampling interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetSample {
    /// Transmitted bytes.
    pub up:   u64,
    /// Received bytes.
    pub down: u64,
}

/// Cumulative interface byte counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetTotals {
    pub rx: u64,
    pub tx: u64,
}

/// Reads `/sys/class/net/<iface>/statistics/{rx,tx}_bytes`.
#[derive(Debug, Clone)]
pub struct NetCounters {
    interface: String,
    rx: PathBuf,
    tx: PathBuf,
}

impl NetCounters {
    pub fn new(root: &SysRoot, interface: impl Into<String>) -> Self {
        let interface = interface.into();
        let stats = root.sys("class/net").join(&interface).join("statistics");
        Self {
            rx: stats.join("rx_bytes"),
            tx: stats.join("tx_bytes"),
            interface,
        }
    }

    /// Fails with [`DialError::Config`] when the interface does not exist.
    pub fn ensure_exists(&self) -> Result<()> {
        match self.rx.parent() {
            Some(stats) if stats.is_dir() => Ok(()),
            _ => Err(DialError::Config(format!(
                "network interface '{}' was not found",
                self.interface
            ))),
        }
    }
}

impl CounterSource for NetCounters {
    type Counters = NetTotals;
    type Sample = NetSample;

    fn read(&mut self) -> Result<NetTotals> {
        Ok(NetTotals {
            rx: read_value(&self.rx)?,
            tx: read_value(&self.tx)?,
        })
    }

    fn derive(&self, before: &NetTotals, after: &NetTotals, _interval: Duration) -> NetSample {
        NetSample {
            up:   after.tx.saturating_sub(before.tx),
            down: after.rx.saturating_sub(before.rx),
        }
    }
}
