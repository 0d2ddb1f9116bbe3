use crate::paths::{read_counter, SysRoot};
use crate::worker::CounterSource;
use dial_config::CpuField;
use dial_core::{DialError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Number of CPU samples kept for the rolling average.
pub const CPU_SAMPLES: usize = 5;

/// Tick columns of one `/proc/stat` cpu line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user:    u64,
    pub nice:    u64,
    pub system:  u64,
    pub idle:    u64,
    pub iowait:  u64,
    pub irq:     u64,
    pub softirq: u64,
    pub steal:   u64,
}

impl CpuTicks {
    pub fn field(&self, field: CpuField) -> u64 {
        match field {
            CpuField::User   => self.user,
            CpuField::Nice   => self.nice,
            CpuField::System => self.system,
            CpuField::Idle   => self.idle,
            CpuField::Iowait => self.iowait,
            CpuField::Busy   => {
                self.user + self.nice + self.system + self.irq + self.softirq + self.steal
            }
        }
    }
}

/// Find the line for `core` (`"cpu"`, `"cpu0"`, …) in `/proc/stat` content.
pub fn parse_stat(content: &str, core: &str) -> Result<CpuTicks> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some(core))
        .ok_or_else(|| DialError::Config(format!("cpu line '{core}' not found in /proc/stat")))?;

    let values = line
        .split_whitespace()
        .skip(1)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| DialError::Parse(format!("bad tick count '{v}' on '{core}' line")))
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() < 4 {
        return Err(DialError::Config(format!(
            "'{core}' line has {} tick fields, need at least 4",
            values.len()
        )));
    }

    let at = |i: usize| values.get(i).copied().unwrap_or(0);
    Ok(CpuTicks {
        user:    at(0),
        nice:    at(1),
        system:  at(2),
        idle:    at(3),
        iowait:  at(4),
        irq:     at(5),
        softirq: at(6),
        steal:   at(7),
    })
}

/// Tick delta over `interval` as a percentage of one core's time.
///
/// Not clamped: an aggregate line on a multi-core machine can exceed 100.
pub fn cpu_load(before: u64, after: u64, interval: Duration, hz: f64) -> f64 {
    let scale = interval.as_secs_f64() * hz / 100.0;
    if scale <= 0.0 {
        return 0.0;
    }
    after.saturating_sub(before) as f64 / scale
}

/// Kernel clock ticks per second (`USER_HZ`).
#[cfg(unix)]
pub fn clock_ticks() -> f64 {
    // SAFETY: `sysconf` is thread-safe for this query and has no side effects.
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz > 0 { hz as f64 } else { 100.0 }
}

#[cfg(not(unix))]
pub fn clock_ticks() -> f64 {
    100.0
}

/// Reads the configured `/proc/stat` line for the CPU worker.
#[derive(Debug, Clone)]
pub struct CpuCounters {
    stat:  PathBuf,
    core:  String,
    field: CpuField,
    hz:    f64,
}

impl CpuCounters {
    pub fn new(root: &SysRoot, core: impl Into<String>, field: CpuField) -> Self {
        Self {
            stat: root.proc("stat"),
            core: core.into(),
            field,
            hz: clock_ticks(),
        }
    }
}

impl CounterSource for CpuCounters {
    type Counters = CpuTicks;
    type Sample = f64;

    fn read(&mut self) -> Result<CpuTicks> {
        parse_stat(&read_counter(&self.stat)?, &self.core)
    }

    fn derive(&self, before: &CpuTicks, after: &CpuTicks, interval: Duration) -> f64 {
        cpu_load(before.field(self.field), after.field(self.field), interval, self.hz)
    }
}
