use crate::battery::{read_charge, BatteryCharge};
use crate::brightness::brightness;
use crate::cpu::{CpuCounters, CPU_SAMPLES};
use crate::memory::ram_percent;
use crate::network::{NetCounters, NetSample, NET_SAMPLES};
use crate::paths::SysRoot;
use crate::source::SampleSource;
use crate::temperature::TemperatureSensor;
use crate::uptime::Uptime;
use crate::worker::{run_worker, CounterSource};
use dial_config::SamplerConfig;
use dial_core::{DialError, Result, ValueSource};
use futures::future::join_all;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Owns one sample source per metric kind plus the workers feeding them.
///
/// Cheap to clone; every clone shares the same sources.  Workers run until
/// [`shutdown`](Self::shutdown) is awaited.
#[derive(Clone)]
pub struct MetricsRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    root:        SysRoot,
    cpu:         Arc<SampleSource<f64>>,
    net:         Arc<SampleSource<NetSample>>,
    temperature: TemperatureSensor,
    workers:     Mutex<Vec<(&'static str, JoinHandle<()>)>>,
    shutdown:    watch::Sender<bool>,
}

impl MetricsRegistry {
    /// Build the registry and spawn a worker for every enabled metric.
    ///
    /// Each enabled source is read once up front; a missing cpu line or
    /// interface fails here with [`DialError::Config`] and nothing is spawned.
    /// Must be called from within a Tokio runtime.
    pub fn start(config: &SamplerConfig) -> Result<Self> {
        let root = SysRoot::new(&config.sys_root);

        let cpu = Arc::new(SampleSource::new("cpu", config.cpu_interval, CPU_SAMPLES, config.averaging));
        let net = Arc::new(SampleSource::new("net", config.net_interval, NET_SAMPLES, config.averaging));

        let mut cpu_counters = CpuCounters::new(&root, &config.cpu_core, config.cpu_field);
        let mut net_counters = NetCounters::new(&root, &config.net_interface);
        if cpu.is_enabled() {
            probe(&mut cpu_counters, "cpu")?;
        }
        if net.is_enabled() {
            net_counters.ensure_exists()?;
            probe(&mut net_counters, "net")?;
        }

        let (shutdown, _) = watch::channel(false);
        let registry = Self {
            inner: Arc::new(Inner {
                temperature: TemperatureSensor::new(&root),
                root,
                cpu: Arc::clone(&cpu),
                net: Arc::clone(&net),
                workers: Mutex::new(Vec::new()),
                shutdown,
            }),
        };

        if cpu.is_enabled() {
            registry.spawn(cpu_counters, cpu);
        }
        if net.is_enabled() {
            info!(interface = %config.net_interface, "sampling network interface");
            registry.spawn(net_counters, net);
        }
        Ok(registry)
    }

    fn spawn<S: CounterSource>(&self, counters: S, source: Arc<SampleSource<S::Sample>>) {
        let name = source.name();
        debug!(metric = name, "spawning sampler");
        let handle = tokio::spawn(run_worker(counters, source, self.inner.shutdown.subscribe()));
        self.workers().push((name, handle));
    }

    fn workers(&self) -> std::sync::MutexGuard<'_, Vec<(&'static str, JoinHandle<()>)>> {
        self.inner.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signal every worker to stop and wait for them to finish.
    ///
    /// Sampled values stay readable afterwards; they just stop updating.
    pub async fn shutdown(&self) {
        self.inner.shutdown.send_replace(true);

        let handles: Vec<_> = self.workers().drain(..).collect();
        info!("Stopping {} sampler(s)", handles.len());

        let names: Vec<&'static str> = handles.iter().map(|(name, _)| *name).collect();
        let results = join_all(handles.into_iter().map(|(_, handle)| handle)).await;

        for (name, result) in names.into_iter().zip(results) {
            if let Err(e) = result {
                error!(metric = name, "sampler task failed: {e}");
            }
        }
    }

    /// Number of workers still owned by the registry.
    pub fn running_workers(&self) -> usize {
        self.workers().len()
    }

    // ── Rolling averages ──────────────────────────────────────────────────────

    /// Mean CPU load over the last [`CPU_SAMPLES`] intervals.
    pub fn cpu(&self) -> Result<f64> {
        self.inner.cpu.average_by(|v| *v)
    }

    /// Mean transmitted bytes per interval.
    pub fn net_up(&self) -> Result<f64> {
        self.inner.net.average_by(|s| s.up as f64)
    }

    /// Mean received bytes per interval.
    pub fn net_down(&self) -> Result<f64> {
        self.inner.net.average_by(|s| s.down as f64)
    }

    /// Rolling mean temperature in °C; `None` without a thermal sensor.
    pub fn temperature(&self) -> Result<Option<f64>> {
        self.inner.temperature.read()
    }

    // ── Point-in-time reads ───────────────────────────────────────────────────

    pub fn ram(&self) -> Result<f64> {
        ram_percent(&self.inner.root)
    }

    pub fn battery(&self, name: &str) -> Result<BatteryCharge> {
        read_charge(&self.inner.root, name)
    }

    pub fn battery_percent(&self, name: &str) -> Result<f64> {
        self.battery(name).map(|charge| charge.percent())
    }

    pub fn brightness(&self, backlight: &str) -> Result<f64> {
        brightness(&self.inner.root, backlight)
    }

    pub fn uptime(&self) -> Result<Uptime> {
        Uptime::read(&self.inner.root)
    }

    /// A [`ValueSource`] handle for `kind`, suitable for a gauge.
    pub fn source(&self, kind: MetricKind) -> MetricSource {
        MetricSource {
            registry: self.clone(),
            kind,
        }
    }
}

impl fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("root", &self.inner.root)
            .field("cpu", &self.inner.cpu.interval())
            .field("net", &self.inner.net.interval())
            .finish_non_exhaustive()
    }
}

fn probe<S: CounterSource>(counters: &mut S, metric: &str) -> Result<()> {
    counters
        .read()
        .map(drop)
        .map_err(|e| match e {
            DialError::Config(_) => e,
            other => DialError::Config(format!("{metric} counters unavailable: {other}")),
        })
}

/// Every metric a gauge can be driven by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Cpu,
    NetUp,
    NetDown,
    Temperature,
    Ram,
    /// Charge percentage of the named power supply.
    Battery(String),
    /// Level of the named backlight.
    Brightness(String),
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu            => f.write_str("cpu"),
            Self::NetUp          => f.write_str("net_up"),
            Self::NetDown        => f.write_str("net_down"),
            Self::Temperature    => f.write_str("temperature"),
            Self::Ram            => f.write_str("ram"),
            Self::Battery(name)  => write!(f, "battery:{name}"),
            Self::Brightness(bl) => write!(f, "brightness:{bl}"),
        }
    }
}

/// One metric of a [`MetricsRegistry`], exposed as a [`ValueSource`].
#[derive(Debug, Clone)]
pub struct MetricSource {
    registry: MetricsRegistry,
    kind:     MetricKind,
}

impl MetricSource {
    pub fn kind(&self) -> &MetricKind {
        &self.kind
    }
}

impl ValueSource for MetricSource {
    fn produce(&self) -> Result<f64> {
        let r = &self.registry;
        match &self.kind {
            MetricKind::Cpu                => r.cpu(),
            MetricKind::NetUp              => r.net_up(),
            MetricKind::NetDown            => r.net_down(),
            MetricKind::Ram                => r.ram(),
            MetricKind::Battery(name)      => r.battery_percent(name),
            MetricKind::Brightness(name)   => r.brightness(name),
            MetricKind::Temperature        => r
                .temperature()?
                .ok_or_else(|| DialError::Config("no thermal sensor found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::clock_ticks;
    use dial_config::{Averaging, CpuField};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    fn write_stat(root: &Path, idle: u64) {
        fs::create_dir_all(root.join("proc")).unwrap();
        fs::write(
            root.join("proc/stat"),
            format!("cpu  100 0 50 {idle} 0 0 0 0 0 0\ncpu0 100 0 50 {idle} 0 0 0 0 0 0\n"),
        )
        .unwrap();
    }

    fn write_net(root: &Path, rx: u64, tx: u64) {
        let stats = root.join("sys/class/net/wlan0/statistics");
        fs::create_dir_all(&stats).unwrap();
        fs::write(stats.join("rx_bytes"), rx.to_string()).unwrap();
        fs::write(stats.join("tx_bytes"), tx.to_string()).unwrap();
    }

    fn config(root: &Path) -> SamplerConfig {
        SamplerConfig {
            cpu_interval: 1,
            net_interval: 1,
            net_interface: "wlan0".to_string(),
            cpu_field: CpuField::Idle,
            sys_root: root.to_path_buf(),
            ..SamplerConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cpu_average_is_the_single_delta() {
        let dir = tempfile::tempdir().unwrap();
        let hz = clock_ticks() as u64;
        write_stat(dir.path(), 1_000);

        let cfg = SamplerConfig { net_interval: 0, ..config(dir.path()) };
        let registry = MetricsRegistry::start(&cfg).unwrap();

        // Let the worker take its "before" read, then advance the idle counter
        // by exactly one interval's worth of 1 %.
        tokio::time::sleep(Duration::from_millis(100)).await;
        write_stat(dir.path(), 1_000 + hz / 100);
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(registry.cpu().unwrap(), (hz / 100) as f64 / (hz as f64 / 100.0));
        registry.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_averaging_under_reads_a_filling_window() {
        let dir = tempfile::tempdir().unwrap();
        let hz = clock_ticks() as u64;
        write_stat(dir.path(), 0);

        let cfg = SamplerConfig {
            net_interval: 0,
            averaging: Averaging::Capacity,
            ..config(dir.path())
        };
        let registry = MetricsRegistry::start(&cfg).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        write_stat(dir.path(), hz);
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        // One sample of 100 % divided across the five-slot window.
        assert_eq!(registry.cpu().unwrap(), 100.0 / CPU_SAMPLES as f64);
        registry.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn net_up_and_down_average_their_own_side() {
        let dir = tempfile::tempdir().unwrap();
        write_net(dir.path(), 10_000, 1_000);

        let cfg = SamplerConfig { cpu_interval: 0, ..config(dir.path()) };
        let registry = MetricsRegistry::start(&cfg).unwrap();

        // Two identical intervals: +2000 rx, +500 tx each.
        tokio::time::sleep(Duration::from_millis(100)).await;
        write_net(dir.path(), 12_000, 1_500);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        write_net(dir.path(), 14_000, 2_000);
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(registry.net_up().unwrap(), 500.0);
        assert_eq!(registry.net_down().unwrap(), 2_000.0);
        assert_eq!(registry.inner.net.snapshot().len(), NET_SAMPLES);
        registry.shutdown().await;
    }

    #[tokio::test]
    async fn disabled_metrics_fail_with_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SamplerConfig { cpu_interval: 0, net_interval: 0, ..config(dir.path()) };
        let registry = MetricsRegistry::start(&cfg).unwrap();

        assert_eq!(registry.running_workers(), 0);
        assert!(matches!(registry.cpu(), Err(DialError::Config(_))));
        assert!(matches!(registry.net_up(), Err(DialError::Config(_))));
        assert!(matches!(registry.net_down(), Err(DialError::Config(_))));
    }

    #[tokio::test]
    async fn missing_interface_fails_at_start() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SamplerConfig { cpu_interval: 0, ..config(dir.path()) };
        assert!(matches!(MetricsRegistry::start(&cfg), Err(DialError::Config(_))));
    }

    #[tokio::test]
    async fn missing_proc_stat_fails_at_start() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SamplerConfig { net_interval: 0, ..config(dir.path()) };
        assert!(matches!(MetricsRegistry::start(&cfg), Err(DialError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_joins_every_worker() {
        let dir = tempfile::tempdir().unwrap();
        write_stat(dir.path(), 0);
        write_net(dir.path(), 0, 0);

        let registry = MetricsRegistry::start(&config(dir.path())).unwrap();
        assert_eq!(registry.running_workers(), 2);

        registry.shutdown().await;
        assert_eq!(registry.running_workers(), 0);
        // Still readable, just frozen.
        assert!(registry.cpu().is_ok());
    }

    #[tokio::test]
    async fn metric_sources_read_through_the_registry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("proc")).unwrap();
        fs::write(dir.path().join("proc/meminfo"), "MemTotal: 400 kB\nActive: 100 kB\n").unwrap();

        let cfg = SamplerConfig { cpu_interval: 0, net_interval: 0, ..config(dir.path()) };
        let registry = MetricsRegistry::start(&cfg).unwrap();

        assert_eq!(registry.source(MetricKind::Ram).produce().unwrap(), 25.0);
        assert!(matches!(
            registry.source(MetricKind::Temperature).produce(),
            Err(DialError::Config(_))
        ));
        assert!(matches!(
            registry.source(MetricKind::Battery("BAT1".into())).produce(),
            Err(DialError::Config(_))
        ));
        assert_eq!(MetricKind::NetDown.to_string(), "net_down");
    }
}
