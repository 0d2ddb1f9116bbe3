//! Background sampling of kernel-exposed counters.
//!
//! Rolling metrics (CPU, network) are fed by one Tokio worker each, owned by
//! a [`MetricsRegistry`].  Temperature keeps a seeded rolling mean updated on
//! every read; battery, RAM, brightness and uptime are one-shot reads.

pub mod battery;
pub mod brightness;
pub mod cpu;
pub mod memory;
pub mod network;
pub mod paths;
pub mod registry;
pub mod source;
pub mod temperature;
pub mod uptime;
pub mod window;
pub mod worker;

pub use battery::BatteryCharge;
pub use network::NetSample;
pub use paths::SysRoot;
pub use registry::{MetricKind, MetricSource, MetricsRegistry};
pub use source::SampleSource;
pub use uptime::Uptime;
pub use window::RollingWindow;
pub use worker::CounterSource;
