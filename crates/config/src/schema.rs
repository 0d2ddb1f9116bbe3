use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `dial.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Overlay surface placement and redraw cadence.
    pub window: WindowConfig,
    /// Background sampler intervals and sources.
    pub sampler: SamplerConfig,
    /// Hardware names used by the point-in-time gauges.
    pub gauges: GaugeConfig,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

/// Overlay surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Offset from the left screen edge in logical pixels.
    pub x: i32,
    /// Offset from the top screen edge in logical pixels.
    pub y: i32,
    /// Surface width; `0` stretches across the output.
    pub width: u32,
    /// Surface height; `0` stretches from `y` to the bottom edge.
    pub height: u32,
    /// Redraw cadence in milliseconds, independent of any sampler interval.
    pub update_delay_ms: u64,
    /// Which layer-shell layer hosts the overlay.
    pub layer: SurfaceLayer,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 550,
            width: 0,
            height: 0,
            update_delay_ms: 1_000,
            layer: SurfaceLayer::Bottom,
        }
    }
}

/// Layer-shell layer the overlay is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLayer {
    Background,
    #[default]
    Bottom,
}

/// Sampler settings.  An interval of `0` disables that metric entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// CPU sampling interval in seconds.
    pub cpu_interval: u64,
    /// Network sampling interval in seconds.
    pub net_interval: u64,
    /// Interface whose byte counters feed the network graphs.
    pub net_interface: String,
    /// `/proc/stat` line to sample (`"cpu"` = all cores, `"cpu0"`, …).
    pub cpu_core: String,
    /// Tick field whose delta becomes the CPU value.
    pub cpu_field: CpuField,
    /// How rolling windows are averaged before they fill up.
    pub averaging: Averaging,
    /// Root that `/proc` and `/sys` paths are resolved against.
    pub sys_root: PathBuf,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cpu_interval:  1,
            net_interval:  1,
            net_interface: "wlan0".to_string(),
            cpu_core:      "cpu".to_string(),
            cpu_field:     CpuField::Idle,
            averaging:     Averaging::Filled,
            sys_root:      PathBuf::from("/"),
        }
    }
}

/// A column of a `/proc/stat` cpu line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CpuField {
    User,
    Nice,
    System,
    #[default]
    Idle,
    Iowait,
    /// Sum of every column except `idle` and `iowait`.
    Busy,
}

/// Rolling-window averaging mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Averaging {
    /// Divide by the number of samples currently held.
    #[default]
    Filled,
    /// Divide by the window capacity even while it is still filling, so
    /// early values read low until the window is full.
    Capacity,
}

/// Names of the hardware the point-in-time gauges read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Power-supply name under `/sys/class/power_supply`.
    pub battery: String,
    /// Backlight name under `/sys/class/backlight`; when set, a thin
    /// brightness ring is drawn inside the CPU gauge.
    pub backlight: Option<String>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            battery:   "BAT1".to_string(),
            backlight: None,
        }
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Colour of the translucent gauge tracks (hex, e.g. `"#3399A8"`).
    pub background: String,
    /// Opacity of the gauge tracks (0.0 – 1.0).
    pub background_alpha: f32,
    /// Gauge colours in layout order: cpu, net up, battery, temp, net down, ram.
    pub foreground: Vec<String>,
    /// Clock text colours: primary, secondary.
    pub text: Vec<String>,
    /// Opacity applied to every gauge and label.
    pub foreground_alpha: f32,
    /// Base font size of the clock labels in points.
    pub font_size: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:       "#3399A8".to_string(),
            background_alpha: 0.1,
            foreground: ["#3399A8", "#3399A8", "#06D46C", "#06D46C", "#F4E730", "#3399A8"]
                .into_iter()
                .map(String::from)
                .collect(),
            text:             vec!["#3399A8".to_string(), "#06D46C".to_string()],
            foreground_alpha: 0.8,
            font_size:        25.0,
        }
    }
}
