use crate::paths::{read_counter, SysRoot};
use crate::window::RollingWindow;
use dial_config::Averaging;
use dial_core::{DialError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Number of temperature reads in the rolling mean.
pub const TEMPERATURE_SAMPLES: usize = 10;

/// Thermal sensor with a seeded rolling mean.
///
/// Each [`read`](Self::read) takes one instantaneous reading.  The first
/// reading fills the whole window so the mean is stable immediately.
#[derive(Debug)]
pub struct TemperatureSensor {
    /// Candidate files in preference order, with the divisor to °C.
    candidates: [(PathBuf, f64); 2],
    window:     Mutex<RollingWindow<f64>>,
}

impl TemperatureSensor {
    pub fn new(root: &SysRoot) -> Self {
        Self {
            candidates: [
                (root.sys("class/thermal/thermal_zone0/temp"), 1000.0),
                (root.proc("acpi/thermal_zone/THM0/temperature"), 1.0),
            ],
            window: Mutex::new(RollingWindow::new(TEMPERATURE_SAMPLES)),
        }
    }

    /// Rolling mean in °C, or `None` when no sensor file exists.
    pub fn read(&self) -> Result<Option<f64>> {
        let Some((path, divisor)) = self.candidates.iter().find(|(p, _)| p.is_file()) else {
            return Ok(None);
        };
        let celsius = parse_reading(&read_counter(path)?, path)? / divisor;

        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        if window.is_empty() {
            for _ in 0..TEMPERATURE_SAMPLES {
                window.push(celsius);
            }
        } else {
            window.push(celsius);
        }
        Ok(Some(window.mean(Averaging::Capacity)))
    }
}

/// First numeric token: sysfs holds `45000`, ACPI holds `temperature: 45 C`.
fn parse_reading(raw: &str, path: &Path) -> Result<f64> {
    raw.split_whitespace()
        .find_map(|token| token.parse::<f64>().ok())
        .ok_or_else(|| DialError::Parse(format!("no temperature in '{}'", path.display())))
}
