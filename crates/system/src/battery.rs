use crate::paths::{read_counter, SysRoot};
use dial_core::{DialError, Result};
use std::collections::HashMap;

/// Charge levels reported by a power supply's `uevent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryCharge {
    /// Charge right now.
    pub current: u64,
    /// Charge when last full.
    pub full:    u64,
    /// Charge the cell was designed to hold.
    pub design:  u64,
}

impl BatteryCharge {
    /// `current / full` as a percentage.
    pub fn percent(&self) -> f64 {
        ratio(self.current, self.full)
    }

    /// `full / design` as a percentage — how much of its capacity the cell has left.
    pub fn health(&self) -> f64 {
        ratio(self.full, self.design)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64 * 100.0
}

/// Read `/sys/class/power_supply/<name>/uevent`.
///
/// Reads the `CHARGE_*` keys (µAh), or the `ENERGY_*` keys (µWh) when the
/// firmware reports no `CHARGE_NOW`.
pub fn read_charge(root: &SysRoot, name: &str) -> Result<BatteryCharge> {
    let path = root.sys("class/power_supply").join(name).join("uevent");
    if !path.is_file() {
        return Err(DialError::Config(format!("battery '{name}' was not found")));
    }

    let raw = read_counter(&path)?;
    let info: HashMap<&str, &str> = raw
        .lines()
        .filter_map(|line| line.split_once('='))
        .collect();

    // One family for all three fields; CHARGE is µAh and ENERGY is µWh.
    let kind = ["CHARGE", "ENERGY"]
        .into_iter()
        .find(|kind| info.contains_key(format!("POWER_SUPPLY_{kind}_NOW").as_str()))
        .ok_or_else(|| DialError::Config(format!("battery '{name}' reports no charge level")))?;

    let field = |suffix: &str| -> Result<u64> {
        let key = format!("POWER_SUPPLY_{kind}_{suffix}");
        let value = info
            .get(key.as_str())
            .ok_or_else(|| DialError::Config(format!("battery '{name}' reports no {key}")))?;
        value
            .trim()
            .parse()
            .map_err(|_| DialError::Parse(format!("battery '{name}' {suffix} = '{value}'")))
    };

    Ok(BatteryCharge {
        current: field("NOW")?,
        full:    field("FULL")?,
        design:  field("FULL_DESIGN")?,
    })
}
