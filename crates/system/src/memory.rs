use crate::paths::{read_counter, SysRoot};
use dial_core::{DialError, Result};

/// Active memory as a percentage of `MemTotal`, from `/proc/meminfo`.
pub fn ram_percent(root: &SysRoot) -> Result<f64> {
    let path = root.proc("meminfo");
    if !path.is_file() {
        return Err(DialError::Config(format!("'{}' does not exist", path.display())));
    }
    let raw = read_counter(&path)?;

    let total  = meminfo_kib(&raw, "MemTotal")?;
    let active = meminfo_kib(&raw, "Active")?;
    if total == 0 {
        return Err(DialError::Parse("MemTotal is 0".to_string()));
    }
    Ok(active as f64 / total as f64 * 100.0)
}

/// Value of `key` in kB; `Active` does not match `Active(anon)`.
fn meminfo_kib(raw: &str, key: &str) -> Result<u64> {
    let value = raw
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim() == key)
        .map(|(_, value)| value.trim().trim_end_matches("kB").trim())
        .ok_or_else(|| DialError::Config(format!("meminfo has no '{key}' field")))?;

    value
        .parse()
        .map_err(|_| DialError::Parse(format!("meminfo '{key}' = '{value}'")))
}
