use crate::paths::{read_value, SysRoot};
use dial_core::{DialError, Result};

/// Backlight level as a percentage of its maximum.
pub fn brightness(root: &SysRoot, backlight: &str) -> Result<f64> {
    let dir = root.sys("class/backlight").join(backlight);
    if !dir.is_dir() {
        return Err(DialError::Config(format!(
            "could not find info for backlight '{backlight}'"
        )));
    }

    let actual: u64 = read_value(&dir.join("actual_brightness"))?;
    let max: u64 = read_value(&dir.join("max_brightness"))?;
    if max == 0 {
        return Err(DialError::Config(format!("backlight '{backlight}' reports max_brightness 0")));
    }
    Ok(actual as f64 / max as f64 * 100.0)
}
