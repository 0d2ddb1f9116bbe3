use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum DialError {
    /// A metric was queried while disabled, or a named resource (battery,
    /// backlight, interface, cpu line) does not exist on this machine.
    #[error("config error: {0}")]
    Config(String),

    /// A counter file vanished or became unreadable between two reads.
    #[error("transient read error on '{}': {source}", path.display())]
    TransientRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("wayland error: {0}")]
    Wayland(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DialError {
    /// `true` for errors a sampling worker should skip over rather than abort on.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientRead { .. })
    }
}

pub type Result<T, E = DialError> = std::result::Result<T, E>;
