use dial_core::{DialError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Filesystem root that `/proc` and `/sys` are resolved against.
///
/// Production uses `/`; tests point it at a fixture tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysRoot(PathBuf);

impl SysRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    /// `<root>/proc/<rel>`
    pub fn proc(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.0.join("proc").join(rel)
    }

    /// `<root>/sys/<rel>`
    pub fn sys(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.0.join("sys").join(rel)
    }
}

impl Default for SysRoot {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Read a counter file, mapping I/O failures to [`DialError::TransientRead`].
pub(crate) fn read_counter(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DialError::TransientRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the first line of a single-value counter file.
pub(crate) fn parse_value<T: FromStr>(raw: &str, path: &Path) -> Result<T> {
    let first = raw.lines().next().unwrap_or_default().trim();
    first.parse().map_err(|_| {
        DialError::Parse(format!("'{first}' in '{}' is not a number", path.display()))
    })
}

/// Read and parse a single-value counter file in one go.
pub(crate) fn read_value<T: FromStr>(path: &Path) -> Result<T> {
    parse_value(&read_counter(path)?, path)
}
