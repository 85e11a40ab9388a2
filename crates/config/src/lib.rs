//! LevelZ Configuration Management
//!
//! Codec options are read from a plain `key = value` text file:
//!
//! ```text
//! # levelz.conf
//! max_matrix_size = 1048576
//! write_end_sentinel = true
//! line_ending = lf
//! ```
//!
//! Unknown keys and unparsable values are logged and the default is kept.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default config file name looked up by [`CodecConfig::load_default`]
pub const DEFAULT_CONFIG_FILE: &str = "levelz.conf";

/// Default cap on how many coordinates one matrix may expand to
pub const DEFAULT_MAX_MATRIX_SIZE: u64 = 1 << 20;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Line terminator used when writing levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => f.write_str("lf"),
            LineEnding::CrLf => f.write_str("crlf"),
        }
    }
}

/// Options shared by the parser and the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest matrix the parser will expand (from "max_matrix_size")
    pub max_matrix_size: u64,
    /// Whether the writer emits the trailing `end` line (from "write_end_sentinel")
    pub write_end_sentinel: bool,
    /// Line terminator for written levels (from "line_ending")
    pub line_ending: LineEnding,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_matrix_size: DEFAULT_MAX_MATRIX_SIZE,
            write_end_sentinel: true,
            line_ending: LineEnding::Lf,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded codec config from {}", path.display());
        Ok(Self::parse(&content))
    }

    /// Load `levelz.conf` from the working directory, or defaults if absent
    pub fn load_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(e) => {
                debug!("{}; using default codec config", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit path when given, otherwise [`CodecConfig::load_default`]
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => config.parse_option(key.trim(), value.trim()),
                None => warn!("Ignoring config line without '=': {}", line),
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "max_matrix_size" => match value.replace('_', "").parse::<u64>() {
                Ok(size) => self.max_matrix_size = size,
                Err(_) => warn!("Invalid max_matrix_size '{}', keeping {}", value, self.max_matrix_size),
            },
            "write_end_sentinel" => match value.parse::<bool>() {
                Ok(flag) => self.write_end_sentinel = flag,
                Err(_) => warn!("Invalid write_end_sentinel '{}', keeping {}", value, self.write_end_sentinel),
            },
            "line_ending" => match value.to_lowercase().as_str() {
                "lf" => self.line_ending = LineEnding::Lf,
                "crlf" => self.line_ending = LineEnding::CrLf,
                _ => warn!("Invalid line_ending '{}', keeping {}", value, self.line_ending),
            },
            _ => warn!("Unknown config option '{}'", key),
        }
    }
}
