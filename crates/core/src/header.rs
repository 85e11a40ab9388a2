//! Level headers
//!
//! Header lines look like `@name value`. The value is everything after the
//! first run of whitespace following the name, so it may contain spaces.

use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header declaring the level dimensionality (`2` or `3`)
pub const TYPE_HEADER: &str = "type";

/// Header holding the spawn coordinate
pub const SPAWN_HEADER: &str = "spawn";

/// Header holding the camera scroll mode
pub const SCROLL_HEADER: &str = "scroll";

/// A `@name value` header
///
/// The name is a single whitespace-free word. The value is non-empty, has no
/// surrounding whitespace and stays on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HeaderData")]
pub struct LevelHeader {
    pub name: String,
    pub value: String,
}

#[derive(Deserialize)]
struct HeaderData {
    name: String,
    value: String,
}

impl TryFrom<HeaderData> for LevelHeader {
    type Error = DecodeError;

    fn try_from(data: HeaderData) -> Result<Self> {
        LevelHeader::new(data.name, data.value)
    }
}

impl LevelHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let value = value.into();

        if name.is_empty() {
            return Err(DecodeError::header(&name, "empty header name"));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DecodeError::header(&name, "header name must be a single word"));
        }
        if value.trim().is_empty() {
            return Err(DecodeError::header(&value, "header has no value"));
        }
        if value.trim() != value {
            return Err(DecodeError::header(&value, "header value has surrounding whitespace"));
        }
        if value.contains(['\n', '\r']) {
            return Err(DecodeError::header(&value, "header value spans more than one line"));
        }

        Ok(Self { name, value })
    }
}

impl fmt::Display for LevelHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {}", self.name, self.value)
    }
}

impl FromStr for LevelHeader {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let rest = line
            .strip_prefix('@')
            .ok_or_else(|| DecodeError::header(s, "header lines must start with '@'"))?;

        let (name, value) = rest
            .split_once(char::is_whitespace)
            .ok_or_else(|| DecodeError::header(s, "header has no value"))?;
        if name.is_empty() {
            return Err(DecodeError::header(s, "empty header name"));
        }

        Self::new(name, value.trim())
    }
}

/// Camera scroll behaviour declared by the `scroll` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scroll {
    None,
    HorizontalLeft,
    HorizontalRight,
    VerticalUp,
    VerticalDown,
}

impl Scroll {
    pub const fn as_str(self) -> &'static str {
        match self {
            Scroll::None => "none",
            Scroll::HorizontalLeft => "horizontal-left",
            Scroll::HorizontalRight => "horizontal-right",
            Scroll::VerticalUp => "vertical-up",
            Scroll::VerticalDown => "vertical-down",
        }
    }
}

impl fmt::Display for Scroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scroll {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Scroll::None),
            "horizontal-left" => Ok(Scroll::HorizontalLeft),
            "horizontal-right" => Ok(Scroll::HorizontalRight),
            "vertical-up" => Ok(Scroll::VerticalUp),
            "vertical-down" => Ok(Scroll::VerticalDown),
            other => Err(DecodeError::header(
                s,
                format!("unknown scroll mode '{}'", other),
            )),
        }
    }
}
