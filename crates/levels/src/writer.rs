//! Level writer
//!
//! Flattens a level back into LevelZ text. Every placement gets its own
//! `block: [x, y]` line; matrices are not reconstructed.

use crate::level::Level;
use crate::{HEADER_END, LEVEL_END};
use levelz_config::{CodecConfig, LineEnding};
use levelz_core::Coordinate;
use std::fmt::{self, Write};

/// Writes levels as LevelZ text
#[derive(Debug, Clone, Copy)]
pub struct LevelWriter {
    line_ending: LineEnding,
    write_end_sentinel: bool,
}

impl Default for LevelWriter {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl LevelWriter {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            line_ending: config.line_ending,
            write_end_sentinel: config.write_end_sentinel,
        }
    }

    /// Write a level to a new string
    pub fn write<C: Coordinate>(&self, level: &Level<C>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_to(level, &mut out);
        out
    }

    /// Write a level into any `fmt::Write` sink
    pub fn write_to<C: Coordinate, W: Write + ?Sized>(&self, level: &Level<C>, out: &mut W) -> fmt::Result {
        let eol = self.line_ending.as_str();

        for header in level.headers() {
            write!(out, "{}{}", header, eol)?;
        }
        write!(out, "{}{}", HEADER_END, eol)?;

        for object in level.placements() {
            write!(out, "{}{}", object, eol)?;
        }

        if self.write_end_sentinel {
            write!(out, "{}{}", LEVEL_END, eol)?;
        }
        Ok(())
    }
}
