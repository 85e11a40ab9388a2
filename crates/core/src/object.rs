//! A single block placement

use crate::block::Block;
use crate::coordinate::Coordinate;
use crate::error::{DecodeError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One block at one coordinate
///
/// Text form is `block: [x, y]`, the shape every body line takes once matrix
/// and `*` lists have been expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelObject<C> {
    pub block: Arc<Block>,
    pub coordinate: C,
}

impl<C: Coordinate> LevelObject<C> {
    pub fn new(block: impl Into<Arc<Block>>, coordinate: C) -> Self {
        Self {
            block: block.into(),
            coordinate,
        }
    }
}

impl<C: Coordinate> fmt::Display for LevelObject<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.block, self.coordinate)
    }
}

impl<C: Coordinate> FromStr for LevelObject<C> {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let (block, coordinate) = s
            .split_once(':')
            .ok_or_else(|| DecodeError::placement(s, "missing ':' between block and coordinate"))?;
        let block: Block = block.parse()?;
        let coordinate: C = coordinate.parse()?;
        Ok(Self::new(block, coordinate))
    }
}
