//! Level structure
//!
//! A level owns its headers, its spawn point and the placement index that
//! maps each coordinate to exactly one block.

use levelz_core::{
    Block, Coordinate, Coordinate2D, Coordinate3D, CoordinateMatrix, DecodeError, Dimension,
    LevelHeader, LevelObject, MatrixTooLarge, Scroll, SCROLL_HEADER, SPAWN_HEADER, TYPE_HEADER,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::writer::LevelWriter;

/// A 2D level
pub type Level2D = Level<Coordinate2D>;

/// A 3D level
pub type Level3D = Level<Coordinate3D>;

/// A LevelZ level
///
/// Headers keep their insertion order and are unique by name. Placements keep
/// the order their coordinates were first used; placing a block at an
/// occupied coordinate replaces the previous block there.
#[derive(Debug, Clone, Serialize)]
pub struct Level<C: Coordinate> {
    headers: Vec<LevelHeader>,
    spawn: C,
    placements: Vec<LevelObject<C>>,
    #[serde(skip)]
    index: HashMap<C, usize>,
}

impl<C: Coordinate> Default for Level<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Coordinate> Level<C> {
    /// Create an empty level spawning at the origin
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            spawn: C::origin(),
            placements: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty level with a `spawn` header
    pub fn with_spawn(spawn: C) -> Self {
        let mut level = Self::new();
        level.set_spawn(spawn);
        level
    }

    pub fn dimension(&self) -> Dimension {
        C::DIMENSION
    }

    /// Set a header, overwriting the value of an existing name in place
    ///
    /// A `type` header must name this level's dimensionality, and a `spawn`
    /// header must hold a coordinate, which also becomes the spawn point.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> levelz_core::Result<()> {
        let header = LevelHeader::new(name, value)?;

        if header.name == TYPE_HEADER && header.value != C::DIMENSION.type_tag() {
            return Err(DecodeError::MalformedHeader {
                input: header.to_string(),
                reason: format!("a {}D level must have type {}", C::DIMENSION, C::DIMENSION.type_tag()),
            });
        }
        if header.name == SPAWN_HEADER {
            self.spawn = header.value.parse()?;
        }

        self.put_header(header);
        Ok(())
    }

    fn put_header(&mut self, header: LevelHeader) {
        match self.headers.iter_mut().find(|h| h.name == header.name) {
            Some(existing) => existing.value = header.value,
            None => self.headers.push(header),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// Remove a header, returning its value
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let index = self.headers.iter().position(|h| h.name == name)?;
        Some(self.headers.remove(index).value)
    }

    pub fn headers(&self) -> impl Iterator<Item = &LevelHeader> {
        self.headers.iter()
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn spawn(&self) -> C {
        self.spawn
    }

    /// Set the spawn point and its `spawn` header
    pub fn set_spawn(&mut self, spawn: C) {
        self.spawn = spawn;
        self.put_header(LevelHeader {
            name: SPAWN_HEADER.to_string(),
            value: spawn.to_string(),
        });
    }

    /// Scroll mode from the `scroll` header, if one is set
    pub fn scroll(&self) -> levelz_core::Result<Option<Scroll>> {
        self.header(SCROLL_HEADER).map(str::parse::<Scroll>).transpose()
    }

    /// Place a block, returning the block it replaced
    pub fn add_block(&mut self, coordinate: C, block: impl Into<Arc<Block>>) -> Option<Arc<Block>> {
        let block = block.into();
        match self.index.get(&coordinate).copied() {
            Some(i) => Some(std::mem::replace(&mut self.placements[i].block, block)),
            None => {
                self.index.insert(coordinate, self.placements.len());
                self.placements.push(LevelObject { block, coordinate });
                None
            }
        }
    }

    /// Place one shared block at every coordinate of a matrix
    ///
    /// Matrices expanding to more than `max` coordinates are refused before
    /// anything is placed. Returns the number of coordinates visited.
    pub fn add_matrix(
        &mut self,
        block: impl Into<Arc<Block>>,
        matrix: &C::Matrix,
        max: u64,
    ) -> Result<u64, MatrixTooLarge> {
        matrix.checked_size(max)?;
        let block = block.into();
        let mut placed = 0;
        for coordinate in matrix.iter() {
            self.add_block(coordinate, Arc::clone(&block));
            placed += 1;
        }
        Ok(placed)
    }

    /// Remove the block at a coordinate
    pub fn remove_block(&mut self, coordinate: &C) -> Option<Arc<Block>> {
        let i = self.index.remove(coordinate)?;
        let removed = self.placements.remove(i);
        for object in &self.placements[i..] {
            if let Some(slot) = self.index.get_mut(&object.coordinate) {
                *slot -= 1;
            }
        }
        Some(removed.block)
    }

    pub fn block(&self, coordinate: &C) -> Option<&Arc<Block>> {
        self.index.get(coordinate).map(|&i| &self.placements[i].block)
    }

    pub fn contains(&self, coordinate: &C) -> bool {
        self.index.contains_key(coordinate)
    }

    /// Number of placements whose block has exactly this name
    pub fn count_blocks(&self, name: &str) -> usize {
        self.placements
            .iter()
            .filter(|object| object.block.name() == name)
            .count()
    }

    /// Placement counts per block name
    pub fn block_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for object in &self.placements {
            *counts.entry(object.block.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Total number of occupied coordinates
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in insertion order
    pub fn placements(&self) -> impl Iterator<Item = &LevelObject<C>> {
        self.placements.iter()
    }
}

/// Levels are equal when headers, spawn and the coordinate -> block mapping
/// match; placement order is not compared.
impl<C: Coordinate> PartialEq for Level<C> {
    fn eq(&self, other: &Self) -> bool {
        self.headers == other.headers
            && self.spawn == other.spawn
            && self.placements.len() == other.placements.len()
            && self
                .placements
                .iter()
                .all(|object| other.block(&object.coordinate) == Some(&object.block))
    }
}

impl<C: Coordinate> fmt::Display for Level<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        LevelWriter::default().write_to(self, f)
    }
}

/// A level of either dimensionality
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyLevel {
    TwoD(Level2D),
    ThreeD(Level3D),
}

impl AnyLevel {
    pub fn dimension(&self) -> Dimension {
        match self {
            AnyLevel::TwoD(_) => Dimension::Two,
            AnyLevel::ThreeD(_) => Dimension::Three,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            AnyLevel::TwoD(level) => level.header(name),
            AnyLevel::ThreeD(level) => level.header(name),
        }
    }

    pub fn header_count(&self) -> usize {
        match self {
            AnyLevel::TwoD(level) => level.header_count(),
            AnyLevel::ThreeD(level) => level.header_count(),
        }
    }

    pub fn placement_count(&self) -> usize {
        match self {
            AnyLevel::TwoD(level) => level.placement_count(),
            AnyLevel::ThreeD(level) => level.placement_count(),
        }
    }

    pub fn block_counts(&self) -> BTreeMap<&str, usize> {
        match self {
            AnyLevel::TwoD(level) => level.block_counts(),
            AnyLevel::ThreeD(level) => level.block_counts(),
        }
    }

    /// Spawn point in its text form
    pub fn spawn_text(&self) -> String {
        match self {
            AnyLevel::TwoD(level) => level.spawn().to_string(),
            AnyLevel::ThreeD(level) => level.spawn().to_string(),
        }
    }

    /// Serialize with an explicit writer
    pub fn write(&self, writer: &LevelWriter) -> String {
        match self {
            AnyLevel::TwoD(level) => writer.write(level),
            AnyLevel::ThreeD(level) => writer.write(level),
        }
    }
}

impl From<Level2D> for AnyLevel {
    fn from(level: Level2D) -> Self {
        AnyLevel::TwoD(level)
    }
}

impl From<Level3D> for AnyLevel {
    fn from(level: Level3D) -> Self {
        AnyLevel::ThreeD(level)
    }
}
