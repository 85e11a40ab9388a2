//! Coordinate types for block placements
//!
//! LevelZ levels are either 2D or 3D. Both coordinate kinds share the
//! [`Coordinate`] trait so the level, parser and writer can be written once.

use crate::error::{DecodeError, Result};
use crate::matrix::{CoordinateMatrix, CoordinateMatrix2D, CoordinateMatrix3D};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Level dimensionality, as declared by the `type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    /// Value of the `type` header for this dimensionality
    pub const fn type_tag(self) -> &'static str {
        match self {
            Dimension::Two => "2",
            Dimension::Three => "3",
        }
    }

    /// Number of axes
    pub const fn axes(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "2" => Ok(Dimension::Two),
            "3" => Ok(Dimension::Three),
            other => Err(format!("unknown level type '{}'", other)),
        }
    }
}

/// A point a block can be placed at
///
/// Implemented by [`Coordinate2D`] and [`Coordinate3D`]. Equality and hashing
/// are component-wise, with `-0.0` and `0.0` treated as the same value.
pub trait Coordinate:
    Copy
    + Eq
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = DecodeError>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Serialize
    + Send
    + Sync
    + 'static
{
    /// Dimensionality of this coordinate kind
    const DIMENSION: Dimension;

    /// Matrix type that expands into this coordinate kind
    type Matrix: CoordinateMatrix<Coord = Self> + FromStr<Err = DecodeError> + fmt::Display;

    /// The origin (all components zero)
    fn origin() -> Self;

    /// Euclidean norm from the origin
    fn magnitude(&self) -> f64;

    /// Euclidean distance to another coordinate
    fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }
}

/// Canonical bit pattern for equality and hashing
#[inline]
fn component_key(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Write one component in its minimal decimal form
///
/// `f64`'s `Display` already omits the fractional part of whole numbers and
/// prints the shortest text that parses back to the same value.
fn write_component(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value == 0.0 {
        f.write_str("0")
    } else {
        write!(f, "{}", value)
    }
}

/// Extract exactly `N` numeric components from coordinate text
///
/// Brackets, commas and whitespace are treated as delimiters, so `[1,2]`,
/// `[ 1 , 2 ]` and `1 2` all decode the same way.
pub(crate) fn parse_components<const N: usize>(input: &str) -> Result<[f64; N]> {
    let tokens: Vec<&str> = input
        .split(|c: char| matches!(c, '[' | ']' | ',') || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != N {
        return Err(DecodeError::coordinate(
            input,
            format!("expected {} components, found {}", N, tokens.len()),
        ));
    }

    let mut components = [0.0; N];
    for (slot, token) in components.iter_mut().zip(&tokens) {
        let value: f64 = token
            .parse()
            .map_err(|_| DecodeError::coordinate(input, format!("'{}' is not a number", token)))?;
        if !value.is_finite() {
            return Err(DecodeError::coordinate(
                input,
                format!("'{}' is not a finite number", token),
            ));
        }
        *slot = value;
    }

    Ok(components)
}

/// A point in 2D space
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate2D {
    x: f64,
    y: f64,
}

impl Coordinate2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn x(&self) -> f64 {
        self.x
    }

    pub const fn y(&self) -> f64 {
        self.y
    }
}

impl Coordinate for Coordinate2D {
    const DIMENSION: Dimension = Dimension::Two;
    type Matrix = CoordinateMatrix2D;

    fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl PartialEq for Coordinate2D {
    fn eq(&self, other: &Self) -> bool {
        component_key(self.x) == component_key(other.x)
            && component_key(self.y) == component_key(other.y)
    }
}

impl Eq for Coordinate2D {}

impl Hash for Coordinate2D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        component_key(self.x).hash(state);
        component_key(self.y).hash(state);
    }
}

impl Add for Coordinate2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Coordinate2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_component(f, self.x)?;
        f.write_str(", ")?;
        write_component(f, self.y)?;
        f.write_str("]")
    }
}

impl FromStr for Coordinate2D {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let [x, y] = parse_components::<2>(s)?;
        Ok(Self::new(x, y))
    }
}

impl From<[f64; 2]> for Coordinate2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A point in 3D space
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate3D {
    x: f64,
    y: f64,
    z: f64,
}

impl Coordinate3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn x(&self) -> f64 {
        self.x
    }

    pub const fn y(&self) -> f64 {
        self.y
    }

    pub const fn z(&self) -> f64 {
        self.z
    }
}

impl Coordinate for Coordinate3D {
    const DIMENSION: Dimension = Dimension::Three;
    type Matrix = CoordinateMatrix3D;

    fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl PartialEq for Coordinate3D {
    fn eq(&self, other: &Self) -> bool {
        component_key(self.x) == component_key(other.x)
            && component_key(self.y) == component_key(other.y)
            && component_key(self.z) == component_key(other.z)
    }
}

impl Eq for Coordinate3D {}

impl Hash for Coordinate3D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        component_key(self.x).hash(state);
        component_key(self.y).hash(state);
        component_key(self.z).hash(state);
    }
}

impl Add for Coordinate3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coordinate3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Coordinate3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_component(f, self.x)?;
        f.write_str(", ")?;
        write_component(f, self.y)?;
        f.write_str(", ")?;
        write_component(f, self.z)?;
        f.write_str("]")
    }
}

impl FromStr for Coordinate3D {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let [x, y, z] = parse_components::<3>(s)?;
        Ok(Self::new(x, y, z))
    }
}

impl From<[f64; 3]> for Coordinate3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}
