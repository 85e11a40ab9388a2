//! Coordinate matrices
//!
//! A matrix is the compact `(minX, maxX, minY, maxY)^[sx, sy]` notation for
//! an inclusive, axis-aligned block of coordinates offset by a start point.
//! Matrices are generators: nothing is allocated until a caller asks for
//! [`CoordinateMatrix::coordinates`], and that call is capped.

use crate::coordinate::{Coordinate, Coordinate2D, Coordinate3D};
use crate::error::{DecodeError, MatrixTooLarge, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common behaviour of 2D and 3D matrices
///
/// Expansion order is X outermost, then Y, then Z innermost.
pub trait CoordinateMatrix {
    type Coord: Coordinate;

    /// Number of coordinates this matrix expands to
    ///
    /// Zero when any axis has `max < min`. Saturates at `u64::MAX` instead of
    /// overflowing, so `u64::MAX` means "at least that many": a 2D matrix
    /// spanning the full `i32` range on both axes has 2^64 coordinates.
    fn size(&self) -> u64;

    /// The coordinate at a linear index, without expanding the matrix
    fn coordinate_at(&self, index: u64) -> Option<Self::Coord>;

    /// Offset added to every generated coordinate
    fn start(&self) -> Self::Coord;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The size, or an error when it exceeds `max`
    fn checked_size(&self, max: u64) -> std::result::Result<u64, MatrixTooLarge> {
        let size = self.size();
        if size > max {
            return Err(MatrixTooLarge { size, max });
        }
        Ok(size)
    }

    /// Lazily iterate over the generated coordinates
    fn iter(&self) -> MatrixIter<'_, Self>
    where
        Self: Sized,
    {
        MatrixIter {
            matrix: self,
            index: 0,
            size: self.size(),
        }
    }

    /// Materialize every generated coordinate, refusing matrices larger than `max`
    fn coordinates(&self, max: u64) -> std::result::Result<Vec<Self::Coord>, MatrixTooLarge>
    where
        Self: Sized,
    {
        self.checked_size(max)?;
        Ok(self.iter().collect())
    }
}

/// Iterator over the coordinates of a matrix
#[derive(Debug, Clone)]
pub struct MatrixIter<'a, M> {
    matrix: &'a M,
    index: u64,
    size: u64,
}

impl<M: CoordinateMatrix> Iterator for MatrixIter<'_, M> {
    type Item = M::Coord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.size {
            return None;
        }
        let coordinate = self.matrix.coordinate_at(self.index);
        self.index += 1;
        coordinate
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // A saturated size is only a lower bound
        if self.size == u64::MAX {
            return (usize::MAX, None);
        }
        let remaining = self.size - self.index;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Inclusive length of one axis, zero when inverted
#[inline]
fn span(min: i32, max: i32) -> u64 {
    if max < min {
        0
    } else {
        (i64::from(max) - i64::from(min) + 1) as u64
    }
}

#[inline]
fn offset(min: i32, step: u64) -> f64 {
    (i64::from(min) + step as i64) as f64
}

/// Parse the integer bounds before the `^`
fn parse_bounds<const N: usize>(input: &str, bounds: &str) -> Result<[i32; N]> {
    let tokens: Vec<&str> = bounds
        .split(|c: char| matches!(c, '(' | ')' | '[' | ']' | ',') || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != N {
        return Err(DecodeError::matrix(
            input,
            format!("expected {} bounds, found {}", N, tokens.len()),
        ));
    }

    let mut values = [0; N];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token
            .parse()
            .map_err(|_| DecodeError::matrix(input, format!("bound '{}' is not an integer", token)))?;
    }
    Ok(values)
}

/// Split matrix text into its bounds and start halves
fn split_matrix<C: Coordinate>(input: &str) -> Result<(&str, C)> {
    let trimmed = input.trim();
    if !trimmed.starts_with('(') {
        return Err(DecodeError::matrix(input, "matrix must start with '('"));
    }
    let (bounds, start) = trimmed
        .split_once('^')
        .ok_or_else(|| DecodeError::matrix(input, "missing '^' before start coordinate"))?;
    let start = start
        .parse::<C>()
        .map_err(|e| DecodeError::matrix(input, format!("bad start coordinate: {}", e)))?;
    Ok((bounds, start))
}

/// A 2D coordinate matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMatrix2D {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub start: Coordinate2D,
}

impl CoordinateMatrix2D {
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32, start: Coordinate2D) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            start,
        }
    }
}

impl CoordinateMatrix for CoordinateMatrix2D {
    type Coord = Coordinate2D;

    fn size(&self) -> u64 {
        span(self.min_x, self.max_x).saturating_mul(span(self.min_y, self.max_y))
    }

    fn coordinate_at(&self, index: u64) -> Option<Coordinate2D> {
        if index >= self.size() {
            return None;
        }
        let height = span(self.min_y, self.max_y);
        let x = offset(self.min_x, index / height);
        let y = offset(self.min_y, index % height);
        Some(Coordinate2D::new(x, y) + self.start)
    }

    fn start(&self) -> Coordinate2D {
        self.start
    }
}

impl fmt::Display for CoordinateMatrix2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})^{}",
            self.min_x, self.max_x, self.min_y, self.max_y, self.start
        )
    }
}

impl FromStr for CoordinateMatrix2D {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let (bounds, start) = split_matrix::<Coordinate2D>(s)?;
        let [min_x, max_x, min_y, max_y] = parse_bounds::<4>(s, bounds)?;
        Ok(Self::new(min_x, max_x, min_y, max_y, start))
    }
}

/// A 3D coordinate matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMatrix3D {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
    pub start: Coordinate3D,
}

impl CoordinateMatrix3D {
    pub const fn new(
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
        min_z: i32,
        max_z: i32,
        start: Coordinate3D,
    ) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            min_z,
            max_z,
            start,
        }
    }
}

impl CoordinateMatrix for CoordinateMatrix3D {
    type Coord = Coordinate3D;

    fn size(&self) -> u64 {
        span(self.min_x, self.max_x)
            .saturating_mul(span(self.min_y, self.max_y))
            .saturating_mul(span(self.min_z, self.max_z))
    }

    fn coordinate_at(&self, index: u64) -> Option<Coordinate3D> {
        if index >= self.size() {
            return None;
        }
        let height = span(self.min_y, self.max_y);
        let depth = span(self.min_z, self.max_z);
        let x = offset(self.min_x, index / height.saturating_mul(depth));
        let y = offset(self.min_y, (index / depth) % height);
        let z = offset(self.min_z, index % depth);
        Some(Coordinate3D::new(x, y, z) + self.start)
    }

    fn start(&self) -> Coordinate3D {
        self.start
    }
}

impl fmt::Display for CoordinateMatrix3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})^{}",
            self.min_x, self.max_x, self.min_y, self.max_y, self.min_z, self.max_z, self.start
        )
    }
}

impl FromStr for CoordinateMatrix3D {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let (bounds, start) = split_matrix::<Coordinate3D>(s)?;
        let [min_x, max_x, min_y, max_y, min_z, max_z] = parse_bounds::<6>(s, bounds)?;
        Ok(Self::new(min_x, max_x, min_y, max_y, min_z, max_z, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const MAX: u64 = 4096;

    #[test]
    fn test_matrix_2d_size_and_text() {
        let matrix = CoordinateMatrix2D::new(0, 3, 0, 3, Coordinate2D::new(0.0, 0.0));
        assert_eq!(matrix.size(), 16);
        assert_eq!(matrix.to_string(), "(0, 3, 0, 3)^[0, 0]");
        assert_eq!(matrix.coordinates(MAX).unwrap().len(), 16);
    }

    #[test]
    fn test_matrix_2d_expansion_order() {
        let matrix = CoordinateMatrix2D::new(0, 1, 0, 2, Coordinate2D::new(10.0, 20.0));
        let coords = matrix.coordinates(MAX).unwrap();
        assert_eq!(coords[0], Coordinate2D::new(10.0, 20.0));
        assert_eq!(coords[1], Coordinate2D::new(10.0, 21.0));
        assert_eq!(coords[2], Coordinate2D::new(10.0, 22.0));
        assert_eq!(coords[3], Coordinate2D::new(11.0, 20.0));
        assert_eq!(coords[5], Coordinate2D::new(11.0, 22.0));
    }

    #[test]
    fn test_matrix_3d_expansion_order() {
        let matrix = CoordinateMatrix3D::new(0, 1, 0, 1, 0, 1, Coordinate3D::new(0.0, 0.0, 0.0));
        let coords = matrix.coordinates(MAX).unwrap();
        assert_eq!(coords.len(), 8);
        assert_eq!(coords[0], Coordinate3D::new(0.0, 0.0, 0.0));
        assert_eq!(coords[1], Coordinate3D::new(0.0, 0.0, 1.0));
        assert_eq!(coords[2], Coordinate3D::new(0.0, 1.0, 0.0));
        assert_eq!(coords[4], Coordinate3D::new(1.0, 0.0, 0.0));
        assert_eq!(coords[7], Coordinate3D::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_single_cell_matrix_is_start() {
        let start = Coordinate3D::new(4.0, 5.5, -6.0);
        let matrix = CoordinateMatrix3D::new(0, 0, 0, 0, 0, 0, start);
        assert_eq!(matrix.coordinates(MAX).unwrap(), vec![start]);

        let matrix = CoordinateMatrix2D::new(7, 7, -2, -2, Coordinate2D::new(0.0, 0.0));
        assert_eq!(matrix.coordinates(MAX).unwrap(), vec![Coordinate2D::new(7.0, -2.0)]);
    }

    #[test]
    fn test_inverted_bounds_are_empty() {
        let matrix = CoordinateMatrix2D::new(3, 1, 3, 1, Coordinate2D::new(0.0, 0.0));
        assert_eq!(matrix.size(), 0);
        assert!(matrix.is_empty());
        assert!(matrix.coordinates(MAX).unwrap().is_empty());
        assert_eq!(matrix.coordinate_at(0), None);
    }

    #[test]
    fn test_huge_matrix_size_saturates() {
        let matrix = CoordinateMatrix3D::new(
            i32::MIN,
            i32::MAX,
            i32::MIN,
            i32::MAX,
            i32::MIN,
            i32::MAX,
            Coordinate3D::new(0.0, 0.0, 0.0),
        );
        assert_eq!(matrix.size(), u64::MAX);
        assert_eq!(
            matrix.coordinate_at(0),
            Some(Coordinate3D::new(i32::MIN as f64, i32::MIN as f64, i32::MIN as f64))
        );
    }

    #[test]
    fn test_full_range_2d_size_hint_is_open() {
        let matrix = CoordinateMatrix2D::new(i32::MIN, i32::MAX, i32::MIN, i32::MAX, Coordinate2D::new(0.0, 0.0));
        assert_eq!(matrix.size(), u64::MAX);
        assert_eq!(matrix.iter().size_hint(), (usize::MAX, None));
    }

    #[test]
    fn test_coordinates_refuses_oversized_matrix() {
        let matrix = CoordinateMatrix2D::new(i32::MIN, i32::MAX, 0, 1 << 20, Coordinate2D::new(0.0, 0.0));
        let err = matrix.coordinates(1 << 20).unwrap_err();
        assert_eq!(err.size, matrix.size());
        assert_eq!(err.max, 1 << 20);

        let matrix = CoordinateMatrix3D::new(0, 9, 0, 9, 0, 9, Coordinate3D::new(0.0, 0.0, 0.0));
        assert_eq!(matrix.checked_size(999), Err(MatrixTooLarge { size: 1000, max: 999 }));
        assert_eq!(matrix.coordinates(1000).unwrap().len(), 1000);
    }

    #[test]
    fn test_parse_matrix() {
        let matrix: CoordinateMatrix2D = "(0, 2, 0, 2)^[3, 3]".parse().unwrap();
        assert_eq!(matrix, CoordinateMatrix2D::new(0, 2, 0, 2, Coordinate2D::new(3.0, 3.0)));

        let matrix: CoordinateMatrix3D = "(0,1,2,3,4,5)^[0.5, 1, 2]".parse().unwrap();
        assert_eq!(matrix.min_z, 4);
        assert_eq!(matrix.start, Coordinate3D::new(0.5, 1.0, 2.0));
    }

    #[test]
    fn test_parse_matrix_errors() {
        let cases = [
            "(0, 2, 0)^[3, 3]",
            "(0, 2, 0, 2, 0, 2)^[3, 3]",
            "(0, a, 0, 2)^[3, 3]",
            "(0, 1.5, 0, 2)^[3, 3]",
            "(0, 2, 0, 2)",
            "(0, 2, 0, 2)^[3]",
            "[0, 2, 0, 2]^[3, 3]",
        ];
        for case in cases {
            assert!(
                matches!(
                    case.parse::<CoordinateMatrix2D>(),
                    Err(DecodeError::MalformedMatrix { .. })
                ),
                "expected failure for {}",
                case
            );
        }
    }

    #[test]
    fn test_iter_size_hint() {
        let matrix = CoordinateMatrix2D::new(0, 4, 0, 1, Coordinate2D::new(0.0, 0.0));
        let mut iter = matrix.iter();
        assert_eq!(iter.size_hint(), (10, Some(10)));
        iter.next();
        assert_eq!(iter.size_hint(), (9, Some(9)));
    }

    proptest! {
        #[test]
        fn prop_matrix_3d_matches_nested_loops(
            min_x in -5i32..5, dx in 0i32..4,
            min_y in -5i32..5, dy in 0i32..4,
            min_z in -5i32..5, dz in 0i32..4,
        ) {
            let start = Coordinate3D::new(1.0, 2.0, 3.0);
            let matrix = CoordinateMatrix3D::new(
                min_x, min_x + dx, min_y, min_y + dy, min_z, min_z + dz, start,
            );

            let mut expected = Vec::new();
            for x in min_x..=min_x + dx {
                for y in min_y..=min_y + dy {
                    for z in min_z..=min_z + dz {
                        expected.push(Coordinate3D::new(x as f64, y as f64, z as f64) + start);
                    }
                }
            }

            prop_assert_eq!(matrix.size(), expected.len() as u64);
            prop_assert_eq!(&matrix.coordinates(MAX).unwrap(), &expected);
            for (i, coordinate) in expected.iter().enumerate() {
                prop_assert_eq!(matrix.coordinate_at(i as u64), Some(*coordinate));
            }
            prop_assert_eq!(matrix.coordinate_at(expected.len() as u64), None);

            let unique: HashSet<_> = expected.iter().copied().collect();
            prop_assert_eq!(unique.len(), expected.len());
        }

        #[test]
        fn prop_matrix_2d_matches_nested_loops(
            min_x in -50i32..50, dx in 0i32..6,
            min_y in -50i32..50, dy in 0i32..6,
        ) {
            let start = Coordinate2D::new(-0.5, 4.0);
            let matrix = CoordinateMatrix2D::new(min_x, min_x + dx, min_y, min_y + dy, start);

            let mut expected = Vec::new();
            for x in min_x..=min_x + dx {
                for y in min_y..=min_y + dy {
                    expected.push(Coordinate2D::new(x as f64, y as f64) + start);
                }
            }

            prop_assert_eq!(matrix.size(), expected.len() as u64);
            prop_assert_eq!(&matrix.coordinates(MAX).unwrap(), &expected);
            let lazy: Vec<_> = matrix.iter().collect();
            prop_assert_eq!(&lazy, &expected);
        }

        #[test]
        fn prop_matrix_2d_text_round_trip(
            min_x in -100i32..100, max_x in -100i32..100,
            min_y in -100i32..100, max_y in -100i32..100,
        ) {
            let matrix = CoordinateMatrix2D::new(min_x, max_x, min_y, max_y, Coordinate2D::new(0.5, -1.0));
            prop_assert_eq!(matrix.to_string().parse::<CoordinateMatrix2D>().unwrap(), matrix);
        }
    }
}
