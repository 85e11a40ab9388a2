//! Level file parser
//!
//! Parses LevelZ text. Input is read in two phases: header lines up to the
//! `---` sentinel, then placement lines up to the `end` sentinel. Both
//! sentinels may be omitted at end of input. The first malformed line aborts
//! the parse.

use crate::error::{LevelError, Result};
use crate::level::{AnyLevel, Level, Level2D, Level3D};
use crate::{HEADER_END, LEVEL_END};
use levelz_config::CodecConfig;
use levelz_core::{Block, Coordinate, CoordinateMatrix, DecodeError, Dimension, LevelHeader, TYPE_HEADER};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Level file parser
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level of a known dimensionality from a file
    pub fn load_file<C: Coordinate, P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Level<C>> {
        let data = Self::read_file(path.as_ref())?;
        Self::parse(&data, config)
    }

    /// Load a level from a file, picking 2D or 3D from its `type` header
    pub fn load_any<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<AnyLevel> {
        let data = Self::read_file(path.as_ref())?;
        Self::parse_any(&data, config)
    }

    fn read_file(path: &Path) -> Result<String> {
        let data = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }

    /// Parse a 2D level with default options
    pub fn parse_2d(data: &str) -> Result<Level2D> {
        Self::parse(data, &CodecConfig::default())
    }

    /// Parse a 3D level with default options
    pub fn parse_3d(data: &str) -> Result<Level3D> {
        Self::parse(data, &CodecConfig::default())
    }

    /// Parse a level, dispatching on its `type` header
    pub fn parse_any(data: &str, config: &CodecConfig) -> Result<AnyLevel> {
        match Self::detect_dimension(data)? {
            Dimension::Two => Self::parse::<levelz_core::Coordinate2D>(data, config).map(AnyLevel::TwoD),
            Dimension::Three => Self::parse::<levelz_core::Coordinate3D>(data, config).map(AnyLevel::ThreeD),
        }
    }

    /// Find the dimensionality declared by the `type` header
    ///
    /// Only the header section is scanned; header lines are not otherwise
    /// validated here.
    pub fn detect_dimension(data: &str) -> Result<Dimension> {
        for line in data.lines().map(str::trim) {
            if line == HEADER_END {
                break;
            }
            let Ok(header) = line.parse::<LevelHeader>() else {
                continue;
            };
            if header.name == TYPE_HEADER {
                return header.value.parse().map_err(LevelError::UnknownDimension);
            }
        }
        Err(LevelError::UnknownDimension(format!(
            "no '@{}' header before '{}'",
            TYPE_HEADER, HEADER_END
        )))
    }

    /// Parse level text into a level of dimensionality `C`
    pub fn parse<C: Coordinate>(data: &str, config: &CodecConfig) -> Result<Level<C>> {
        let mut level = Level::new();
        let mut lines = data.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

        let mut header_end = None;
        for (line_no, line) in lines.by_ref() {
            if line == HEADER_END {
                header_end = Some(line_no);
                break;
            }
            if line.is_empty() {
                continue;
            }
            Self::parse_header_line(&mut level, line_no, line)?;
        }

        match header_end {
            Some(line_no) => debug!("Read {} headers, body starts after line {}", level.header_count(), line_no),
            None => {
                debug!("Input ended in header section after {} headers", level.header_count());
                return Ok(level);
            }
        }

        let mut level_end = false;
        for (line_no, line) in lines.by_ref() {
            if line == LEVEL_END {
                level_end = true;
                break;
            }
            if line.is_empty() {
                continue;
            }
            Self::parse_body_line(&mut level, line_no, line, config)?;
        }

        if level_end {
            let trailing = lines.filter(|(_, line)| !line.is_empty()).count();
            if trailing > 0 {
                warn!("Ignoring {} line(s) after '{}'", trailing, LEVEL_END);
            }
        }

        debug!(
            "Parsed {}D level: {} headers, {} placements",
            C::DIMENSION,
            level.header_count(),
            level.placement_count()
        );
        Ok(level)
    }

    /// Parse one `@name value` line
    fn parse_header_line<C: Coordinate>(level: &mut Level<C>, line_no: usize, line: &str) -> Result<()> {
        let header: LevelHeader = line.parse().map_err(LevelError::decode(line_no))?;

        if header.name == TYPE_HEADER && header.value != C::DIMENSION.type_tag() {
            return Err(LevelError::TypeMismatch {
                line: line_no,
                expected: C::DIMENSION,
                found: header.value,
            });
        }

        // Also decodes the spawn coordinate
        level
            .add_header(header.name, header.value)
            .map_err(LevelError::decode(line_no))
    }

    /// Parse one `block : point*point*...` line
    fn parse_body_line<C: Coordinate>(
        level: &mut Level<C>,
        line_no: usize,
        line: &str,
        config: &CodecConfig,
    ) -> Result<()> {
        let (block_spec, points) = line.split_once(':').ok_or_else(|| LevelError::Decode {
            line: line_no,
            source: DecodeError::MalformedPlacement {
                input: line.to_string(),
                reason: "missing ':' between block and points".into(),
            },
        })?;

        let points = points.trim();
        if points.is_empty() {
            return Err(LevelError::UnexpectedEndOfInput {
                line: line_no,
                message: format!("'{}' ends before its point list", line),
            });
        }

        let block: Arc<Block> = Arc::new(block_spec.parse().map_err(LevelError::decode(line_no))?);

        let mut placed = 0u64;
        for token in points.split('*').map(str::trim) {
            if token.is_empty() {
                return Err(LevelError::UnexpectedEndOfInput {
                    line: line_no,
                    message: format!("empty point in '{}'", points),
                });
            }

            if token.starts_with('(') {
                let matrix: C::Matrix = token.parse().map_err(LevelError::decode(line_no))?;
                if matrix.is_empty() {
                    return Err(LevelError::Decode {
                        line: line_no,
                        source: DecodeError::MalformedMatrix {
                            input: token.to_string(),
                            reason: "a bound has max < min".into(),
                        },
                    });
                }
                placed += level
                    .add_matrix(Arc::clone(&block), &matrix, config.max_matrix_size)
                    .map_err(|e| LevelError::MatrixTooLarge {
                        line: line_no,
                        matrix: token.to_string(),
                        size: e.size,
                        max: e.max,
                    })?;
            } else {
                let coordinate: C = token.parse().map_err(LevelError::decode(line_no))?;
                level.add_block(coordinate, Arc::clone(&block));
                placed += 1;
            }
        }

        trace!("line {}: placed '{}' at {} coordinate(s)", line_no, block.name(), placed);
        Ok(())
    }
}
