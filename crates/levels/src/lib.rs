//! # LevelZ Levels
//!
//! This crate reads and writes LevelZ level files.
//!
//! ## Features
//! - 2D and 3D levels behind one generic [`Level`] type
//! - Header section with `type`, `spawn` and free-form headers
//! - Placement lines with `*` point lists and coordinate matrices
//! - Writer that flattens a level back to text
//!
//! ## Level Format
//!
//! ```text
//! @type 2
//! @spawn [0, 0]
//! ---
//! grass: [0, 0]*[0, 1]
//! door<open=true>: [1, 2]
//! cobble: (0, 2, 0, 2)^[3, 3]
//! end
//! ```
//!
//! - **Headers**: `@name value` lines, ended by `---`
//! - **Body**: `block: points` lines, ended by `end`

pub mod error;
pub mod level;
pub mod parser;
pub mod writer;

/// Line separating the header section from the body
pub const HEADER_END: &str = "---";

/// Line ending the body
pub const LEVEL_END: &str = "end";

pub use error::{ErrorKind, LevelError, Result};
pub use level::{AnyLevel, Level, Level2D, Level3D};
pub use parser::LevelLoader;
pub use writer::LevelWriter;
