//! LevelZ Core - Element types and their text forms
//!
//! Coordinates, blocks, matrices and headers, each with a canonical
//! `Display` form and a `FromStr` decoder that reports [`DecodeError`].

mod error;
mod coordinate;
mod block;
mod matrix;
mod header;
mod object;

pub use error::*;
pub use coordinate::*;
pub use block::*;
pub use matrix::*;
pub use header::*;
pub use object::*;
