//! Utility types and functions for FBX decoding.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam, [`Color`], FBX time conversion

mod error;
mod math;

pub use error::*;
pub use math::*;
