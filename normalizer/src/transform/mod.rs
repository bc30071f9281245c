//! Transformation module.
//!
//! - Expander: wide customs rows to long rows (pure, no I/O)
//! - Pipeline: file reading, expansion and CSV output

pub mod expander;
pub mod pipeline;

pub use expander::*;
pub use pipeline::*;
