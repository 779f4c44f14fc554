//! Core types for autoland report processing.

mod extraction;
mod report;

pub use extraction::*;
pub use report::*;
