//! Report domain models for both lineages.

mod source_model;
mod statistics;
mod target_model;

pub use source_model::*;
pub use statistics::*;
pub use target_model::*;
