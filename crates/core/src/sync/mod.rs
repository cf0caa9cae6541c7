//! Source-to-target reconciliation: mapper, matcher, engine, stats.

mod engine;
mod mapper;
mod matcher;
mod model;
mod stats;
mod stores;

pub use engine::*;
pub use mapper::*;
pub use matcher::*;
pub use model::*;
pub use stats::*;
pub use stores::*;

#[cfg(test)]
mod tests;
