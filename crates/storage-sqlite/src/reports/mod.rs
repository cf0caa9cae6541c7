//! Report table models and repository.

mod model;
mod repository;

pub use model::{ReportDB, ReportUpdateDB};
pub use repository::ReportRepository;
