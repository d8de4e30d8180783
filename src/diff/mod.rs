pub mod engine;
pub mod report;

pub use engine::{diff, validate_threshold, DiffResult};
pub use report::{DiffReport, ReadRecommendation, TileDetail};
