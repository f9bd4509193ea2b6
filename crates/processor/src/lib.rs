//! Points and level calculation

pub mod catalog;
pub mod levels;
pub mod points;


pub use catalog::PointsCatalog;
pub use levels::calculate_level_progress;
pub use points::{calculate_points, PointsCalculator};
