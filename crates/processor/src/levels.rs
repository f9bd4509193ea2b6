//! Level progress calculation

use common::models::{LevelProgress, LevelThresholds};
use common::{Error, Result};

/// Map a cumulative point total onto the level table.
///
/// Totals at or past the last configured threshold stay on the last level,
/// with the next threshold taken as twice the last one.
pub fn calculate_level_progress(
    total_points: i64,
    thresholds: &LevelThresholds,
) -> Result<LevelProgress> {
    if total_points < 0 {
        return Err(Error::InvalidArgument(format!(
            "total points must be non-negative, got {}",
            total_points
        )));
    }

    let levels = thresholds.levels();
    let mut current = levels[0];
    let mut next = None;
    for level in levels {
        if level.min_points <= total_points {
            current = *level;
        } else {
            next = Some(level.min_points);
            break;
        }
    }

    let previous_level_threshold = current.min_points;
    let next_level_threshold = next.unwrap_or_else(|| thresholds.last().min_points.saturating_mul(2));

    let band = next_level_threshold - previous_level_threshold;
    let progress_percentage = if band > 0 {
        ((total_points - previous_level_threshold) as f64 / band as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    Ok(LevelProgress {
        current_level: current.level,
        total_points,
        previous_level_threshold,
        next_level_threshold,
        points_to_next_level: (next_level_threshold - total_points).max(0),
        progress_percentage,
    })
}
