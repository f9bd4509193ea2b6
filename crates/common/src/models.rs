//! Domain models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// AI-authored work is worth this fraction of human-authored work unless
/// configured otherwise.
pub const DEFAULT_AI_MODIFIER: f64 = 0.75;

/// Lowest number of points a single activity can award
pub const MIN_POINTS: f64 = 0.0;

/// Highest number of points a single activity can award
pub const MAX_POINTS: f64 = 1000.0;

/// Kind of tracked developer action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Commit,
    PullRequest,
    CodeReview,
    BugFix,
    StoryClosed,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Commit,
        ActivityType::PullRequest,
        ActivityType::CodeReview,
        ActivityType::BugFix,
        ActivityType::StoryClosed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Commit => "commit",
            ActivityType::PullRequest => "pull_request",
            ActivityType::CodeReview => "code_review",
            ActivityType::BugFix => "bug_fix",
            ActivityType::StoryClosed => "story_closed",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::Config(format!("unknown activity type '{}'", s)))
    }
}

/// A single tracked action submitted for scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub activity_type: ActivityType,
    #[serde(default)]
    pub is_ai_generated: bool,
}

fn default_ai_modifier() -> f64 {
    DEFAULT_AI_MODIFIER
}

/// Point values for each activity type, plus the AI modifier and any
/// organization-specific overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointsConfig {
    #[serde(default)]
    pub base_points: BTreeMap<ActivityType, f64>,
    #[serde(default = "default_ai_modifier")]
    pub ai_modifier: f64,
    /// Takes precedence over `base_points` for the types it lists
    #[serde(default)]
    pub org_overrides: BTreeMap<ActivityType, f64>,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            base_points: BTreeMap::new(),
            ai_modifier: DEFAULT_AI_MODIFIER,
            org_overrides: BTreeMap::new(),
        }
    }
}

impl PointsConfig {
    /// Check the modifier range and that every point value is a
    /// non-negative finite number
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ai_modifier) {
            return Err(Error::Config(format!(
                "ai_modifier must be within [0, 1], got {}",
                self.ai_modifier
            )));
        }

        let entries = self
            .base_points
            .iter()
            .map(|entry| ("base_points", entry))
            .chain(self.org_overrides.iter().map(|entry| ("org_overrides", entry)));

        for (table, (activity_type, points)) in entries {
            if !points.is_finite() || *points < 0.0 {
                return Err(Error::Config(format!(
                    "{}.{} must be a non-negative number, got {}",
                    table, activity_type, points
                )));
            }
        }

        Ok(())
    }
}

/// Validation bounds applied to every calculated point value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointsBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for PointsBounds {
    fn default() -> Self {
        Self {
            min: MIN_POINTS,
            max: MAX_POINTS,
        }
    }
}

impl PointsBounds {
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(Error::Config(format!(
                "invalid points bounds [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Which configuration tier supplied the base points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BasePointsSource {
    OrgOverride,
    Config,
    SystemDefault,
}

impl fmt::Display for BasePointsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BasePointsSource::OrgOverride => "organization override",
            BasePointsSource::Config => "configuration",
            BasePointsSource::SystemDefault => "system default",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

/// One entry of the audit trail attached to a calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationStep {
    BasePointsResolved {
        activity_type: ActivityType,
        points: f64,
        source: BasePointsSource,
    },
    AiModifierApplied {
        modifier: f64,
        before: f64,
        after: f64,
    },
    Clamped {
        bound: Bound,
        from: f64,
        to: f64,
    },
}

impl fmt::Display for CalculationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationStep::BasePointsResolved {
                activity_type,
                points,
                source,
            } => write!(f, "Base points for {}: {} ({})", activity_type, points, source),
            CalculationStep::AiModifierApplied {
                modifier,
                before,
                after,
            } => write!(f, "AI modifier x{}: {} -> {}", modifier, before, after),
            CalculationStep::Clamped { bound, from, to } => {
                let name = match bound {
                    Bound::Min => "minimum",
                    Bound::Max => "maximum",
                };
                write!(f, "Adjusted to {} of {}: {} -> {}", name, to, from, to)
            }
        }
    }
}

/// Result of scoring a single activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointsCalculation {
    pub activity_type: ActivityType,
    pub base_points: f64,
    /// Exactly 1 when the activity was not AI-generated
    pub ai_modifier: f64,
    pub intermediate_points: f64,
    pub final_points: i64,
    pub calculation_steps: Vec<CalculationStep>,
}

/// Minimum cumulative points required to reach a level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelThreshold {
    pub level: u32,
    pub min_points: i64,
}

/// Ordered level table. Strictly increasing in both level and threshold,
/// starting at level 1 with a threshold of 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<LevelThreshold>", into = "Vec<LevelThreshold>")]
pub struct LevelThresholds(Vec<LevelThreshold>);

impl LevelThresholds {
    /// Build a table, sorting by level first. Thresholds that do not grow
    /// with the level are rejected rather than reordered.
    pub fn new(mut levels: Vec<LevelThreshold>) -> Result<Self> {
        levels.sort_by_key(|l| l.level);

        let first = levels
            .first()
            .ok_or_else(|| Error::Config("level table is empty".to_string()))?;
        if first.level != 1 || first.min_points != 0 {
            return Err(Error::Config(format!(
                "level table must start at level 1 with 0 points, got level {} at {}",
                first.level, first.min_points
            )));
        }

        for pair in levels.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.level == next.level {
                return Err(Error::Config(format!("duplicate level {}", next.level)));
            }
            if next.min_points <= prev.min_points {
                return Err(Error::Config(format!(
                    "level {} threshold {} must exceed level {} threshold {}",
                    next.level, next.min_points, prev.level, prev.min_points
                )));
            }
        }

        Ok(Self(levels))
    }

    pub fn levels(&self) -> &[LevelThreshold] {
        &self.0
    }

    pub fn last(&self) -> LevelThreshold {
        // Never empty once constructed
        self.0[self.0.len() - 1]
    }
}

impl Default for LevelThresholds {
    fn default() -> Self {
        let table = [0, 100, 250, 500, 1000, 2000, 3500, 5500, 8000, 12000];
        Self(
            table
                .iter()
                .zip(1..)
                .map(|(&min_points, level)| LevelThreshold { level, min_points })
                .collect(),
        )
    }
}

impl TryFrom<Vec<LevelThreshold>> for LevelThresholds {
    type Error = Error;

    fn try_from(levels: Vec<LevelThreshold>) -> Result<Self> {
        Self::new(levels)
    }
}

impl From<LevelThresholds> for Vec<LevelThreshold> {
    fn from(thresholds: LevelThresholds) -> Self {
        thresholds.0
    }
}

/// Where a point total sits in the level table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelProgress {
    pub current_level: u32,
    pub total_points: i64,
    pub previous_level_threshold: i64,
    pub next_level_threshold: i64,
    pub points_to_next_level: i64,
    /// Position within the current level band, 0 to 100
    pub progress_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(level: u32, min_points: i64) -> LevelThreshold {
        LevelThreshold { level, min_points }
    }

    #[test]
    fn test_activity_type_from_str() {
        assert_eq!(
            "pull_request".parse::<ActivityType>().unwrap(),
            ActivityType::PullRequest
        );
        assert_eq!(
            "Code-Review".parse::<ActivityType>().unwrap(),
            ActivityType::CodeReview
        );
        assert_eq!(" commit ".parse::<ActivityType>().unwrap(), ActivityType::Commit);
    }

    #[test]
    fn test_unknown_activity_type_is_config_error() {
        let err = "deploy".parse::<ActivityType>().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_activity_type_serde_matches_as_str() {
        for t in ActivityType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_points_config_defaults_when_fields_missing() {
        let config: PointsConfig = serde_json::from_str(r#"{"base_points": {"commit": 12}}"#).unwrap();
        assert_eq!(config.base_points[&ActivityType::Commit], 12.0);
        assert_eq!(config.ai_modifier, DEFAULT_AI_MODIFIER);
        assert!(config.org_overrides.is_empty());
    }

    #[test]
    fn test_points_config_rejects_modifier_out_of_range() {
        let config = PointsConfig {
            ai_modifier: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_points_config_rejects_negative_override() {
        let mut config = PointsConfig::default();
        config.org_overrides.insert(ActivityType::BugFix, -5.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_points_bounds_rejects_inverted_range() {
        let bounds = PointsBounds { min: 10.0, max: 5.0 };
        assert!(bounds.validate().is_err());
        assert!(PointsBounds::default().validate().is_ok());
    }

    #[test]
    fn test_calculation_step_display() {
        let step = CalculationStep::AiModifierApplied {
            modifier: 0.75,
            before: 25.0,
            after: 18.75,
        };
        assert_eq!(step.to_string(), "AI modifier x0.75: 25 -> 18.75");
    }

    #[test]
    fn test_calculation_step_serializes_with_kind_tag() {
        let step = CalculationStep::Clamped {
            bound: Bound::Max,
            from: 1200.0,
            to: 1000.0,
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["kind"], "clamped");
        assert_eq!(value["bound"], "max");
    }

    #[test]
    fn test_thresholds_sorted_by_level() {
        let table =
            LevelThresholds::new(vec![threshold(3, 300), threshold(1, 0), threshold(2, 100)])
                .unwrap();
        let levels: Vec<u32> = table.levels().iter().map(|l| l.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(table.last(), threshold(3, 300));
    }

    #[test]
    fn test_thresholds_reject_non_increasing_points() {
        let result = LevelThresholds::new(vec![threshold(1, 0), threshold(2, 300), threshold(3, 100)]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_thresholds_reject_bad_first_level() {
        assert!(LevelThresholds::new(vec![]).is_err());
        assert!(LevelThresholds::new(vec![threshold(1, 10)]).is_err());
        assert!(LevelThresholds::new(vec![threshold(2, 0)]).is_err());
    }

    #[test]
    fn test_thresholds_reject_duplicate_level() {
        let result = LevelThresholds::new(vec![threshold(1, 0), threshold(2, 100), threshold(2, 200)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_thresholds_deserialize_validates() {
        let bad = r#"[{"level": 1, "min_points": 0}, {"level": 2, "min_points": 0}]"#;
        assert!(serde_json::from_str::<LevelThresholds>(bad).is_err());

        let good = r#"[{"level": 2, "min_points": 50}, {"level": 1, "min_points": 0}]"#;
        let table: LevelThresholds = serde_json::from_str(good).unwrap();
        assert_eq!(table.levels().len(), 2);
    }

    #[test]
    fn test_default_thresholds_are_valid() {
        let table = LevelThresholds::default();
        assert!(LevelThresholds::new(table.levels().to_vec()).is_ok());
        assert_eq!(table.last(), threshold(10, 12000));
    }
}
