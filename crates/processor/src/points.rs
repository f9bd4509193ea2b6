//! Activity point calculation

use common::models::{
    ActivityType, BasePointsSource, Bound, CalculationStep, PointsBounds, PointsCalculation,
    PointsConfig,
};
use common::{Error, Result};
use tracing::debug;

/// Built-in configuration used when a caller has none, and as the last
/// lookup tier for activity types a caller's configuration leaves out
pub fn system_default_config() -> PointsConfig {
    PointsConfig {
        base_points: [
            (ActivityType::Commit, 10.0),
            (ActivityType::PullRequest, 25.0),
            (ActivityType::CodeReview, 15.0),
            (ActivityType::BugFix, 20.0),
            (ActivityType::StoryClosed, 30.0),
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

/// Calculates awarded points for activities
#[derive(Debug, Clone)]
pub struct PointsCalculator {
    system_default: PointsConfig,
    bounds: PointsBounds,
}

impl Default for PointsCalculator {
    fn default() -> Self {
        // Built-in values always pass validation
        Self {
            system_default: system_default_config(),
            bounds: PointsBounds::default(),
        }
    }
}

impl PointsCalculator {
    /// Build a calculator, rejecting an invalid system default or bounds
    pub fn new(system_default: PointsConfig, bounds: PointsBounds) -> Result<Self> {
        system_default.validate()?;
        bounds.validate()?;
        Ok(Self {
            system_default,
            bounds,
        })
    }

    pub fn system_default(&self) -> &PointsConfig {
        &self.system_default
    }

    pub fn bounds(&self) -> PointsBounds {
        self.bounds
    }

    /// Calculate the points awarded for one activity.
    ///
    /// Base points resolve org override, then `config`, then the system
    /// default. AI-generated work is scaled by the modifier, and the result
    /// is clamped to the bounds and rounded half away from zero.
    pub fn calculate(
        &self,
        activity_type: ActivityType,
        is_ai_generated: bool,
        config: Option<&PointsConfig>,
    ) -> Result<PointsCalculation> {
        let config = match config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => &self.system_default,
        };
        let mut steps = Vec::new();

        let (base_points, source) = self.resolve_base_points(activity_type, config)?;
        steps.push(CalculationStep::BasePointsResolved {
            activity_type,
            points: base_points,
            source,
        });

        let ai_modifier = if is_ai_generated {
            config.ai_modifier
        } else {
            1.0
        };
        let intermediate_points = base_points * ai_modifier;
        if is_ai_generated {
            steps.push(CalculationStep::AiModifierApplied {
                modifier: ai_modifier,
                before: base_points,
                after: intermediate_points,
            });
        }

        let clamped = intermediate_points.clamp(self.bounds.min, self.bounds.max);
        if clamped != intermediate_points {
            let bound = if intermediate_points < self.bounds.min {
                Bound::Min
            } else {
                Bound::Max
            };
            debug!(
                "Clamped {} points for {} to {:?} bound {}",
                intermediate_points, activity_type, bound, clamped
            );
            steps.push(CalculationStep::Clamped {
                bound,
                from: intermediate_points,
                to: clamped,
            });
        }

        let final_points = clamped.round() as i64;
        debug!(
            "Calculated {} points for {} (ai_generated={})",
            final_points, activity_type, is_ai_generated
        );

        Ok(PointsCalculation {
            activity_type,
            base_points,
            ai_modifier,
            intermediate_points,
            final_points,
            calculation_steps: steps,
        })
    }

    fn resolve_base_points(
        &self,
        activity_type: ActivityType,
        config: &PointsConfig,
    ) -> Result<(f64, BasePointsSource)> {
        if let Some(points) = config.org_overrides.get(&activity_type) {
            return Ok((*points, BasePointsSource::OrgOverride));
        }
        if let Some(points) = config.base_points.get(&activity_type) {
            return Ok((*points, BasePointsSource::Config));
        }
        self.system_default
            .base_points
            .get(&activity_type)
            .map(|points| (*points, BasePointsSource::SystemDefault))
            .ok_or_else(|| {
                Error::Config(format!("no points configured for activity type '{}'", activity_type))
            })
    }
}

/// Calculate points with the built-in system default and bounds
pub fn calculate_points(
    activity_type: ActivityType,
    is_ai_generated: bool,
    config: Option<&PointsConfig>,
) -> Result<PointsCalculation> {
    PointsCalculator::default().calculate(activity_type, is_ai_generated, config)
}
