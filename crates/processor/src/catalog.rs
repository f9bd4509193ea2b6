//! Points configuration provider
//!
//! Holds the system default points, per-organization configurations and the
//! level table. Loaded once at startup and read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use common::models::{LevelThresholds, PointsBounds, PointsConfig};
use common::{Error, Result};
use serde::Deserialize;
use tracing::info;

use crate::points::{system_default_config, PointsCalculator};

/// On-disk catalog document. Every key is optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    system_default: Option<PointsConfig>,
    bounds: Option<PointsBounds>,
    #[serde(default)]
    organizations: BTreeMap<String, PointsConfig>,
    levels: Option<LevelThresholds>,
}

/// Loaded points configuration
#[derive(Debug, Clone)]
pub struct PointsCatalog {
    calculator: PointsCalculator,
    organizations: BTreeMap<String, PointsConfig>,
    levels: LevelThresholds,
}

impl PointsCatalog {
    /// Catalog made of built-in values only
    pub fn builtin() -> Self {
        Self {
            calculator: PointsCalculator::default(),
            organizations: BTreeMap::new(),
            levels: LevelThresholds::default(),
        }
    }

    /// Parse a JSON catalog, falling back to built-in values for missing keys
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid points catalog: {}", e)))?;

        let calculator = PointsCalculator::new(
            file.system_default.unwrap_or_else(system_default_config),
            file.bounds.unwrap_or_default(),
        )?;

        for (name, config) in &file.organizations {
            config
                .validate()
                .map_err(|e| Error::Config(format!("organization '{}': {}", name, e)))?;
        }

        Ok(Self {
            calculator,
            organizations: file.organizations,
            levels: file.levels.unwrap_or_default(),
        })
    }

    /// Read a JSON catalog from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded points catalog from {} ({} organizations, {} levels)",
            path.display(),
            catalog.organizations.len(),
            catalog.levels.levels().len()
        );
        Ok(catalog)
    }

    pub fn calculator(&self) -> &PointsCalculator {
        &self.calculator
    }

    pub fn levels(&self) -> &LevelThresholds {
        &self.levels
    }

    pub fn organizations(&self) -> impl Iterator<Item = &str> {
        self.organizations.keys().map(String::as_str)
    }

    /// Configuration for an organization, or the system default when no
    /// organization is given
    pub fn config_for(&self, org: Option<&str>) -> Result<&PointsConfig> {
        match org {
            None => Ok(self.calculator.system_default()),
            Some(name) => self
                .organizations
                .get(name)
                .ok_or_else(|| Error::NotFound(format!("organization '{}'", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{ActivityType, BasePointsSource, CalculationStep};

    const CATALOG: &str = r#"{
        "bounds": {"min": 1, "max": 50},
        "organizations": {
            "acme": {
                "base_points": {"commit": 5},
                "ai_modifier": 0.5,
                "org_overrides": {"pull_request": 40}
            }
        },
        "levels": [
            {"level": 1, "min_points": 0},
            {"level": 2, "min_points": 100},
            {"level": 3, "min_points": 300}
        ]
    }"#;

    #[test]
    fn test_builtin_catalog() {
        let catalog = PointsCatalog::builtin();
        assert_eq!(catalog.organizations().count(), 0);
        assert_eq!(catalog.levels(), &LevelThresholds::default());
        assert_eq!(catalog.config_for(None).unwrap(), &system_default_config());
    }

    #[test]
    fn test_from_json_reads_all_sections() {
        let catalog = PointsCatalog::from_json(CATALOG).unwrap();

        assert_eq!(catalog.organizations().collect::<Vec<_>>(), vec!["acme"]);
        assert_eq!(catalog.levels().last().min_points, 300);
        assert_eq!(catalog.calculator().bounds(), PointsBounds { min: 1.0, max: 50.0 });
        // No system_default key: built-in values
        assert_eq!(catalog.calculator().system_default(), &system_default_config());
    }

    #[test]
    fn test_org_config_drives_calculation() {
        let catalog = PointsCatalog::from_json(CATALOG).unwrap();
        let config = catalog.config_for(Some("acme")).unwrap();

        let pr = catalog
            .calculator()
            .calculate(ActivityType::PullRequest, true, Some(config))
            .unwrap();
        assert_eq!(pr.base_points, 40.0);
        assert_eq!(pr.final_points, 20);

        // Not configured by acme, so the system default applies
        let review = catalog
            .calculator()
            .calculate(ActivityType::CodeReview, false, Some(config))
            .unwrap();
        assert_eq!(
            review.calculation_steps[0],
            CalculationStep::BasePointsResolved {
                activity_type: ActivityType::CodeReview,
                points: 15.0,
                source: BasePointsSource::SystemDefault,
            }
        );
    }

    #[test]
    fn test_unknown_org_not_found() {
        let catalog = PointsCatalog::from_json(CATALOG).unwrap();
        assert!(matches!(
            catalog.config_for(Some("globex")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_document_is_builtin() {
        let catalog = PointsCatalog::from_json("{}").unwrap();
        assert_eq!(catalog.levels(), PointsCatalog::builtin().levels());
    }

    #[test]
    fn test_invalid_org_config_rejected() {
        let json = r#"{"organizations": {"acme": {"ai_modifier": 2.0}}}"#;
        let err = PointsCatalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("acme"));
    }

    #[test]
    fn test_invalid_levels_rejected() {
        let json = r#"{"levels": [{"level": 1, "min_points": 5}]}"#;
        assert!(matches!(PointsCatalog::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_activity_type_rejected() {
        let json = r#"{"system_default": {"base_points": {"deploy": 10}}}"#;
        assert!(PointsCatalog::from_json(json).is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let json = r#"{"bounds": {"min": 10, "max": 5}}"#;
        assert!(matches!(PointsCatalog::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = PointsCatalog::load("/nonexistent/points.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
