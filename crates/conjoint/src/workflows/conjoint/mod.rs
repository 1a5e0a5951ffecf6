//! Full-factorial conjoint analysis.
//!
//! Stages run in a fixed order and each consumes the immutable output of the
//! previous one:
//!
//! 1. [`AttributeCatalog`]: attribute names and their levels
//! 2. [`ProfileSet`]: every level combination, numbered from 1
//! 3. [`RatingMatrix`]: respondent ratings validated against the profiles
//! 4. [`DesignMatrixBuilder`]: dummy coding stacked once per respondent
//! 5. [`UtilityEstimator`]: intercept-free minimum-norm least squares
//! 6. [`ImportanceScorer`]: part-worth spread as a share of the total
//!
//! [`ConjointAnalysis`] chains stages 4 to 6.

mod catalog;
mod design;
pub mod domain;
mod estimator;
pub mod export;
pub mod import;
mod importance;
mod profiles;
mod ratings;
pub mod report;

pub use catalog::AttributeCatalog;
pub use design::{DesignMatrix, DesignMatrixBuilder};
pub use domain::{
    Attribute, ConjointError, EstimationError, LevelKey, ValidationError,
    ATTRIBUTE_NAME_HEADER, PROFILE_NUMBER_HEADER, RESPONDENT_ID_HEADER,
};
pub use estimator::{
    Estimate, FitDiagnostics, PartWorthUtilities, UtilityEstimator, DEFAULT_SINGULAR_TOLERANCE,
};
pub use importance::{AttributeImportance, AttributeImportances, ImportanceScorer};
pub use profiles::{Profile, ProfileLevelView, ProfileSet, ProfileView};
pub use ratings::RatingMatrix;
pub use report::ConjointReport;

use crate::config::AnalysisConfig;
use tracing::info;

/// Runs design construction, estimation, and importance scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConjointAnalysis {
    estimator: UtilityEstimator,
}

impl ConjointAnalysis {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            estimator: UtilityEstimator::new(config.singular_tolerance),
        }
    }

    pub fn run(
        &self,
        profiles: &ProfileSet,
        ratings: &RatingMatrix,
    ) -> Result<ConjointReport, ConjointError> {
        let (design, target) = DesignMatrixBuilder::build(profiles, ratings)?;
        let Estimate {
            part_worths,
            diagnostics,
        } = self.estimator.fit(&design, &target)?;
        let importances = ImportanceScorer::score(&part_worths, profiles.catalog());

        info!(
            attributes = profiles.catalog().len(),
            profiles = profiles.len(),
            respondents = ratings.respondent_count(),
            rank = diagnostics.rank,
            "conjoint analysis completed"
        );

        Ok(ConjointReport::new(
            profiles.catalog().clone(),
            part_worths,
            importances,
            diagnostics,
        ))
    }
}
