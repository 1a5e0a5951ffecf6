//! Minimum-norm ordinary least squares for part-worth utilities.
//!
//! The stacked design keeps every level of every attribute, so its columns
//! are linearly dependent (each attribute's dummies sum to the all-ones
//! column). The fit therefore has no intercept and is solved through the
//! singular value decomposition: singular values below the cutoff are
//! treated as zero, which yields the minimum-norm solution, i.e. the
//! pseudo-inverse applied to the ratings.

use super::design::DesignMatrix;
use super::domain::{EstimationError, LevelKey};
use nalgebra::DVector;
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Default relative cutoff applied to the largest singular value.
pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 1e-10;

/// Multiple of machine epsilon, per unit of coefficient scale and matrix
/// dimension, that bounds the solver's round-off in a coefficient.
const ROUND_OFF_FACTOR: f64 = 64.0;

/// One coefficient per `attribute=level`, in dummy-column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartWorthUtilities {
    levels: Vec<LevelKey>,
    values: Vec<f64>,
    #[serde(skip)]
    attribute_columns: Vec<Range<usize>>,
    #[serde(skip)]
    noise_floor: f64,
}

impl PartWorthUtilities {
    /// Always zero: the model is fitted without an intercept term.
    pub fn intercept(&self) -> f64 {
        0.0
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LevelKey, f64)> {
        self.levels.iter().zip(self.values.iter().copied())
    }

    pub fn get(&self, attribute: &str, level: &str) -> Option<f64> {
        self.iter()
            .find(|(key, _)| key.attribute == attribute && key.level == level)
            .map(|(_, value)| value)
    }

    /// Looks a coefficient up by its `attribute=level` label.
    pub fn by_label(&self, label: &str) -> Option<f64> {
        self.iter()
            .find(|(key, _)| key.label() == label)
            .map(|(_, value)| value)
    }

    /// Coefficients of the attribute at `index` in catalog order.
    pub fn for_attribute(&self, index: usize) -> Option<&[f64]> {
        self.attribute_columns
            .get(index)
            .map(|range| &self.values[range.clone()])
    }

    pub fn attribute_count(&self) -> usize {
        self.attribute_columns.len()
    }

    /// Differences between coefficients at or below this magnitude are
    /// indistinguishable from solver round-off.
    pub fn noise_floor(&self) -> f64 {
        self.noise_floor
    }
}

/// Descriptive fit facts. No inferential statistics are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitDiagnostics {
    pub observations: usize,
    pub parameters: usize,
    pub rank: usize,
    pub residual_sum_of_squares: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub part_worths: PartWorthUtilities,
    pub diagnostics: FitDiagnostics,
}

#[derive(Debug, Clone, Copy)]
pub struct UtilityEstimator {
    relative_tolerance: f64,
}

impl Default for UtilityEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SINGULAR_TOLERANCE)
    }
}

impl UtilityEstimator {
    pub fn new(relative_tolerance: f64) -> Self {
        Self { relative_tolerance }
    }

    pub fn fit(
        &self,
        design: &DesignMatrix,
        ratings: &DVector<f64>,
    ) -> Result<Estimate, EstimationError> {
        let (rows, columns) = (design.rows(), design.columns());
        if rows == 0 || columns == 0 {
            return Err(EstimationError::EmptyDesign { rows, columns });
        }
        if ratings.len() != rows {
            return Err(EstimationError::LengthMismatch {
                rows,
                ratings: ratings.len(),
            });
        }

        let x = design.as_matrix();
        let svd = x.clone().svd(true, true);
        let largest = svd
            .singular_values
            .iter()
            .fold(0.0_f64, |acc, value| acc.max(*value));
        let relative = self
            .relative_tolerance
            .max(f64::EPSILON * rows.max(columns) as f64);
        let cutoff = largest * relative;

        let rank = svd.rank(cutoff);
        let beta = svd
            .solve(ratings, cutoff)
            .map_err(EstimationError::SolverFailed)?;

        if let Some(index) = beta.iter().position(|value| !value.is_finite()) {
            return Err(EstimationError::NonFiniteCoefficient {
                column: design.column_keys()[index].label(),
            });
        }

        let scale = beta.iter().fold(0.0_f64, |acc, value| acc.max(value.abs()));
        let noise_floor = ROUND_OFF_FACTOR * f64::EPSILON * scale * rows.max(columns) as f64;

        let residuals = ratings - x * &beta;
        let diagnostics = FitDiagnostics {
            observations: rows,
            parameters: columns,
            rank,
            residual_sum_of_squares: residuals.norm_squared(),
        };

        debug!(
            rows,
            columns,
            rank,
            rss = diagnostics.residual_sum_of_squares,
            "estimated part-worth utilities"
        );

        Ok(Estimate {
            part_worths: PartWorthUtilities {
                levels: design.column_keys().to_vec(),
                values: beta.iter().copied().collect(),
                attribute_columns: design.attribute_columns().to_vec(),
                noise_floor,
            },
            diagnostics,
        })
    }
}
