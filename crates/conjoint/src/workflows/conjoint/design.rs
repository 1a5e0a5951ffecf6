use super::domain::{ConjointError, LevelKey};
use super::profiles::ProfileSet;
use super::ratings::RatingMatrix;
use nalgebra::{DMatrix, DVector};
use std::ops::Range;
use tracing::debug;

/// Stacked 0/1 dummy matrix, one column per `attribute=level`.
///
/// No reference level is dropped. Row `r` describes profile `r % P` as rated
/// by respondent `r / P`, where `P` is the profile count, so rows line up with
/// [`RatingMatrix::flattened`].
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    columns: Vec<LevelKey>,
    attribute_columns: Vec<Range<usize>>,
    profile_count: usize,
    respondent_count: usize,
    values: DMatrix<f64>,
}

impl DesignMatrix {
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_keys(&self) -> &[LevelKey] {
        &self.columns
    }

    /// Dummy-column span of each attribute, in catalog order.
    pub fn attribute_columns(&self) -> &[Range<usize>] {
        &self.attribute_columns
    }

    pub fn attribute_count(&self) -> usize {
        self.attribute_columns.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profile_count
    }

    pub fn respondent_count(&self) -> usize {
        self.respondent_count
    }

    pub fn is_set(&self, row: usize, column: usize) -> bool {
        self.values
            .get((row, column))
            .is_some_and(|value| *value != 0.0)
    }

    /// Number of hot dummies in each row.
    pub fn row_sums(&self) -> Vec<usize> {
        self.values
            .row_iter()
            .map(|row| row.iter().filter(|value| **value != 0.0).count())
            .collect()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }
}

pub struct DesignMatrixBuilder;

impl DesignMatrixBuilder {
    /// Encodes every profile and replicates the block once per respondent.
    ///
    /// Returns the stacked design alongside the rating vector flattened in
    /// the same respondent-major order. The rating table must have been
    /// validated against this exact profile set.
    pub fn build(
        profiles: &ProfileSet,
        ratings: &RatingMatrix,
    ) -> Result<(DesignMatrix, DVector<f64>), ConjointError> {
        if ratings.profile_count() != profiles.len() {
            return Err(ConjointError::ShapeMismatch {
                expected: profiles.len(),
                found: ratings.profile_count(),
            });
        }

        let catalog = profiles.catalog();
        let columns = catalog.level_keys();
        let offsets = catalog.column_offsets();
        let attribute_columns: Vec<Range<usize>> = offsets
            .iter()
            .zip(catalog.attributes())
            .map(|(&start, attribute)| start..start + attribute.level_count())
            .collect();

        let profile_count = profiles.len();
        let respondent_count = ratings.respondent_count();
        let mut block = DMatrix::<f64>::zeros(profile_count, columns.len());
        for (row, profile) in profiles.profiles().iter().enumerate() {
            for (offset, level) in offsets.iter().zip(profile.level_indices()) {
                block[(row, offset + level)] = 1.0;
            }
        }

        let rows = profile_count * respondent_count;
        let values = DMatrix::from_fn(rows, columns.len(), |row, column| {
            block[(row % profile_count, column)]
        });
        let target = DVector::from_column_slice(ratings.flattened());

        debug!(
            rows,
            columns = columns.len(),
            respondents = respondent_count,
            "built dummy-coded design matrix"
        );

        Ok((
            DesignMatrix {
                columns,
                attribute_columns,
                profile_count,
                respondent_count,
                values,
            },
            target,
        ))
    }
}
