use super::domain::{ConjointError, ValidationError, RESPONDENT_ID_HEADER};
use tracing::debug;

/// Respondent-by-profile rating table with no missing cells.
///
/// Column `j` holds ratings for profile number `j + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    respondents: Vec<String>,
    values: Vec<f64>,
    profile_count: usize,
}

impl RatingMatrix {
    /// Builds a matrix from already-numeric rows.
    pub fn new(
        respondents: Vec<String>,
        rows: Vec<Vec<f64>>,
        expected_profiles: usize,
    ) -> Result<Self, ConjointError> {
        if rows.len() > respondents.len() {
            return Err(ValidationError::MissingRespondentId {
                row: respondents.len() + 1,
            }
            .into());
        }
        if let Some(respondent) = respondents.get(rows.len()) {
            return Err(ValidationError::MissingRating {
                respondent: respondent.clone(),
                profile: 1,
            }
            .into());
        }

        let mut values = Vec::with_capacity(rows.len() * expected_profiles);

        for (respondent, row) in respondents.iter().zip(rows.iter()) {
            if row.len() != expected_profiles {
                return Err(ConjointError::ShapeMismatch {
                    expected: expected_profiles,
                    found: row.len(),
                });
            }
            for (index, value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ValidationError::InvalidRating {
                        respondent: respondent.clone(),
                        profile: index + 1,
                        value: value.to_string(),
                    }
                    .into());
                }
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            respondents,
            values,
            profile_count: expected_profiles,
        })
    }

    /// Validates a raw rating table against the generated profile count.
    ///
    /// The header width is checked first so that a stale or mismatched table
    /// is rejected before any cell is parsed. Blank cells are missing ratings.
    pub fn from_table<H, R, S>(
        header: &[H],
        rows: impl IntoIterator<Item = R>,
        expected_profiles: usize,
    ) -> Result<Self, ConjointError>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let first = header.first().map(|cell| cell.as_ref().trim()).unwrap_or("");
        if !first.eq_ignore_ascii_case(RESPONDENT_ID_HEADER) {
            return Err(ValidationError::MissingColumn {
                expected: RESPONDENT_ID_HEADER,
                found: first.to_string(),
            }
            .into());
        }

        let found = header.len() - 1;
        if found != expected_profiles {
            return Err(ConjointError::ShapeMismatch {
                expected: expected_profiles,
                found,
            });
        }

        let mut respondents = Vec::new();
        let mut values = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let row_number = index + 1;
            let cells: Vec<S> = row.into_iter().collect();
            if cells.len() > header.len() {
                return Err(ValidationError::UnexpectedCell {
                    row: row_number,
                    expected: header.len(),
                    found: cells.len(),
                }
                .into());
            }

            let respondent = cells
                .first()
                .map(|cell| cell.as_ref().trim())
                .filter(|id| !id.is_empty())
                .ok_or(ValidationError::MissingRespondentId { row: row_number })?
                .to_string();

            for profile in 1..=expected_profiles {
                let raw = cells
                    .get(profile)
                    .map(|cell| cell.as_ref().trim())
                    .unwrap_or("");
                values.push(parse_rating(&respondent, profile, raw)?);
            }
            respondents.push(respondent);
        }

        debug!(
            respondents = respondents.len(),
            profiles = expected_profiles,
            "validated rating table"
        );

        Ok(Self {
            respondents,
            values,
            profile_count: expected_profiles,
        })
    }

    pub fn respondents(&self) -> &[String] {
        &self.respondents
    }

    pub fn respondent_count(&self) -> usize {
        self.respondents.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profile_count
    }

    pub fn row(&self, respondent: usize) -> Option<&[f64]> {
        if respondent >= self.respondents.len() {
            return None;
        }
        let start = respondent * self.profile_count;
        self.values.get(start..start + self.profile_count)
    }

    /// Ratings flattened respondent-major, profile order within each block.
    pub fn flattened(&self) -> &[f64] {
        &self.values
    }
}

fn parse_rating(respondent: &str, profile: usize, raw: &str) -> Result<f64, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingRating {
            respondent: respondent.to_string(),
            profile,
        });
    }

    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidRating {
            respondent: respondent.to_string(),
            profile,
            value: raw.to_string(),
        })
}
