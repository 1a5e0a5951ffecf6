use serde::Serialize;
use std::fmt;

/// Header expected in the first column of the attribute table.
pub const ATTRIBUTE_NAME_HEADER: &str = "Attribute Name";
/// Header expected in the first column of the rating table.
pub const RESPONDENT_ID_HEADER: &str = "Respondent ID";
/// Header of the first column of the generated profiles table.
pub const PROFILE_NUMBER_HEADER: &str = "Profile Number";

/// A named product attribute with its ordered, distinct levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    levels: Vec<String>,
}

impl Attribute {
    pub fn new(
        name: impl Into<String>,
        levels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::MissingAttributeName { row: None });
        }

        let mut collected: Vec<String> = Vec::new();
        for level in levels {
            let level = level.into();
            if level.trim().is_empty() {
                return Err(ValidationError::MissingLevel {
                    attribute: name,
                    position: collected.len() + 1,
                });
            }
            if collected.contains(&level) {
                return Err(ValidationError::DuplicateLevel {
                    attribute: name,
                    level,
                });
            }
            collected.push(level);
        }

        if collected.is_empty() {
            return Err(ValidationError::EmptyAttribute { attribute: name });
        }

        Ok(Self {
            name,
            levels: collected,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// Identifies one dummy variable: a single level of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LevelKey {
    pub attribute: String,
    pub level: String,
}

impl LevelKey {
    pub fn new(attribute: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            level: level.into(),
        }
    }

    /// Column label in `attribute=level` form.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attribute, self.level)
    }
}

/// Malformed or incomplete attribute/rating input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected column '{expected}' as the first column, found '{found}'")]
    MissingColumn { expected: &'static str, found: String },
    #[error("{}", missing_name_message(.row))]
    MissingAttributeName { row: Option<usize> },
    #[error("attribute '{attribute}' is missing level {position}")]
    MissingLevel { attribute: String, position: usize },
    #[error("attribute '{attribute}' declares no levels")]
    EmptyAttribute { attribute: String },
    #[error("attribute '{attribute}' is declared more than once")]
    DuplicateAttribute { attribute: String },
    #[error("attribute '{attribute}' lists level '{level}' more than once")]
    DuplicateLevel { attribute: String, level: String },
    #[error("{attributes} attributes combine into more profiles than can be enumerated")]
    TooManyProfiles { attributes: usize },
    #[error("respondent '{respondent}' has no rating for profile {profile}")]
    MissingRating { respondent: String, profile: usize },
    #[error("respondent '{respondent}' has a non-numeric rating '{value}' for profile {profile}")]
    InvalidRating {
        respondent: String,
        profile: usize,
        value: String,
    },
    #[error("row {row} has a missing respondent identifier")]
    MissingRespondentId { row: usize },
    #[error("row {row} has more cells ({found}) than the header declares ({expected})")]
    UnexpectedCell {
        row: usize,
        expected: usize,
        found: usize,
    },
}

fn missing_name_message(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!("attribute name is missing on row {row}"),
        None => "one or more attribute names are missing".to_string(),
    }
}

/// Degenerate numeric input or solver failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    #[error("design matrix is empty ({rows} rows x {columns} columns); nothing to estimate")]
    EmptyDesign { rows: usize, columns: usize },
    #[error("design matrix has {rows} rows but the rating vector has {ratings} entries")]
    LengthMismatch { rows: usize, ratings: usize },
    #[error("least-squares solver failed: {0}")]
    SolverFailed(&'static str),
    #[error("solver produced a non-finite coefficient for '{column}'")]
    NonFiniteCoefficient { column: String },
}

/// Errors surfaced by the conjoint core. The first failure stops the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConjointError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(
        "rating table has {found} profile columns but {expected} profiles were generated; \
         regenerate the profiles or re-collect the ratings"
    )]
    ShapeMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Estimation(#[from] EstimationError),
}

impl ConjointError {
    /// `ShapeMismatch` is a specialised validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConjointError::Validation(_) | ConjointError::ShapeMismatch { .. }
        )
    }
}
