//! Ingestion of the attribute and rating tables from CSV or `.xlsx` files.

mod normalizer;
mod parser;

use super::catalog::AttributeCatalog;
use super::domain::{ConjointError, ValidationError, ATTRIBUTE_NAME_HEADER};
use super::profiles::ProfileSet;
use super::ratings::RatingMatrix;
use parser::RawTable;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Spreadsheet(calamine::XlsxError),
    UnsupportedFormat { path: String },
    Conjoint(ConjointError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read input table: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::Spreadsheet(err) => write!(f, "invalid workbook: {}", err),
            ImportError::UnsupportedFormat { path } => {
                write!(f, "unsupported file format for {} (expected .csv or .xlsx)", path)
            }
            ImportError::Conjoint(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Spreadsheet(err) => Some(err),
            ImportError::UnsupportedFormat { .. } => None,
            ImportError::Conjoint(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Spreadsheet(err)
    }
}

impl From<ConjointError> for ImportError {
    fn from(err: ConjointError) -> Self {
        Self::Conjoint(err)
    }
}

impl From<ValidationError> for ImportError {
    fn from(err: ValidationError) -> Self {
        Self::Conjoint(err.into())
    }
}

/// Picks the reader from the file extension: `.csv` or `.xlsx`.
fn read_table(path: &Path) -> Result<RawTable, ImportError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(parser::parse_table(File::open(path)?)?),
        Some("xlsx") => Ok(parser::parse_workbook(BufReader::new(File::open(path)?))?),
        _ => Err(ImportError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Reads the attribute table: `Attribute Name` followed by level columns.
pub struct AttributeTableImporter;

impl AttributeTableImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<AttributeCatalog, ImportError> {
        Self::from_table(read_table(path.as_ref())?)
    }

    /// Reads CSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<AttributeCatalog, ImportError> {
        Self::from_table(parser::parse_table(reader)?)
    }

    fn from_table(table: RawTable) -> Result<AttributeCatalog, ImportError> {
        let first = table.header.first().map(String::as_str).unwrap_or("");
        if !first.eq_ignore_ascii_case(ATTRIBUTE_NAME_HEADER) {
            return Err(ValidationError::MissingColumn {
                expected: ATTRIBUTE_NAME_HEADER,
                found: first.to_string(),
            }
            .into());
        }

        let catalog = AttributeCatalog::from_rows(table.rows)?;
        debug!(
            attributes = catalog.len(),
            profiles = catalog.profile_count(),
            "loaded attribute table"
        );
        Ok(catalog)
    }
}

/// Reads the rating table and checks it against the generated profiles.
pub struct RatingTableImporter;

impl RatingTableImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        profiles: &ProfileSet,
    ) -> Result<RatingMatrix, ImportError> {
        Self::from_table(read_table(path.as_ref())?, profiles)
    }

    /// Reads CSV text.
    pub fn from_reader<R: Read>(
        reader: R,
        profiles: &ProfileSet,
    ) -> Result<RatingMatrix, ImportError> {
        Self::from_table(parser::parse_table(reader)?, profiles)
    }

    fn from_table(table: RawTable, profiles: &ProfileSet) -> Result<RatingMatrix, ImportError> {
        Ok(RatingMatrix::from_table(
            &table.header,
            table.rows,
            profiles.len(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ATTRIBUTES: &str = "Attribute Name,Level 1,Level 2,Level 3\n\
Color,Red,Blue,\n\
Size,S,M,L\n";

    #[test]
    fn attribute_table_loads_ragged_rows() {
        let catalog =
            AttributeTableImporter::from_reader(Cursor::new(ATTRIBUTES)).expect("import succeeds");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.profile_count(), 6);
        assert_eq!(catalog.get("Color").expect("color").levels(), ["Red", "Blue"]);
    }

    #[test]
    fn attribute_table_with_gap_is_rejected() {
        let csv = "Attribute Name,Level 1,Level 2\nColor,NA,Blue\n";
        let err = AttributeTableImporter::from_reader(Cursor::new(csv)).expect_err("gap");
        match err {
            ImportError::Conjoint(ConjointError::Validation(ValidationError::MissingLevel {
                attribute,
                position,
            })) => {
                assert_eq!(attribute, "Color");
                assert_eq!(position, 1);
            }
            other => panic!("expected missing level, got {other:?}"),
        }
    }

    #[test]
    fn attribute_table_requires_name_column() {
        let csv = "Name,Level 1\nColor,Red\n";
        let err = AttributeTableImporter::from_reader(Cursor::new(csv)).expect_err("header");
        assert!(matches!(
            err,
            ImportError::Conjoint(ConjointError::Validation(
                ValidationError::MissingColumn { .. }
            ))
        ));
    }

    #[test]
    fn rating_table_is_checked_against_profiles() {
        let catalog =
            AttributeTableImporter::from_reader(Cursor::new(ATTRIBUTES)).expect("catalog");
        let profiles = ProfileSet::generate(&catalog);

        let ok = "Respondent ID,P1,P2,P3,P4,P5,P6\nr1,1,2,3,4,5,6\n";
        let ratings =
            RatingTableImporter::from_reader(Cursor::new(ok), &profiles).expect("ratings");
        assert_eq!(ratings.respondent_count(), 1);

        let short = "Respondent ID,P1,P2,P3,P4,P5\nr1,1,2,3,4,5\n";
        let err = RatingTableImporter::from_reader(Cursor::new(short), &profiles)
            .expect_err("shape mismatch");
        assert!(matches!(
            err,
            ImportError::Conjoint(ConjointError::ShapeMismatch {
                expected: 6,
                found: 5
            })
        ));
    }

    #[test]
    fn from_path_rejects_unknown_formats_and_missing_files() {
        let err = AttributeTableImporter::from_path("Attributes.ods").expect_err("ods");
        assert!(matches!(err, ImportError::UnsupportedFormat { .. }));

        let err = AttributeTableImporter::from_path("./does-not-exist.csv").expect_err("io");
        match err {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn workbook_tables_load_like_csv() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("Attributes.XLSX");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (row, cells) in [
            ["Attribute Name", "Level 1", "Level 2", "Level 3"],
            ["Color", "Red", "Blue", ""],
            ["Size", "S", "M", "L"],
        ]
        .iter()
        .enumerate()
        {
            for (column, cell) in cells.iter().enumerate() {
                if !cell.is_empty() {
                    sheet
                        .write(row as u32, column as u16, *cell)
                        .expect("cell");
                }
            }
        }
        workbook.save(&path).expect("save workbook");

        let catalog = AttributeTableImporter::from_path(&path).expect("workbook import");
        assert_eq!(catalog.profile_count(), 6);
        assert_eq!(catalog.get("Color").expect("color").levels(), ["Red", "Blue"]);
    }
}
