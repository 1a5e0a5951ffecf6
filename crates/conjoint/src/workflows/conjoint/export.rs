//! CSV writers for the generated profiles and the result tables.
//!
//! Writers only run after every numeric stage has succeeded. Tables are
//! staged next to their destination and moved into place together, so a
//! failed run never leaves a partial result set behind.

use super::domain::{PROFILE_NUMBER_HEADER, RESPONDENT_ID_HEADER};
use super::estimator::PartWorthUtilities;
use super::importance::AttributeImportances;
use super::profiles::ProfileSet;
use crate::config::ExportConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write output table: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode output table: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// `Profile Number,<attribute>...`, one row per profile.
pub fn write_profiles<W: Write>(writer: W, profiles: &ProfileSet) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![PROFILE_NUMBER_HEADER.to_string()];
    header.extend(profiles.catalog().names().map(str::to_string));
    csv_writer.write_record(&header)?;

    for profile in profiles.profiles() {
        let mut record = vec![profile.number().to_string()];
        record.extend(profiles.describe(profile).map(|(_, level)| level.to_string()));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Blank rating form: `Respondent ID,Profile 1,...,Profile N` and no rows.
pub fn write_rating_template<W: Write>(
    writer: W,
    profiles: &ProfileSet,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let header: Vec<String> = std::iter::once(RESPONDENT_ID_HEADER.to_string())
        .chain(
            profiles
                .profiles()
                .iter()
                .map(|profile| format!("Profile {}", profile.number())),
        )
        .collect();
    csv_writer.write_record(&header)?;
    csv_writer.flush()?;
    Ok(())
}

/// `Level,Part-Worth`, one row per `attribute=level`.
pub fn write_part_worths<W: Write>(
    writer: W,
    part_worths: &PartWorthUtilities,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Level", "Part-Worth"])?;
    for (key, value) in part_worths.iter() {
        csv_writer.write_record([key.label(), value.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// `Attribute,Importance (%)` in catalog order.
pub fn write_importances<W: Write>(
    writer: W,
    importances: &AttributeImportances,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Attribute", "Importance (%)"])?;
    for entry in importances.iter() {
        csv_writer.write_record([entry.attribute.clone(), entry.importance.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn stage(path: &Path) -> Result<NamedTempFile, ExportError> {
    let dir = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    Ok(NamedTempFile::new_in(dir)?)
}

/// Moves staged tables into place. If any move fails the tables already
/// moved are removed again, and the remaining staged files are dropped.
fn publish(staged: Vec<(NamedTempFile, PathBuf)>) -> Result<Vec<PathBuf>, ExportError> {
    let mut published: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        if let Err(err) = file.persist(&path) {
            for done in &published {
                if let Err(cleanup) = fs::remove_file(done) {
                    warn!(
                        path = %done.display(),
                        error = %cleanup,
                        "could not remove partial output"
                    );
                }
            }
            return Err(ExportError::Io(err.error));
        }
        published.push(path);
    }
    Ok(published)
}

/// Writes the profiles table and the blank rating template.
pub fn save_profiles(
    config: &ExportConfig,
    profiles: &ProfileSet,
) -> Result<Vec<PathBuf>, ExportError> {
    let profiles_path = config.profiles_path();
    let mut profiles_file = stage(&profiles_path)?;
    write_profiles(&mut profiles_file, profiles)?;
    let template_path = config.rating_template_path();
    let mut template_file = stage(&template_path)?;
    write_rating_template(&mut template_file, profiles)?;

    let written = publish(vec![
        (profiles_file, profiles_path),
        (template_file, template_path),
    ])?;
    info!(
        profiles = profiles.len(),
        path = %written[0].display(),
        "generated product profiles saved"
    );
    Ok(written)
}

/// Writes the part-worth and importance tables. Either both land or neither.
pub fn save_results(
    config: &ExportConfig,
    part_worths: &PartWorthUtilities,
    importances: &AttributeImportances,
) -> Result<Vec<PathBuf>, ExportError> {
    let part_worths_path = config.part_worths_path();
    let mut part_worths_file = stage(&part_worths_path)?;
    write_part_worths(&mut part_worths_file, part_worths)?;
    let importances_path = config.importances_path();
    let mut importances_file = stage(&importances_path)?;
    write_importances(&mut importances_file, importances)?;

    let written = publish(vec![
        (part_worths_file, part_worths_path),
        (importances_file, importances_path),
    ])?;
    info!(
        part_worths = %written[0].display(),
        importances = %written[1].display(),
        "conjoint results saved"
    );
    Ok(written)
}
