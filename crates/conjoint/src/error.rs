use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::conjoint::export::ExportError;
use crate::workflows::conjoint::import::ImportError;
use crate::workflows::conjoint::ConjointError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ImportError),
    Analysis(ConjointError),
    Export(ExportError),
}

impl AppError {
    /// True when the run failed on bad input data rather than on the
    /// environment; the caller can fix it by correcting the source tables.
    pub fn is_input_error(&self) -> bool {
        match self {
            AppError::Import(ImportError::Conjoint(err)) | AppError::Analysis(err) => {
                err.is_validation()
            }
            AppError::Import(
                ImportError::Csv(_)
                | ImportError::Spreadsheet(_)
                | ImportError::UnsupportedFormat { .. },
            ) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "input error: {}", err),
            AppError::Analysis(err) => write!(f, "analysis error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Analysis(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ConjointError> for AppError {
    fn from(value: ConjointError) -> Self {
        Self::Analysis(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
