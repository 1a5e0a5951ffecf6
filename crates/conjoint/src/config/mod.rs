use crate::workflows::conjoint::DEFAULT_SINGULAR_TOLERANCE;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the calculator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub analysis: AnalysisConfig,
    pub export: ExportConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("CONJOINT_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let singular_tolerance = match env::var("CONJOINT_SVD_TOLERANCE") {
            Ok(raw) => parse_tolerance(&raw)?,
            Err(_) => DEFAULT_SINGULAR_TOLERANCE,
        };

        let output_dir = env::var("CONJOINT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let log_level = env::var("CONJOINT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            analysis: AnalysisConfig { singular_tolerance },
            export: ExportConfig::in_dir(output_dir),
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_tolerance(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..1.0).contains(value))
        .ok_or_else(|| ConfigError::InvalidTolerance {
            value: raw.to_string(),
        })
}

/// Numerical settings for the least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Singular values below `singular_tolerance * largest` count as zero.
    pub singular_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            singular_tolerance: DEFAULT_SINGULAR_TOLERANCE,
        }
    }
}

/// Where result tables are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub profiles_file: String,
    pub rating_template_file: String,
    pub part_worths_file: String,
    pub importances_file: String,
}

impl ExportConfig {
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            profiles_file: "GeneratedProfiles.csv".to_string(),
            rating_template_file: "RatingsTemplate.csv".to_string(),
            part_worths_file: "PartWorthUtilities.csv".to_string(),
            importances_file: "AttributeImportances.csv".to_string(),
        }
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.output_dir.join(&self.profiles_file)
    }

    pub fn rating_template_path(&self) -> PathBuf {
        self.output_dir.join(&self.rating_template_file)
    }

    pub fn part_worths_path(&self) -> PathBuf {
        self.output_dir.join(&self.part_worths_file)
    }

    pub fn importances_path(&self) -> PathBuf {
        self.output_dir.join(&self.importances_file)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTolerance { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance { value } => write!(
                f,
                "CONJOINT_SVD_TOLERANCE must be a number in [0, 1), got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
