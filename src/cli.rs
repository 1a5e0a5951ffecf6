use crate::demo::{run_demo, DemoArgs};
use crate::render::{self, OutputFormat};
use clap::{Args, Parser, Subcommand};
use conjoint::config::{AppConfig, ExportConfig};
use conjoint::error::AppError;
use conjoint::telemetry;
use conjoint::workflows::conjoint::export;
use conjoint::workflows::conjoint::import::{AttributeTableImporter, RatingTableImporter};
use conjoint::workflows::conjoint::{ConjointAnalysis, ProfileSet};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "conjoint",
    about = "Generate full-factorial product profiles and estimate part-worth utilities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the profile table and a blank rating template from an attribute table
    Profiles(ProfilesArgs),
    /// Estimate part-worth utilities and attribute importances from collected ratings
    Analyze(AnalyzeArgs),
    /// Run a built-in study end to end without reading or writing files
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ProfilesArgs {
    /// Attribute table (CSV): `Attribute Name` followed by level columns
    #[arg(long)]
    pub(crate) attributes: PathBuf,
    /// Directory for GeneratedProfiles.csv and RatingsTemplate.csv
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Attribute table (CSV) the profiles were generated from
    #[arg(long)]
    pub(crate) attributes: PathBuf,
    /// Rating table (CSV): `Respondent ID` followed by one column per profile
    #[arg(long)]
    pub(crate) ratings: PathBuf,
    /// Directory for PartWorthUtilities.csv and AttributeImportances.csv
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    /// Print results without writing the result tables
    #[arg(long)]
    pub(crate) no_export: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "conjoint calculator starting");

    match cli.command {
        Command::Profiles(args) => run_profiles(args, &config),
        Command::Analyze(args) => run_analyze(args, &config),
        Command::Demo(args) => run_demo(args, &config),
    }
}

fn export_config(config: &AppConfig, output_dir: Option<PathBuf>) -> ExportConfig {
    match output_dir {
        Some(dir) => ExportConfig {
            output_dir: dir,
            ..config.export.clone()
        },
        None => config.export.clone(),
    }
}

fn run_profiles(args: ProfilesArgs, config: &AppConfig) -> Result<(), AppError> {
    let ProfilesArgs {
        attributes,
        output_dir,
        format,
    } = args;

    let catalog = AttributeTableImporter::from_path(&attributes)?;
    let profiles = ProfileSet::generate(&catalog);
    let written = export::save_profiles(&export_config(config, output_dir), &profiles)?;

    render::profiles(&profiles, &written, format)?;
    Ok(())
}

fn run_analyze(args: AnalyzeArgs, config: &AppConfig) -> Result<(), AppError> {
    let AnalyzeArgs {
        attributes,
        ratings,
        output_dir,
        format,
        no_export,
    } = args;

    let catalog = AttributeTableImporter::from_path(&attributes)?;
    let profiles = ProfileSet::generate(&catalog);
    let ratings = RatingTableImporter::from_path(&ratings, &profiles)?;
    let report = ConjointAnalysis::new(&config.analysis).run(&profiles, &ratings)?;

    let written = if no_export {
        Vec::new()
    } else {
        export::save_results(
            &export_config(config, output_dir),
            &report.part_worths,
            &report.importances,
        )?
    };

    render::analysis(&report, &profiles, &ratings, &written, format)?;
    Ok(())
}
