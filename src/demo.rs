use crate::render::{self, OutputFormat};
use clap::Args;
use conjoint::config::AppConfig;
use conjoint::error::AppError;
use conjoint::workflows::conjoint::{
    AttributeCatalog, ConjointAnalysis, ConjointError, ProfileSet, RatingMatrix,
};
use tracing::info;

const DEMO_ATTRIBUTES: [&[&str]; 3] = [
    &["Brand", "Acme", "Globex"],
    &["Price", "$199", "$249", "$299"],
    &["Battery Life", "8h", "12h"],
];

/// Utility each demo respondent attaches to a level, aligned with `DEMO_ATTRIBUTES`.
const DEMO_TASTES: [&[f64]; 3] = [&[0.5, 0.0], &[3.0, 1.5, 0.0], &[0.0, 2.0]];

const DEMO_RESPONDENTS: usize = 4;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let catalog = AttributeCatalog::from_rows(DEMO_ATTRIBUTES).map_err(ConjointError::from)?;
    let profiles = ProfileSet::generate(&catalog);
    let ratings = demo_ratings(&profiles)?;

    info!(
        profiles = profiles.len(),
        respondents = ratings.respondent_count(),
        "running built-in conjoint study"
    );

    let report = ConjointAnalysis::new(&config.analysis).run(&profiles, &ratings)?;
    render::analysis(&report, &profiles, &ratings, &[], args.format)?;
    Ok(())
}

/// Additive ratings on a 1-10 scale. Each respondent shifts the whole scale
/// and leans a little harder on price than the one before.
fn demo_ratings(profiles: &ProfileSet) -> Result<RatingMatrix, ConjointError> {
    let respondents = (1..=DEMO_RESPONDENTS)
        .map(|index| format!("R{index:03}"))
        .collect();

    let rows = (0..DEMO_RESPONDENTS)
        .map(|respondent| {
            let shift = 1.0 + respondent as f64 * 0.25;
            let price_weight = 1.0 + respondent as f64 * 0.25;
            profiles
                .profiles()
                .iter()
                .map(|profile| {
                    let utility: f64 = profile
                        .level_indices()
                        .iter()
                        .enumerate()
                        .map(|(attribute, &level)| {
                            let taste = DEMO_TASTES[attribute][level];
                            if attribute == 1 {
                                taste * price_weight
                            } else {
                                taste
                            }
                        })
                        .sum();
                    shift + utility
                })
                .collect()
        })
        .collect();

    Ok(RatingMatrix::new(respondents, rows, profiles.len())?)
}
