use clap::ValueEnum;
use conjoint::workflows::conjoint::report::views::{ConjointInsights, ConjointReportSummary};
use conjoint::workflows::conjoint::{ConjointReport, ProfileSet, ProfileView, RatingMatrix};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct ProfilesResponse {
    attributes: Vec<String>,
    profile_count: usize,
    profiles: Vec<ProfileView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    written: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    attributes: usize,
    profiles: usize,
    respondents: usize,
    #[serde(flatten)]
    summary: ConjointReportSummary,
    insights: ConjointInsights,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    written: Vec<String>,
}

fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|path| path.display().to_string()).collect()
}

fn write_json<T: Serialize>(payload: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, payload)?;
    writeln!(stdout)
}

pub(crate) fn profiles(
    profiles: &ProfileSet,
    written: &[PathBuf],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(&ProfilesResponse {
            attributes: profiles.catalog().names().map(str::to_string).collect(),
            profile_count: profiles.len(),
            profiles: profiles.views(),
            written: display_paths(written),
        });
    }

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Generated {} profiles from {} attributes",
        profiles.len(),
        profiles.catalog().len()
    )?;
    for profile in profiles.profiles() {
        let levels: Vec<String> = profiles
            .describe(profile)
            .map(|(attribute, level)| format!("{attribute}: {level}"))
            .collect();
        writeln!(out, "- #{} | {}", profile.number(), levels.join(" | "))?;
    }

    if !written.is_empty() {
        writeln!(out, "\nSaved")?;
        for path in written {
            writeln!(out, "- {}", path.display())?;
        }
        writeln!(
            out,
            "\nCollect one rating per profile from each respondent in the template, \
             then run `conjoint analyze`."
        )?;
    }
    Ok(())
}

pub(crate) fn analysis(
    report: &ConjointReport,
    profiles: &ProfileSet,
    ratings: &RatingMatrix,
    written: &[PathBuf],
    format: OutputFormat,
) -> io::Result<()> {
    let summary = report.summary();
    let insights = report.insights();

    if format == OutputFormat::Json {
        return write_json(&AnalysisResponse {
            attributes: profiles.catalog().len(),
            profiles: profiles.len(),
            respondents: ratings.respondent_count(),
            summary,
            insights,
            written: display_paths(written),
        });
    }

    let mut out = io::stdout().lock();
    writeln!(out, "Conjoint analysis")?;
    writeln!(
        out,
        "{} attributes, {} profiles, {} respondents ({} observations, design rank {}/{})",
        profiles.catalog().len(),
        profiles.len(),
        ratings.respondent_count(),
        summary.fit.observations,
        summary.fit.rank,
        summary.fit.parameters
    )?;

    writeln!(out, "\nPart-worth utilities (intercept {:.1})", summary.intercept)?;
    for entry in &summary.part_worths {
        writeln!(out, "- {:<32} {:>10.4}", entry.label, entry.part_worth)?;
    }

    writeln!(out, "\nAttribute importance")?;
    for entry in &summary.importances {
        let bar = "#".repeat((entry.importance_pct / 2.0).round() as usize);
        writeln!(
            out,
            "- {:<24} {:>6.2}% {}",
            entry.attribute, entry.importance_pct, bar
        )?;
    }

    writeln!(out, "\nPreferred profile")?;
    for level in &insights.preferred_profile {
        writeln!(
            out,
            "- {}: {} ({:.4})",
            level.attribute, level.level, level.part_worth
        )?;
    }

    if !insights.observations.is_empty() {
        writeln!(out, "\nObservations")?;
        for note in &insights.observations {
            writeln!(out, "- {note}")?;
        }
    }

    if !written.is_empty() {
        writeln!(out, "\nSaved")?;
        for path in written {
            writeln!(out, "- {}", path.display())?;
        }
    }
    Ok(())
}
