use super::summary::ConjointReport;
use super::views::{ConjointInsights, PreferredLevel};

pub(crate) fn generate_insights(report: &ConjointReport) -> ConjointInsights {
    let preferred_profile: Vec<PreferredLevel> = report
        .catalog()
        .attributes()
        .iter()
        .enumerate()
        .filter_map(|(index, attribute)| {
            let values = report.part_worths.for_attribute(index)?;
            let (best, part_worth) = values.iter().copied().enumerate().fold(
                None,
                |best: Option<(usize, f64)>, (level, value)| match best {
                    Some((_, current)) if current >= value => best,
                    _ => Some((level, value)),
                },
            )?;
            Some(PreferredLevel {
                attribute: attribute.name().to_string(),
                level: attribute.levels()[best].clone(),
                part_worth,
            })
        })
        .collect();

    let uniform_preferences = report
        .importances
        .iter()
        .all(|entry| entry.importance == 0.0);
    let leading = if uniform_preferences {
        None
    } else {
        report.importances.leading()
    };

    let mut observations = Vec::new();
    if uniform_preferences {
        observations.push(
            "Ratings do not vary with any attribute; no level is preferred over another."
                .to_string(),
        );
    } else {
        if let Some(entry) = leading {
            observations.push(format!(
                "{} drives {:.1}% of the preference spread.",
                entry.attribute, entry.importance
            ));
        }
        let negligible: Vec<&str> = report
            .importances
            .iter()
            .filter(|entry| entry.importance < 5.0)
            .map(|entry| entry.attribute.as_str())
            .collect();
        if !negligible.is_empty() {
            observations.push(format!(
                "Below 5% importance: {}.",
                negligible.join(", ")
            ));
        }
    }
    if report.fit.rank < report.fit.parameters {
        observations.push(format!(
            "Design rank {} of {} columns; part-worths are the minimum-norm solution.",
            report.fit.rank, report.fit.parameters
        ));
    }

    ConjointInsights {
        leading_attribute: leading.map(|entry| entry.attribute.clone()),
        leading_importance_pct: leading.map(|entry| entry.importance),
        preferred_profile,
        uniform_preferences,
        observations,
    }
}
