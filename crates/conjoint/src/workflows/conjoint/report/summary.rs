use super::super::catalog::AttributeCatalog;
use super::super::estimator::{FitDiagnostics, PartWorthUtilities};
use super::super::importance::AttributeImportances;
use super::views::{ConjointInsights, ConjointReportSummary, ImportanceEntry, PartWorthEntry};
use serde::Serialize;

/// Outcome of one conjoint run. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConjointReport {
    #[serde(skip)]
    catalog: AttributeCatalog,
    pub part_worths: PartWorthUtilities,
    pub importances: AttributeImportances,
    pub fit: FitDiagnostics,
}

impl ConjointReport {
    pub(crate) fn new(
        catalog: AttributeCatalog,
        part_worths: PartWorthUtilities,
        importances: AttributeImportances,
        fit: FitDiagnostics,
    ) -> Self {
        Self {
            catalog,
            part_worths,
            importances,
            fit,
        }
    }

    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    pub fn summary(&self) -> ConjointReportSummary {
        let part_worths = self
            .part_worths
            .iter()
            .map(|(key, part_worth)| PartWorthEntry {
                label: key.label(),
                attribute: key.attribute.clone(),
                level: key.level.clone(),
                part_worth,
            })
            .collect();

        let importances = self
            .importances
            .iter()
            .map(|entry| ImportanceEntry {
                attribute: entry.attribute.clone(),
                range: entry.range,
                importance_pct: entry.importance,
            })
            .collect();

        ConjointReportSummary {
            intercept: self.part_worths.intercept(),
            part_worths,
            importances,
            fit: self.fit,
        }
    }

    pub fn insights(&self) -> ConjointInsights {
        super::generate_insights(self)
    }
}
