use super::super::estimator::FitDiagnostics;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PartWorthEntry {
    pub label: String,
    pub attribute: String,
    pub level: String,
    pub part_worth: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportanceEntry {
    pub attribute: String,
    pub range: f64,
    pub importance_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferredLevel {
    pub attribute: String,
    pub level: String,
    pub part_worth: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConjointInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_importance_pct: Option<f64>,
    /// Highest-utility level of every attribute, in catalog order.
    pub preferred_profile: Vec<PreferredLevel>,
    /// True when every attribute scored zero importance.
    pub uniform_preferences: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConjointReportSummary {
    pub intercept: f64,
    pub part_worths: Vec<PartWorthEntry>,
    pub importances: Vec<ImportanceEntry>,
    pub fit: FitDiagnostics,
}
