mod insights;
mod summary;
pub mod views;

pub use summary::ConjointReport;

pub(crate) use insights::generate_insights;
