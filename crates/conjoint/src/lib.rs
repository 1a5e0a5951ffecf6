//! Conjoint analysis over full-factorial product profiles.
//!
//! The pipeline runs strictly in order: an attribute table is parsed into an
//! [`AttributeCatalog`](workflows::conjoint::AttributeCatalog), expanded into a
//! [`ProfileSet`](workflows::conjoint::ProfileSet), rated by respondents, then
//! dummy-encoded and fitted by minimum-norm least squares to obtain one
//! part-worth per attribute level and an importance percentage per attribute.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
