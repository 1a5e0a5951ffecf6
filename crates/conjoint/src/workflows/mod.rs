pub mod conjoint;
