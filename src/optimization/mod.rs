pub mod config;
pub mod flattened;
pub mod simplifier;
pub mod strategy;
pub mod summarize;
