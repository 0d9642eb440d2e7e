use crate::optimization::strategy::{CyclicCursor, WeightStrategy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from building or loading a [`SummarizeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("strategy rotation must contain at least one strategy")]
    EmptyRotation,
    #[error("max_rounds must be at least 1")]
    ZeroRounds,
}

/// Tuning for [`DebtGraph::summarize_with`](crate::graph::debt_graph::DebtGraph::summarize_with).
///
/// `strategies` is the rotation applied to successive cancellation rounds;
/// `max_rounds` caps how many components the orchestrator will process
/// before settling the rest as they are.
///
/// ```
/// use debt_optimizer::optimization::config::SummarizeConfig;
///
/// let config = SummarizeConfig::from_json_str(r#"{ "max_rounds": 50 }"#).unwrap();
/// assert_eq!(config.max_rounds(), 50);
/// assert_eq!(config.strategies().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSummarizeConfig")]
pub struct SummarizeConfig {
    strategies: Vec<WeightStrategy>,
    max_rounds: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSummarizeConfig {
    #[serde(default = "default_strategies")]
    strategies: Vec<WeightStrategy>,
    #[serde(default = "default_max_rounds")]
    max_rounds: usize,
}

impl TryFrom<RawSummarizeConfig> for SummarizeConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSummarizeConfig) -> Result<Self, Self::Error> {
        SummarizeConfig::new(raw.strategies, raw.max_rounds)
    }
}

fn default_strategies() -> Vec<WeightStrategy> {
    vec![WeightStrategy::MinMidRemove, WeightStrategy::MaxNumMidRemove]
}

fn default_max_rounds() -> usize {
    10_000
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            max_rounds: default_max_rounds(),
        }
    }
}

impl SummarizeConfig {
    pub fn new(strategies: Vec<WeightStrategy>, max_rounds: usize) -> Result<Self, ConfigError> {
        if strategies.is_empty() {
            return Err(ConfigError::EmptyRotation);
        }
        if max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(Self {
            strategies,
            max_rounds,
        })
    }

    /// Parse a JSON object; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn strategies(&self) -> &[WeightStrategy] {
        &self.strategies
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// A fresh cursor at the start of the strategy rotation.
    pub fn rotation(&self) -> CyclicCursor<WeightStrategy> {
        CyclicCursor::begin(self.strategies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rotation() {
        let config = SummarizeConfig::default();
        assert_eq!(
            config.strategies(),
            &[WeightStrategy::MinMidRemove, WeightStrategy::MaxNumMidRemove]
        );
        assert_eq!(config.max_rounds(), 10_000);
        assert_eq!(*config.rotation().value(), WeightStrategy::MinMidRemove);
    }

    #[test]
    fn test_new_validates() {
        assert!(matches!(
            SummarizeConfig::new(vec![], 10),
            Err(ConfigError::EmptyRotation)
        ));
        assert!(matches!(
            SummarizeConfig::new(vec![WeightStrategy::MaxRemove], 0),
            Err(ConfigError::ZeroRounds)
        ));
    }

    #[test]
    fn test_from_json() {
        let config =
            SummarizeConfig::from_json_str(r#"{ "strategies": ["MaxRemove", "MinNumRemove"] }"#)
                .unwrap();
        assert_eq!(
            config.strategies(),
            &[WeightStrategy::MaxRemove, WeightStrategy::MinNumRemove]
        );
        assert_eq!(config.max_rounds(), 10_000);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(SummarizeConfig::from_json_str(r#"{ "strategies": [] }"#).is_err());
        assert!(SummarizeConfig::from_json_str(r#"{ "strategies": ["Greedy"] }"#).is_err());
        assert!(SummarizeConfig::from_json_str(r#"{ "rounds": 5 }"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = SummarizeConfig::new(vec![WeightStrategy::MidPointRemove], 7).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"strategies":["MidPointRemove"],"max_rounds":7}"#);
        assert_eq!(SummarizeConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SummarizeConfig::from_file("/nonexistent/summarize.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
