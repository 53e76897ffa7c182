//! Evaluation strategy value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the pseudo-strategy that is resolved into a real one.
pub const RANDOM_STRATEGY_NAME: &str = "random";

/// How the comparison engine issues and checks queries against both instances.
///
/// Only real strategies live here; `random` is modelled by [`StrategyChoice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStrategy {
    /// Each query runs to completion on "this" before it runs on "other"
    Sequential,
    /// Query executions alternate between the two instances
    Interleaved,
}

impl EvaluationStrategy {
    /// All real strategies, in selection order.
    ///
    /// The order is part of the reproducibility contract: a seed picks an
    /// index into this slice.
    pub const ALL: [EvaluationStrategy; 2] =
        [EvaluationStrategy::Sequential, EvaluationStrategy::Interleaved];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStrategy::Sequential => "sequential",
            EvaluationStrategy::Interleaved => "interleaved",
        }
    }

    /// Comma-separated list of the real strategy names.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for EvaluationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EvaluationStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| DomainError::UnknownStrategy(s.to_string(), Self::names()))
    }
}

/// The strategy requested by the user: a real strategy, or `random`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrategyChoice {
    Named(EvaluationStrategy),
    #[default]
    Random,
}

impl std::fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyChoice::Named(strategy) => write!(f, "{}", strategy),
            StrategyChoice::Random => write!(f, "{}", RANDOM_STRATEGY_NAME),
        }
    }
}

impl FromStr for StrategyChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == RANDOM_STRATEGY_NAME {
            return Ok(StrategyChoice::Random);
        }
        s.parse::<EvaluationStrategy>()
            .map(StrategyChoice::Named)
            .map_err(|_| {
                DomainError::UnknownStrategy(
                    s.to_string(),
                    format!("{}, {}", EvaluationStrategy::names(), RANDOM_STRATEGY_NAME),
                )
            })
    }
}

impl From<EvaluationStrategy> for StrategyChoice {
    fn from(strategy: EvaluationStrategy) -> Self {
        StrategyChoice::Named(strategy)
    }
}
