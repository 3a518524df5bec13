use std::str::FromStr;

use crate::domain::fog_system_model::orchestration::decision_strategy::DecisionStrategy;
use crate::domain::fog_system_model::orchestration::subgradient_heuristic::{HeuristicParams, SubgradientHeuristic};
use crate::error::{ConversionError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationScheme {
    None,
    Heuristic,
    /// Decisions come from an externally supplied learned policy.
    Learned,
}

impl FromStr for OrchestrationScheme {
    type Err = ConversionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(OrchestrationScheme::None),
            "heuristic" | "dro" => Ok(OrchestrationScheme::Heuristic),
            "learned" | "rl" => Ok(OrchestrationScheme::Learned),
            _ => Err(ConversionError::UnknownOrchestrationScheme(s.to_string())),
        }
    }
}

impl OrchestrationScheme {
    pub fn is_enabled(&self) -> bool {
        *self != OrchestrationScheme::None
    }

    /// Built-in strategy for the scheme. `Learned` has none and must be supplied by the caller.
    pub fn get_instance(&self, params: HeuristicParams) -> Result<Option<Box<dyn DecisionStrategy>>> {
        match self {
            OrchestrationScheme::None => Ok(None),
            OrchestrationScheme::Heuristic => Ok(Some(Box::new(SubgradientHeuristic::new(params)))),
            OrchestrationScheme::Learned => Err(Error::MissingDecisionStrategy),
        }
    }
}
