//! Error kinds surfaced by the core. Internal agent failures never unwind
//! past the PhaseRunner's guard; only `SafetyHalt` and `PromptInvalid` are
//! allowed to short-circuit the orchestrator.

use thiserror::Error;

use crate::entities::Collation;

/// Raised by `PhaseRunner` when a Safety-class agent fails to produce a
/// successful response in the current phase.
#[derive(Debug, Clone, Error)]
#[error("safety halt: {failed_agents:?} did not return success in phase")]
pub struct SafetyHaltError {
    pub failed_agents: Vec<String>,
    pub partial_collation: Collation,
}

/// Error kinds surfaced to the orchestrator. Most are recorded inline on
/// an `AgentResponse` or `ArbitratorOutput` rather than propagated as a Rust
/// error; `DisruptionError` models the two that actually short-circuit
/// `Orchestrator::handle`.
#[derive(Debug, Error)]
pub enum DisruptionError {
    #[error("prompt too short: must be at least 10 non-whitespace characters")]
    PromptInvalid,

    #[error(transparent)]
    SafetyHalt(#[from] SafetyHaltError),

    #[error("duplicate agent name in registry: {0}")]
    DuplicateAgentRegistration(String),

    #[error("arbitrator weights must be non-negative and sum to 1.0: {0:?}")]
    InvalidArbitratorWeights(crate::recovery::ScoreWeights),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Phase;
    use chrono::Utc;
    use std::collections::HashMap;

    #[test]
    fn unit_disruption_error_prompt_invalid_has_stable_message() {
        let error = DisruptionError::PromptInvalid;
        assert_eq!(
            error.to_string(),
            "prompt too short: must be at least 10 non-whitespace characters"
        );
    }

    #[test]
    fn unit_safety_halt_error_carries_failed_agents_and_partial_collation() {
        let halt = SafetyHaltError {
            failed_agents: vec!["crew_compliance".to_string()],
            partial_collation: Collation {
                phase: Phase::Initial,
                responses: HashMap::new(),
                timestamp: Utc::now(),
                duration_seconds: 1.0,
            },
        };
        let error: DisruptionError = halt.clone().into();
        assert!(error.to_string().contains("crew_compliance"));
        assert_eq!(halt.partial_collation.count(), 0);
    }
}
