//! Deterministic mock `AgentClient` implementations for tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use disruption_contract::{AgentResponse, DisruptionPayload, ResponseStatus};

use crate::cancellation::CooperativeCancellationToken;
use crate::registry::AgentClient;

type ScriptFn = dyn Fn(&DisruptionPayload) -> AgentResponse + Send + Sync;

enum MockBehavior {
    Fixed(AgentResponse),
    Slow(Duration, Box<AgentResponse>),
    Scripted(Arc<ScriptFn>),
}

/// A scripted agent used throughout the property and scenario tests. Each
/// instance answers as one fixed agent name; behaviour is chosen at
/// construction time so tests can build the exact registry a scenario needs.
pub struct MockAgentClient {
    agent_name: String,
    behavior: MockBehavior,
}

impl MockAgentClient {
    /// Always returns a successful response with the given recommendation.
    pub fn always_success(agent_name: &str) -> Self {
        Self::with_response(
            agent_name,
            "maintain current operations".to_string(),
            Vec::new(),
        )
    }

    /// Always returns a successful response with a specific recommendation
    /// and (for Safety-class agents) binding constraints.
    pub fn with_response(
        agent_name: &str,
        recommendation: String,
        binding_constraints: Vec<String>,
    ) -> Self {
        let response = AgentResponse {
            agent_name: agent_name.to_string(),
            recommendation,
            confidence: 0.85,
            binding_constraints,
            reasoning: "deterministic mock reasoning".to_string(),
            data_sources: vec!["mock-data-source".to_string()],
            extracted_flight_info: None,
            status: ResponseStatus::Success,
            error: None,
            duration_seconds: 0.01,
            timestamp: Utc::now(),
        };
        Self {
            agent_name: agent_name.to_string(),
            behavior: MockBehavior::Fixed(response),
        }
    }

    /// Sleeps for `delay` before returning a successful response. Used to
    /// exercise the PhaseRunner's per-agent timeout guard.
    pub fn slow(agent_name: &str, delay: Duration) -> Self {
        let response = AgentResponse {
            agent_name: agent_name.to_string(),
            recommendation: "slow recommendation".to_string(),
            confidence: 0.5,
            binding_constraints: Vec::new(),
            reasoning: "slow mock reasoning".to_string(),
            data_sources: Vec::new(),
            extracted_flight_info: None,
            status: ResponseStatus::Success,
            error: None,
            duration_seconds: delay.as_secs_f64(),
            timestamp: Utc::now(),
        };
        Self {
            agent_name: agent_name.to_string(),
            behavior: MockBehavior::Slow(delay, Box::new(response)),
        }
    }

    /// Always fails with `status=error`, exercising the guard's error path
    /// without relying on a timeout.
    pub fn always_error(agent_name: &str, message: &str) -> Self {
        let response = AgentResponse::errored(agent_name, message, 0.01);
        Self {
            agent_name: agent_name.to_string(),
            behavior: MockBehavior::Fixed(response),
        }
    }

    /// Computes its response from the payload it receives, e.g. to return
    /// different recommendations for `initial` vs `revision` phases.
    pub fn scripted(
        agent_name: &str,
        script: impl Fn(&DisruptionPayload) -> AgentResponse + Send + Sync + 'static,
    ) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            behavior: MockBehavior::Scripted(Arc::new(script)),
        }
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    fn agent_name(&self) -> &str {
        &self.agent_name
    }

    async fn analyse(
        &self,
        cancellation: &CooperativeCancellationToken,
        payload: &DisruptionPayload,
    ) -> AgentResponse {
        match &self.behavior {
            MockBehavior::Fixed(response) => response.clone(),
            MockBehavior::Slow(delay, response) => {
                tokio::select! {
                    _ = cancellation.cancelled() => AgentResponse::errored(&self.agent_name, "cancelled", 0.0),
                    _ = tokio::time::sleep(*delay) => (**response).clone(),
                }
            }
            MockBehavior::Scripted(script) => script(payload),
        }
    }
}
