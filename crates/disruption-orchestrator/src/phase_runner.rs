//! Runs one phase across all seven agents in parallel and assembles the
//! result into a `Collation`, enforcing the safety-halt rule.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use disruption_agent_core::{invoke_agent_with_guard, AgentRegistry, CooperativeCancellationToken};
use disruption_contract::{classify_agent, AgentClass, AgentResponse, Collation, DisruptionPayload, Phase, ResponseStatus, SafetyHaltError};
use futures_util::future::join_all;

use crate::config::TimeoutTable;
use crate::prompt_augmenter::build_payload;

/// Runs `phase` across every agent in `registry`, honouring per-agent
/// deadlines from `timeouts`. Returns the assembled `Collation` on success,
/// or a `SafetyHaltError` carrying the failed safety agents and the partial
/// collation when any Safety-class agent timed out or errored.
pub async fn run_phase(
    registry: &AgentRegistry,
    cancellation: &CooperativeCancellationToken,
    timeouts: &TimeoutTable,
    phase: Phase,
    user_prompt: &str,
    prior_collation: Option<&Collation>,
) -> Result<Collation, SafetyHaltError> {
    let started = std::time::Instant::now();
    let payload = Arc::new(build_payload(phase, user_prompt, prior_collation));

    let mut tasks = Vec::with_capacity(7);
    for (agent_name, client) in registry.iter() {
        let client = Arc::clone(client);
        let cancellation = cancellation.clone();
        let payload = Arc::clone(&payload);
        let deadline = timeouts.deadline_for(agent_name, phase);
        tasks.push(tokio::spawn(async move {
                    invoke_agent_with_guard(client.as_ref(), &cancellation, &payload, deadline).await
        }));
    }

    let task_results = join_all(tasks).await;
    let mut responses: HashMap<String, AgentResponse> = HashMap::with_capacity(task_results.len());
    for (agent_name, joined) in registry.agent_names().zip(task_results) {
        let response = match joined {
            Ok(response) => response,
            Err(join_error) => AgentResponse::errored(
                agent_name,
                format!("agent task panicked: {join_error}"),
                started.elapsed().as_secs_f64(),
            ),
        };
        responses.insert(agent_name.to_string(), response);
    }

    let collation = Collation {
        phase,
        responses,
        timestamp: Utc::now(),
        duration_seconds: started.elapsed().as_secs_f64(),
    };

    let failed_safety_agents: Vec<String> = collation.responses.iter().filter(|(name, response)| {
            classify_agent(name) == Some(AgentClass::Safety)
            && matches!(response.status, ResponseStatus::Timeout | ResponseStatus::Error)
    }).map(|(name, _)| name.clone()).collect();

    if failed_safety_agents.is_empty() {
        Ok(collation)
    } else {
        // Best-effort: signal cancellation so any still-running business
        // tasks stop early. All tasks have already been awaited above, so
        // this only benefits a future phase sharing the same token.
        cancellation.cancel();
        Err(SafetyHaltError {
                failed_agents: failed_safety_agents,
                partial_collation: collation,
        })
    }
}
