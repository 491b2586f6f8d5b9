use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use disruption_agent_core::{AgentClient, AgentRegistry, MockAgentClient};
use disruption_arbitrator::ArbitratorConfig;
use disruption_contract::{all_agent_names, AgentResponse, FinalStatus, SAFETY_AGENT_NAMES};
use disruption_orchestrator::{Orchestrator, TimeoutTable};

const PROMPT: &str = "Flight EY123 on 2026-01-20 had a mechanical failure";

fn registry_with_overrides(overrides: Vec<Arc<dyn AgentClient>>) -> AgentRegistry {
    let mut by_name: HashMap<String, Arc<dyn AgentClient>> = all_agent_names()
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                Arc::new(MockAgentClient::always_success(name)) as Arc<dyn AgentClient>,
            )
        })
        .collect();
    for client in overrides {
        by_name.insert(client.agent_name().to_string(), client);
    }
    AgentRegistry::new(by_name.into_values().collect()).expect("registry should build")
}

fn orchestrator_with(overrides: Vec<Arc<dyn AgentClient>>, timeouts: TimeoutTable) -> Orchestrator {
    Orchestrator::new(registry_with_overrides(overrides), timeouts, ArbitratorConfig::default())
}

#[tokio::test]
async fn scenario_1_clean_run_produces_success_with_full_audit_trail() {
    let orchestrator = orchestrator_with(Vec::new(), TimeoutTable::default());
    let output = orchestrator.handle(PROMPT).await;

    assert_eq!(output.status, FinalStatus::Success);
    assert!(!output
        .arbitration
        .as_ref()
        .expect("arbitration present")
        .solution_options
        .is_empty());
    assert!(output.audit_trail.phase1_initial.is_some());
    assert!(output.audit_trail.phase2_revision.is_some());
    assert!(output.audit_trail.phase3_arbitration.is_some());
}

#[tokio::test]
async fn scenario_2_safety_timeout_in_phase_one_halts_before_phase_two() {
    let overrides: Vec<Arc<dyn AgentClient>> =
        vec![Arc::new(MockAgentClient::slow("crew_compliance", Duration::from_secs(120)))];
    let mut timeouts = TimeoutTable::default();
    timeouts.phase1_safety = Duration::from_millis(20);
    let orchestrator = orchestrator_with(overrides, timeouts);
    let output = orchestrator.handle(PROMPT).await;

    assert_eq!(output.status, FinalStatus::Failed);
    assert!(output.audit_trail.phase1_initial.is_some());
    assert!(output.audit_trail.phase2_revision.is_none());
    assert!(output.audit_trail.phase3_arbitration.is_none());
    assert!(output.error.expect("halt error present").contains("crew_compliance"));
}

#[tokio::test]
async fn scenario_3_business_error_in_phase_two_yields_partial_with_arbitration() {
    // `network` succeeds in Phase 1 (default mock) but errors whenever invoked
    // with a payload carrying Phase-1 history, i.e. only in Phase 2.
    struct FailOnRevisionClient;

    #[async_trait::async_trait]
    impl AgentClient for FailOnRevisionClient {
        fn agent_name(&self) -> &str {
            "network"
        }

        async fn analyse(
            &self,
            cancellation: &disruption_agent_core::CooperativeCancellationToken,
            payload: &disruption_contract::DisruptionPayload,
        ) -> AgentResponse {
            if payload.other_recommendations.is_some() {
                AgentResponse::errored("network", "datastore unavailable", 0.05)
            } else {
                MockAgentClient::always_success("network")
                    .analyse(cancellation, payload)
                    .await
            }
        }
    }

    let overrides: Vec<Arc<dyn AgentClient>> = vec![Arc::new(FailOnRevisionClient)];
    let orchestrator = orchestrator_with(overrides, TimeoutTable::default());
    let output = orchestrator.handle(PROMPT).await;

    assert_eq!(output.status, FinalStatus::Partial);
    let phase2 = output.audit_trail.phase2_revision.expect("phase 2 ran");
    assert_eq!(
        phase2.responses["network"].status,
        disruption_contract::ResponseStatus::Error
    );
    assert!(!output
        .arbitration
        .expect("arbitration still runs")
        .solution_options
        .is_empty());
}

#[tokio::test]
async fn scenario_4_prompt_too_short_invokes_no_agents() {
    let orchestrator = orchestrator_with(Vec::new(), TimeoutTable::default());
    let output = orchestrator.handle("EY1 sick").await;

    assert_eq!(output.status, FinalStatus::Failed);
    assert!(output.audit_trail.phase1_initial.is_none());
    assert!(output.audit_trail.phase2_revision.is_none());
    assert!(output.audit_trail.phase3_arbitration.is_none());
    assert!(output.error.is_some());
}

#[tokio::test]
async fn scenario_5_unsatisfiable_safety_constraints_fall_back_to_conservative_escalation() {
    let overrides: Vec<Arc<dyn AgentClient>> = SAFETY_AGENT_NAMES
        .iter()
        .map(|&name| {
            let constraint = if name == "crew_compliance" {
                "no delay > 2h"
            } else {
                "require 10h crew rest"
            };
            Arc::new(MockAgentClient::with_response(
                name,
                "delay 3h pending crew rest",
                vec![constraint.to_string()],
            )) as Arc<dyn AgentClient>
        })
        .collect();
    let orchestrator = orchestrator_with(overrides, TimeoutTable::default());
    let output = orchestrator.handle(PROMPT).await;

    assert_eq!(output.status, FinalStatus::Partial);
    let arbitration = output.arbitration.expect("arbitration ran");
    assert_eq!(arbitration.confidence, 0.0);
    assert_eq!(arbitration.solution_options.len(), 1);
    assert_eq!(arbitration.solution_options[0].recovery_plan.steps.len(), 1);
}
