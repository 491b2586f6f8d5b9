//! Timeout- and cancellation-wraps one agent invocation.

use std::time::Duration;

use disruption_contract::{AgentResponse, DisruptionPayload};

use crate::cancellation::CooperativeCancellationToken;
use crate::registry::AgentClient;

/// Invokes `client.analyse(..)` under `deadline`, converting a timeout or an
/// already-cancelled token into the structured `AgentResponse` shapes the
/// PhaseRunner expects rather than ever unwinding past this call.
pub async fn invoke_agent_with_guard(
    client: &dyn AgentClient,
    cancellation: &CooperativeCancellationToken,
    payload: &DisruptionPayload,
    deadline: Duration,
) -> AgentResponse {
    let agent_name = client.agent_name().to_string();

    if cancellation.is_cancelled() {
        return AgentResponse::errored(agent_name, "cancelled before execution", 0.0);
    }

    let started = std::time::Instant::now();
    let analysis = client.analyse(cancellation, payload);

    let outcome = tokio::select! {
        _ = cancellation.cancelled() => None,
        response = tokio::time::timeout(deadline, analysis) => Some(response),
    };

    match outcome {
        None => AgentResponse::errored(agent_name, "cancelled", started.elapsed().as_secs_f64()),
        Some(Ok(response)) => response,
        Some(Err(_elapsed)) => AgentResponse::timed_out(agent_name, deadline.as_secs_f64()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAgentClient;
    use disruption_contract::{DisruptionPayload, ResponseStatus};
    use std::time::Duration;

    #[tokio::test]
    async fn functional_guard_returns_success_response_within_deadline() {
        let client = MockAgentClient::always_success("network");
        let token = CooperativeCancellationToken::new();
        let payload = DisruptionPayload::initial("Flight EY123 on 2026-01-20 had a mechanical failure");
        let response = invoke_agent_with_guard(&client, &token, &payload, Duration::from_secs(1)).await;
        assert_eq!(response.status, ResponseStatus::Success);
    }

    #[tokio::test]
    async fn functional_guard_converts_slow_agent_into_timeout_response() {
        let client = MockAgentClient::slow("network", Duration::from_millis(200));
        let token = CooperativeCancellationToken::new();
        let payload = DisruptionPayload::initial("Flight EY123 on 2026-01-20 had a mechanical failure");
        let response =
        invoke_agent_with_guard(&client, &token, &payload, Duration::from_millis(20)).await;
        assert_eq!(response.status, ResponseStatus::Timeout);
        assert_eq!(response.agent_name, "network");
    }

    #[tokio::test]
    async fn regression_guard_respects_pre_cancelled_token() {
        let client = MockAgentClient::always_success("network");
        let token = CooperativeCancellationToken::new();
        token.cancel();
        let payload = DisruptionPayload::initial("Flight EY123 on 2026-01-20 had a mechanical failure");
        let response = invoke_agent_with_guard(&client, &token, &payload, Duration::from_secs(1)).await;
        assert_eq!(response.status, ResponseStatus::Error);
    }
}
