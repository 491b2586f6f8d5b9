//! A concrete `AgentClient` that calls out to a JSON HTTP endpoint, retrying
//! transient failures the way the rest of the stack does.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use disruption_ai::{is_retryable_http_error, new_request_id, next_backoff_ms_with_jitter};
use disruption_contract::{AgentResponse, DisruptionPayload, ResponseStatus};

use crate::cancellation::CooperativeCancellationToken;
use crate::registry::AgentClient;

const MAX_ATTEMPTS: u32 = 3;

/// Posts `payload` as JSON to `endpoint` and expects an `AgentResponse` JSON
/// body back. Retries retryable HTTP failures with jittered backoff; a
/// non-retryable or exhausted-retry failure becomes a `status=error`
/// `AgentResponse` rather than propagating.
pub struct HttpAgentClient {
    agent_name: String,
    endpoint: String,
    http: reqwest::Client,
}

impl HttpAgentClient {
    pub fn new(agent_name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    fn agent_name(&self) -> &str {
        &self.agent_name
    }

    async fn analyse(
        &self,
        cancellation: &CooperativeCancellationToken,
        payload: &DisruptionPayload,
    ) -> AgentResponse {
        let started = std::time::Instant::now();
        let request_id = new_request_id();

        for attempt in 0..MAX_ATTEMPTS {
            if cancellation.is_cancelled() {
                return AgentResponse::errored(&self.agent_name, "cancelled", started.elapsed().as_secs_f64());
            }

            let sent = self.http.post(&self.endpoint).header("x-request-id", &request_id).json(payload).send().await;

            match sent {
                Ok(response) if response.status().is_success() => {
                    return match response.json::<AgentResponse>().await {
                        Ok(parsed) => parsed,
                        Err(error) => AgentResponse::errored(
                            &self.agent_name,
                            format!("malformed response body: {error}"),
                            started.elapsed().as_secs_f64(),
                        ),
                    };
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt + 1 >= MAX_ATTEMPTS || !matches!(status, 408 | 409 | 425 | 429 | 500..=599) {
                        return AgentResponse::errored(
                            &self.agent_name,
                            format!("upstream returned status {status}"),
                            started.elapsed().as_secs_f64(),
                        );
                    }
                }
                Err(error) => {
                    if attempt + 1 >= MAX_ATTEMPTS || !is_retryable_http_error(&error) {
                        return AgentResponse::errored(
                            &self.agent_name,
                            format!("request failed: {error}"),
                            started.elapsed().as_secs_f64(),
                        );
                    }
                }
            }

            let backoff_ms = next_backoff_ms_with_jitter(attempt as usize, true);
            tokio::select! {
                _ = cancellation.cancelled() => {
                    return AgentResponse::errored(&self.agent_name, "cancelled", started.elapsed().as_secs_f64());
                }
                _ = tokio::time::sleep(Duration::from_millis(backoff_ms)) => {}
            }
        }

        AgentResponse {
            agent_name: self.agent_name.clone(),
            recommendation: String::new(),
            confidence: 0.0,
            binding_constraints: Vec::new(),
            reasoning: String::new(),
            data_sources: Vec::new(),
            extracted_flight_info: None,
            status: ResponseStatus::Error,
            error: Some("retry budget exhausted".to_string()),
            duration_seconds: started.elapsed().as_secs_f64(),
            timestamp: Utc::now(),
        }
    }
}
