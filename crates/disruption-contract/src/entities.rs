//! Core per-phase data model: payload, agent responses, and collations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured flight extraction produced by an agent from the free-text prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub flight_number: String,
    pub date: String,
    pub disruption_event: String,
}

impl FlightInfo {
    /// Checks the shape the core is allowed to enforce on an agent's claimed
    /// extraction: `flight_number` matches `^EY\d{3,4}$` (case-normalised),
    /// `date` looks like `YYYY-MM-DD`, and `disruption_event` is non-empty
    /// after trimming. The core does not second-guess flight data semantics,
    /// only well-formedness.
    pub fn is_well_formed(&self) -> bool {
        flight_number_matches(&self.flight_number)
        && date_looks_like_iso8601_calendar_date(&self.date)
        && !self.disruption_event.trim().is_empty()
    }
}

fn flight_number_matches(candidate: &str) -> bool {
    let upper = candidate.to_ascii_uppercase();
    let Some(digits) = upper.strip_prefix("EY") else {
        return false;
    };
    (3..=4).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

fn date_looks_like_iso8601_calendar_date(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    let is_digit = |i: usize| bytes[i].is_ascii_digit();
    (0..4).all(is_digit)
    && bytes[4] == b'-'
    && (5..7).all(is_digit)
    && bytes[7] == b'-'
    && (8..10).all(is_digit)
}

/// The phase a `DisruptionPayload` or `Collation` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initial,
    Revision,
}

/// Outcome of one agent invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Timeout,
    Error,
}

/// Input handed to one `AgentClient::analyse` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionPayload {
    pub user_prompt: String,
    pub phase: Phase,
    /// Required iff `phase == Revision`, forbidden iff `phase == Initial`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_recommendations: Option<HashMap<String, AgentResponse>>,
}

impl DisruptionPayload {
    pub fn initial(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            phase: Phase::Initial,
            other_recommendations: None,
        }
    }

    pub fn revision(
        user_prompt: impl Into<String>,
        prior: HashMap<String, AgentResponse>,
    ) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            phase: Phase::Revision,
            other_recommendations: Some(prior),
        }
    }

    /// `true` when the payload's phase/other_recommendations pairing matches.
    pub fn is_well_formed(&self) -> bool {
        match self.phase {
            Phase::Initial => self.other_recommendations.is_none(),
            Phase::Revision => self.other_recommendations.is_some(),
        }
    }
}

/// One agent's output for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_name: String,
    pub recommendation: String,
    pub confidence: f64,
    #[serde(default)]
    pub binding_constraints: Vec<String>,
    pub reasoning: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_flight_info: Option<FlightInfo>,
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

impl AgentResponse {
    /// Builds a `status=timeout` response per the PhaseRunner guard.
    pub fn timed_out(agent_name: impl Into<String>, after_seconds: f64) -> Self {
        let agent_name = agent_name.into();
        Self {
            agent_name,
            recommendation: String::new(),
            confidence: 0.0,
            binding_constraints: Vec::new(),
            reasoning: String::new(),
            data_sources: Vec::new(),
            extracted_flight_info: None,
            status: ResponseStatus::Timeout,
            error: Some(format!("deadline exceeded at {after_seconds:.0}s")),
            duration_seconds: after_seconds,
            timestamp: Utc::now(),
        }
    }

    /// Builds a `status=error` response per the PhaseRunner guard.
    pub fn errored(agent_name: impl Into<String>, message: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            agent_name: agent_name.into(),
            recommendation: String::new(),
            confidence: 0.0,
            binding_constraints: Vec::new(),
            reasoning: String::new(),
            data_sources: Vec::new(),
            extracted_flight_info: None,
            status: ResponseStatus::Error,
            error: Some(message.into()),
            duration_seconds,
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ResponseStatus::Success)
    }
}

/// One phase's aggregated result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collation {
    pub phase: Phase,
    pub responses: HashMap<String, AgentResponse>,
    pub timestamp: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl Collation {
    /// Every `AgentResponse` whose `status == success`.
    pub fn successful(&self) -> Vec<&AgentResponse> {
        self.responses.values().filter(|r| r.is_success()).collect()
    }

    /// Every `AgentResponse` whose `status != success`.
    pub fn failed(&self) -> Vec<&AgentResponse> {
        self.responses.values().filter(|r| !r.is_success()).collect()
    }

    pub fn count(&self) -> usize {
        self.responses.len()
    }

    /// `true` when every entry's key equals its value's `agent_name`.
    pub fn keys_match_agent_names(&self) -> bool {
        self.responses.iter().all(|(key, response)| key == &response.agent_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response(agent_name: &str, status: ResponseStatus) -> AgentResponse {
        AgentResponse {
            agent_name: agent_name.to_string(),
            recommendation: "delay 2h".to_string(),
            confidence: 0.8,
            binding_constraints: Vec::new(),
            reasoning: "because".to_string(),
            data_sources: Vec::new(),
            extracted_flight_info: None,
            status,
            error: None,
            duration_seconds: 1.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn unit_flight_info_well_formed_accepts_canonical_shape() {
        let info = FlightInfo {
            flight_number: "ey123".to_string(),
            date: "2026-01-20".to_string(),
            disruption_event: "mechanical failure".to_string(),
        };
        assert!(info.is_well_formed());
    }

    #[test]
    fn regression_flight_info_well_formed_rejects_malformed_fields() {
        let bad_number = FlightInfo {
            flight_number: "BA123".to_string(),
            date: "2026-01-20".to_string(),
            disruption_event: "x".to_string(),
        };
        assert!(!bad_number.is_well_formed());

        let bad_date = FlightInfo {
            flight_number: "EY1".to_string(),
            date: "yesterday".to_string(),
            disruption_event: "x".to_string(),
        };
        assert!(!bad_date.is_well_formed());

        let empty_event = FlightInfo {
            flight_number: "EY1234".to_string(),
            date: "2026-01-20".to_string(),
            disruption_event: " ".to_string(),
        };
        assert!(!empty_event.is_well_formed());
    }

    #[test]
    fn unit_disruption_payload_well_formed_enforces_phase_pairing() {
        assert!(DisruptionPayload::initial("prompt").is_well_formed());
        assert!(DisruptionPayload::revision("prompt", HashMap::new()).is_well_formed());

        let malformed_initial = DisruptionPayload {
            user_prompt: "prompt".to_string(),
            phase: Phase::Initial,
            other_recommendations: Some(HashMap::new()),
        };
        assert!(!malformed_initial.is_well_formed());

        let malformed_revision = DisruptionPayload {
            user_prompt: "prompt".to_string(),
            phase: Phase::Revision,
            other_recommendations: None,
        };
        assert!(!malformed_revision.is_well_formed());
    }

    #[test]
    fn unit_collation_derives_successful_failed_and_count() {
        let mut responses = HashMap::new();
        responses.insert(
            "network".to_string(),
            sample_response("network", ResponseStatus::Success),
        );
        responses.insert(
            "cargo".to_string(),
            sample_response("cargo", ResponseStatus::Error),
        );
        let collation = Collation {
            phase: Phase::Initial,
            responses,
            timestamp: Utc::now(),
            duration_seconds: 2.0,
        };
        assert_eq!(collation.count(), 2);
        assert_eq!(collation.successful().len(), 1);
        assert_eq!(collation.failed().len(), 1);
        assert!(collation.keys_match_agent_names());
    }

    #[test]
    fn regression_collation_keys_match_agent_names_detects_mismatch() {
        let mut responses = HashMap::new();
        responses.insert(
            "network".to_string(),
            sample_response("cargo", ResponseStatus::Success),
        );
        let collation = Collation {
            phase: Phase::Initial,
            responses,
            timestamp: Utc::now(),
            duration_seconds: 1.0,
        };
        assert!(!collation.keys_match_agent_names());
    }
}
