//! Arbitration results and the orchestrator's final packaged output.

use serde::{Deserialize, Serialize};

use crate::entities::Collation;
use crate::recovery::RecoverySolution;

/// Classification of a conflict between two agents' recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    SafetyVsBusiness,
    SafetyVsSafety,
    BusinessVsBusiness,
}

/// One recorded conflict between two agents' recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub agents_involved: Vec<String>,
    pub conflict_type: ConflictType,
    pub description: String,
}

/// The resolution applied to one recorded conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub conflict: ConflictRecord,
    pub resolution: String,
    pub rationale: String,
}

/// A record of a safety-class binding constraint overriding a business
/// recommendation during `safety_vs_business` resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyOverride {
    pub safety_agent: String,
    pub overridden_agent: String,
    pub binding_constraint: String,
}

/// Result of `Arbitrator::arbitrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitratorOutput {
    /// 1-3 solutions, ordered by descending `composite_score`.
    pub solution_options: Vec<RecoverySolution>,
    pub recommended_solution_id: u32,
    pub conflicts_identified: Vec<ConflictRecord>,
    pub conflict_resolutions: Vec<ConflictResolution>,
    pub safety_overrides: Vec<SafetyOverride>,
    /// Backward-compat projection of `solution_options[0]`.
    pub final_decision: String,
    pub recommendations: Vec<String>,
    pub justification: String,
    pub reasoning: String,
    pub confidence: f64,
    /// Present only when the arbitrator hit its catch-all fallback path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArbitratorOutput {
    /// Builds the backward-compat top-level fields from the recommended
    /// solution.
    pub fn project_from_recommended(
        solution_options: Vec<RecoverySolution>,
        conflicts_identified: Vec<ConflictRecord>,
        conflict_resolutions: Vec<ConflictResolution>,
        safety_overrides: Vec<SafetyOverride>,
        error: Option<String>,
    ) -> Self {
        let recommended = solution_options.first().expect("solution_options must be non-empty before projection");
        let recommended_solution_id = recommended.solution_id;
        let final_decision = recommended.title.clone();
        let recommendations = recommended.recommendations.clone();
        let justification = recommended.description.clone();
        let reasoning = recommended.pros.join("; ");
        let confidence = recommended.confidence;
        Self {
            solution_options,
            recommended_solution_id,
            conflicts_identified,
            conflict_resolutions,
            safety_overrides,
            final_decision,
            recommendations,
            justification,
            reasoning,
            confidence,
            error,
        }
    }
}

/// Top-level status of a `Handle` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Success,
    Partial,
    Failed,
}

/// The full audit trail: every phase that executed, never pruned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditTrail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase1_initial: Option<Collation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_revision: Option<Collation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase3_arbitration: Option<ArbitratorOutput>,
}

/// Result returned by `Orchestrator::handle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalOutput {
    pub status: FinalStatus,
    #[serde(flatten)]
    pub arbitration: Option<ArbitratorOutput>,
    pub audit_trail: AuditTrail,
    pub total_duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FinalOutput {
    /// Builds the `status=failed, no audit trail` shape for `prompt_invalid`.
    pub fn prompt_invalid(message: impl Into<String>) -> Self {
        Self {
            status: FinalStatus::Failed,
            arbitration: None,
            audit_trail: AuditTrail::default(),
            total_duration_seconds: 0.0,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::{RecoveryPlan, RecoveryStep};
    use std::collections::HashMap;

    fn sample_solution(id: u32, composite_score: f64) -> RecoverySolution {
        RecoverySolution {
            solution_id: id,
            title: format!("solution-{id}"),
            description: "desc".to_string(),
            recommendations: vec!["do thing".to_string()],
            safety_compliance: serde_json::json!({}),
            passenger_impact: serde_json::json!({}),
            financial_impact: serde_json::json!({}),
            network_impact: serde_json::json!({}),
            safety_score: 90.0,
            cost_score: 80.0,
            passenger_score: 70.0,
            network_score: 60.0,
            composite_score,
            pros: vec!["fast".to_string()],
            cons: Vec::new(),
            risks: Vec::new(),
            confidence: 0.9,
            estimated_duration: "2h".to_string(),
            recovery_plan: RecoveryPlan {
                solution_id: id,
                steps: vec![RecoveryStep {
                        step_number: 1,
                        step_name: "step".to_string(),
                        description: "d".to_string(),
                        responsible_agent: "network".to_string(),
                        action_type: "notify".to_string(),
                        success_criteria: "ok".to_string(),
                        dependencies: Vec::new(),
                        estimated_duration: "10m".to_string(),
                        automation_possible: false,
                        parameters: HashMap::new(),
                }],
                critical_path: vec![1],
                contingency_plans: Vec::new(),
                estimated_total_duration: "10m".to_string(),
            },
        }
    }

    #[test]
    fn unit_project_from_recommended_copies_first_solution_fields() {
        let output = ArbitratorOutput::project_from_recommended(
            vec![sample_solution(1, 78.0), sample_solution(2, 60.0)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        );
        assert_eq!(output.recommended_solution_id, 1);
        assert_eq!(output.final_decision, "solution-1");
        assert_eq!(output.confidence, 0.9);
        assert!(output.error.is_none());
    }

    #[test]
    fn unit_final_output_prompt_invalid_has_empty_audit_trail() {
        let output = FinalOutput::prompt_invalid("prompt too short");
        assert_eq!(output.status, FinalStatus::Failed);
        assert!(output.audit_trail.phase1_initial.is_none());
        assert!(output.audit_trail.phase2_revision.is_none());
        assert!(output.audit_trail.phase3_arbitration.is_none());
        assert_eq!(output.error.as_deref(), Some("prompt too short"));
    }
}
