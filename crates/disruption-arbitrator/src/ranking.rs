//! Constraint filtering, ranking, and the conservative fallback.

use std::collections::HashMap;

use disruption_contract::{ArbitratorOutput, ConflictRecord, ConflictResolution, RecoveryPlan, RecoveryStep, RecoverySolution, SafetyOverride};
use disruption_safety::satisfies_all;

/// Drops every solution that violates a binding constraint. Returns the
/// survivors in their original relative order; ranking happens separately.
pub fn filter_by_constraints(solutions: Vec<RecoverySolution>, binding_constraints: &[String]) -> Vec<RecoverySolution> {
    solutions.into_iter().filter(|solution| satisfies_all(&solution.risks, binding_constraints.iter())).collect()
}

/// Sorts by `composite_score` descending, tie-breaking by `safety_score`
/// descending then `solution_id` ascending, truncates to `max_solutions`, and
/// renumbers `solution_id` to `1..N` in rank order.
pub fn rank_and_renumber(mut solutions: Vec<RecoverySolution>, max_solutions: usize) -> Vec<RecoverySolution> {
    solutions.sort_by(|a, b| {
            b.composite_score.partial_cmp(&a.composite_score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| b.safety_score.partial_cmp(&a.safety_score).unwrap_or(std::cmp::Ordering::Equal)).then_with(|| a.solution_id.cmp(&b.solution_id))
    });
    solutions.truncate(max_solutions.clamp(1, 3));
    for (index, solution) in solutions.iter_mut().enumerate() {
        let new_id = (index as u32) + 1;
        solution.solution_id = new_id;
        solution.recovery_plan.solution_id = new_id;
    }
    solutions
}

/// The step-5 conservative fallback, also reused for the arbitrator's
/// top-level catch-all failure path.
pub fn conservative_fallback(
    conflicts_identified: Vec<ConflictRecord>,
    conflict_resolutions: Vec<ConflictResolution>,
    safety_overrides: Vec<SafetyOverride>,
    error: Option<String>,
) -> ArbitratorOutput {
    let escalate_step = RecoveryStep {
        step_number: 1,
        step_name: "escalate to duty officer".to_string(),
        description: "Automated arbitration could not produce a compliant recovery option; escalate for manual review.".to_string(),
        responsible_agent: "duty_officer".to_string(),
        action_type: "escalation".to_string(),
        success_criteria: "duty officer acknowledges the escalation".to_string(),
        dependencies: Vec::new(),
        estimated_duration: "15m".to_string(),
        automation_possible: false,
        parameters: HashMap::new(),
    };
    let plan = RecoveryPlan {
        solution_id: 1,
        steps: vec![escalate_step],
        critical_path: vec![1],
        contingency_plans: Vec::new(),
        estimated_total_duration: "15m".to_string(),
    };
    let fallback_solution = RecoverySolution {
        solution_id: 1,
        title: "Escalate to manual review".to_string(),
        description: "No automatically generated recovery option satisfied every binding safety constraint.".to_string(),
        recommendations: vec!["Escalate to duty officer for manual review".to_string()],
        safety_compliance: serde_json::json!({ "automated_resolution": false }),
        passenger_impact: serde_json::json!(null),
        financial_impact: serde_json::json!(null),
        network_impact: serde_json::json!(null),
        safety_score: 0.0,
        cost_score: 0.0,
        passenger_score: 0.0,
        network_score: 0.0,
        composite_score: 0.0,
        pros: Vec::new(),
        cons: Vec::new(),
        risks: Vec::new(),
        confidence: 0.0,
        estimated_duration: "15m".to_string(),
        recovery_plan: plan,
    };
    ArbitratorOutput::project_from_recommended(
        vec![fallback_solution],
        conflicts_identified,
        conflict_resolutions,
        safety_overrides,
        error,
    )
}
