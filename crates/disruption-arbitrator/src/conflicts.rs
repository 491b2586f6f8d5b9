//! Constraint extraction and conflict classification.

use disruption_contract::{
    classify_agent, AgentClass, AgentResponse, Collation, ConflictRecord, ConflictResolution,
    ConflictType, ResponseStatus, SafetyOverride, SAFETY_AGENT_PRIORITY,
};
use disruption_safety::recommendations_conflict;

/// Collects `binding_constraints` from every Safety agent that returned
/// success. Returns `None` when a Safety agent failed and `degraded` is
/// false - the orchestrator is expected not to call the arbitrator at all
/// in that case (it would already have raised a safety halt), but the
/// arbitrator defends against a misbehaving caller anyway.
pub fn extract_binding_constraints(collation: &Collation, degraded: bool) -> Option<Vec<String>> {
    let safety_agents: Vec<&AgentResponse> = collation.responses.values().filter(|response| classify_agent(&response.agent_name) == Some(AgentClass::Safety)).collect();

    if !degraded
    && safety_agents.iter().any(|response| response.status != ResponseStatus::Success)
    {
        return None;
    }

    let mut constraints: Vec<String> = safety_agents.iter().filter(|response| response.status == ResponseStatus::Success).flat_map(|response| response.binding_constraints.iter().cloned()).collect();
    constraints.sort();
    constraints.dedup();
    Some(constraints)
}

/// Conservatism ranking used to break `safety_vs_safety` ties when neither
/// agent's confidence differs meaningfully - "cancel" is the most cautious
/// action, an unclassified recommendation the least.
fn conservatism_rank(recommendation: &str) -> u8 {
    let groups = disruption_safety::recommended_action_groups(recommendation);
    if groups.contains(&"cancel") {
        4
    } else if groups.contains(&"reroute") {
        3
    } else if groups.contains(&"delay") {
        2
    } else if groups.contains(&"reassign_crew") {
        1
    } else {
        0
    }
}

fn priority_rank(agent_name: &str) -> usize {
    SAFETY_AGENT_PRIORITY.iter().position(|name| *name == agent_name).unwrap_or(SAFETY_AGENT_PRIORITY.len())
}

/// Classifies every conflicting pair of successful responses in `collation`,
/// producing the conflict records and their resolutions. `safety_overrides`
/// is populated for every `safety_vs_business` conflict.
pub fn classify_conflicts(
    collation: &Collation,
) -> (Vec<ConflictRecord>, Vec<ConflictResolution>, Vec<SafetyOverride>) {
    let mut successes: Vec<&AgentResponse> = collation.responses.values().filter(|response| response.status == ResponseStatus::Success).collect();
    successes.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));

    let mut conflicts = Vec::new();
    let mut resolutions = Vec::new();
    let mut overrides = Vec::new();

    for i in 0..successes.len() {
        for j in (i + 1)..successes.len() {
            let a = successes[i];
            let b = successes[j];
            if !recommendations_conflict(&a.recommendation, &b.recommendation) {
                continue;
            }

            let class_a = classify_agent(&a.agent_name);
            let class_b = classify_agent(&b.agent_name);
            let (conflict_type, resolution, rationale, safety_override) = match (class_a, class_b) {
                (Some(AgentClass::Safety), Some(AgentClass::Business)) => {
                    let resolution = format!("favour {} over {}", a.agent_name, b.agent_name);
                    let rationale = "safety-class recommendations always take precedence over business-class ones".to_string();
                    let safety_override = Some(SafetyOverride {
                            safety_agent: a.agent_name.clone(),
                            overridden_agent: b.agent_name.clone(),
                            binding_constraint: a.binding_constraints.first().cloned().unwrap_or_default(),
                    });
                    (ConflictType::SafetyVsBusiness, resolution, rationale, safety_override)
                }
                (Some(AgentClass::Business), Some(AgentClass::Safety)) => {
                    let resolution = format!("favour {} over {}", b.agent_name, a.agent_name);
                    let rationale = "safety-class recommendations always take precedence over business-class ones".to_string();
                    let safety_override = Some(SafetyOverride {
                            safety_agent: b.agent_name.clone(),
                            overridden_agent: a.agent_name.clone(),
                            binding_constraint: b.binding_constraints.first().cloned().unwrap_or_default(),
                    });
                    (ConflictType::SafetyVsBusiness, resolution, rationale, safety_override)
                }
                (Some(AgentClass::Safety), Some(AgentClass::Safety)) => {
                    let winner = pick_more_conservative(a, b);
                    let resolution = format!("favour {} as the more conservative recommendation", winner);
                    let rationale = "safety_vs_safety ties resolve to the more conservative stance, then by confidence, then by fixed agent priority".to_string();
                    (ConflictType::SafetyVsSafety, resolution, rationale, None)
                }
                _ => {
                    let resolution = "retained both views across the solution portfolio".to_string();
                    let rationale = "business_vs_business conflicts have no deterministic override".to_string();
                    (ConflictType::BusinessVsBusiness, resolution, rationale, None)
                }
            };

            conflicts.push(ConflictRecord {
                    agents_involved: vec![a.agent_name.clone(), b.agent_name.clone()],
                    conflict_type,
                    description: format!(
                        "'{}' recommended '{}' while '{}' recommended '{}'",
                        a.agent_name, a.recommendation, b.agent_name, b.recommendation
                    ),
            });
            resolutions.push(ConflictResolution {
                    conflict: conflicts.last().cloned().expect("just pushed"),
                    resolution,
                    rationale,
            });
            if let Some(safety_override) = safety_override {
                overrides.push(safety_override);
            }
        }
    }

    (conflicts, resolutions, overrides)
}

fn pick_more_conservative<'a>(a: &'a AgentResponse, b: &'a AgentResponse) -> &'a str {
    let rank_a = conservatism_rank(&a.recommendation);
    let rank_b = conservatism_rank(&b.recommendation);
    if rank_a != rank_b {
        return if rank_a > rank_b { &a.agent_name } else { &b.agent_name };
    }
    if (a.confidence - b.confidence).abs() > f64::EPSILON {
        return if a.confidence > b.confidence { &a.agent_name } else { &b.agent_name };
    }
    if priority_rank(&a.agent_name) <= priority_rank(&b.agent_name) {
        &a.agent_name
    } else {
        &b.agent_name
    }
}
