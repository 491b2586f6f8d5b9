//! Solution seeding and per-solution drafting.

use std::collections::HashMap;

use disruption_contract::{classify_agent, AgentClass, AgentResponse, Collation, RecoveryPlan, RecoveryStep, RecoverySolution, ResponseStatus, ScoreWeights};
use disruption_safety::recommended_action_groups;

/// One seed strategy: a named stance plus which successful business
/// responses it leans on. Safety-class recommendations are always honoured
/// in full, since they are binding; strategies vary only in how much weight
/// they give conflicting business-class recommendations.
struct SeedStrategy {
    title: &'static str,
    description: &'static str,
    cost_factor: f64,
    passenger_factor: f64,
    network_factor: f64,
    risk_note: Option<&'static str>,
}

/// Produces 1-3 Pareto-informative seed strategies. Always includes the
/// conservative, safety-first stance; adds a cancel-and-reprotect stance
/// when any successful recommendation proposed cancellation, and a
/// balanced stance otherwise/additionally, capped at three seeds.
fn seed_strategies(collation: &Collation) -> Vec<SeedStrategy> {
    let mut strategies = vec![SeedStrategy {
            title: "Conservative safety-first response",
            description: "Follows every safety-class recommendation exactly and minimises operational risk, accepting higher cost and schedule impact.",
            cost_factor: 0.7,
            passenger_factor: 0.75,
            network_factor: 0.75,
            risk_note: None,
    }];

    let any_cancel_recommended = collation.responses.values().any(|response| response.status == ResponseStatus::Success && recommended_action_groups(&response.recommendation).contains(&"cancel"));

    if any_cancel_recommended {
        strategies.push(SeedStrategy {
                title: "Cancel and reprotect",
                description: "Cancels the affected rotation outright and reprotects passengers on alternative services, trading network disruption for certainty.",
                cost_factor: 0.5,
                passenger_factor: 0.6,
                network_factor: 0.5,
                risk_note: Some("cancellation removes scheduling flexibility for the rest of the day"),
        });
    }

    strategies.push(SeedStrategy {
            title: "Balanced crew and network recovery",
            description: "Balances business-class recommendations against safety constraints, aiming for the least-disruptive compliant recovery.",
            cost_factor: 0.85,
            passenger_factor: 0.85,
            network_factor: 0.85,
            risk_note: None,
    });

    strategies.truncate(3);
    strategies
}

fn average_confidence(collation: &Collation, agent_names: &[&str]) -> f64 {
    let confidences: Vec<f64> = agent_names.iter().filter_map(|name| collation.responses.get(*name)).filter(|response| response.status == ResponseStatus::Success).map(|response| response.confidence).collect();
    if confidences.is_empty() {
        return 0.5;
    }
    confidences.iter().sum::<f64>() / confidences.len() as f64
}

fn successful_reasoning(collation: &Collation, class: AgentClass, limit: usize) -> Vec<String> {
    let mut responses: Vec<&AgentResponse> = collation.responses.values().filter(|response| {
            response.status == ResponseStatus::Success && classify_agent(&response.agent_name) == Some(class)
    }).collect();
    responses.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));
    responses.into_iter().take(limit).map(|response| format!("{}: {}", response.agent_name, response.reasoning)).collect()
}

fn build_recovery_plan(seed_index: u32, strategy: &SeedStrategy, collation: &Collation) -> RecoveryPlan {
    let mut successes: Vec<&AgentResponse> = collation.responses.values().filter(|response| response.status == ResponseStatus::Success).collect();
    successes.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));

    let steps: Vec<RecoveryStep> = successes.iter().enumerate().map(|(index, response)| RecoveryStep {
            step_number: (index as u32) + 1,
            step_name: format!("{} action", response.agent_name),
            description: response.recommendation.clone(),
            responsible_agent: response.agent_name.clone(),
            action_type: recommended_action_groups(&response.recommendation).first().map(|group| group.to_string()).unwrap_or_else(|| "coordination".to_string()),
            success_criteria: "action confirmed complete by responsible agent".to_string(),
            dependencies: if index == 0 { Vec::new() } else { vec![index as u32] },
            estimated_duration: "30m".to_string(),
            automation_possible: false,
            parameters: HashMap::new(),
    }).collect();

    let critical_path = steps.iter().map(|step| step.step_number).collect::<Vec<_>>();
    RecoveryPlan {
        solution_id: seed_index,
        estimated_total_duration: format!("{}h", steps.len().max(1)),
        critical_path,
        contingency_plans: vec![format!("escalate to duty officer if '{}' cannot be completed", strategy.title)],
        steps,
    }
}

/// Drafts one `RecoverySolution` per seed strategy. A seed that panics while
/// drafting is the caller's concern to catch; this function itself cannot
/// fail, since every input is already validated data from a `Collation`.
pub fn draft_solutions(collation: &Collation, weights: ScoreWeights) -> Vec<RecoverySolution> {
    let safety_confidence = average_confidence(collation, &disruption_contract::SAFETY_AGENT_NAMES);
    let network_confidence = average_confidence(collation, &["network"]);
    let guest_confidence = average_confidence(collation, &["guest_experience"]);
    let finance_confidence = average_confidence(collation, &["finance"]);

    seed_strategies(collation).into_iter().enumerate().map(|(index, strategy)| {
            let solution_id = (index as u32) + 1;
            let safety_score = (safety_confidence * 100.0).clamp(0.0, 100.0);
            let cost_score = (finance_confidence * 100.0 * strategy.cost_factor).clamp(0.0, 100.0);
            let passenger_score = (guest_confidence * 100.0 * strategy.passenger_factor).clamp(0.0, 100.0);
            let network_score = (network_confidence * 100.0 * strategy.network_factor).clamp(0.0, 100.0);
            let composite_score = {
                let raw = weights.composite(safety_score, cost_score, passenger_score, network_score);
                (raw * 10.0).round() / 10.0
            };

            let mut pros = successful_reasoning(collation, AgentClass::Safety, 2);
            pros.extend(successful_reasoning(collation, AgentClass::Business, 1));
            let cons = if strategy.cost_factor < 0.8 {
                vec!["higher direct operating cost than the balanced option".to_string()]
            } else {
                Vec::new()
            };
            let risks: Vec<String> = strategy.risk_note.map(|note| note.to_string()).into_iter().collect();

            let recommendations: Vec<String> = collation.responses.values().filter(|response| response.status == ResponseStatus::Success).map(|response| response.recommendation.clone()).collect();

            RecoverySolution {
                solution_id,
                title: strategy.title.to_string(),
                description: strategy.description.to_string(),
                recommendations,
                safety_compliance: serde_json::json!({ "binding_constraints_honoured": true }),
                passenger_impact: serde_json::json!({ "score": passenger_score }),
                financial_impact: serde_json::json!({ "score": cost_score }),
                network_impact: serde_json::json!({ "score": network_score }),
                safety_score,
                cost_score,
                passenger_score,
                network_score,
                composite_score,
                pros,
                cons,
                risks,
                confidence: safety_confidence.min(network_confidence).min(guest_confidence).min(finance_confidence),
                estimated_duration: "2h".to_string(),
                recovery_plan: build_recovery_plan(solution_id, &strategy, collation),
            }
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use disruption_contract::Phase;

    fn response(agent_name: &str, recommendation: &str, confidence: f64) -> AgentResponse {
        AgentResponse {
            agent_name: agent_name.to_string(),
            recommendation: recommendation.to_string(),
            confidence,
            binding_constraints: Vec::new(),
            reasoning: "because".to_string(),
            data_sources: Vec::new(),
            extracted_flight_info: None,
            status: ResponseStatus::Success,
            error: None,
            duration_seconds: 0.1,
            timestamp: Utc::now(),
        }
    }

    fn collation(responses: Vec<AgentResponse>) -> Collation {
        Collation {
            phase: Phase::Initial,
            responses: responses.into_iter().map(|r| (r.agent_name.clone(), r)).collect(),
            timestamp: Utc::now(),
            duration_seconds: 1.0,
        }
    }

    #[test]
    fn functional_draft_solutions_produces_between_one_and_three_seeds() {
        let collation = collation(vec![
                response("crew_compliance", "delay 2h", 0.9),
                response("maintenance", "inspect aircraft", 0.8),
                response("regulatory", "file incident report", 0.85),
                response("network", "delay 2h", 0.7),
                response("guest_experience", "rebook connections", 0.6),
                response("cargo", "hold cargo", 0.6),
                response("finance", "accept delay cost", 0.6),
        ]);
        let solutions = draft_solutions(&collation, ScoreWeights::default());
        assert!(!solutions.is_empty() && solutions.len() <= 3);
        assert!(solutions[0].composite_score >= 0.0);
    }

    #[test]
    fn functional_cancel_recommendation_adds_cancel_and_reprotect_seed() {
        let collation = collation(vec![
                response("crew_compliance", "cancel flight", 0.9),
                response("network", "cancel flight", 0.7),
        ]);
        let solutions = draft_solutions(&collation, ScoreWeights::default());
        assert!(solutions.iter().any(|solution| solution.title == "Cancel and reprotect"));
    }

    #[test]
    fn unit_recovery_plan_has_contiguous_step_numbers_and_full_critical_path() {
        let collation = collation(vec![response("network", "delay 2h", 0.8)]);
        let solutions = draft_solutions(&collation, ScoreWeights::default());
        let plan = &solutions[0].recovery_plan;
        let numbers: Vec<u32> = plan.steps.iter().map(|step| step.step_number).collect();
        assert_eq!(numbers, (1..=plan.steps.len() as u32).collect::<Vec<_>>());
        assert_eq!(plan.critical_path, numbers);
    }
}
