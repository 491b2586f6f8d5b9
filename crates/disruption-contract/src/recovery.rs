//! Recovery plan step graphs and candidate solutions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of a recovery plan's dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryStep {
    pub step_number: u32,
    pub step_name: String,
    pub description: String,
    pub responsible_agent: String,
    pub action_type: String,
    pub success_criteria: String,
    #[serde(default)]
    pub dependencies: Vec<u32>,
    pub estimated_duration: String,
    pub automation_possible: bool,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

/// Step graph for one candidate solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryPlan {
    pub solution_id: u32,
    pub steps: Vec<RecoveryStep>,
    pub critical_path: Vec<u32>,
    #[serde(default)]
    pub contingency_plans: Vec<String>,
    pub estimated_total_duration: String,
}

impl RecoveryPlan {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }
}

/// One candidate recovery option produced by the arbitrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverySolution {
    pub solution_id: u32,
    pub title: String,
    pub description: String,
    pub recommendations: Vec<String>,
    pub safety_compliance: Value,
    pub passenger_impact: Value,
    pub financial_impact: Value,
    pub network_impact: Value,
    pub safety_score: f64,
    pub cost_score: f64,
    pub passenger_score: f64,
    pub network_score: f64,
    pub composite_score: f64,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub risks: Vec<String>,
    pub confidence: f64,
    pub estimated_duration: String,
    pub recovery_plan: RecoveryPlan,
}

/// Arbitrator weighting for the four sub-scores. Must be a convex combination
/// (non-negative, summing to 1.0 within tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub safety: f64,
    pub cost: f64,
    pub passenger: f64,
    pub network: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            safety: 0.4,
            cost: 0.2,
            passenger: 0.2,
            network: 0.2,
        }
    }
}

impl ScoreWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    pub fn is_valid(&self) -> bool {
        let non_negative =
        self.safety >= 0.0 && self.cost >= 0.0 && self.passenger >= 0.0 && self.network >= 0.0;
        let sum = self.safety + self.cost + self.passenger + self.network;
        non_negative && (sum - 1.0).abs() <= Self::SUM_TOLERANCE
    }

    pub fn composite(&self, safety: f64, cost: f64, passenger: f64, network: f64) -> f64 {
        self.safety * safety + self.cost * cost + self.passenger * passenger + self.network * network
    }
}
