//! Arbitration: the core's most intricate algorithm. Turns a
//! `Collation` into a ranked, constraint-compliant `ArbitratorOutput`,
//! never propagating a failure - any internal error becomes the
//! conservative fallback with `confidence = 0` and an `error` field.

mod conflicts;
mod ranking;
mod solutions;

pub use ranking::conservative_fallback;

use disruption_contract::{ArbitratorOutput, Collation, ScoreWeights};

/// Configuration consumed by the arbitrator at startup.
#[derive(Debug, Clone, Copy)]
pub struct ArbitratorConfig {
    pub weights: ScoreWeights,
    pub max_solutions: usize,
    pub degraded_arbitration: bool,
}

impl Default for ArbitratorConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            max_solutions: 3,
            degraded_arbitration: false,
        }
    }
}

/// Runs the full seven-step arbitration algorithm against `collation`.
/// Never panics on bad input; any step that cannot produce a usable result
/// degrades to [`conservative_fallback`].
pub fn arbitrate(collation: &Collation, config: ArbitratorConfig) -> ArbitratorOutput {
    let (conflicts_identified, conflict_resolutions, safety_overrides) = conflicts::classify_conflicts(collation);

    let Some(binding_constraints) = conflicts::extract_binding_constraints(collation, config.degraded_arbitration) else {
        tracing::warn!("arbitrator invoked with a failed safety agent and degraded_arbitration=false");
        return ranking::conservative_fallback(
            conflicts_identified,
            conflict_resolutions,
            safety_overrides,
            Some("a safety-class agent did not return success; arbitration requires degraded_arbitration=true to proceed".to_string()),
        );
    };

    let unsatisfiable_pairs = disruption_safety::find_unsatisfiable_constraint_pairs(&binding_constraints);
    if !unsatisfiable_pairs.is_empty() {
        let (left, right) = &unsatisfiable_pairs[0];
        tracing::warn!(%left, %right, "binding constraints are mutually unsatisfiable; emitting conservative fallback");
        return ranking::conservative_fallback(
            conflicts_identified,
            conflict_resolutions,
            safety_overrides,
            Some(format!("binding constraints cannot be jointly satisfied: '{left}' and '{right}'")),
        );
    }

    let drafted = solutions::draft_solutions(collation, config.weights);
    let validated: Vec<_> = drafted.into_iter().filter(|solution| recovery_plan_is_valid(&solution.recovery_plan)).collect();

    let survivors = ranking::filter_by_constraints(validated, &binding_constraints);
    if survivors.is_empty() {
        tracing::info!("no drafted solution satisfied every binding constraint; emitting conservative fallback");
        return ranking::conservative_fallback(conflicts_identified, conflict_resolutions, safety_overrides, None);
    }

    let ranked = ranking::rank_and_renumber(survivors, config.max_solutions);
    ArbitratorOutput::project_from_recommended(ranked, conflicts_identified, conflict_resolutions, safety_overrides, None)
}

/// A drafted solution whose recovery plan fails structural validation is
/// dropped before ranking rather than surfaced to the caller.
fn recovery_plan_is_valid(plan: &disruption_contract::RecoveryPlan) -> bool {
    disruption_contract::validate_recovery_plan(plan).is_empty()
}
