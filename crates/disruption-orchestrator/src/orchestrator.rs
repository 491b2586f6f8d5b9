//! Top-level entry point wiring the three phases together.

use disruption_agent_core::{AgentRegistry, CooperativeCancellationToken};
use disruption_arbitrator::ArbitratorConfig;
use disruption_contract::{AuditTrail, Collation, FinalOutput, FinalStatus, Phase};

use crate::config::TimeoutTable;
use crate::phase_runner::run_phase;

/// Minimum number of non-whitespace characters a prompt must contain before
/// any agent is invoked.
const MIN_PROMPT_CHARS: usize = 10;

/// Owns the fixed agent registry and the configuration the three phases run
/// under. One instance can serve many `handle` calls.
pub struct Orchestrator {
    registry: AgentRegistry,
    timeouts: TimeoutTable,
    arbitrator_config: ArbitratorConfig,
}

impl Orchestrator {
    pub fn new(registry: AgentRegistry, timeouts: TimeoutTable, arbitrator_config: ArbitratorConfig) -> Self {
        Self {
            registry,
            timeouts,
            arbitrator_config,
        }
    }

    /// Runs the full initial -> revision -> arbitration pipeline for
    /// `user_prompt`, returning a `FinalOutput` with the complete audit
    /// trail for whatever phases actually ran.
    pub async fn handle(&self, user_prompt: &str) -> FinalOutput {
        let started = std::time::Instant::now();

        if user_prompt.chars().filter(|c| !c.is_whitespace()).count() < MIN_PROMPT_CHARS {
            tracing::warn!("rejected prompt shorter than {MIN_PROMPT_CHARS} non-whitespace characters");
            return FinalOutput::prompt_invalid(format!(
                    "prompt must contain at least {MIN_PROMPT_CHARS} non-whitespace characters"
            ));
        }

        let cancellation = CooperativeCancellationToken::new();

        let phase1 = match run_phase(
            &self.registry,
            &cancellation,
            &self.timeouts,
            Phase::Initial,
            user_prompt,
            None,
        ).await
        {
            Ok(collation) => collation,
            Err(halt) => {
                tracing::error!(failed_agents = ?halt.failed_agents, "safety halt during initial phase");
                return self.halted_output(started, AuditTrail {
                    phase1_initial: Some(halt.partial_collation),
                    ..AuditTrail::default()
                }, &halt.failed_agents);
            }
        };

        let phase2 = match run_phase(
            &self.registry,
            &cancellation,
            &self.timeouts,
            Phase::Revision,
            user_prompt,
            Some(&phase1),
        ).await
        {
            Ok(collation) => collation,
            Err(halt) => {
                tracing::error!(failed_agents = ?halt.failed_agents, "safety halt during revision phase");
                return self.halted_output(started, AuditTrail {
                    phase1_initial: Some(phase1),
                    phase2_revision: Some(halt.partial_collation),
                    ..AuditTrail::default()
                }, &halt.failed_agents);
            }
        };

        let arbitration = disruption_arbitrator::arbitrate(&phase2, self.arbitrator_config);

        // A clean run has every Phase-2 agent succeeding and a confident,
        // error-free arbitration. Anything short of that - a failed
        // business agent, or the arbitrator's conservative fallback
        // (confidence 0, possibly with an `error`) - is reported as partial
        // rather than success, even though the pipeline completed.
        let status = if phase2.failed().is_empty() && arbitration.error.is_none() && arbitration.confidence > 0.0 {
            FinalStatus::Success
        } else {
            FinalStatus::Partial
        };

        FinalOutput {
            status,
            arbitration: Some(arbitration.clone()),
            audit_trail: AuditTrail {
                phase1_initial: Some(phase1),
                phase2_revision: Some(phase2),
                phase3_arbitration: Some(arbitration),
            },
            total_duration_seconds: started.elapsed().as_secs_f64(),
            error: None,
        }
    }

    fn halted_output(&self, started: std::time::Instant, audit_trail: AuditTrail, failed_agents: &[String]) -> FinalOutput {
        FinalOutput {
            status: FinalStatus::Failed,
            arbitration: None,
            audit_trail,
            total_duration_seconds: started.elapsed().as_secs_f64(),
            error: Some(format!(
                    "safety halt: {} did not return success",
                    failed_agents.join(", ")
            )),
        }
    }
}
