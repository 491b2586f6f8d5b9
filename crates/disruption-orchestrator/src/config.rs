//! Timeout table consumed at startup, not per call.

use std::time::Duration;

use disruption_contract::{classify_agent, AgentClass, Phase};

/// Per-agent-class, per-phase deadlines. Phase 2 defaults to Phase 1 plus a
/// fixed margin to accommodate cross-reading of others' recommendations;
/// callers may override either phase independently.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutTable {
    pub phase1_safety: Duration,
    pub phase1_business: Duration,
    pub phase2_safety: Duration,
    pub phase2_business: Duration,
    pub phase3_arbitrator: Duration,
}

impl Default for TimeoutTable {
    fn default() -> Self {
        let phase1_safety = Duration::from_secs(60);
        let phase1_business = Duration::from_secs(45);
        let margin = Duration::from_secs(30);
        Self {
            phase1_safety,
            phase1_business,
            phase2_safety: phase1_safety + margin,
            phase2_business: phase1_business + margin,
            phase3_arbitrator: Duration::from_secs(60),
        }
    }
}

impl TimeoutTable {
    /// Returns the deadline for `agent_name` in `phase`. Panics if
    /// `agent_name` is not one of the seven known agents, since the
    /// registry is validated at startup to only contain those names.
    pub fn deadline_for(&self, agent_name: &str, phase: Phase) -> Duration {
        let class = classify_agent(agent_name).unwrap_or_else(|| panic!("unknown agent '{agent_name}' has no configured timeout"));
        match (phase, class) {
            (Phase::Initial, AgentClass::Safety) => self.phase1_safety,
            (Phase::Initial, AgentClass::Business) => self.phase1_business,
            (Phase::Revision, AgentClass::Safety) => self.phase2_safety,
            (Phase::Revision, AgentClass::Business) => self.phase2_business,
        }
    }
}
