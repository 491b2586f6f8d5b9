//! TOML startup configuration: agent endpoints, timeouts, arbitrator tuning.
//!
//! Loaded once at process start, before any agent is invoked.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use disruption_arbitrator::ArbitratorConfig;
use disruption_contract::{all_agent_names, ScoreWeights};
use disruption_orchestrator::TimeoutTable;
use serde::Deserialize;

fn default_phase1_safety_secs() -> u64 {
    60
}

fn default_phase1_business_secs() -> u64 {
    45
}

fn default_phase2_margin_secs() -> u64 {
    30
}

fn default_phase3_arbitrator_secs() -> u64 {
    60
}

fn default_max_solutions() -> usize {
    3
}

/// The timeout section of the on-disk config, expressed in whole seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub phase1_safety_secs: u64,
    pub phase1_business_secs: u64,
    pub phase2_margin_secs: u64,
    pub phase3_arbitrator_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            phase1_safety_secs: default_phase1_safety_secs(),
            phase1_business_secs: default_phase1_business_secs(),
            phase2_margin_secs: default_phase2_margin_secs(),
            phase3_arbitrator_secs: default_phase3_arbitrator_secs(),
        }
    }
}

impl TimeoutSettings {
    fn into_table(self) -> TimeoutTable {
        let phase1_safety = Duration::from_secs(self.phase1_safety_secs);
        let phase1_business = Duration::from_secs(self.phase1_business_secs);
        let margin = Duration::from_secs(self.phase2_margin_secs);
        TimeoutTable {
            phase1_safety,
            phase1_business,
            phase2_safety: phase1_safety + margin,
            phase2_business: phase1_business + margin,
            phase3_arbitrator: Duration::from_secs(self.phase3_arbitrator_secs),
        }
    }
}

/// One agent's HTTP endpoint, keyed by the fixed registry name it answers to.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentEndpoint {
    pub agent_name: String,
    pub url: String,
}

/// Top-level on-disk configuration, parsed from a TOML file at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub agents: Vec<AgentEndpoint>,
    #[serde(default)]
    pub weights: Option<ScoreWeights>,
    #[serde(default = "default_max_solutions")]
    pub max_solutions: usize,
    #[serde(default)]
    pub degraded_arbitration: bool,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

impl Settings {
    /// Reads and parses `path`, then validates it covers exactly the seven
    /// known agents with no duplicates and (if supplied) valid score weights.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings: Settings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let mut configured: Vec<&str> = self.agents.iter().map(|a| a.agent_name.as_str()).collect();
        configured.sort_unstable();
        configured.dedup();
        if configured.len() != self.agents.len() {
            bail!("config lists a duplicate agent_name");
        }
        for required in all_agent_names() {
            if !configured.contains(&required) {
                bail!("config is missing endpoint for required agent '{required}'");
            }
        }
        if let Some(weights) = self.weights {
            if !weights.is_valid() {
                bail!("configured score weights must be non-negative and sum to 1.0");
            }
        }
        if !(1..=3).contains(&self.max_solutions) {
            bail!("max_solutions must be between 1 and 3");
        }
        Ok(())
    }

    pub fn timeout_table(&self) -> TimeoutTable {
        self.timeouts.clone().into_table()
    }

    pub fn arbitrator_config(&self) -> ArbitratorConfig {
        ArbitratorConfig {
            weights: self.weights.unwrap_or_default(),
            max_solutions: self.max_solutions,
            degraded_arbitration: self.degraded_arbitration,
        }
    }
}
