//! Configuration loading and registry construction for the `disruption-cli` binary.

pub mod config;

pub use config::Settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use disruption_agent_core::{AgentClient, AgentRegistry, HttpAgentClient};

/// Builds the fixed seven-agent registry from `settings`, pointing every
/// agent at its configured HTTP endpoint.
pub fn build_registry(settings: &Settings) -> Result<AgentRegistry> {
    let clients: Vec<Arc<dyn AgentClient>> = settings
        .agents
        .iter()
        .map(|endpoint| Arc::new(HttpAgentClient::new(&endpoint.agent_name, &endpoint.url)) as Arc<dyn AgentClient>)
        .collect();
    AgentRegistry::new(clients).context("configured agents do not form a valid registry")
}
