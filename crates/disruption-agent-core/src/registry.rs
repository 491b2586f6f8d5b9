//! The `AgentClient` contract and the fixed seven-name registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use disruption_contract::{all_agent_names, classify_agent, AgentResponse, DisruptionPayload};

use crate::cancellation::CooperativeCancellationToken;

/// Abstracts one domain agent. Implementations must be safe to invoke
/// concurrently with themselves and with other agents, must honour
/// cancellation by returning promptly, and must never raise from the top
/// level - any internal failure becomes a `status=error` `AgentResponse`.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// The fixed registry name this client answers to, e.g. `"crew_compliance"`.
    fn agent_name(&self) -> &str;

    async fn analyse(
        &self,
        cancellation: &CooperativeCancellationToken,
        payload: &DisruptionPayload,
    ) -> AgentResponse;
}

/// Errors that can occur while assembling an `AgentRegistry`.
#[derive(Debug, thiserror::Error)]
pub enum AgentRegistryError {
    #[error("duplicate agent registration for '{0}'")]
    Duplicate(String),
    #[error("'{0}' is not one of the seven registered agent names")]
    UnknownAgentName(String),
    #[error("agent registry is missing required agent '{0}'")]
    MissingAgent(String),
}

/// Map of agent-name to `AgentClient` implementation. Must contain exactly
/// the seven fixed agent names, with no duplicate registration.
pub struct AgentRegistry {
    clients: HashMap<String, Arc<dyn AgentClient>>,
}

impl AgentRegistry {
    /// Builds a registry from a list of clients, validating that every name
    /// is one of the seven known agents, none is duplicated, and all seven
    /// are present.
    pub fn new(clients: Vec<Arc<dyn AgentClient>>) -> Result<Self, AgentRegistryError> {
        let mut map = HashMap::with_capacity(clients.len());
        for client in clients {
            let name = client.agent_name().to_string();
            if classify_agent(&name).is_none() {
                return Err(AgentRegistryError::UnknownAgentName(name));
            }
            if map.insert(name.clone(), client).is_some() {
                return Err(AgentRegistryError::Duplicate(name));
            }
        }
        for required in all_agent_names() {
            if !map.contains_key(required) {
                return Err(AgentRegistryError::MissingAgent(required.to_string()));
            }
        }
        Ok(Self { clients: map })
    }

    pub fn get(&self, agent_name: &str) -> Option<&Arc<dyn AgentClient>> {
        self.clients.get(agent_name)
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn AgentClient>)> {
        self.clients.iter().map(|(name, client)| (name.as_str(), client))
    }
}
