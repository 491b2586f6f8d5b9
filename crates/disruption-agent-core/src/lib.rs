//! The `AgentClient` contract, the fixed seven-agent registry, and the
//! cooperative cancellation/timeout guard that wraps every agent invocation.

mod cancellation;
mod guard;
mod http_client;
mod mock;
mod registry;

pub use cancellation::CooperativeCancellationToken;
pub use guard::invoke_agent_with_guard;
pub use http_client::HttpAgentClient;
pub use mock::MockAgentClient;
pub use registry::{AgentClient, AgentRegistry, AgentRegistryError};
