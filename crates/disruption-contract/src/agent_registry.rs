//! The fixed seven-agent registry and its safety/business partition.

/// The two agent classes. Safety-class agents may emit binding constraints;
/// business-class agents never may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentClass {
    Safety,
    Business,
}

/// The seven fixed agent names, safety-class agents first.
pub const SAFETY_AGENT_NAMES: [&str; 3] = ["crew_compliance", "maintenance", "regulatory"];
pub const BUSINESS_AGENT_NAMES: [&str; 4] = ["network", "guest_experience", "cargo", "finance"];

/// Fixed priority order used to break `safety_vs_safety` conflict ties.
pub const SAFETY_AGENT_PRIORITY: [&str; 3] = ["crew_compliance", "maintenance", "regulatory"];

/// Returns the class of a known agent name, or `None` if the name is not one
/// of the seven registered agents.
pub fn classify_agent(agent_name: &str) -> Option<AgentClass> {
    if SAFETY_AGENT_NAMES.contains(&agent_name) {
        Some(AgentClass::Safety)
    } else if BUSINESS_AGENT_NAMES.contains(&agent_name) {
        Some(AgentClass::Business)
    } else {
        None
    }
}

/// Returns all seven registered agent names in a stable order.
pub fn all_agent_names() -> Vec<&'static str> {
    SAFETY_AGENT_NAMES.iter().chain(BUSINESS_AGENT_NAMES.iter()).copied().collect()
}

/// Returns the fixed tie-break rank of a safety agent (lower is higher priority).
/// Agents not in the safety priority list rank last.
pub fn safety_priority_rank(agent_name: &str) -> usize {
    SAFETY_AGENT_PRIORITY.iter().position(|name| *name == agent_name).unwrap_or(SAFETY_AGENT_PRIORITY.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_classify_agent_partitions_safety_and_business() {
        assert_eq!(classify_agent("crew_compliance"), Some(AgentClass::Safety));
        assert_eq!(classify_agent("maintenance"), Some(AgentClass::Safety));
        assert_eq!(classify_agent("regulatory"), Some(AgentClass::Safety));
        assert_eq!(classify_agent("network"), Some(AgentClass::Business));
        assert_eq!(classify_agent("guest_experience"), Some(AgentClass::Business));
        assert_eq!(classify_agent("cargo"), Some(AgentClass::Business));
        assert_eq!(classify_agent("finance"), Some(AgentClass::Business));
        assert_eq!(classify_agent("arbitrator"), None);
    }

    #[test]
    fn unit_all_agent_names_contains_exactly_seven_unique_names() {
        let names = all_agent_names();
        assert_eq!(names.len(), 7);
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn unit_safety_priority_rank_orders_crew_before_maintenance_before_regulatory() {
        assert!(safety_priority_rank("crew_compliance") < safety_priority_rank("maintenance"));
        assert!(safety_priority_rank("maintenance") < safety_priority_rank("regulatory"));
        assert!(safety_priority_rank("regulatory") < safety_priority_rank("network"));
    }
}
