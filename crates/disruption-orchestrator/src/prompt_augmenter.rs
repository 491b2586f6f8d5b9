//! Builds the per-agent `DisruptionPayload` for a phase.

use std::collections::HashMap;

use disruption_contract::{Collation, DisruptionPayload, Phase};

/// Builds the payload every agent receives in a phase. In `revision`, every
/// agent sees the full prior collation, including its own phase-1 response;
/// agents are not excluded from their own history.
pub fn build_payload(
    phase: Phase,
    user_prompt: &str,
    prior_collation: Option<&Collation>,
) -> DisruptionPayload {
    match phase {
        Phase::Initial => DisruptionPayload::initial(user_prompt),
        Phase::Revision => {
            let prior = prior_collation.expect("revision phase requires a prior collation").responses.clone();
            DisruptionPayload::revision(user_prompt, prior)
        }
    }
}
