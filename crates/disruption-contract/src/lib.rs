//! Shared data model and fixture helpers for the disruption-response core.
//!
//! Centralizes the entities from the domain's data model plus the fixture
//! parsing/validation helpers used by contract-driven tests across the
//! orchestrator and arbitrator crates.
//!
//! ```rust
//! use disruption_contract::{parse_fixture_with_validation, validate_fixture_header};
//!
//! #[derive(serde::Deserialize)]
//! struct ExampleFixture {
//!     schema_version: u32,
//!     name: String,
//!     cases: Vec<String>,
//! }
//!
//! let fixture = parse_fixture_with_validation::<ExampleFixture>(
//!     r#"{"schema_version":1,"name":"demo","cases":["case-a"]}"#,
//!     "failed to parse demo fixture",
//!     |parsed| {
//!         validate_fixture_header(
//!             "demo",
//!             parsed.schema_version,
//!             1,
//!             &parsed.name,
//!             parsed.cases.len(),
//!         )
//!     },
//! )?;
//!
//! assert_eq!(fixture.cases.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod agent_registry;
pub mod entities;
pub mod error;
pub mod output;
pub mod recovery;
pub mod recovery_plan_validator;

pub use agent_registry::{
    all_agent_names, classify_agent, safety_priority_rank, AgentClass, BUSINESS_AGENT_NAMES,
    SAFETY_AGENT_NAMES, SAFETY_AGENT_PRIORITY,
};
pub use entities::{AgentResponse, Collation, DisruptionPayload, FlightInfo, Phase, ResponseStatus};
pub use error::{DisruptionError, SafetyHaltError};
pub use output::{
    ArbitratorOutput, AuditTrail, ConflictRecord, ConflictResolution, ConflictType, FinalOutput,
    FinalStatus, SafetyOverride,
};
pub use recovery::{RecoveryPlan, RecoverySolution, RecoveryStep, ScoreWeights};
pub use recovery_plan_validator::{validate as validate_recovery_plan, PlanViolation};

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

/// Parses a contract fixture payload and runs caller-provided validation.
pub fn parse_fixture_with_validation<F>(
    raw: &str,
    parse_error_context: &str,
    validate: impl FnOnce(&F) -> Result<()>,
) -> Result<F>
where
    F: DeserializeOwned,
{
    let fixture =
        serde_json::from_str::<F>(raw).with_context(|| parse_error_context.to_string())?;
    validate(&fixture)?;
    Ok(fixture)
}

/// Loads a fixture file from disk and delegates parsing to the caller.
pub fn load_fixture_from_path<F>(path: &Path, parse: impl FnOnce(&str) -> Result<F>) -> Result<F> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    parse(&raw).with_context(|| format!("invalid fixture {}", path.display()))
}

/// Validates common contract fixture header fields.
pub fn validate_fixture_header(
    contract_label: &str,
    schema_version: u32,
    expected_schema_version: u32,
    fixture_name: &str,
    case_count: usize,
) -> Result<()> {
    validate_fixture_header_with_empty_message(
        contract_label,
        schema_version,
        expected_schema_version,
        fixture_name,
        case_count,
        "fixture must include at least one case",
    )
}

/// Validates common contract fixture header fields with a custom empty-items message.
pub fn validate_fixture_header_with_empty_message(
    contract_label: &str,
    schema_version: u32,
    expected_schema_version: u32,
    fixture_name: &str,
    item_count: usize,
    empty_items_message: &str,
) -> Result<()> {
    if schema_version != expected_schema_version {
        bail!(
            "unsupported {} contract schema version {} (expected {})",
            contract_label,
            schema_version,
            expected_schema_version
        );
    }
    if fixture_name.trim().is_empty() {
        bail!("fixture name cannot be empty");
    }
    if item_count == 0 {
        bail!("{empty_items_message}");
    }
    Ok(())
}

/// Validates that case identifiers are unique after trimming whitespace.
pub fn ensure_unique_case_ids<'a>(case_ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut ids = HashSet::new();
    for raw_case_id in case_ids {
        let case_id = raw_case_id.trim().to_string();
        if !ids.insert(case_id.clone()) {
            bail!("fixture contains duplicate case_id '{}'", case_id);
        }
    }
    Ok(())
}
