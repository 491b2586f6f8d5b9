//! The three-phase pipeline: timeouts, payload construction, parallel
//! per-phase agent fan-out, and the top-level `Orchestrator::handle` entry
//! point.

mod config;
mod orchestrator;
mod phase_runner;
mod prompt_augmenter;

pub use config::TimeoutTable;
pub use orchestrator::Orchestrator;
pub use phase_runner::run_phase;
pub use prompt_augmenter::build_payload;
