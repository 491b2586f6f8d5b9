//! Transport-adjacent helpers for agent clients that call out over HTTP.
//!
//! Kept separate from `disruption-agent-core` so the retry/backoff policy can be
//! unit-tested without pulling in the agent trait or cancellation plumbing.
mod retry;

pub use retry::{
    is_retryable_http_error, new_request_id, next_backoff_ms, next_backoff_ms_with_jitter,
    parse_retry_after_ms, provider_retry_delay_ms, retry_budget_allows_delay,
    should_retry_status, BASE_BACKOFF_MS,
};
