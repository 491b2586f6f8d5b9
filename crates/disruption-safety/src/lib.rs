//! Textual constraint and conflict helpers used by the arbitrator.
//!
//! The arbitration algorithm needs two kinds of lightweight text reasoning
//! over free-form agent recommendations and binding constraints:
//!
//! - detecting when two agents proposed mutually exclusive actions (used to
//! classify conflicts), and
//! - detecting when the constraint set extracted from the Safety agents is
//! internally unsatisfiable, or when a drafted solution violates one of
//! those constraints.
//!
//! Both are implemented as literal keyword/pattern matching rather than any
//! semantic understanding of airline operations; this is the "safe default"
//! string-matching checker the domain leaves pluggable, not a claim that the
//! heuristics below are exhaustive.

use aho_corasick::AhoCorasick;
use regex::Regex;
use std::sync::OnceLock;

/// Groups of mutually exclusive recovery actions. Two recommendations that
/// each match a different group (and neither matches the same group) are
/// treated as proposing incompatible courses of action.
const ACTION_GROUPS: &[(&str, &[&str])] = &[
    ("delay", &["delay", "hold", "postpone"]),
    ("cancel", &["cancel", "cancellation"]),
    ("reroute", &["reroute", "divert", "alternate routing"]),
    ("reassign_crew", &["crew swap", "reassign crew", "replace crew"]),
];

fn action_matcher() -> &'static AhoCorasick {
    static MATCHER: OnceLock<AhoCorasick> = OnceLock::new();
    MATCHER.get_or_init(|| {
            let patterns: Vec<&str> = ACTION_GROUPS.iter().flat_map(|(_, kws)| kws.iter().copied()).collect();
            AhoCorasick::new(patterns).expect("action keyword patterns are valid")
    })
}

/// Returns the set of action-group names (e.g. `"delay"`, `"cancel"`) whose
/// keywords appear in `text`, matched case-insensitively.
pub fn recommended_action_groups(text: &str) -> Vec<&'static str> {
    let lowered = text.to_ascii_lowercase();
    let matcher = action_matcher();
    let mut groups = Vec::new();
    for mat in matcher.find_iter(&lowered) {
        let keyword = &lowered[mat.start()..mat.end()];
        if let Some((group, _)) = ACTION_GROUPS.iter().find(|(_, kws)| kws.contains(&keyword)) {
            if !groups.contains(group) {
                groups.push(*group);
            }
        }
    }
    groups
}

/// `true` when the two recommendations propose disjoint, non-empty sets of
/// actions - i.e. they cannot both be the chosen course of action.
pub fn recommendations_conflict(a: &str, b: &str) -> bool {
    let groups_a = recommended_action_groups(a);
    let groups_b = recommended_action_groups(b);
    if groups_a.is_empty() || groups_b.is_empty() {
        return false;
    }
    groups_a.iter().all(|g| !groups_b.contains(g))
}

/// Whether a numeric constraint bounds a subject from above (`no X > Nh`) or
/// below (`require Nh of X`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Max,
    Min,
}

/// A numeric bound parsed out of a binding-constraint string.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericBound {
    pub subject: String,
    pub kind: BoundKind,
    pub hours: f64,
}

fn max_bound_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
            Regex::new(r"(?i)no\s+([a-z][a-z _-]*?)\s*>\s*(\d+(?:\.\d+)?)\s*h").expect("valid regex")
    })
}

fn min_bound_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
            Regex::new(r"(?i)require\s+(\d+(?:\.\d+)?)\s*h\s+([a-z][a-z _-]*)").expect("valid regex")
    })
}

/// Parses a binding constraint string into a numeric bound when it matches
/// one of the two recognised shapes: `no <subject> > Nh` or `require Nh
/// <subject>`. Constraints that match neither shape (the common case for
/// qualitative constraints) return `None`.
pub fn parse_numeric_bound(constraint: &str) -> Option<NumericBound> {
    if let Some(caps) = max_bound_pattern().captures(constraint) {
        let subject = caps.get(1)?.as_str().trim().to_ascii_lowercase();
        let hours: f64 = caps.get(2)?.as_str().parse().ok()?;
        return Some(NumericBound {
                subject,
                kind: BoundKind::Max,
                hours,
        });
    }
    if let Some(caps) = min_bound_pattern().captures(constraint) {
        let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
        let subject = caps.get(2)?.as_str().trim().to_ascii_lowercase();
        return Some(NumericBound {
                subject,
                kind: BoundKind::Min,
                hours,
        });
    }
    None
}

/// Subject pairs known to trade off against each other: satisfying a tight
/// upper bound on the first makes a lower bound on the second harder to
/// reach. This is a deliberately small, explicit table, not a general
/// ontology - subjects outside it are never reported as conflicting.
const LINKED_SUBJECTS: &[(&str, &str)] = &[("delay", "crew rest")];

fn subjects_are_linked(a: &str, b: &str) -> bool {
    LINKED_SUBJECTS.iter().any(|(x, y)| (a.contains(x) && b.contains(y)) || (a.contains(y) && b.contains(x)))
}

/// `true` when an upper bound on one linked subject makes a lower bound on
/// its pair unreachable, e.g. `no delay > 2h` vs `require 10h crew rest`.
pub fn bounds_conflict(a: &NumericBound, b: &NumericBound) -> bool {
    let (max_bound, min_bound) = match (a.kind, b.kind) {
        (BoundKind::Max, BoundKind::Min) => (a, b),
        (BoundKind::Min, BoundKind::Max) => (b, a),
        _ => return false,
    };
    subjects_are_linked(&max_bound.subject, &min_bound.subject) && max_bound.hours < min_bound.hours
}

/// Scans every pair of binding constraints for a numeric conflict, returning
/// the original constraint text pairs that cannot be jointly satisfied.
pub fn find_unsatisfiable_constraint_pairs(constraints: &[String]) -> Vec<(String, String)> {
    let parsed: Vec<(String, Option<NumericBound>)> = constraints.iter().map(|c| (c.clone(), parse_numeric_bound(c))).collect();

    let mut conflicts = Vec::new();
    for i in 0..parsed.len() {
        for j in (i + 1)..parsed.len() {
            if let (Some(left), Some(right)) = (&parsed[i].1, &parsed[j].1) {
                if bounds_conflict(left, right) {
                    conflicts.push((parsed[i].0.clone(), parsed[j].0.clone()));
                }
            }
        }
    }
    conflicts
}

/// Default constraint-satisfaction checker: a solution is
/// treated as violating `constraint` iff the constraint's literal text
/// appears in one of the solution's recorded `risks`. The arbitrator decides
/// which constraints to record as risks while drafting each solution;
/// operators who need true domain semantics should supply their own checker.
pub fn satisfies_all<'a>(solution_risks: &[String], constraints: impl IntoIterator<Item = &'a String>) -> bool {
    let risks_lower: Vec<String> = solution_risks.iter().map(|r| r.to_ascii_lowercase()).collect();
    constraints.into_iter().all(|constraint| {
            let needle = constraint.to_ascii_lowercase();
            !risks_lower.iter().any(|risk| risk.contains(&needle))
    })
}
