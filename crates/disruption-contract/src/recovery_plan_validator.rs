//! Independent, pure validation of a `RecoveryPlan`'s step DAG.

use std::collections::{HashMap, HashSet};

use crate::recovery::RecoveryPlan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanViolation {
    DuplicateStepNumber(u32),
    NonContiguousStepNumbers,
    SelfDependency(u32),
    MissingDependency { step: u32, missing: u32 },
    DependencyCycle(Vec<u32>),
    CriticalPathReferencesUnknownStep(u32),
    EmptyRequiredField { step: u32, field: &'static str },
}

/// Validates `plan`, returning every violation found (not just the first).
/// An empty result means the plan is structurally sound.
pub fn validate(plan: &RecoveryPlan) -> Vec<PlanViolation> {
    let mut violations = Vec::new();

    let mut seen_numbers = HashSet::new();
    for step in &plan.steps {
        if !seen_numbers.insert(step.step_number) {
            violations.push(PlanViolation::DuplicateStepNumber(step.step_number));
        }
    }

    let mut sorted_numbers: Vec<u32> = seen_numbers.iter().copied().collect();
    sorted_numbers.sort_unstable();
    let contiguous = sorted_numbers.iter().enumerate().all(|(index, number)| *number == (index as u32) + 1);
    if !contiguous {
        violations.push(PlanViolation::NonContiguousStepNumbers);
    }

    let known_steps: HashSet<u32> = plan.steps.iter().map(|step| step.step_number).collect();
    for step in &plan.steps {
        for dependency in &step.dependencies {
            if *dependency == step.step_number {
                violations.push(PlanViolation::SelfDependency(step.step_number));
            } else if !known_steps.contains(dependency) {
                violations.push(PlanViolation::MissingDependency {
                        step: step.step_number,
                        missing: *dependency,
                });
            }
        }

        for field in [
            ("step_name", step.step_name.as_str()),
            ("description", step.description.as_str()),
            ("responsible_agent", step.responsible_agent.as_str()),
            ("action_type", step.action_type.as_str()),
            ("success_criteria", step.success_criteria.as_str()),
            ("estimated_duration", step.estimated_duration.as_str()),
        ] {
            if field.1.trim().is_empty() {
                violations.push(PlanViolation::EmptyRequiredField {
                        step: step.step_number,
                        field: field.0,
                });
            }
        }
    }

    if let Some(cycle) = find_cycle(&plan.steps) {
        violations.push(PlanViolation::DependencyCycle(cycle));
    }

    for step_number in &plan.critical_path {
        if !known_steps.contains(step_number) {
            violations.push(PlanViolation::CriticalPathReferencesUnknownStep(*step_number));
        }
    }

    if plan.estimated_total_duration.trim().is_empty() {
        violations.push(PlanViolation::EmptyRequiredField {
                step: 0,
                field: "estimated_total_duration",
        });
    }

    violations
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// Standard DFS-with-colouring cycle detection. Returns one offending cycle
/// (as the path at the moment the back-edge was found) if any exists.
fn find_cycle(steps: &[crate::recovery::RecoveryStep]) -> Option<Vec<u32>> {
    let adjacency: HashMap<u32, &[u32]> = steps.iter().map(|step| (step.step_number, step.dependencies.as_slice())).collect();
    let mut colour: HashMap<u32, Colour> =
    steps.iter().map(|step| (step.step_number, Colour::White)).collect();
    let mut path = Vec::new();

    fn visit(
        node: u32,
        adjacency: &HashMap<u32, &[u32]>,
        colour: &mut HashMap<u32, Colour>,
        path: &mut Vec<u32>,
    ) -> Option<Vec<u32>> {
        colour.insert(node, Colour::Grey);
        path.push(node);
        if let Some(neighbours) = adjacency.get(&node) {
            for &neighbour in *neighbours {
                match colour.get(&neighbour).copied() {
                    Some(Colour::Grey) => {
                        let start = path.iter().position(|&n| n == neighbour).unwrap_or(0);
                        return Some(path[start..].to_vec());
                    }
                    Some(Colour::White) | None => {
                        if let Some(cycle) = visit(neighbour, adjacency, colour, path) {
                            return Some(cycle);
                        }
                    }
                    Some(Colour::Black) => {}
                }
            }
        }
        path.pop();
        colour.insert(node, Colour::Black);
        None
    }

    for &step_number in adjacency.keys() {
        if colour.get(&step_number).copied() == Some(Colour::White) {
            if let Some(cycle) = visit(step_number, &adjacency, &mut colour, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}
