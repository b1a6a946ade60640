//! Dependency ordering for migration steps.
//!
//! Every step names the steps it builds on. The plan is a stable topological
//! order: among steps whose predecessors are satisfied, declaration order wins,
//! so an append-only log that is already consistent keeps its order.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// Why a set of steps cannot be ordered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("migration '{0}' is declared twice")]
    Duplicate(String),

    #[error("migration '{step}' depends on unknown migration '{missing}'")]
    UnknownDependency { step: String, missing: String },

    #[error("migrations {0:?} depend on each other in a cycle")]
    Cycle(Vec<String>),
}

/// A step as seen by the planner: its name and its predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a> {
    pub name: &'a str,
    pub depends_on: &'a [&'a str],
}

/// Order `nodes` so each comes after its predecessors.
///
/// Returns indices into `nodes`.
pub fn resolve(nodes: &[Node<'_>]) -> Result<Vec<usize>, PlanError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.name, i).is_some() {
            return Err(PlanError::Duplicate(node.name.to_string()));
        }
    }

    for node in nodes {
        for dep in node.depends_on {
            if !index.contains_key(dep) {
                return Err(PlanError::UnknownDependency {
                    step: node.name.to_string(),
                    missing: dep.to_string(),
                });
            }
        }
    }

    let mut placed: HashSet<usize> = HashSet::with_capacity(nodes.len());
    let mut order = Vec::with_capacity(nodes.len());

    while order.len() < nodes.len() {
        let ready = nodes.iter().enumerate().find(|(i, node)| {
            !placed.contains(i)
                && node
                    .depends_on
                    .iter()
                    .all(|dep| placed.contains(&index[dep]))
        });

        match ready {
            Some((i, _)) => {
                placed.insert(i);
                order.push(i);
            }
            None => {
                let stuck = nodes
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !placed.contains(i))
                    .map(|(_, node)| node.name.to_string())
                    .collect();
                return Err(PlanError::Cycle(stuck));
            }
        }
    }

    Ok(order)
}
