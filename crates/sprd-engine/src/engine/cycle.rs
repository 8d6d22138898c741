//! Recalculation order and circular dependency detection.
//!
//! When a cell changes, it and every cell that transitively depends on it must
//! be recomputed, and each cell must come after everything it reads from.
//! A depth-first walk over the dependents of the changed cell yields that
//! order (reverse postorder). The same walk detects cycles: reaching the
//! changed cell again means the edit closed a loop.
//!
//! The walk keeps an explicit stack so long dependency chains cannot exhaust
//! the thread's stack.

use std::collections::HashSet;

use thiserror::Error;
use tracing::trace;

use super::DependencyGraph;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecalcError {
    #[error("circular dependency through {cell}")]
    Circular { cell: String },
}

struct Frame<'g> {
    name: &'g str,
    dependents: Vec<&'g str>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g DependencyGraph, name: &'g str) -> Frame<'g> {
        Frame {
            name,
            dependents: graph.dependents(name).collect(),
            next: 0,
        }
    }
}

/// Return `start` followed by every cell that depends on it, directly or
/// indirectly, ordered so that no cell precedes a cell it depends on.
///
/// Fails if `start` can reach itself through its dependents.
pub fn cells_to_recalculate<'g>(
    graph: &'g DependencyGraph,
    start: &'g str,
) -> Result<Vec<String>, RecalcError> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut finished: Vec<&str> = Vec::new();
    let mut stack = vec![Frame::new(graph, start)];
    visited.insert(start);

    while let Some(frame) = stack.last_mut() {
        match frame.dependents.get(frame.next).copied() {
            Some(next) => {
                frame.next += 1;
                if next == start {
                    trace!(cell = start, via = frame.name, "cycle closes at start cell");
                    return Err(RecalcError::Circular {
                        cell: start.to_string(),
                    });
                }
                if visited.insert(next) {
                    stack.push(Frame::new(graph, next));
                }
            }
            None => {
                finished.push(frame.name);
                stack.pop();
            }
        }
    }

    Ok(finished.into_iter().rev().map(str::to_string).collect())
}
