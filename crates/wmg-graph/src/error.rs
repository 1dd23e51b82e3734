//! Graph-specific error types.

use wmg_core::{NodeId, WmgError};

use crate::arena::NodeKey;

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An edge refers to a node that was never added.
    MissingEndpoint {
        source: NodeId,
        target: NodeId,
        missing: NodeId,
    },

    /// The arena already holds a node under this key.
    DuplicateKey { key: NodeKey },

    /// The arena ran out of representable ids.
    IdSpaceExhausted { len: usize },

    /// A node position is NaN or infinite.
    NonFinitePosition { node: NodeId },

    /// No edge in the graph carries the requested attribute.
    MissingEdgeAttribute { attribute: String },

    /// A node lacks the attribute used for ordering.
    MissingNodeAttribute { node: NodeId, attribute: String },

    /// Splitting and re-merging did not reproduce the original edge set.
    PartitionMismatch { expected: usize, actual: usize },

    /// ID not found in index map.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::MissingEndpoint {
                source,
                target,
                missing,
            } => {
                write!(
                    f,
                    "Edge {} -> {} refers to non-existent node {}",
                    source, target, missing
                )
            }
            GraphError::DuplicateKey { key } => {
                write!(f, "Node key {} was added twice", key)
            }
            GraphError::IdSpaceExhausted { len } => {
                write!(f, "Cannot allocate a node id past {} nodes", len)
            }
            GraphError::NonFinitePosition { node } => {
                write!(f, "Node {} has a non-finite position", node)
            }
            GraphError::MissingEdgeAttribute { attribute } => {
                write!(
                    f,
                    "Edge attribute '{}' not found in graph. Check the attribute.",
                    attribute
                )
            }
            GraphError::MissingNodeAttribute { node, attribute } => {
                write!(f, "Node {} has no attribute '{}'", node, attribute)
            }
            GraphError::PartitionMismatch { expected, actual } => {
                write!(
                    f,
                    "Edge partition holds {} edges but the graph has {}",
                    actual, expected
                )
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for WmgError {
    fn from(err: GraphError) -> Self {
        WmgError::Invariant {
            what: err.to_string(),
        }
    }
}
