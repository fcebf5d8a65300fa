//! Error types for graft-core.

use crate::graph::{NodeId, PlugId};
use crate::value::ValueType;
use thiserror::Error;

/// Error when a value has the wrong type.
#[derive(Debug, Clone, Error)]
#[error("type error: expected {expected}, got {got}")]
pub struct TypeError {
    /// The type that was expected.
    pub expected: ValueType,
    /// The type that was actually provided.
    pub got: ValueType,
}

impl TypeError {
    /// Create a new type error.
    pub fn expected(expected: ValueType, got: ValueType) -> Self {
        Self { expected, got }
    }
}

/// Errors that can occur during graph operations.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    /// Node with the given ID was not found.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Plug with the given ID was not found.
    #[error("plug not found: {0}")]
    PlugNotFound(PlugId),

    /// A node has no plug with the given name.
    #[error("no plug named '{plug}' on node {node}")]
    NoSuchPlug {
        /// Path of the node that was searched.
        node: String,
        /// Requested plug name.
        plug: String,
    },

    /// A plug with the given name already exists on the node.
    #[error("duplicate plug '{plug}' on node {node}")]
    DuplicatePlug {
        /// Path of the node.
        node: String,
        /// Conflicting plug name.
        plug: String,
    },

    /// Type mismatch with no defined conversion.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type.
        expected: ValueType,
        /// Actual type.
        got: ValueType,
    },

    /// Connecting the plugs would introduce a dependency cycle.
    #[error("cycle detected in graph")]
    CycleDetected,

    /// `set_value` on a plug that takes its value from a connection.
    #[error("cannot set value of {plug}: it has an input connection")]
    InputHasConnection {
        /// Path of the plug.
        plug: String,
    },

    /// `set_value` or `set_input` on an output produced by `compute`.
    #[error("cannot set {plug}: it is a computed output")]
    NotSettable {
        /// Path of the plug.
        plug: String,
    },

    /// An input with no stored value, no default, and no connection was read.
    #[error("no value set for {plug}")]
    NoValue {
        /// Path of the plug.
        plug: String,
    },

    /// An output of a non-computing node was read with nothing stored.
    #[error("cannot compute {plug}: its node does not compute")]
    NotComputable {
        /// Path of the plug.
        plug: String,
    },

    /// `compute` set a different plug than the one requested.
    #[error("compute for {path} set plug '{set}' instead")]
    WrongPlugSet {
        /// The output that was requested.
        plug: PlugId,
        /// Path of the requested output.
        path: String,
        /// Name of the plug that was actually set.
        set: String,
    },

    /// `compute` returned without setting the requested plug.
    #[error("compute for {path} did not set a value")]
    PlugNotSet {
        /// The output that was requested.
        plug: PlugId,
        /// Path of the requested output.
        path: String,
    },

    /// A node's `hash` or `compute` failed.
    #[error("compute failed for {path}: {message}")]
    ComputeFailed {
        /// The output whose evaluation failed.
        plug: PlugId,
        /// Path of the failing output.
        path: String,
        /// The underlying failure.
        message: String,
    },

    /// Evaluation was cancelled via the context's token.
    #[error("evaluation cancelled")]
    Cancelled,

    /// Error raised inside a node body.
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// Value accessor mismatch inside a node body.
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl GraphError {
    /// The plug whose `hash` or `compute` originally failed, for errors that
    /// carry one. Propagated failures keep the origin of the first failure.
    pub fn failing_plug(&self) -> Option<PlugId> {
        match self {
            GraphError::WrongPlugSet { plug, .. }
            | GraphError::PlugNotSet { plug, .. }
            | GraphError::ComputeFailed { plug, .. } => Some(*plug),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_error_display() {
        let err = TypeError::expected(ValueType::F32, ValueType::Bool);
        let msg = err.to_string();
        assert!(msg.contains("f32"));
        assert!(msg.contains("bool"));
    }

    #[test]
    fn test_failing_plug() {
        let err = GraphError::ComputeFailed {
            plug: PlugId(7),
            path: "add.sum".into(),
            message: "boom".into(),
        };
        assert_eq!(err.failing_plug(), Some(PlugId(7)));
        assert_eq!(GraphError::CycleDetected.failing_plug(), None);
    }

    #[test]
    fn test_type_error_converts() {
        fn fails() -> Result<f32, GraphError> {
            let err = TypeError::expected(ValueType::F32, ValueType::I32);
            Err(err.into())
        }
        assert!(matches!(fails(), Err(GraphError::Type(_))));
    }
}
