use thiserror::Error;

/// Errors raised while building or querying a [`Dag`](crate::dag::Dag)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DagError {
    /// A declared parent was not declared earlier in the input list.
    /// Covers both out-of-order input and references to nodes that never appear.
    #[error("Invalid input: node '{node}' references parent '{parent}' before it is declared")]
    InvalidInput { node: String, parent: String },

    #[error("Invalid input: node '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("Node not found in graph: {0}")]
    NodeNotFound(String),
}

pub type DagResult<T> = Result<T, DagError>;
