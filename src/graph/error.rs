use thiserror::Error;

/// Contract violations on a [`DebtGraph`](crate::graph::debt_graph::DebtGraph).
///
/// None of these are recoverable: well-formed input never triggers them
/// inside the simplification pipeline, so their appearance signals a bug in
/// the caller or in the pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("invalid vertex index {vertex} (graph has {vertex_count} vertices)")]
    InvalidVertex { vertex: usize, vertex_count: usize },

    #[error("edge {from} -> {to} already exists")]
    DuplicateEdge { from: usize, to: usize },

    #[error("self-loop on vertex {vertex} is not allowed")]
    SelfLoop { vertex: usize },

    #[error("edge {from} -> {to} does not exist")]
    MissingEdge { from: usize, to: usize },
}

/// Errors from parsing the textual graph form.
#[derive(Debug, Error)]
pub enum ParseGraphError {
    #[error("missing \"Graph with N vertices\" header")]
    MissingHeader,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
