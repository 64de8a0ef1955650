use lnpath_core::NodeId;

/// Errors that can occur within the routing layer.
///
/// An unreachable or unknown endpoint is not an error; searches report it
/// through [`Outcome::NotFound`](crate::Outcome::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("broken path: no edge from {from} to {to}")]
    BrokenPath { from: NodeId, to: NodeId },

    #[error("path must contain at least two nodes, got {len}")]
    EmptyPath { len: usize },

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
