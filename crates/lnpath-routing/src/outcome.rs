use std::fmt;

use lnpath_core::NodeId;

/// Why a search produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The node does not appear in the graph (no usable channel touches it).
    UnknownNode(NodeId),
    /// Both endpoints exist but no eligible path connects them.
    NoPath,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::UnknownNode(node) => write!(f, "unknown node {node}"),
            NotFoundReason::NoPath => f.write_str("no path found"),
        }
    }
}

/// Result of a route search that completed normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Found(T),
    NotFound(NotFoundReason),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NotFound(_) => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NotFound(_) => None,
        }
    }

    pub fn not_found_reason(&self) -> Option<&NotFoundReason> {
        match self {
            Outcome::Found(_) => None,
            Outcome::NotFound(reason) => Some(reason),
        }
    }
}
