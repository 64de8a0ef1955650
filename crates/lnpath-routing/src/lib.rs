//! lnpath routing: multi-criteria payment route search.
//!
//! This crate provides:
//! - [`GraphBuilder`]: turns normalized channel records into an immutable [`ChannelGraph`]
//!   filtered by policy and payment size.
//! - [`analyze`]: fee, timelock and bottleneck-capacity totals for a path.
//! - [`PathFinder`]: deterministic Dijkstra search for the best path under one [`Metric`].
//! - [`SimplePaths`]: lazy enumeration of loopless paths in non-decreasing cost order (Yen).
//! - [`TopKSearch`]: bounded top-k rankings by fee, timelock and hop count from a single
//!   enumeration, with an early-stop heuristic.
//! - [`most_connected_pair`]: picks a well-connected node pair for demonstrations.
//!
//! [`Metric`]: lnpath_core::Metric

pub mod analyzer;
pub mod error;
pub mod graph;
pub mod outcome;
pub mod pair_finder;
pub mod pathfinder;
pub mod simple_paths;
pub mod topk;

// Re-exports for convenience.
pub use analyzer::{analyze, PathCandidate};
pub use error::RoutingError;
pub use graph::{BuildStats, ChannelGraph, Edge, GraphBuilder, NetworkStats};
pub use outcome::{NotFoundReason, Outcome};
pub use pair_finder::{most_connected_pair, ConnectedPair};
pub use pathfinder::{BestPaths, PathFinder};
pub use simple_paths::{SimplePaths, WeightedPath};
pub use topk::{SearchStats, StopReason, TopKConfig, TopKPaths, TopKSearch, TopKSet};
