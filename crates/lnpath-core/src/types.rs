use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Opaque node identifier, in practice a hex-encoded public key.
///
/// Ordering is lexicographic on the underlying string. Every deterministic
/// tie-break in the search engine relies on this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The quantity a route is ranked by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Total forwarding fee in millisatoshis.
    #[default]
    Fee,
    /// Number of hops.
    #[serde(alias = "hops")]
    Hop,
    /// Sum of timelock deltas along the route.
    Timelock,
}

impl Metric {
    /// All metrics, in the order results are usually reported.
    pub const ALL: [Metric; 3] = [Metric::Fee, Metric::Hop, Metric::Timelock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Fee => "fee",
            Metric::Hop => "hop",
            Metric::Timelock => "timelock",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fee" => Ok(Metric::Fee),
            "hop" | "hops" => Ok(Metric::Hop),
            "timelock" => Ok(Metric::Timelock),
            _ => Err(CoreError::InvalidMetric(s.to_string())),
        }
    }
}
