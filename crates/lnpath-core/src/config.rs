use serde::{Deserialize, Serialize};

use crate::types::Metric;

/// Parameters shared by route queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Amount the routes must carry, in millisatoshis. Channels below it are
    /// left out of the graph.
    #[serde(default = "default_payment_amount_msat")]
    pub payment_amount_msat: u64,
    /// Size of each ranked result list.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Longest route accepted, in hops.
    #[serde(default = "default_max_hop")]
    pub max_hop: u32,
    /// Consecutive non-improving routes tolerated before the top-k search stops.
    #[serde(default = "default_max_no_improve")]
    pub max_no_improve: usize,
    /// Metric that orders the top-k enumeration.
    #[serde(default)]
    pub primary_metric: Metric,
}

fn default_payment_amount_msat() -> u64 {
    1_000_000
}
fn default_top_k() -> usize {
    10
}
fn default_max_hop() -> u32 {
    10
}
fn default_max_no_improve() -> usize {
    500
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            payment_amount_msat: default_payment_amount_msat(),
            top_k: default_top_k(),
            max_hop: default_max_hop(),
            max_no_improve: default_max_no_improve(),
            primary_metric: Metric::Fee,
        }
    }
}
