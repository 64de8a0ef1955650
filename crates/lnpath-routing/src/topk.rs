use lnpath_core::{Metric, NodeId, SearchConfig};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::analyzer::{analyze_indices, PathCandidate};
use crate::error::RoutingError;
use crate::graph::ChannelGraph;
use crate::outcome::{NotFoundReason, Outcome};
use crate::pathfinder::{resolve_endpoints, validate_query};
use crate::simple_paths::SimplePaths;

/// The `k` best candidates seen so far under one metric.
///
/// Kept sorted ascending by `(metric value, insertion sequence)`; once the set
/// is full, an insertion evicts the last entry.
#[derive(Debug, Clone)]
pub struct TopKSet {
    metric: Metric,
    k: usize,
    entries: Vec<(u64, u64, PathCandidate)>,
}

impl TopKSet {
    pub fn new(metric: Metric, k: usize) -> Self {
        Self {
            metric,
            k,
            entries: Vec::with_capacity(k.min(64) + 1),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offer a candidate. `seq` orders candidates with equal metric values;
    /// earlier wins. Returns whether the candidate is in the set afterwards.
    pub fn insert(&mut self, seq: u64, candidate: PathCandidate) -> bool {
        if self.k == 0 {
            return false;
        }
        let key = (candidate.metric(self.metric), seq);
        if self.entries.len() == self.k {
            if let Some(&(worst_value, worst_seq, _)) = self.entries.last() {
                if key >= (worst_value, worst_seq) {
                    return false;
                }
            }
        }

        let pos = self
            .entries
            .partition_point(|&(value, s, _)| (value, s) < key);
        self.entries.insert(pos, (key.0, key.1, candidate));
        self.entries.truncate(self.k);
        true
    }

    /// Largest-metric member, the next to be evicted.
    pub fn worst(&self) -> Option<&PathCandidate> {
        self.entries.last().map(|(_, _, candidate)| candidate)
    }

    /// Members in ascending metric order.
    pub fn iter(&self) -> impl Iterator<Item = &PathCandidate> {
        self.entries.iter().map(|(_, _, candidate)| candidate)
    }

    pub fn into_vec(self) -> Vec<PathCandidate> {
        self.entries
            .into_iter()
            .map(|(_, _, candidate)| candidate)
            .collect()
    }
}

impl Serialize for TopKSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Why the enumeration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every loopless path was examined.
    Exhausted,
    /// `max_no_improve` consecutive paths failed to beat the best seen.
    NoImprovement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Paths analyzed and offered to the rankings.
    pub paths_checked: usize,
    /// Paths dropped for exceeding `max_hop`.
    pub paths_skipped: usize,
    pub stop_reason: StopReason,
}

/// The three rankings produced by one [`TopKSearch::search`].
#[derive(Debug, Clone, Serialize)]
pub struct TopKPaths {
    pub by_fee: TopKSet,
    pub by_timelock: TopKSet,
    pub by_hops: TopKSet,
    #[serde(skip)]
    pub stats: SearchStats,
}

impl TopKPaths {
    /// The ranking for `metric`.
    pub fn ranking(&self, metric: Metric) -> &TopKSet {
        match metric {
            Metric::Fee => &self.by_fee,
            Metric::Hop => &self.by_hops,
            Metric::Timelock => &self.by_timelock,
        }
    }
}

/// Configuration for the top-k search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKConfig {
    /// Size bound of each ranking.
    pub k: usize,
    /// Paths longer than this are skipped.
    pub max_hop: u32,
    /// Consecutive non-improving paths tolerated before stopping.
    pub max_no_improve: usize,
    /// Metric ordering the enumeration and judging improvement.
    pub primary_metric: Metric,
}

impl Default for TopKConfig {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for TopKConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            k: config.top_k,
            max_hop: config.max_hop,
            max_no_improve: config.max_no_improve,
            primary_metric: config.primary_metric,
        }
    }
}

/// Fills fee, timelock and hop-count rankings from one cost-ordered
/// enumeration of loopless paths.
///
/// The rankings for the non-primary metrics only contain what the
/// enumeration reached before it stopped; they are not global top-k sets.
pub struct TopKSearch<'g> {
    graph: &'g ChannelGraph,
    config: TopKConfig,
}

impl<'g> TopKSearch<'g> {
    pub fn new(graph: &'g ChannelGraph, config: TopKConfig) -> Self {
        Self { graph, config }
    }

    pub fn with_defaults(graph: &'g ChannelGraph) -> Self {
        Self::new(graph, TopKConfig::default())
    }

    pub fn config(&self) -> &TopKConfig {
        &self.config
    }

    /// Enumerate paths from `source` to `target` and rank them.
    ///
    /// Paths arrive in non-decreasing order of the primary metric. Each path
    /// within `max_hop` is analyzed and offered to all three rankings. A path
    /// whose primary value is strictly below the best so far resets the
    /// no-improvement counter, any other path increments it, and the search
    /// stops when the counter reaches `max_no_improve`.
    pub fn search(
        &self,
        source: &NodeId,
        target: &NodeId,
        payment_amount_msat: u64,
    ) -> Result<Outcome<TopKPaths>, RoutingError> {
        validate_query(source, target, payment_amount_msat)?;
        if self.config.k == 0 {
            return Err(RoutingError::InvalidQuery("k must be at least 1".into()));
        }

        let (s, t) = match resolve_endpoints(self.graph, source, target) {
            Ok(endpoints) => endpoints,
            Err(reason) => {
                debug!(%source, %target, %reason, "top-k search skipped");
                return Ok(Outcome::NotFound(reason));
            }
        };

        let &TopKConfig {
            k,
            max_hop,
            max_no_improve,
            primary_metric,
        } = &self.config;

        let mut paths = SimplePaths::from_indices(self.graph, s, t, primary_metric);
        let mut by_fee = TopKSet::new(Metric::Fee, k);
        let mut by_timelock = TopKSet::new(Metric::Timelock, k);
        let mut by_hops = TopKSet::new(Metric::Hop, k);

        let mut best: Option<u64> = None;
        let mut no_improve = 0usize;
        let mut seq = 0u64;
        let mut paths_checked = 0usize;
        let mut paths_skipped = 0usize;
        let mut stop_reason = StopReason::Exhausted;

        while let Some((_, nodes)) = paths.next_indexed() {
            if nodes.len() - 1 > max_hop as usize {
                paths_skipped += 1;
                continue;
            }

            let candidate = analyze_indices(self.graph, &nodes, payment_amount_msat)?;
            let value = candidate.metric(primary_metric);

            by_fee.insert(seq, candidate.clone());
            by_timelock.insert(seq, candidate.clone());
            by_hops.insert(seq, candidate);
            seq += 1;
            paths_checked += 1;

            if best.map_or(true, |b| value < b) {
                best = Some(value);
                no_improve = 0;
            } else {
                no_improve += 1;
            }

            if no_improve >= max_no_improve {
                debug!(
                    max_no_improve,
                    paths_checked,
                    "no better {primary_metric} found, stopping early"
                );
                stop_reason = StopReason::NoImprovement;
                break;
            }
        }

        info!(
            %source,
            %target,
            paths_checked,
            paths_skipped,
            ?stop_reason,
            "top-k search finished"
        );

        if paths_checked == 0 {
            return Ok(Outcome::NotFound(NotFoundReason::NoPath));
        }

        Ok(Outcome::Found(TopKPaths {
            by_fee,
            by_timelock,
            by_hops,
            stats: SearchStats {
                paths_checked,
                paths_skipped,
                stop_reason,
            },
        }))
    }
}
