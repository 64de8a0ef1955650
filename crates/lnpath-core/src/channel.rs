use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::types::NodeId;

/// Serde helpers for numeric fields that graph exports carry either as
/// JSON numbers or as decimal strings (`"fee_base_msat": "1000"`).
mod lenient_int {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }

    fn to_u64<E: Error>(value: NumOrString) -> Result<u64, E> {
        match value {
            NumOrString::Num(n) => Ok(n),
            NumOrString::Str(s) => s.trim().parse().map_err(E::custom),
        }
    }

    pub fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        to_u64(NumOrString::deserialize(deserializer)?)
    }

    pub fn de_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<NumOrString>::deserialize(deserializer)?
            .map(to_u64::<D::Error>)
            .transpose()
    }

    pub fn de_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = de_u64(deserializer)?;
        u32::try_from(value).map_err(D::Error::custom)
    }
}

use lenient_int::{de_opt_u64, de_u32, de_u64};

/// Decode a policy that is only carried along; anything unreadable becomes
/// `None` instead of failing the whole record.
fn de_reference_policy<'de, D>(deserializer: D) -> Result<Option<Policy>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

fn default_disabled() -> bool {
    true
}

/// One node's forwarding terms for one direction of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// A policy that does not state it is enabled is treated as disabled.
    #[serde(default = "default_disabled")]
    pub disabled: bool,
    /// Flat fee charged per forwarded payment, in millisatoshis.
    #[serde(default, deserialize_with = "de_u64")]
    pub fee_base_msat: u64,
    /// Proportional fee in millionths of the forwarded amount.
    #[serde(default, alias = "fee_rate_milli_msat", deserialize_with = "de_u64")]
    pub fee_rate_millionths: u64,
    /// Blocks added to the payment's expiry by this hop.
    #[serde(default, deserialize_with = "de_u32")]
    pub time_lock_delta: u32,
}

impl Policy {
    /// An enabled policy with the given terms.
    pub fn enabled(fee_base_msat: u64, fee_rate_millionths: u64, time_lock_delta: u32) -> Self {
        Self {
            disabled: false,
            fee_base_msat,
            fee_rate_millionths,
            time_lock_delta,
        }
    }

    /// Fee charged for forwarding `amount_msat`. See [`forwarding_fee`].
    pub fn fee_for(&self, amount_msat: u64) -> u64 {
        forwarding_fee(self.fee_base_msat, self.fee_rate_millionths, amount_msat)
    }
}

/// `fee_base_msat + floor(amount_msat * fee_rate_millionths / 1_000_000)`.
///
/// The product is taken in 128 bits; the result saturates at `u64::MAX`.
pub fn forwarding_fee(fee_base_msat: u64, fee_rate_millionths: u64, amount_msat: u64) -> u64 {
    let proportional = (amount_msat as u128 * fee_rate_millionths as u128) / 1_000_000;
    let proportional = u64::try_from(proportional).unwrap_or(u64::MAX);
    fee_base_msat.saturating_add(proportional)
}

/// A channel as seen from one of its endpoints.
///
/// Capacity is read from `capacity_sat`, or from `capacity` when that is the
/// only spelling present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChannelRecord")]
pub struct ChannelRecord {
    pub channel_id: Option<String>,
    /// The node at the other end of the channel.
    pub peer: NodeId,
    /// Total channel capacity in satoshis.
    pub capacity_sat: u64,
    /// The owning node's outgoing policy. Only this one affects routing.
    pub own_policy: Option<Policy>,
    /// The peer's policy toward the owning node, kept for reference.
    pub peer_policy: Option<Policy>,
}

/// Wire form of [`ChannelRecord`] before the capacity spellings are merged.
#[derive(Deserialize)]
struct RawChannelRecord {
    #[serde(default)]
    channel_id: Option<String>,
    peer: NodeId,
    #[serde(default, deserialize_with = "de_opt_u64")]
    capacity_sat: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    capacity: Option<u64>,
    #[serde(default)]
    own_policy: Option<Policy>,
    #[serde(default, deserialize_with = "de_reference_policy")]
    peer_policy: Option<Policy>,
}

impl TryFrom<RawChannelRecord> for ChannelRecord {
    type Error = String;

    fn try_from(raw: RawChannelRecord) -> Result<Self, Self::Error> {
        let capacity_sat = raw
            .capacity_sat
            .or(raw.capacity)
            .ok_or_else(|| "missing field `capacity_sat`".to_string())?;
        Ok(Self {
            channel_id: raw.channel_id,
            peer: raw.peer,
            capacity_sat,
            own_policy: raw.own_policy,
            peer_policy: raw.peer_policy,
        })
    }
}

impl ChannelRecord {
    pub fn new(peer: impl Into<NodeId>, capacity_sat: u64, own_policy: Option<Policy>) -> Self {
        Self {
            channel_id: None,
            peer: peer.into(),
            capacity_sat,
            own_policy,
            peer_policy: None,
        }
    }
}

/// Outgoing channel records per node.
///
/// Ordered so that every consumer processes nodes in the same order.
pub type ChannelMap = BTreeMap<NodeId, Vec<ChannelRecord>>;

/// Decode a normalized channel map from JSON.
///
/// The document must be an object mapping node ids to arrays. Individual
/// records that fail to decode are skipped.
pub fn parse_channel_map(json: &str) -> Result<ChannelMap, CoreError> {
    let raw: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(json)?;

    let mut map = ChannelMap::new();
    let mut skipped = 0usize;
    let mut accepted = 0usize;

    for (node, values) in raw {
        let records: Vec<ChannelRecord> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ChannelRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(node = %node, error = %e, "skipping malformed channel record");
                    skipped += 1;
                    None
                }
            })
            .collect();
        accepted += records.len();
        map.insert(NodeId::new(node), records);
    }

    debug!(nodes = map.len(), records = accepted, skipped, "parsed channel map");
    Ok(map)
}
