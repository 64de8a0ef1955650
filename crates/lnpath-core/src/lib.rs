pub mod channel;
pub mod config;
pub mod error;
pub mod types;

pub use channel::{forwarding_fee, parse_channel_map, ChannelMap, ChannelRecord, Policy};
pub use config::SearchConfig;
pub use error::CoreError;
pub use types::{Metric, NodeId};
