// Host module - execution environment around one lottery instance
// Serializes calls, keeps external accounts and mines blocks for entropy

mod config;
mod runtime;

pub use config::HostConfig;
pub use runtime::{HostError, LotteryHost};
