// Host configuration

use crate::ledger::LotteryConfig;
use crate::vault::Amount;

use super::HostError;

/// Configuration for a lottery host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Entries must be strictly greater than this amount
    pub min_entry: Amount,
    /// Flat fee charged to the invoker of every executed mutating call
    pub call_fee: Amount,
    /// Seconds between consecutive blocks
    pub block_interval_secs: u64,
    /// Timestamp of the genesis block; the current time when unset
    pub genesis_timestamp: Option<u64>,
    /// Seed for deterministic winner selection; context randomness when unset
    pub seed: Option<u64>,
}

impl HostConfig {
    /// Create a new config with builder pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusive minimum entry amount
    pub fn with_min_entry(mut self, amount: Amount) -> Self {
        self.min_entry = amount;
        self
    }

    /// Set the per-call fee
    pub fn with_call_fee(mut self, fee: Amount) -> Self {
        self.call_fee = fee;
        self
    }

    /// Set the block interval
    pub fn with_block_interval_secs(mut self, secs: u64) -> Self {
        self.block_interval_secs = secs;
        self
    }

    /// Pin the genesis timestamp
    pub fn with_genesis_timestamp(mut self, timestamp: u64) -> Self {
        self.genesis_timestamp = Some(timestamp);
        self
    }

    /// Use seeded randomness
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Ledger settings derived from this config
    pub fn lottery_config(&self) -> LotteryConfig {
        LotteryConfig::new().with_min_entry(self.min_entry)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), HostError> {
        if self.block_interval_secs == 0 {
            return Err(HostError::InvalidConfig(
                "block_interval_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            min_entry: 0,
            call_fee: 0,
            block_interval_secs: 12,
            genesis_timestamp: None,
            seed: None,
        }
    }
}
