//! Manager-resolved lottery pool.
//!
//! Players [`enter`](ledger::LotteryLedger::enter) with a strictly positive
//! amount; the manager calls [`pick_winner`](ledger::LotteryLedger::pick_winner)
//! to move the whole pool to one entrant and reset for the next round. Winner
//! selection hashes public context and is not secure randomness.

pub mod host;
pub mod identity;
pub mod ledger;
pub mod vault;

pub use host::{HostConfig, HostError, LotteryHost};
pub use identity::Address;
pub use ledger::{LotteryConfig, LotteryError, LotteryLedger, Payout};
pub use vault::{format_units, parse_units, Amount};
