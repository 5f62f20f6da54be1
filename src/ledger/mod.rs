// Ledger module - the lottery state machine
// Handles entries, winner selection, the atomic payout/reset and payout receipts

mod lottery;
mod randomness;
mod receipt;
mod transaction;

pub use lottery::{BlockInfo, LotteryConfig, LotteryError, LotteryLedger, Payout};
pub use receipt::{ReceiptCodec, ReceiptError};
pub use randomness::{
    select_index, ContextRandomness, EntropyContext, RandomnessSource, SeededRandomness,
};
