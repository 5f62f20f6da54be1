// Vault module - value outside the pool: external accounts, payouts, units

mod accounts;
mod payout;
mod units;

pub use accounts::{AccountBook, VaultError};
pub use payout::{MockPayoutTarget, PayoutError, PayoutTarget};
pub use units::{format_units, parse_units, Amount, UnitsError, DECIMALS, UNIT};
