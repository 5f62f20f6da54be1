// LotteryHost - serialized execution environment for a single lottery instance
//
// Every call takes the same lock over the ledger, the external accounts and the
// block clock, so calls are totally ordered and never observed half-applied.

use super::config::HostConfig;
use crate::identity::{Address, Keypair};
use crate::ledger::{
    BlockInfo, ContextRandomness, LotteryError, LotteryLedger, Payout, RandomnessSource,
    SeededRandomness,
};
use crate::vault::{AccountBook, Amount, VaultError};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by host calls
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostError {
    #[error(transparent)]
    Lottery(#[from] LotteryError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("Unknown account: {0}")]
    UnknownAccount(Address),

    #[error("Host state lock poisoned")]
    LockPoisoned,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// BLOCK CLOCK
// ============================================================================

/// Monotonic block height and timestamp, advanced once per mutating call
#[derive(Clone, Copy, Debug)]
struct BlockClock {
    current: BlockInfo,
    interval_secs: u64,
}

impl BlockClock {
    fn new(genesis_timestamp: u64, interval_secs: u64) -> Self {
        Self {
            current: BlockInfo::new(0, genesis_timestamp),
            interval_secs,
        }
    }

    fn mine(&mut self) -> BlockInfo {
        self.current.height += 1;
        self.current.timestamp = self.current.timestamp.saturating_add(self.interval_secs);
        self.current
    }
}

struct HostState {
    ledger: LotteryLedger,
    accounts: AccountBook,
    clock: BlockClock,
}

// ============================================================================
// LOTTERY HOST
// ============================================================================

/// Runs one lottery instance against a set of external accounts.
///
/// `LotteryHost` is `Send + Sync`; share it behind an `Arc`.
pub struct LotteryHost {
    config: HostConfig,
    manager: Address,
    randomness: Box<dyn RandomnessSource + Send + Sync>,
    state: Mutex<HostState>,
}

impl LotteryHost {
    /// Deploy a new instance managed by a freshly minted account
    pub fn deploy(config: HostConfig, manager_funding: Amount) -> Result<Self, HostError> {
        let manager = Address::from_public_key(&Keypair::generate().public_key());
        Self::deploy_as(config, manager, manager_funding)
    }

    /// Deploy a new instance managed by `manager`
    pub fn deploy_as(
        config: HostConfig,
        manager: Address,
        manager_funding: Amount,
    ) -> Result<Self, HostError> {
        config.validate()?;

        let genesis = config.genesis_timestamp.unwrap_or_else(|| {
            u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
        });

        let randomness: Box<dyn RandomnessSource + Send + Sync> = match config.seed {
            Some(seed) => Box::new(SeededRandomness::new(seed)),
            None => Box::new(ContextRandomness),
        };

        let mut accounts = AccountBook::new();
        accounts.open(manager, manager_funding)?;

        let ledger = LotteryLedger::with_config(manager, config.lottery_config());
        let mut clock = BlockClock::new(genesis, config.block_interval_secs);
        let block = clock.mine();

        info!(manager = %manager, height = block.height, "lottery deployed");

        Ok(Self {
            config,
            manager,
            randomness,
            state: Mutex::new(HostState {
                ledger,
                accounts,
                clock,
            }),
        })
    }

    /// Replace the randomness source used for winner selection
    pub fn with_randomness<R>(mut self, source: R) -> Self
    where
        R: RandomnessSource + Send + Sync + 'static,
    {
        self.randomness = Box::new(source);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, HostState>, HostError> {
        self.state.lock().map_err(|_| HostError::LockPoisoned)
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    /// Open a new funded account and return its address
    pub fn open_account(&self, initial: Amount) -> Result<Address, HostError> {
        let address = Address::from_public_key(&Keypair::generate().public_key());
        self.lock()?.accounts.open(address, initial)?;
        debug!(account = %address.short(), initial, "account opened");
        Ok(address)
    }

    /// External balance of an account
    pub fn balance_of(&self, address: &Address) -> Result<Amount, HostError> {
        Ok(self.lock()?.accounts.balance_of(address))
    }

    // ========================================================================
    // LOTTERY CALLS
    // ========================================================================

    /// Enter the lottery with `amount` taken from the caller's account.
    ///
    /// The call fee is charged whenever the call executes, including when the
    /// ledger rejects the entry.
    pub fn enter(&self, caller: &Address, amount: Amount) -> Result<(), HostError> {
        let mut guard = self.lock()?;
        let HostState {
            ledger,
            accounts,
            clock,
        } = &mut *guard;

        let required = Self::ensure_funds(accounts, caller, amount, self.config.call_fee)?;

        let block = clock.mine();
        accounts.withdraw(caller, required)?;

        if let Err(e) = ledger.enter(caller, amount) {
            accounts.deposit(caller, amount)?;
            return Err(e.into());
        }

        debug!(caller = %caller.short(), height = block.height, "enter executed");
        Ok(())
    }

    /// Resolve the current round. Manager only.
    pub fn pick_winner(&self, caller: &Address) -> Result<Payout, HostError> {
        let mut guard = self.lock()?;
        let HostState {
            ledger,
            accounts,
            clock,
        } = &mut *guard;

        let fee = Self::ensure_funds(accounts, caller, 0, self.config.call_fee)?;

        let block = clock.mine();
        accounts.withdraw(caller, fee)?;

        let payout = ledger.pick_winner(caller, block, self.randomness.as_ref(), accounts)?;
        Ok(payout)
    }

    /// Snapshot of the current entrants. Free read, any caller.
    pub fn players(&self) -> Result<Vec<Address>, HostError> {
        self.with_players(|players| players.to_vec())
    }

    /// Borrow the current entrants under the host lock
    pub fn with_players<T, F>(&self, f: F) -> Result<T, HostError>
    where
        F: FnOnce(&[Address]) -> T,
    {
        Ok(f(self.lock()?.ledger.players()))
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn manager(&self) -> &Address {
        &self.manager
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Value held in custody by the lottery instance
    pub fn pool_balance(&self) -> Result<Amount, HostError> {
        Ok(self.lock()?.ledger.balance())
    }

    /// Value held by every external account plus the pool.
    ///
    /// Entries and payouts only move value, so this changes only by fees
    /// charged and accounts opened. `None` if the sum exceeds `Amount::MAX`.
    pub fn total_value(&self) -> Result<Option<Amount>, HostError> {
        let state = self.lock()?;
        Ok(state
            .accounts
            .total_supply()
            .and_then(|supply| supply.checked_add(state.ledger.balance())))
    }

    /// Number of completed rounds
    pub fn round(&self) -> Result<u64, HostError> {
        Ok(self.lock()?.ledger.round())
    }

    /// Height of the most recently mined block
    pub fn block_height(&self) -> Result<u64, HostError> {
        Ok(self.lock()?.clock.current.height)
    }

    /// Check the caller can pay `amount` plus `fee`; returns the total to debit
    fn ensure_funds(
        accounts: &AccountBook,
        caller: &Address,
        amount: Amount,
        fee: Amount,
    ) -> Result<Amount, HostError> {
        if !accounts.contains(caller) {
            return Err(HostError::UnknownAccount(*caller));
        }

        let available = accounts.balance_of(caller);
        // a total past Amount::MAX is never affordable
        let required = amount
            .checked_add(fee)
            .ok_or(HostError::InsufficientFunds {
                available,
                required: Amount::MAX,
            })?;

        if !accounts.can_afford(caller, required) {
            return Err(HostError::InsufficientFunds {
                available,
                required,
            });
        }
        Ok(required)
    }
}
