// Lottery ledger - the pooled balance, the entrants and the manager who resolves them

use crate::identity::Address;
use crate::ledger::randomness::{select_index, EntropyContext, RandomnessSource};
use crate::ledger::transaction::{RoundState, Transaction};
use crate::vault::{format_units, Amount, PayoutError, PayoutTarget};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during lottery operations.
///
/// Every variant is returned before any state is committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotteryError {
    #[error("Insufficient value: entries must exceed {minimum}, got {provided}")]
    InsufficientValue { minimum: Amount, provided: Amount },

    #[error("Unauthorized: only the manager can resolve the round")]
    Unauthorized,

    #[error("Empty pool: no players to pick a winner from")]
    EmptyPool,

    #[error("Pool balance would overflow")]
    BalanceOverflow,

    #[error("Payout failed: {0}")]
    PayoutFailed(#[from] PayoutError),
}

/// Configuration for a lottery instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LotteryConfig {
    /// Entries must be strictly greater than this amount
    pub min_entry: Amount,
}

impl LotteryConfig {
    /// Create a new config with builder pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusive minimum entry amount
    pub fn with_min_entry(mut self, amount: Amount) -> Self {
        self.min_entry = amount;
        self
    }
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self { min_entry: 0 }
    }
}

/// Block the call executes in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockInfo {
    pub height: u64,
    pub timestamp: u64,
}

impl BlockInfo {
    pub fn new(height: u64, timestamp: u64) -> Self {
        Self { height, timestamp }
    }
}

/// Receipt for a resolved round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    round: u64,
    winner: Address,
    index: usize,
    amount: Amount,
}

impl Payout {
    /// Round that was resolved
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Address that received the pool
    pub fn winner(&self) -> &Address {
        &self.winner
    }

    /// Position in the player list that was selected
    pub fn index(&self) -> usize {
        self.index
    }

    /// Amount transferred
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// A single lottery instance
#[derive(Clone, Debug)]
pub struct LotteryLedger {
    /// Identity allowed to resolve rounds, fixed at construction
    manager: Address,
    config: LotteryConfig,
    state: RoundState,
}

impl LotteryLedger {
    /// Create an instance managed by `manager` with the default config
    pub fn new(manager: Address) -> Self {
        Self::with_config(manager, LotteryConfig::default())
    }

    /// Create an instance with an explicit config
    pub fn with_config(manager: Address, config: LotteryConfig) -> Self {
        debug!(manager = %manager.short(), min_entry = config.min_entry, "lottery initialized");
        Self {
            manager,
            config,
            state: RoundState::default(),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn manager(&self) -> &Address {
        &self.manager
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    /// Value currently held in custody
    pub fn balance(&self) -> Amount {
        self.state.balance
    }

    /// Number of completed rounds
    pub fn round(&self) -> u64 {
        self.state.round
    }

    /// Entrants of the current round in entry order, duplicates included
    pub fn players(&self) -> &[Address] {
        &self.state.players
    }

    pub fn player_count(&self) -> usize {
        self.state.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.players.is_empty()
    }

    // ========================================================================
    // ENTERING
    // ========================================================================

    /// Add `caller` to the pool with `amount` of value.
    ///
    /// The same caller may enter any number of times; each entry is its own
    /// slot in the draw.
    pub fn enter(&mut self, caller: &Address, amount: Amount) -> Result<(), LotteryError> {
        if amount <= self.config.min_entry {
            warn!(caller = %caller.short(), amount, "entry below minimum rejected");
            return Err(LotteryError::InsufficientValue {
                minimum: self.config.min_entry,
                provided: amount,
            });
        }

        // nothing below can fail once the new balance is known
        let balance = self
            .state
            .balance
            .checked_add(amount)
            .ok_or(LotteryError::BalanceOverflow)?;
        self.state.balance = balance;
        self.state.players.push(*caller);

        debug!(
            caller = %caller.short(),
            amount,
            players = self.state.players.len(),
            balance = self.state.balance,
            "entry accepted"
        );
        Ok(())
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Pick a winner, pay out the whole pool and reset for the next round.
    ///
    /// Only the manager may call this. The pool is cleared on a working copy,
    /// the transfer runs last, and the reset is committed only once the
    /// transfer has succeeded. A failed transfer leaves the instance exactly as
    /// it was.
    pub fn pick_winner<R, P>(
        &mut self,
        caller: &Address,
        block: BlockInfo,
        randomness: &R,
        payout: &mut P,
    ) -> Result<Payout, LotteryError>
    where
        R: RandomnessSource + ?Sized,
        P: PayoutTarget + ?Sized,
    {
        if *caller != self.manager {
            warn!(caller = %caller.short(), "non-manager attempted to pick a winner");
            return Err(LotteryError::Unauthorized);
        }

        let ctx = EntropyContext::new(
            block.height,
            block.timestamp,
            self.state.round,
            &self.state.players,
        );
        let index = select_index(randomness, &ctx).ok_or(LotteryError::EmptyPool)?;

        let winner = self.state.players[index];
        let round = self.state.round;

        let mut tx = Transaction::begin(&mut self.state);
        let amount = tx.balance;
        tx.balance = 0;
        tx.players.clear();
        tx.round += 1;

        if let Err(e) = payout.transfer(&winner, amount) {
            warn!(winner = %winner.short(), amount, error = %e, "payout failed, round left open");
            return Err(e.into());
        }
        tx.commit();

        info!(
            round,
            winner = %winner,
            index,
            amount = %format_units(amount),
            "round resolved"
        );

        Ok(Payout {
            round,
            winner,
            index,
            amount,
        })
    }
}
