// External account balances - what each identity holds outside the pool

use crate::identity::Address;
use crate::vault::payout::{PayoutError, PayoutTarget};
use crate::vault::Amount;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during account operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VaultError {
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("Unknown account: {0}")]
    UnknownAccount(Address),

    #[error("Account already exists: {0}")]
    AccountExists(Address),

    #[error("Balance would overflow")]
    BalanceOverflow,
}

/// Ledger of external balances keyed by address
#[derive(Clone, Debug, Default)]
pub struct AccountBook {
    balances: HashMap<Address, Amount>,
}

impl AccountBook {
    /// Create an empty account book
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new account with an initial balance
    pub fn open(&mut self, address: Address, initial: Amount) -> Result<(), VaultError> {
        if self.balances.contains_key(&address) {
            return Err(VaultError::AccountExists(address));
        }
        self.balances.insert(address, initial);
        Ok(())
    }

    /// Check whether an account exists
    pub fn contains(&self, address: &Address) -> bool {
        self.balances.contains_key(address)
    }

    /// Number of open accounts
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Check if no accounts are open
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    // ========================================================================
    // BALANCE QUERIES
    // ========================================================================

    /// Balance of an account (0 for unknown accounts)
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Check if the account can cover a specific amount
    pub fn can_afford(&self, address: &Address, amount: Amount) -> bool {
        self.balance_of(address) >= amount
    }

    /// Sum of every account balance, or `None` if it does not fit in an `Amount`
    pub fn total_supply(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(0, |total: Amount, balance| total.checked_add(*balance))
    }

    // ========================================================================
    // MOVEMENTS
    // ========================================================================

    /// Credit an existing account
    pub fn deposit(&mut self, address: &Address, amount: Amount) -> Result<Amount, VaultError> {
        let balance = self
            .balances
            .get_mut(address)
            .ok_or(VaultError::UnknownAccount(*address))?;

        *balance = balance
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow)?;
        Ok(*balance)
    }

    /// Debit an existing account
    pub fn withdraw(&mut self, address: &Address, amount: Amount) -> Result<Amount, VaultError> {
        let balance = self
            .balances
            .get_mut(address)
            .ok_or(VaultError::UnknownAccount(*address))?;

        if *balance < amount {
            return Err(VaultError::InsufficientFunds {
                available: *balance,
                required: amount,
            });
        }

        *balance -= amount;
        Ok(*balance)
    }
}

impl PayoutTarget for AccountBook {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), PayoutError> {
        // winners that never opened an account here still get paid
        let balance = self.balances.entry(*to).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(PayoutError::RecipientOverflow)?;
        Ok(())
    }
}
