// Payout - moves a resolved pool out of custody to the winner's external account

use crate::identity::Address;
use crate::vault::Amount;
use thiserror::Error;

/// Errors raised by a payout target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("Recipient account would overflow")]
    RecipientOverflow,

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

// ============================================================================
// PAYOUT TARGET TRAIT
// ============================================================================

/// Destination for pool payouts.
///
/// A transfer either credits the full amount or fails without crediting
/// anything. The ledger holds `&mut self` for the duration of the call, so an
/// implementation cannot reach back into the instance being resolved.
pub trait PayoutTarget {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), PayoutError>;
}

// ============================================================================
// MOCK PAYOUT TARGET
// ============================================================================

/// Mock implementation of PayoutTarget for testing
#[derive(Debug, Default)]
pub struct MockPayoutTarget {
    failure_message: Option<String>,
    failures_remaining: usize,
    transfers: Vec<(Address, Amount)>,
    attempts: usize,
}

impl MockPayoutTarget {
    /// Create a new mock target that accepts every transfer
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure to always fail with a message
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure_message = Some(message.to_string());
        self.failures_remaining = usize::MAX;
        self
    }

    /// Fail N times, then succeed
    pub fn with_failures_then_success(mut self, failures: usize) -> Self {
        self.failures_remaining = failures;
        self
    }

    /// Transfers that were accepted, in order
    pub fn transfers(&self) -> &[(Address, Amount)] {
        &self.transfers
    }

    /// Total number of transfer attempts, accepted or not
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Sum of all accepted transfers to one address
    pub fn received_by(&self, address: &Address) -> Amount {
        self.transfers
            .iter()
            .filter(|(to, _)| to == address)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl PayoutTarget for MockPayoutTarget {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), PayoutError> {
        self.attempts += 1;

        if self.failures_remaining > 0 {
            self.failures_remaining -= 1;
            return Err(PayoutError::Rejected(
                self.failure_message
                    .clone()
                    .unwrap_or_else(|| "Mock failure".to_string()),
            ));
        }

        self.transfers.push((*to, amount));
        Ok(())
    }
}
