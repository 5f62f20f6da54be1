// All-or-nothing mutation of the pool state

use crate::identity::Address;
use crate::vault::Amount;
use std::ops::{Deref, DerefMut};

/// Mutable part of a lottery instance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RoundState {
    pub(crate) players: Vec<Address>,
    pub(crate) balance: Amount,
    pub(crate) round: u64,
}

/// Working copy of a [`RoundState`].
///
/// Changes land on the copy; `commit` writes them back. Dropping an
/// uncommitted transaction leaves the original untouched.
pub(crate) struct Transaction<'a> {
    target: &'a mut RoundState,
    working: RoundState,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(target: &'a mut RoundState) -> Self {
        let working = target.clone();
        Self { target, working }
    }

    pub(crate) fn commit(self) {
        *self.target = self.working;
    }
}

impl Deref for Transaction<'_> {
    type Target = RoundState;

    fn deref(&self) -> &RoundState {
        &self.working
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut RoundState {
        &mut self.working
    }
}
