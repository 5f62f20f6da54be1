// Winner selection entropy
//
// Nothing here is secure randomness. Every input is public and the caller who
// triggers resolution chooses when it happens, so the outcome can be biased by
// whoever controls ordering and timing. Use for low-stakes pools only.

use crate::identity::Address;
use sha3::{Digest, Keccak256};

/// Public values available at resolution time
#[derive(Clone, Copy, Debug)]
pub struct EntropyContext<'a> {
    /// Height of the block (or sequence number) the call executes in
    pub block_height: u64,
    /// Timestamp of that block, seconds
    pub timestamp: u64,
    /// Current round of the instance
    pub round: u64,
    /// Players eligible for selection, in entry order
    pub players: &'a [Address],
}

impl<'a> EntropyContext<'a> {
    pub fn new(block_height: u64, timestamp: u64, round: u64, players: &'a [Address]) -> Self {
        Self {
            block_height,
            timestamp,
            round,
            players,
        }
    }

    fn hash_into(&self, hasher: &mut Keccak256) {
        hasher.update(self.block_height.to_be_bytes());
        hasher.update(self.timestamp.to_be_bytes());
        hasher.update(self.round.to_be_bytes());
        for player in self.players {
            hasher.update(player.as_bytes());
        }
    }
}

/// Source of the 32 bytes used to pick a winner.
///
/// Injected into resolution so tests can pin the outcome.
pub trait RandomnessSource {
    fn entropy(&self, ctx: &EntropyContext<'_>) -> [u8; 32];
}

/// Keccak-256 over the block height, timestamp, round and player list.
///
/// Reproducible by anyone who can read the context. Manipulable by design.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextRandomness;

impl RandomnessSource for ContextRandomness {
    fn entropy(&self, ctx: &EntropyContext<'_>) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        ctx.hash_into(&mut hasher);
        hasher.finalize().into()
    }
}

/// Context randomness mixed with a fixed seed, for deterministic runs
#[derive(Clone, Copy, Debug)]
pub struct SeededRandomness {
    seed: u64,
}

impl SeededRandomness {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomnessSource for SeededRandomness {
    fn entropy(&self, ctx: &EntropyContext<'_>) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(b"seeded:");
        hasher.update(self.seed.to_be_bytes());
        ctx.hash_into(&mut hasher);
        hasher.finalize().into()
    }
}

impl<R: RandomnessSource + ?Sized> RandomnessSource for &R {
    fn entropy(&self, ctx: &EntropyContext<'_>) -> [u8; 32] {
        (**self).entropy(ctx)
    }
}

impl<R: RandomnessSource + ?Sized> RandomnessSource for Box<R> {
    fn entropy(&self, ctx: &EntropyContext<'_>) -> [u8; 32] {
        (**self).entropy(ctx)
    }
}

/// Map entropy onto a player position.
///
/// Reads the first 16 bytes big-endian and reduces modulo the player count,
/// so selection is uniform over positions, not over distinct identities.
/// Returns `None` when there are no players.
pub fn select_index<R: RandomnessSource + ?Sized>(
    source: &R,
    ctx: &EntropyContext<'_>,
) -> Option<usize> {
    if ctx.players.is_empty() {
        return None;
    }

    let entropy = source.entropy(ctx);
    let mut head = [0u8; 16];
    head.copy_from_slice(&entropy[..16]);
    let value = u128::from_be_bytes(head);

    Some((value % ctx.players.len() as u128) as usize)
}
