// Host tests: fees, serialization of calls, error mapping

use lottery_ledger::host::{HostConfig, HostError, LotteryHost};
use lottery_ledger::identity::{Address, Keypair};
use lottery_ledger::ledger::{select_index, EntropyContext, LotteryError, SeededRandomness};
use lottery_ledger::vault::parse_units;
use std::sync::Arc;
use std::thread;

const FUNDING: u128 = 1_000_000;

fn config() -> HostConfig {
    HostConfig::new()
        .with_genesis_timestamp(1_700_000_000)
        .with_seed(7)
}

fn host() -> LotteryHost {
    LotteryHost::deploy(config(), FUNDING).unwrap()
}

// ============================================================================
// DEPLOYMENT TESTS
// ============================================================================

#[test]
fn test_deploy_starts_empty() {
    let host = host();

    assert!(host.players().unwrap().is_empty());
    assert_eq!(host.pool_balance().unwrap(), 0);
    assert_eq!(host.round().unwrap(), 0);
    assert_eq!(host.balance_of(host.manager()).unwrap(), FUNDING);
}

#[test]
fn test_deploy_as_uses_given_manager() {
    let manager = Address::from_public_key(&Keypair::generate().public_key());
    let host = LotteryHost::deploy_as(config(), manager, 5).unwrap();

    assert_eq!(host.manager(), &manager);
    assert_eq!(host.balance_of(&manager).unwrap(), 5);
}

#[test]
fn test_deploy_rejects_invalid_config() {
    let result = LotteryHost::deploy(config().with_block_interval_secs(0), FUNDING);
    assert!(matches!(result, Err(HostError::InvalidConfig(_))));
}

#[test]
fn test_each_mutating_call_mines_a_block() {
    let host = host();
    let alice = host.open_account(FUNDING).unwrap();
    let start = host.block_height().unwrap();

    host.enter(&alice, 10).unwrap();
    host.enter(&alice, 10).unwrap();
    host.players().unwrap();

    assert_eq!(host.block_height().unwrap(), start + 2);
}

// ============================================================================
// ENTER TESTS
// ============================================================================

#[test]
fn test_enter_moves_value_into_custody() {
    let host = host();
    let alice = host.open_account(FUNDING).unwrap();

    host.enter(&alice, 300).unwrap();

    assert_eq!(host.balance_of(&alice).unwrap(), FUNDING - 300);
    assert_eq!(host.pool_balance().unwrap(), 300);
    assert_eq!(host.players().unwrap(), vec![alice]);
}

#[test]
fn test_enter_zero_is_rejected() {
    let host = host();
    let alice = host.open_account(FUNDING).unwrap();

    let result = host.enter(&alice, 0);

    assert_eq!(
        result,
        Err(HostError::Lottery(LotteryError::InsufficientValue {
            minimum: 0,
            provided: 0
        }))
    );
    assert!(host.players().unwrap().is_empty());
    assert_eq!(host.pool_balance().unwrap(), 0);
    assert_eq!(host.balance_of(&alice).unwrap(), FUNDING);
}

#[test]
fn test_enter_from_unknown_account_fails() {
    let host = host();
    let ghost = Address::from_bytes([9u8; 20]);

    assert_eq!(host.enter(&ghost, 10), Err(HostError::UnknownAccount(ghost)));
}

#[test]
fn test_enter_without_funds_charges_nothing() {
    let host = LotteryHost::deploy(config().with_call_fee(5), FUNDING).unwrap();
    let alice = host.open_account(100).unwrap();

    let result = host.enter(&alice, 100);

    assert_eq!(
        result,
        Err(HostError::InsufficientFunds {
            available: 100,
            required: 105
        })
    );
    assert_eq!(host.balance_of(&alice).unwrap(), 100);
    assert!(host.players().unwrap().is_empty());
}

#[test]
fn test_enter_whose_total_cost_overflows_is_rejected() {
    let host = LotteryHost::deploy(config().with_call_fee(5), FUNDING).unwrap();
    let alice = host.open_account(u128::MAX).unwrap();
    let height = host.block_height().unwrap();

    let result = host.enter(&alice, u128::MAX - 2);

    assert_eq!(
        result,
        Err(HostError::InsufficientFunds {
            available: u128::MAX,
            required: u128::MAX
        })
    );
    assert_eq!(host.balance_of(&alice).unwrap(), u128::MAX);
    assert_eq!(host.pool_balance().unwrap(), 0);
    assert!(host.players().unwrap().is_empty());
    assert_eq!(host.block_height().unwrap(), height);
}

#[test]
fn test_pick_winner_without_fee_funds_charges_nothing() {
    let host = LotteryHost::deploy(config().with_call_fee(5), 4).unwrap();
    let manager = *host.manager();

    let result = host.pick_winner(&manager);

    assert_eq!(
        result,
        Err(HostError::InsufficientFunds {
            available: 4,
            required: 5
        })
    );
    assert_eq!(host.balance_of(&manager).unwrap(), 4);
}

// ============================================================================
// FEE TESTS
// ============================================================================

#[test]
fn test_fee_charged_on_successful_entry() {
    let host = LotteryHost::deploy(config().with_call_fee(5), FUNDING).unwrap();
    let alice = host.open_account(1_000).unwrap();

    host.enter(&alice, 100).unwrap();

    assert_eq!(host.balance_of(&alice).unwrap(), 895);
    assert_eq!(host.pool_balance().unwrap(), 100);
}

#[test]
fn test_fee_charged_on_rejected_entry() {
    let host = LotteryHost::deploy(config().with_call_fee(5).with_min_entry(50), FUNDING).unwrap();
    let alice = host.open_account(1_000).unwrap();

    assert!(host.enter(&alice, 50).is_err());

    assert_eq!(host.balance_of(&alice).unwrap(), 995);
    assert_eq!(host.pool_balance().unwrap(), 0);
}

#[test]
fn test_manager_pays_fee_for_resolution() {
    let host = LotteryHost::deploy(config().with_call_fee(5), FUNDING).unwrap();
    let manager = *host.manager();
    host.enter(&manager, 1_000).unwrap();
    let before = host.balance_of(&manager).unwrap();

    let payout = host.pick_winner(&manager).unwrap();

    assert_eq!(payout.winner(), &manager);
    assert_eq!(host.balance_of(&manager).unwrap(), before + 1_000 - 5);
}

#[test]
fn test_total_value_drops_only_by_fees() {
    let host = LotteryHost::deploy(config().with_call_fee(5), FUNDING).unwrap();
    let manager = *host.manager();
    let alice = host.open_account(1_000).unwrap();
    let bob = host.open_account(1_000).unwrap();
    let before = host.total_value().unwrap().unwrap();

    host.enter(&alice, 100).unwrap();
    host.enter(&bob, 200).unwrap();
    host.pick_winner(&manager).unwrap();

    assert_eq!(host.total_value().unwrap(), Some(before - 3 * 5));
}

#[test]
fn test_total_value_past_max_is_none() {
    let host = LotteryHost::deploy(config(), u128::MAX).unwrap();
    host.open_account(1).unwrap();

    assert_eq!(host.total_value().unwrap(), None);
}

// ============================================================================
// PICK WINNER TESTS
// ============================================================================

#[test]
fn test_non_manager_cannot_pick_winner() {
    let host = host();
    let alice = host.open_account(FUNDING).unwrap();
    host.enter(&alice, 10).unwrap();

    let result = host.pick_winner(&alice);

    assert_eq!(result, Err(HostError::Lottery(LotteryError::Unauthorized)));
    assert_eq!(host.players().unwrap(), vec![alice]);
    assert_eq!(host.pool_balance().unwrap(), 10);
}

#[test]
fn test_pick_winner_on_empty_pool_fails() {
    let host = host();
    let manager = *host.manager();

    let result = host.pick_winner(&manager);

    assert_eq!(result, Err(HostError::Lottery(LotteryError::EmptyPool)));
    assert_eq!(host.round().unwrap(), 0);
}

#[test]
fn test_value_is_conserved_across_a_round() {
    let host = host();
    let manager = *host.manager();
    let players: Vec<Address> = (0..5).map(|_| host.open_account(FUNDING).unwrap()).collect();
    for (i, player) in players.iter().enumerate() {
        host.enter(player, (i as u128 + 1) * 100).unwrap();
    }

    let external_before: u128 = players
        .iter()
        .map(|p| host.balance_of(p).unwrap())
        .sum::<u128>()
        + host.balance_of(&manager).unwrap();
    let pool = host.pool_balance().unwrap();

    let payout = host.pick_winner(&manager).unwrap();

    let external_after: u128 = players
        .iter()
        .map(|p| host.balance_of(p).unwrap())
        .sum::<u128>()
        + host.balance_of(&manager).unwrap();

    assert_eq!(payout.amount(), pool);
    assert!(players.contains(payout.winner()));
    assert_eq!(external_after, external_before + pool);
    assert_eq!(host.pool_balance().unwrap(), 0);
}

#[test]
fn test_injected_randomness_pins_winner() {
    let host = LotteryHost::deploy(config(), FUNDING)
        .unwrap()
        .with_randomness(SeededRandomness::new(1234));
    let manager = *host.manager();
    let players: Vec<Address> = (0..6).map(|_| host.open_account(FUNDING).unwrap()).collect();
    for player in &players {
        host.enter(player, 10).unwrap();
    }

    // deployment mined block 1, each entry one more; resolution lands in the next
    let height = host.block_height().unwrap() + 1;
    let timestamp = 1_700_000_000 + height * 12;
    let expected = select_index(
        &SeededRandomness::new(1234),
        &EntropyContext::new(height, timestamp, 0, &players),
    )
    .unwrap();

    let payout = host.pick_winner(&manager).unwrap();

    assert_eq!(payout.index(), expected);
    assert_eq!(payout.winner(), &players[expected]);
    assert_eq!(host.balance_of(&players[expected]).unwrap(), FUNDING - 10 + 60);
}

// ============================================================================
// CONCURRENCY TESTS
// ============================================================================

#[test]
fn test_concurrent_entries_are_all_recorded() {
    let host = Arc::new(host());
    let players: Vec<Address> = (0..8).map(|_| host.open_account(FUNDING).unwrap()).collect();

    let handles: Vec<_> = players
        .iter()
        .copied()
        .map(|player| {
            let host = Arc::clone(&host);
            thread::spawn(move || {
                for _ in 0..25 {
                    host.enter(&player, 3).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = host.players().unwrap();
    assert_eq!(entries.len(), 8 * 25);
    assert_eq!(host.pool_balance().unwrap(), 8 * 25 * 3);
    for player in &players {
        assert_eq!(entries.iter().filter(|p| *p == player).count(), 25);
        assert_eq!(host.balance_of(player).unwrap(), FUNDING - 75);
    }
}

#[test]
fn test_concurrent_entries_and_resolution_never_lose_value() {
    let host = Arc::new(host());
    let manager = *host.manager();
    let players: Vec<Address> = (0..4).map(|_| host.open_account(FUNDING).unwrap()).collect();
    let total_before = host.total_value().unwrap().unwrap();

    let entrants: Vec<_> = players
        .iter()
        .copied()
        .map(|player| {
            let host = Arc::clone(&host);
            thread::spawn(move || {
                for _ in 0..50 {
                    host.enter(&player, 1).unwrap();
                }
            })
        })
        .collect();

    let resolver = {
        let host = Arc::clone(&host);
        thread::spawn(move || {
            for _ in 0..20 {
                match host.pick_winner(&manager) {
                    Ok(_) | Err(HostError::Lottery(LotteryError::EmptyPool)) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
                thread::yield_now();
            }
        })
    };

    for handle in entrants {
        handle.join().unwrap();
    }
    resolver.join().unwrap();

    assert_eq!(host.total_value().unwrap(), Some(total_before));
    assert_eq!(
        host.pool_balance().unwrap(),
        host.players().unwrap().len() as u128
    );
}

#[tokio::test]
async fn test_async_entrants_share_one_host() {
    let host = Arc::new(
        LotteryHost::deploy(config(), parse_units("10").unwrap()).unwrap(),
    );
    let stake = parse_units("0.02").unwrap();
    let mut players = Vec::new();
    for _ in 0..10 {
        players.push(host.open_account(parse_units("1").unwrap()).unwrap());
    }

    let tasks: Vec<_> = players
        .iter()
        .copied()
        .map(|player| {
            let host = Arc::clone(&host);
            tokio::spawn(async move { host.enter(&player, stake) })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(host.players().unwrap().len(), 10);
    assert_eq!(host.pool_balance().unwrap(), stake * 10);
}
