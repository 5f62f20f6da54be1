// End-to-end rounds against a host with a realistic call fee

use lottery_ledger::host::{HostConfig, HostError, LotteryHost};
use lottery_ledger::identity::Address;
use lottery_ledger::ledger::LotteryError;
use lottery_ledger::vault::parse_units;

fn units(s: &str) -> u128 {
    parse_units(s).unwrap()
}

/// Manager plus `n` funded accounts, like a fresh local test chain
fn setup(n: usize) -> (LotteryHost, Vec<Address>) {
    let config = HostConfig::new().with_call_fee(units("0.001"));
    let host = LotteryHost::deploy(config, units("100")).unwrap();
    let mut accounts = vec![*host.manager()];
    for _ in 1..n {
        accounts.push(host.open_account(units("100")).unwrap());
    }
    (host, accounts)
}

#[test]
fn test_deploys_a_contract() {
    let (host, accounts) = setup(1);

    assert_eq!(host.manager(), &accounts[0]);
    assert!(host.players().unwrap().is_empty());
    assert_eq!(host.pool_balance().unwrap(), 0);
}

#[test]
fn test_allows_one_account_to_enter() {
    let (host, accounts) = setup(1);

    host.enter(&accounts[0], units("0.02")).unwrap();

    let players = host.players().unwrap();
    assert_eq!(players[0], accounts[0]);
    assert_eq!(players.len(), 1);
}

#[test]
fn test_allows_multiple_accounts_to_enter() {
    let (host, accounts) = setup(3);

    for account in &accounts {
        host.enter(account, units("0.02")).unwrap();
    }

    let players = host.players().unwrap();
    assert_eq!(players[0], accounts[0]);
    assert_eq!(players[1], accounts[1]);
    assert_eq!(players[2], accounts[2]);
    assert_eq!(players.len(), 3);
}

#[test]
fn test_requires_a_minimum_amount_to_enter() {
    let (host, accounts) = setup(1);

    let result = host.enter(&accounts[0], 0);

    assert!(matches!(
        result,
        Err(HostError::Lottery(LotteryError::InsufficientValue { .. }))
    ));
    assert!(host.players().unwrap().is_empty());
}

#[test]
fn test_only_manager_can_pick_winner() {
    let (host, accounts) = setup(2);
    host.enter(&accounts[1], units("0.02")).unwrap();

    let result = host.pick_winner(&accounts[1]);

    assert_eq!(result, Err(HostError::Lottery(LotteryError::Unauthorized)));
    assert_eq!(host.players().unwrap(), vec![accounts[1]]);
}

#[test]
fn test_sends_money_to_winner_and_resets_players() {
    let (host, accounts) = setup(1);
    host.enter(&accounts[0], units("2")).unwrap();
    let initial = host.balance_of(&accounts[0]).unwrap();

    host.pick_winner(&accounts[0]).unwrap();

    let difference = host.balance_of(&accounts[0]).unwrap() - initial;
    assert!(difference > units("1.8"));
    assert!(host.players().unwrap().is_empty());
    assert_eq!(host.pool_balance().unwrap(), 0);
}

#[test]
fn test_consecutive_rounds_are_independent() {
    let (host, accounts) = setup(4);
    let manager = accounts[0];

    let mut prizes = Vec::new();
    for round in 0..2u64 {
        for account in &accounts[1..] {
            host.enter(account, units("0.5")).unwrap();
        }
        assert_eq!(host.players().unwrap(), accounts[1..].to_vec());
        assert_eq!(host.pool_balance().unwrap(), units("1.5"));

        let payout = host.pick_winner(&manager).unwrap();

        assert_eq!(payout.round(), round);
        assert!(accounts[1..].contains(payout.winner()));
        assert!(host.players().unwrap().is_empty());
        assert_eq!(host.pool_balance().unwrap(), 0);
        prizes.push(payout.amount());
    }

    assert_eq!(prizes, vec![units("1.5"), units("1.5")]);
    assert_eq!(host.round().unwrap(), 2);
}
