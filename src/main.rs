use clap::Parser;
use lottery_ledger::ledger::ReceiptCodec;
use lottery_ledger::{format_units, parse_units, Amount, HostConfig, LotteryHost};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Simulate lottery rounds against an in-process host
#[derive(Parser, Debug)]
#[command(name = "lottery", version, about)]
struct Args {
    /// Number of players per round
    #[arg(long, default_value_t = 3)]
    players: usize,

    /// Amount each player enters with
    #[arg(long, default_value = "0.02", value_parser = parse_amount)]
    stake: Amount,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Entries must exceed this amount
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    min_entry: Amount,

    /// Fee charged per executed call
    #[arg(long, default_value = "0.001", value_parser = parse_amount)]
    fee: Amount,

    /// Starting balance of every account
    #[arg(long, default_value = "100", value_parser = parse_amount)]
    funding: Amount,

    /// Seed for deterministic winner selection
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    parse_units(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = HostConfig::new()
        .with_min_entry(args.min_entry)
        .with_call_fee(args.fee);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let host = Arc::new(LotteryHost::deploy(config, args.funding)?);
    let manager = *host.manager();

    let mut players = Vec::with_capacity(args.players);
    for _ in 0..args.players {
        players.push(host.open_account(args.funding)?);
    }

    for round in 0..args.rounds {
        let mut tasks = Vec::with_capacity(players.len());
        for player in players.iter().copied() {
            let host = Arc::clone(&host);
            let stake = args.stake;
            tasks.push(tokio::spawn(async move { host.enter(&player, stake) }));
        }

        for task in tasks {
            if let Err(e) = task.await? {
                error!(round, error = %e, "entry failed");
            }
        }

        info!(
            round,
            players = host.players()?.len(),
            pool = %format_units(host.pool_balance()?),
            "entries closed"
        );

        match host.pick_winner(&manager) {
            Ok(payout) => {
                let balance = host.balance_of(payout.winner())?;
                info!(
                    round = payout.round(),
                    winner = %payout.winner(),
                    prize = %format_units(payout.amount()),
                    balance = %format_units(balance),
                    receipt = %ReceiptCodec::encode_hex(&payout)?,
                    "winner paid"
                );
            }
            Err(e) => error!(round, error = %e, "round could not be resolved"),
        }
    }

    if let Some(total) = host.total_value()? {
        info!(total = %format_units(total), "value held by accounts and pool");
    }

    Ok(())
}
