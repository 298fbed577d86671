// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Node
//!
//! Entry point for the `ledger-node` binary. Parses CLI arguments,
//! initializes logging, and runs one subcommand against a snapshot file.
//!
//! - `genesis`: create a ledger and write its snapshot
//! - `apply`  : replay a JSON-lines file of submissions
//! - `query`  : read balances, allowances, owner, or the event log
//! - `version`: print build version information
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod cli;
mod logging;
mod metrics;
mod ops;
mod state;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde_json::json;
use std::fs::File;
use std::io::BufReader;

use ledger_contracts::{SharedLedger, TokenLedger};
use ledger_protocol::amount::{format_units, parse_units};
use ledger_protocol::config::{DEFAULT_MAX_SUPPLY, PROTOCOL_VERSION, TOKEN_DECIMALS};
use ledger_protocol::Amount;

use cli::{Commands, LedgerNodeCli, Query};
use metrics::LedgerMetrics;

fn main() -> Result<()> {
    let cli = LedgerNodeCli::parse();
    logging::try_init_logging(cli.log_format).context("failed to initialize logging")?;

    match cli.command {
        Commands::Genesis(args) => genesis(args),
        Commands::Apply(args) => apply(args),
        Commands::Query(args) => query(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Creates a ledger and writes its first snapshot.
fn genesis(args: cli::GenesisArgs) -> Result<()> {
    let supply = parse_amount(&args.supply, args.raw).context("invalid --supply")?;
    let max_supply = match &args.max_supply {
        Some(s) => parse_amount(s, args.raw).context("invalid --max-supply")?,
        None => DEFAULT_MAX_SUPPLY,
    };

    let ledger =
        TokenLedger::with_max_supply(args.creator, &args.name, &args.symbol, supply, max_supply)
            .context("failed to construct ledger")?;
    state::create(&args.state, &ledger, args.force)?;

    tracing::info!(
        state = %args.state.display(),
        name = ledger.name(),
        symbol = ledger.symbol(),
        owner = %ledger.owner(),
        total_supply = %ledger.total_supply(),
        "genesis written"
    );
    println!("{}", info_json(&ledger));
    Ok(())
}

/// Replays a submissions file against a snapshot.
fn apply(args: cli::ApplyArgs) -> Result<()> {
    let started_at = Utc::now();
    let ledger = state::load(&args.state)?;

    let file = File::open(&args.ops)
        .with_context(|| format!("failed to open ops file {}", args.ops.display()))?;
    let submissions = ops::parse_submissions(BufReader::new(file))?;

    let metrics = if args.metrics {
        Some(LedgerMetrics::new().context("failed to create metrics registry")?)
    } else {
        None
    };

    let shared = SharedLedger::new(ledger);
    let summary = ops::replay(&shared, &submissions, metrics.as_ref());
    for outcome in &summary.outcomes {
        println!(
            "{}",
            serde_json::to_string(outcome).context("failed to encode outcome")?
        );
    }

    let ledger = shared.snapshot();
    ledger
        .check_invariants()
        .context("ledger invariants violated after replay")?;

    if args.dry_run {
        tracing::info!("dry run, snapshot left unchanged");
    } else {
        state::save(&args.state, &ledger)?;
    }

    let finished_at = Utc::now();
    tracing::info!(
        submissions = submissions.len(),
        applied = summary.applied,
        rejected = summary.rejected,
        total_supply = %ledger.total_supply(),
        holders = ledger.holder_count(),
        started_at = %started_at.to_rfc3339(),
        elapsed_ms = (finished_at - started_at).num_milliseconds(),
        state_digest = %hex::encode(ledger.state_digest()),
        "replay finished"
    );

    if let Some(m) = metrics {
        eprint!("{}", m.encode().context("failed to encode metrics")?);
    }
    Ok(())
}

/// Answers a read-only query against a snapshot.
fn query(args: cli::QueryArgs) -> Result<()> {
    let ledger = state::load(&args.state)?;

    let out = match args.query {
        Query::Info => info_json(&ledger),
        Query::Balance { address } => {
            let balance = ledger.balance_of(&address);
            json!({
                "address": address,
                "balance": balance.to_string(),
                "formatted": format_units(balance, ledger.decimals()),
            })
        }
        Query::Allowance { owner, spender } => {
            let allowance = ledger.allowance(&owner, &spender);
            json!({
                "owner": owner,
                "spender": spender,
                "allowance": allowance.to_string(),
                "formatted": format_units(allowance, ledger.decimals()),
            })
        }
        Query::Owner => json!({ "owner": ledger.owner() }),
        Query::Events => json!({ "events": ledger.events() }),
    };
    println!("{}", out);
    Ok(())
}

fn info_json(ledger: &TokenLedger) -> serde_json::Value {
    json!({
        "name": ledger.name(),
        "symbol": ledger.symbol(),
        "decimals": ledger.decimals(),
        "total_supply": ledger.total_supply().to_string(),
        "max_supply": ledger.max_supply().to_string(),
        "owner": ledger.owner(),
        "holders": ledger.holder_count(),
        "events": ledger.events().len(),
        "state_digest": hex::encode(ledger.state_digest()),
    })
}

/// Parses a CLI amount: whole tokens by default, base units with `--raw`.
fn parse_amount(input: &str, raw: bool) -> Result<Amount> {
    if raw {
        input
            .trim()
            .parse::<Amount>()
            .with_context(|| format!("'{}' is not a base-unit amount", input))
    } else {
        Ok(parse_units(input, TOKEN_DECIMALS)?)
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("ledger-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol    {}", PROTOCOL_VERSION);
    println!("rustc       {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_protocol::config::BASE_UNITS_PER_TOKEN;
    use ledger_protocol::Address;

    #[test]
    fn amounts_scale_unless_raw() {
        assert_eq!(parse_amount("2", false).unwrap(), 2 * BASE_UNITS_PER_TOKEN);
        assert_eq!(parse_amount("2", true).unwrap(), 2);
        assert!(parse_amount("1.5", true).is_err());
        assert!(parse_amount("abc", false).is_err());
    }

    #[test]
    fn genesis_then_apply_flow() {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("ledger.json");
        let ops_path = dir.path().join("ops.jsonl");
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");

        genesis(cli::GenesisArgs {
            name: "Token".into(),
            symbol: "TKN".into(),
            supply: "100".into(),
            max_supply: None,
            raw: true,
            creator: alice,
            state: state_path.clone(),
            force: false,
        })
        .unwrap();

        std::fs::write(
            &ops_path,
            format!(
                "{}\n{}\n",
                json!({"caller": alice, "op": "transfer", "to": bob, "amount": "10"}),
                json!({"caller": bob, "op": "mint", "to": bob, "amount": "1"}),
            ),
        )
        .unwrap();

        apply(cli::ApplyArgs {
            state: state_path.clone(),
            ops: ops_path.clone(),
            dry_run: true,
            metrics: false,
        })
        .unwrap();
        assert_eq!(state::load(&state_path).unwrap().balance_of(&bob), 0);

        apply(cli::ApplyArgs {
            state: state_path.clone(),
            ops: ops_path,
            dry_run: false,
            metrics: true,
        })
        .unwrap();
        let ledger = state::load(&state_path).unwrap();
        assert_eq!(ledger.balance_of(&alice), 90);
        assert_eq!(ledger.balance_of(&bob), 10);
        assert_eq!(ledger.total_supply(), 100);
    }
}
