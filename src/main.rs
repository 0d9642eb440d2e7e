//! debt-optimizer CLI
//!
//! Simplify a group's debts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Simplify debts from a JSON file
//! debt-optimizer simplify --input debts.json
//!
//! # Output as JSON, with a custom strategy rotation
//! debt-optimizer simplify --input debts.json --format json --config summarize.json
//!
//! # Show each party's net balance
//! debt-optimizer balances --input debts.json
//!
//! # Generate a random group for testing
//! debt-optimizer generate --parties 10 --debts 30 --seed 7
//! ```
//!
//! Set `RUST_LOG=debug` to trace the simplification pipeline.

use debt_optimizer::core::debt::{Debt, DebtSet};
use debt_optimizer::core::ledger::Ledger;
use debt_optimizer::core::party::PartyId;
use debt_optimizer::graph::debt_graph::Amount;
use debt_optimizer::optimization::config::SummarizeConfig;
use debt_optimizer::optimization::simplifier::DebtSimplifier;
use debt_optimizer::simulation::random_network::{generate_random_network, NetworkConfig};
use serde::Serialize;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"debt-optimizer — minimize the number of payments that settle a group

USAGE:
    debt-optimizer <COMMAND> [OPTIONS]

COMMANDS:
    simplify    Compute a minimal set of transfers for a debt set
    balances    Show the net balance of every party
    generate    Generate a random debt set (for testing)
    help        Show this message

OPTIONS (simplify, balances):
    --input <FILE>      Path to JSON debts file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (simplify):
    --config <FILE>     JSON strategy configuration

OPTIONS (generate):
    --parties <N>       Number of parties (default: 10)
    --debts <N>         Number of debts (default: 30)
    --max-amount <N>    Largest single amount (default: 10000)
    --seed <N>          Random seed (default: 42)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    debt-optimizer simplify --input debts.json
    debt-optimizer simplify --input debts.json --format json
    debt-optimizer balances --input debts.json
    debt-optimizer generate --parties 6 --debts 20 --output group.json"#
    );
}

/// JSON schema for one input debt.
#[derive(serde::Deserialize)]
struct DebtInput {
    from: String,
    to: String,
    amount: Amount,
}

#[derive(serde::Deserialize)]
struct DebtsFile {
    debts: Vec<DebtInput>,
}

#[derive(Serialize)]
struct BalanceOutput {
    party: String,
    balance: Amount,
    status: &'static str,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(format!("serializing output: {}", e)))
}

fn load_debts(path: &str) -> DebtSet {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));

    let file: DebtsFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "debts": [
    {{ "from": "alice", "to": "bob", "amount": 1200 }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut set = DebtSet::new();
    for (i, debt) in file.debts.into_iter().enumerate() {
        let debt = Debt::try_new(PartyId::new(debt.from), PartyId::new(debt.to), debt.amount)
            .unwrap_or_else(|e| fail(format!("debt #{}: {}", i, e)));
        set.add(debt);
    }
    set
}

/// Shared `--input` / `--format` parsing; `extra` handles command-specific
/// flags and returns whether it consumed one.
fn parse_input_args<F>(args: &[String], mut extra: F) -> (String, String)
where
    F: FnMut(&str, Option<&String>) -> bool,
{
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--input requires a file path")),
                );
            }
            "--format" => {
                i += 1;
                format = args
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| fail("--format requires 'text' or 'json'"));
            }
            other => {
                if !extra(other, args.get(i + 1)) {
                    fail(format!("unknown option: {}", other));
                }
                i += 1;
            }
        }
        i += 1;
    }

    if format != "text" && format != "json" {
        fail(format!("unknown format '{}'", format));
    }
    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    (path, format)
}

fn cmd_simplify(args: &[String]) {
    let mut config_path: Option<String> = None;
    let (path, format) = parse_input_args(args, |flag, value| match flag {
        "--config" => {
            config_path = Some(
                value
                    .cloned()
                    .unwrap_or_else(|| fail("--config requires a file path")),
            );
            true
        }
        _ => false,
    });

    let config = match config_path {
        Some(p) => SummarizeConfig::from_file(&p)
            .unwrap_or_else(|e| fail(format!("loading config '{}': {}", p, e))),
        None => SummarizeConfig::default(),
    };

    let set = load_debts(&path);
    let result = DebtSimplifier::simplify_with(&set, &config)
        .unwrap_or_else(|e| fail(format!("simplification failed: {}", e)));

    if format == "json" {
        println!("{}", to_json(&result));
    } else {
        println!("{}", result);
    }
}

fn cmd_balances(args: &[String]) {
    let (path, format) = parse_input_args(args, |_, _| false);
    let set = load_debts(&path);
    let ledger = Ledger::from_debts(set.debts());

    let balances: Vec<BalanceOutput> = ledger
        .positions()
        .iter()
        .map(|(party, &balance)| BalanceOutput {
            party: party.to_string(),
            balance,
            status: match balance {
                b if b > 0 => "CREDITOR",
                b if b < 0 => "DEBTOR",
                _ => "SETTLED",
            },
        })
        .collect();

    if format == "json" {
        println!("{}", to_json(&balances));
    } else {
        for b in &balances {
            println!("{:<16} {:>12}  {}", b.party, b.balance, b.status);
        }
        println!("\nNet settlement required: {}", ledger.total_net_settlement());
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = NetworkConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args.get(i);
        match flag {
            "--parties" => config.party_count = parse_number(flag, value),
            "--debts" => config.debt_count = parse_number(flag, value),
            "--max-amount" => config.max_amount = parse_number(flag, value),
            "--seed" => config.seed = parse_number(flag, value),
            "--output" => {
                output_path = Some(
                    value
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            _ => fail(format!("unknown option: {}", flag)),
        }
        i += 1;
    }

    let set = generate_random_network(&config);
    let json = to_json(&set);

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} debts across {} parties → {}",
            set.len(),
            config.party_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    value
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| fail(format!("{} requires a number", flag)))
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simplify" => cmd_simplify(rest),
        "balances" => cmd_balances(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
