//! cashflow-engine CLI
//!
//! Settle debts between banks from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a network described in a JSON file
//! cashflow-engine settle --input network.json
//!
//! # Output as JSON, failing on transactions that name unknown banks
//! cashflow-engine settle --input network.json --format json --strict
//!
//! # Generate a random network for testing
//! cashflow-engine generate --banks 10 --transactions 30
//! ```

use cashflow_engine::core::bank::{Bank, BankId};
use cashflow_engine::core::channel::ChannelId;
use cashflow_engine::core::network::BankNetwork;
use cashflow_engine::core::transaction::Transaction;
use cashflow_engine::optimization::engine::{SettlementConfig, SettlementEngine, UnresolvedPolicy};
use cashflow_engine::optimization::liquidity::LiquidityAnalysis;
use cashflow_engine::optimization::netting::Payment;
use cashflow_engine::optimization::settlement::SettlementError;
use cashflow_engine::simulation::stress_test::{generate_random_network, NetworkConfig};
use log::debug;
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"cashflow-engine: channel-aware cash flow minimization

USAGE:
    cashflow-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute the minimal payment list for a network
    generate    Generate a random network (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON network file
    --format <FORMAT>   Output format: text (default) or json
    --strict            Fail on transactions naming unknown banks

OPTIONS (generate):
    --banks <N>          Number of banks besides the hub (default: 10)
    --transactions <N>   Number of transactions (default: 30)
    --channels <LIST>    Comma-separated channel names (default: Google_Pay,PayTM,UPI)
    --output <FILE>      Write to file instead of stdout

Set RUST_LOG=debug to trace each settlement step.

EXAMPLES:
    cashflow-engine settle --input network.json
    cashflow-engine settle --input network.json --format json
    cashflow-engine generate --banks 20 --transactions 60
    cashflow-engine generate --banks 5 --channels GPay,PayTM --output test.json"#
    );
}

/// JSON schema for an input network.
#[derive(serde::Serialize, serde::Deserialize)]
struct NetworkFile {
    /// Name of the hub; the first bank when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hub: Option<String>,
    banks: Vec<Bank>,
    #[serde(default)]
    transactions: Vec<TransactionInput>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct TransactionInput {
    debtor: String,
    creditor: String,
    amount: Decimal,
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettlementOutput {
    hub: String,
    original_transactions: usize,
    minimized_payments: usize,
    transactions_saved: i64,
    savings_percent: f64,
    gross_total: String,
    net_total: String,
    settled_total: String,
    hub_routed: String,
    balanced: bool,
    unresolved: Vec<TransactionInput>,
    payments: Vec<Payment>,
}

fn load_network(path: &str) -> Result<(BankNetwork, Vec<Transaction>), SettlementError> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: NetworkFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "hub": "World_Bank",
  "banks": [
    {{ "name": "World_Bank", "channels": ["Google_Pay", "PayTM"] }},
    {{ "name": "Bank_1", "channels": ["Google_Pay"] }}
  ],
  "transactions": [
    {{ "debtor": "Bank_1", "creditor": "World_Bank", "amount": "100" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut network = BankNetwork::new(file.banks)?;
    if let Some(hub) = file.hub {
        network = network.with_hub(&BankId::new(hub))?;
    }

    let mut transactions = Vec::with_capacity(file.transactions.len());
    for tx in file.transactions {
        transactions.push(Transaction::try_new(
            BankId::new(tx.debtor),
            BankId::new(tx.creditor),
            tx.amount,
        )?);
    }
    debug!(
        "loaded {} banks and {} transactions from {}",
        network.len(),
        transactions.len(),
        path
    );
    Ok((network, transactions))
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = SettlementConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--strict" => config.unresolved = UnresolvedPolicy::Reject,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let report = load_network(&path)
        .and_then(|(network, transactions)| {
            SettlementEngine::new(config).settle(&network, &transactions)
        })
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if format == "json" {
        let output = SettlementOutput {
            hub: report.hub().to_string(),
            original_transactions: report.transaction_count(),
            minimized_payments: report.payment_count(),
            transactions_saved: report.transactions_saved(),
            savings_percent: report.savings_percent(),
            gross_total: report.gross_total().to_string(),
            net_total: report.net_total().to_string(),
            settled_total: report.settled_total().to_string(),
            hub_routed: report.hub_routed().to_string(),
            balanced: report.is_balanced(),
            unresolved: report
                .unresolved()
                .iter()
                .map(|tx| TransactionInput {
                    debtor: tx.debtor().to_string(),
                    creditor: tx.creditor().to_string(),
                    amount: tx.amount(),
                })
                .collect(),
            payments: report.payments().to_vec(),
        };

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", report);

        let liquidity = LiquidityAnalysis::from_report(&report);
        println!("{}", liquidity);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = NetworkConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--banks" => {
                i += 1;
                config.bank_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--banks requires a number");
                        process::exit(1);
                    });
            }
            "--transactions" => {
                i += 1;
                config.transaction_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--transactions requires a number");
                        process::exit(1);
                    });
            }
            "--channels" => {
                i += 1;
                let list = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--channels requires a comma-separated list");
                    process::exit(1);
                });
                config.channels = list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ChannelId::new)
                    .collect();
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (network, set) = generate_random_network(&config).unwrap_or_else(|e| {
        eprintln!("Error generating network: {}", e);
        process::exit(1);
    });

    let output = NetworkFile {
        hub: Some(network.hub().name().to_string()),
        banks: network.banks().to_vec(),
        transactions: set
            .transactions()
            .iter()
            .map(|tx| TransactionInput {
                debtor: tx.debtor().to_string(),
                creditor: tx.creditor().to_string(),
                amount: tx.amount(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing network: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} transactions across {} banks → {}",
            set.len(),
            network.len(),
            path
        );
    } else {
        println!("{}", json);
    }
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
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
