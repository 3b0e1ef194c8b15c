//! Hub routing example.
//!
//! Banks that share no payment channel can only settle through the hub.
//! This walks through the three reference cases: hub routing, direct
//! netting, and a cycle that needs no payment at all.

use cashflow_engine::prelude::*;
use rust_decimal_macros::dec;

fn run(title: &str, network: &BankNetwork, transactions: &[Transaction]) {
    println!("━━━ {} ━━━\n", title);
    match SettlementEngine::default().settle(network, transactions) {
        Ok(report) => {
            if report.is_empty() {
                println!("  No payments needed.");
            }
            for payment in report.payments() {
                println!("  {}", payment);
            }
        }
        Err(e) => println!("  settlement failed: {}", e),
    }
    println!();
}

fn main() {
    let tx = |d: &str, c: &str, amount| Transaction::new(BankId::new(d), BankId::new(c), amount);

    let split = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["Google_Pay", "PayTM"]),
        Bank::with_channels("A", ["Google_Pay"]),
        Bank::with_channels("B", ["PayTM"]),
    ])
    .expect("valid network");
    run("No shared channel: route via hub", &split, &[tx("A", "B", dec!(100))]);

    let shared = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["Google_Pay"]),
        Bank::with_channels("A", ["Google_Pay"]),
        Bank::with_channels("B", ["Google_Pay"]),
    ])
    .expect("valid network");
    run(
        "Shared channel: pay the net directly",
        &shared,
        &[tx("A", "B", dec!(50)), tx("B", "A", dec!(20))],
    );

    run(
        "Cycle: everything cancels",
        &shared,
        &[
            tx("A", "B", dec!(10)),
            tx("B", "Hub", dec!(10)),
            tx("Hub", "A", dec!(10)),
        ],
    );
}
