//! Basic settlement example.
//!
//! Five banks sharing a mix of payment channels settle a web of debts
//! with as few payments as the channel constraints allow.

use cashflow_engine::core::bank::{Bank, BankId};
use cashflow_engine::core::network::BankNetwork;
use cashflow_engine::core::transaction::Transaction;
use cashflow_engine::optimization::engine::SettlementEngine;
use cashflow_engine::optimization::liquidity::LiquidityAnalysis;
use rust_decimal_macros::dec;

fn main() {
    println!("╔═══════════════════════════════════════════╗");
    println!("║  cashflow-engine: Basic Settlement Example ║");
    println!("╚═══════════════════════════════════════════╝\n");

    let network = BankNetwork::new(vec![
        Bank::with_channels("World_Bank", ["Google_Pay", "PayTM", "UPI"]),
        Bank::with_channels("Bank_B", ["Google_Pay", "UPI"]),
        Bank::with_channels("Bank_C", ["Google_Pay"]),
        Bank::with_channels("Bank_D", ["UPI", "PayTM"]),
        Bank::with_channels("Bank_E", ["PayTM"]),
    ])
    .expect("valid network");

    let b = BankId::new("Bank_B");
    let c = BankId::new("Bank_C");
    let d = BankId::new("Bank_D");
    let e = BankId::new("Bank_E");
    let hub = BankId::new("World_Bank");

    let transactions = vec![
        Transaction::new(b.clone(), hub.clone(), dec!(300)),
        Transaction::new(b.clone(), c.clone(), dec!(700)),
        Transaction::new(c.clone(), d.clone(), dec!(500)),
        Transaction::new(d.clone(), e.clone(), dec!(400)),
        Transaction::new(e.clone(), b.clone(), dec!(200)),
        Transaction::new(hub.clone(), d.clone(), dec!(100)),
        Transaction::new(c.clone(), e.clone(), dec!(150)),
    ];

    let report = SettlementEngine::default()
        .settle(&network, &transactions)
        .expect("settlement succeeds");

    println!("━━━ Net Positions ━━━\n");
    for position in report.positions() {
        let status = if position.is_creditor() {
            "CREDITOR"
        } else if position.is_debtor() {
            "DEBTOR"
        } else {
            "FLAT"
        };
        println!(
            "  {:<12} {:>8}  {:<24} [{}]",
            position.bank,
            position.net_amount,
            position.channels.to_string(),
            status
        );
    }
    println!();

    println!("{}", report);
    println!("{}", LiquidityAnalysis::from_report(&report));
}
