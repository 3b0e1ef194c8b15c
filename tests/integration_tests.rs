use cashflow_engine::core::bank::{Bank, BankId};
use cashflow_engine::core::channel::ChannelId;
use cashflow_engine::core::network::BankNetwork;
use cashflow_engine::core::transaction::Transaction;
use cashflow_engine::optimization::engine::{SettlementEngine, SettlementReport};
use cashflow_engine::optimization::liquidity::LiquidityAnalysis;
use cashflow_engine::optimization::netting::Payment;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn tx(debtor: &str, creditor: &str, amount: Decimal) -> Transaction {
    Transaction::new(BankId::new(debtor), BankId::new(creditor), amount)
}

fn payment(from: &str, to: &str, amount: Decimal, channel: &str) -> Payment {
    Payment {
        from: BankId::new(from),
        to: BankId::new(to),
        amount,
        channel: ChannelId::new(channel),
    }
}

fn settle(network: &BankNetwork, transactions: &[Transaction]) -> SettlementReport {
    SettlementEngine::default()
        .settle(network, transactions)
        .unwrap()
}

/// Two banks without a common channel settle through the hub.
#[test]
fn scenario_a_routes_through_hub() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G", "P"]),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["P"]),
    ])
    .unwrap();

    let report = settle(&network, &[tx("A", "B", dec!(100))]);

    assert_eq!(
        report.payments(),
        &[
            payment("A", "Hub", dec!(100), "any"),
            payment("Hub", "B", dec!(100), "any"),
        ][..]
    );
    assert!(report.is_balanced());
}

/// Opposing debts on a shared channel net to one direct payment.
#[test]
fn scenario_b_direct_net_payment() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", Vec::<&str>::new()),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["G"]),
    ])
    .unwrap();

    let report = settle(&network, &[tx("A", "B", dec!(50)), tx("B", "A", dec!(20))]);

    assert_eq!(report.payments(), &[payment("A", "B", dec!(30), "G")][..]);
}

/// A closed cycle of equal debts needs no payment at all.
#[test]
fn scenario_c_cycle_is_empty() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G"]),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["P"]),
        Bank::with_channels("C", ["Z"]),
    ])
    .unwrap();

    let report = settle(
        &network,
        &[tx("A", "B", dec!(10)), tx("B", "C", dec!(10)), tx("C", "A", dec!(10))],
    );

    assert!(report.is_empty());
    assert!(report.positions().iter().all(|p| p.is_flat()));
}

#[test]
fn no_transactions_is_empty() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G"]),
        Bank::with_channels("A", ["G"]),
    ])
    .unwrap();

    let report = settle(&network, &[]);
    assert!(report.is_empty());
    assert_eq!(report.savings_percent(), 0.0);
}

/// Zero-amount and self-referential transactions change nothing.
#[test]
fn zero_and_self_transactions_are_inert() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G"]),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["G"]),
    ])
    .unwrap();

    let report = settle(
        &network,
        &[tx("A", "B", Decimal::ZERO), tx("B", "B", dec!(999))],
    );
    assert!(report.is_empty());
}

/// A transaction naming an unknown bank is left out of every net position.
#[test]
fn unknown_bank_is_excluded() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G"]),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["G"]),
    ])
    .unwrap();

    let report = settle(
        &network,
        &[tx("A", "Nowhere", dec!(500)), tx("A", "B", dec!(10))],
    );

    assert_eq!(report.unresolved().len(), 1);
    assert_eq!(report.unresolved()[0].creditor(), &BankId::new("Nowhere"));
    assert_eq!(report.net_position(&BankId::new("A")), Some(dec!(-10)));
    assert_eq!(report.net_position(&BankId::new("B")), Some(dec!(10)));
    assert_eq!(report.gross_total(), dec!(10));
    assert_eq!(report.payments(), &[payment("A", "B", dec!(10), "G")][..]);
}

/// Debtors prefer the largest compatible creditor and fall back to the hub.
#[test]
fn mixed_direct_and_hub_routing() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("World_Bank", ["Google_Pay", "PayTM"]),
        Bank::with_channels("Bank_1", ["Google_Pay"]),
        Bank::with_channels("Bank_2", ["Google_Pay"]),
        Bank::with_channels("Bank_3", ["PayTM"]),
    ])
    .unwrap();

    // Nets: Bank_1 -100, Bank_2 +40, Bank_3 +60.
    let report = settle(
        &network,
        &[tx("Bank_1", "Bank_2", dec!(40)), tx("Bank_1", "Bank_3", dec!(60))],
    );

    // Bank_1 pays Bank_2 directly, then the rest goes through the hub to Bank_3.
    assert_eq!(
        report.payments(),
        &[
            payment("Bank_1", "World_Bank", dec!(60), "any"),
            payment("World_Bank", "Bank_3", dec!(60), "any"),
            payment("Bank_1", "Bank_2", dec!(40), "Google_Pay"),
        ][..]
    );
    assert!(report.is_balanced());

    let liquidity = LiquidityAnalysis::from_report(&report);
    assert_eq!(liquidity.hub_routed, dec!(60));
    assert_eq!(liquidity.requirement(&BankId::new("Bank_1")), dec!(100));
}

/// Hub routing can overshoot a creditor, which then settles in a later round.
#[test]
fn hub_leg_larger_than_creditor_balance() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G", "P"]),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["P"]),
        Bank::with_channels("C", ["P"]),
    ])
    .unwrap();

    // Nets: A -100, B +60, C +40.
    let report = settle(
        &network,
        &[tx("A", "B", dec!(60)), tx("A", "C", dec!(40))],
    );

    // Round 1: A -> Hub -> B 100 (B goes to -40). Round 2: B pays C 40 over P.
    assert_eq!(
        report.payments(),
        &[
            payment("A", "Hub", dec!(100), "any"),
            payment("Hub", "B", dec!(100), "any"),
            payment("B", "C", dec!(40), "P"),
        ][..]
    );
    assert!(report.is_balanced());
}

#[test]
fn report_serializes() {
    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G"]),
        Bank::with_channels("A", ["G"]),
    ])
    .unwrap();
    let report = settle(&network, &[tx("A", "Hub", dec!(12.50))]);

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["hub"], "Hub");
    assert_eq!(parsed["payments"][0]["from"], "A");
    assert_eq!(parsed["payments"][0]["amount"], "12.50");
    assert_eq!(parsed["payments"][0]["channel"], "G");
}

/// Amounts that each fit but overflow together are reported, not a panic.
#[test]
fn accumulated_overflow_is_an_error() {
    use cashflow_engine::optimization::settlement::SettlementError;

    let network = BankNetwork::new(vec![
        Bank::with_channels("Hub", ["G"]),
        Bank::with_channels("A", ["G"]),
        Bank::with_channels("B", ["G"]),
    ])
    .unwrap();
    let transactions: Vec<Transaction> = (0..2)
        .map(|_| Transaction::try_new(BankId::new("A"), BankId::new("B"), Decimal::MAX).unwrap())
        .collect();

    let err = SettlementEngine::default()
        .settle(&network, &transactions)
        .unwrap_err();
    assert!(matches!(err, SettlementError::AmountOverflow(_)));
    assert!(err.to_string().contains("overflow"));
}
