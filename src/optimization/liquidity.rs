use crate::core::bank::BankId;
use crate::optimization::engine::SettlementReport;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Funding needed and received per bank once the payment list executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityAnalysis {
    /// Total each bank has to pay out.
    pub outflows: BTreeMap<BankId, Decimal>,
    /// Total each bank receives.
    pub inflows: BTreeMap<BankId, Decimal>,
    /// Debt the hub forwarded for banks sharing no channel with a creditor.
    /// Direct payments to or from the hub are not included.
    pub hub_routed: Decimal,
    /// Gross value of the original transactions.
    pub gross_requirement: Decimal,
    /// Value moved by the payment list.
    pub net_requirement: Decimal,
}

impl LiquidityAnalysis {
    /// Compute liquidity requirements from a settlement report.
    pub fn from_report(report: &SettlementReport) -> Self {
        let mut outflows: BTreeMap<BankId, Decimal> = BTreeMap::new();
        let mut inflows: BTreeMap<BankId, Decimal> = BTreeMap::new();

        // Each per-bank sum is bounded by the report's settled total.
        for payment in report.payments() {
            *outflows.entry(payment.from.clone()).or_insert(Decimal::ZERO) += payment.amount;
            *inflows.entry(payment.to.clone()).or_insert(Decimal::ZERO) += payment.amount;
        }

        LiquidityAnalysis {
            outflows,
            inflows,
            hub_routed: report.hub_routed(),
            gross_requirement: report.gross_total(),
            net_requirement: report.settled_total(),
        }
    }

    /// Share of the gross value that no longer needs to move.
    pub fn savings_ratio(&self) -> f64 {
        if self.gross_requirement == Decimal::ZERO {
            return 0.0;
        }
        let ratio = (self.gross_requirement - self.net_requirement) / self.gross_requirement;
        ratio.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Amount a bank must fund, zero if it only receives.
    pub fn requirement(&self, bank: &BankId) -> Decimal {
        self.outflows.get(bank).copied().unwrap_or(Decimal::ZERO)
    }
}

impl std::fmt::Display for LiquidityAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Liquidity Analysis ===")?;
        writeln!(f, "Gross Requirement: {}", self.gross_requirement)?;
        writeln!(f, "Net Requirement:   {}", self.net_requirement)?;
        writeln!(f, "Savings Ratio:     {:.1}%", self.savings_ratio() * 100.0)?;
        writeln!(f, "Hub Routed:        {}", self.hub_routed)?;

        writeln!(f, "\nFunding Requirements:")?;
        for (bank, amount) in &self.outflows {
            writeln!(f, "  {} pays out {}", bank, amount)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bank::Bank;
    use crate::core::network::BankNetwork;
    use crate::core::transaction::Transaction;
    use crate::optimization::engine::SettlementEngine;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn network() -> BankNetwork {
        BankNetwork::new(vec![
            Bank::with_channels("Hub", ["G", "P"]),
            Bank::with_channels("A", ["G"]),
            Bank::with_channels("B", ["P"]),
            Bank::with_channels("C", ["G"]),
        ])
        .unwrap()
    }

    fn tx(debtor: &str, creditor: &str, amount: Decimal) -> Transaction {
        Transaction::new(BankId::new(debtor), BankId::new(creditor), amount)
    }

    #[test]
    fn test_liquidity_hub_routing() {
        let report = SettlementEngine::default()
            .settle(&network(), &[tx("A", "B", dec!(100))])
            .unwrap();
        let analysis = LiquidityAnalysis::from_report(&report);

        assert_eq!(analysis.hub_routed, dec!(100));
        assert_eq!(analysis.requirement(&BankId::new("A")), dec!(100));
        assert_eq!(analysis.requirement(&BankId::new("Hub")), dec!(100));
        assert_eq!(analysis.requirement(&BankId::new("B")), Decimal::ZERO);
        assert_eq!(analysis.inflows[&BankId::new("B")], dec!(100));
    }

    #[test]
    fn test_direct_hub_payment_not_counted_as_routed() {
        let network = BankNetwork::new(vec![
            Bank::with_channels("Hub", ["G"]),
            Bank::new("A", crate::core::channel::ChannelSet::new()),
        ])
        .unwrap();
        let report = SettlementEngine::default()
            .settle(&network, &[tx("A", "Hub", dec!(40))])
            .unwrap();
        let analysis = LiquidityAnalysis::from_report(&report);

        assert!(report.payments()[0].channel.is_any());
        assert_eq!(analysis.hub_routed, Decimal::ZERO);
        assert_eq!(analysis.requirement(&BankId::new("A")), dec!(40));
    }

    #[test]
    fn test_liquidity_netting_saves() {
        let report = SettlementEngine::default()
            .settle(
                &network(),
                &[tx("A", "C", dec!(100)), tx("C", "A", dec!(60))],
            )
            .unwrap();
        let analysis = LiquidityAnalysis::from_report(&report);

        assert_eq!(analysis.gross_requirement, dec!(160));
        assert_eq!(analysis.net_requirement, dec!(40));
        assert_eq!(analysis.hub_routed, Decimal::ZERO);
        assert_relative_eq!(analysis.savings_ratio(), 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_liquidity_perfect_cycle() {
        let report = SettlementEngine::default()
            .settle(
                &network(),
                &[tx("A", "C", dec!(100)), tx("C", "A", dec!(100))],
            )
            .unwrap();
        let analysis = LiquidityAnalysis::from_report(&report);

        assert_eq!(analysis.net_requirement, Decimal::ZERO);
        assert_relative_eq!(analysis.savings_ratio(), 1.0, epsilon = 1e-9);
    }
}
