use crate::core::bank::BankId;
use crate::core::ledger::{Ledger, NetPosition};
use crate::core::network::BankNetwork;
use crate::core::transaction::Transaction;
use crate::graph::debt_matrix::DebtMatrix;
use crate::optimization::netting::{net_payments, Payment};
use crate::optimization::settlement::{settle_positions, SettlementError};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a transaction naming a bank outside the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Leave it out of the settlement and list it in the report.
    #[default]
    Ignore,
    /// Fail the whole run.
    Reject,
}

/// Settlement run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementConfig {
    #[serde(default)]
    pub unresolved: UnresolvedPolicy,
}

/// Outcome of a settlement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    hub: BankId,
    /// Final payment instructions, in pair order.
    payments: Vec<Payment>,
    /// Net positions before settlement, in network order.
    positions: Vec<NetPosition>,
    /// Transactions left out because a party was unknown.
    unresolved: Vec<Transaction>,
    /// Number of transactions submitted.
    transaction_count: usize,
    /// Gross value of the transactions that were settled.
    gross_total: Decimal,
    /// Sum of the creditor positions: the least value any settlement moves.
    net_total: Decimal,
    /// Value moved by the payment instructions.
    settled_total: Decimal,
    /// Value the hub forwarded for banks that share no channel.
    hub_routed: Decimal,
}

impl SettlementReport {
    pub fn hub(&self) -> &BankId {
        &self.hub
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn positions(&self) -> &[NetPosition] {
        &self.positions
    }

    pub fn unresolved(&self) -> &[Transaction] {
        &self.unresolved
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    /// True when nobody owed anything and no payment is needed.
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }

    pub fn net_total(&self) -> Decimal {
        self.net_total
    }

    /// Total value moved by the payment instructions.
    pub fn settled_total(&self) -> Decimal {
        self.settled_total
    }

    pub fn hub_routed(&self) -> Decimal {
        self.hub_routed
    }

    /// Submitted transactions minus payments. Negative when hub routing
    /// needed more legs than there were transactions.
    pub fn transactions_saved(&self) -> i64 {
        self.transaction_count as i64 - self.payments.len() as i64
    }

    /// Transactions saved as a percentage of transactions submitted.
    pub fn savings_percent(&self) -> f64 {
        if self.transaction_count == 0 {
            return 0.0;
        }
        self.transactions_saved() as f64 * 100.0 / self.transaction_count as f64
    }

    /// Net position a bank started with, by name.
    pub fn net_position(&self, bank: &BankId) -> Option<Decimal> {
        self.positions
            .iter()
            .find(|p| &p.bank == bank)
            .map(|p| p.net_amount)
    }

    /// Replay the payments against the starting positions and confirm
    /// every bank ends flat.
    pub fn is_balanced(&self) -> bool {
        let mut balances: HashMap<&BankId, Decimal> = self
            .positions
            .iter()
            .map(|p| (&p.bank, p.net_amount))
            .collect();
        for payment in &self.payments {
            let from = balances.entry(&payment.from).or_insert(Decimal::ZERO);
            match from.checked_add(payment.amount) {
                Some(v) => *from = v,
                None => return false,
            }
            let to = balances.entry(&payment.to).or_insert(Decimal::ZERO);
            match to.checked_sub(payment.amount) {
                Some(v) => *to = v,
                None => return false,
            }
        }
        balances.values().all(|v| v.is_zero())
    }
}

impl std::fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Result ===")?;
        writeln!(f, "Hub:                   {}", self.hub)?;
        writeln!(f, "Original Transactions: {}", self.transaction_count)?;
        writeln!(f, "Minimized Payments:    {}", self.payments.len())?;
        writeln!(
            f,
            "Transactions Saved:    {} ({:.1}%)",
            self.transactions_saved(),
            self.savings_percent()
        )?;
        writeln!(f, "Gross Total:           {}", self.gross_total)?;
        writeln!(f, "Net Total:             {}", self.net_total)?;
        writeln!(f, "Settled Total:         {}", self.settled_total)?;
        writeln!(f, "Hub Routed:            {}", self.hub_routed)?;
        writeln!(f, "Balanced:              {}", self.is_balanced())?;

        if !self.unresolved.is_empty() {
            writeln!(f, "\nUnresolved transactions (ignored):")?;
            for tx in &self.unresolved {
                writeln!(f, "  {} -> {}: {}", tx.debtor(), tx.creditor(), tx.amount())?;
            }
        }

        writeln!(f, "\n--- Payments ---")?;
        if self.payments.is_empty() {
            writeln!(f, "  No payments needed: all banks are already balanced.")?;
        }
        for payment in &self.payments {
            writeln!(f, "  {}", payment)?;
        }
        Ok(())
    }
}

/// Runs the full settlement pipeline.
///
/// # Examples
///
/// ```
/// use cashflow_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let network = BankNetwork::new(vec![
///     Bank::with_channels("Hub", ["G", "P"]),
///     Bank::with_channels("A", ["G"]),
///     Bank::with_channels("B", ["G"]),
/// ]).unwrap();
///
/// let report = SettlementEngine::default()
///     .settle(&network, &[
///         Transaction::new(BankId::new("A"), BankId::new("B"), dec!(50)),
///         Transaction::new(BankId::new("B"), BankId::new("A"), dec!(20)),
///     ])
///     .unwrap();
///
/// assert_eq!(report.payment_count(), 1);
/// assert_eq!(report.payments()[0].amount, dec!(30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: SettlementConfig,
}

impl SettlementEngine {
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Settle `transactions` among the banks of `network`.
    ///
    /// # Pipeline
    ///
    /// 1. Accumulate transactions into a debt matrix.
    /// 2. Reduce the matrix to one net position per bank.
    /// 3. Greedily pair debtors with channel-compatible creditors, routing
    ///    through the hub when none exists.
    /// 4. Net opposing payments between each pair of banks.
    pub fn settle(
        &self,
        network: &BankNetwork,
        transactions: &[Transaction],
    ) -> Result<SettlementReport, SettlementError> {
        let matrix = DebtMatrix::build(network, transactions)?;

        if self.config.unresolved == UnresolvedPolicy::Reject {
            if let Some(tx) = matrix.unresolved().first() {
                return Err(SettlementError::UnresolvedReference {
                    id: tx.id(),
                    debtor: tx.debtor().clone(),
                    creditor: tx.creditor().clone(),
                });
            }
        }

        let ledger = Ledger::from_matrix(network, &matrix)?;
        let net_total = ledger
            .total_net_settlement()
            .ok_or_else(|| SettlementError::AmountOverflow("net settlement total".to_string()))?;
        let positions = ledger.positions().to_vec();
        let settlement = settle_positions(network, ledger)?;
        let hub_routed = settlement.hub_routed();
        let payments = net_payments(network, settlement);
        let settled_total = payments
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.amount))
            .ok_or_else(|| SettlementError::AmountOverflow("settled total".to_string()))?;

        info!(
            "settled {} transactions among {} banks into {} payments moving {} (net {}, {} unresolved)",
            transactions.len(),
            network.len(),
            payments.len(),
            settled_total,
            net_total,
            matrix.unresolved().len()
        );

        Ok(SettlementReport {
            hub: network.hub().name().clone(),
            payments,
            positions,
            unresolved: matrix.unresolved().to_vec(),
            transaction_count: transactions.len(),
            gross_total: matrix.gross_total(),
            net_total,
            settled_total,
            hub_routed,
        })
    }
}
