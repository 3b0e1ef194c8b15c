use crate::core::network::BankNetwork;
use crate::core::transaction::Transaction;
use crate::optimization::settlement::SettlementError;
use log::{debug, warn};
use rust_decimal::Decimal;

/// Square matrix of accumulated debts, indexed `[debtor][creditor]` by
/// position in the [`BankNetwork`].
///
/// Built once from the raw transaction list and read-only afterwards.
/// Repeated debtor/creditor pairs accumulate. Self-referential transactions
/// land on the diagonal, where they cancel out of every net position.
///
/// # Examples
///
/// ```
/// use cashflow_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let network = BankNetwork::new(vec![
///     Bank::with_channels("Hub", ["G"]),
///     Bank::with_channels("A", ["G"]),
///     Bank::with_channels("B", ["G"]),
/// ]).unwrap();
///
/// let matrix = DebtMatrix::build(&network, &[
///     Transaction::new(BankId::new("A"), BankId::new("B"), dec!(100)),
///     Transaction::new(BankId::new("A"), BankId::new("B"), dec!(50)),
/// ]).unwrap();
///
/// assert_eq!(matrix.amount(1, 2), dec!(150));
/// assert_eq!(matrix.incoming_total(2), Some(dec!(150)));
/// ```
#[derive(Debug, Clone)]
pub struct DebtMatrix {
    size: usize,
    cells: Vec<Decimal>,
    /// Transactions naming a bank outside the network; never accumulated.
    unresolved: Vec<Transaction>,
    /// Sum of the amounts that were accumulated.
    gross_total: Decimal,
}

impl DebtMatrix {
    /// Accumulate every resolvable transaction into a new matrix.
    ///
    /// Fails with [`SettlementError::AmountOverflow`] when the accumulated
    /// gross value leaves the decimal range. Every row, column and net
    /// position is bounded by that gross value.
    pub fn build(
        network: &BankNetwork,
        transactions: &[Transaction],
    ) -> Result<Self, SettlementError> {
        let size = network.len();
        let mut cells = vec![Decimal::ZERO; size * size];
        let mut unresolved = Vec::new();
        let mut gross_total = Decimal::ZERO;

        for tx in transactions {
            match (network.index_of(tx.debtor()), network.index_of(tx.creditor())) {
                (Some(debtor), Some(creditor)) => {
                    if tx.is_self_referential() {
                        debug!("transaction {} is owed by {} to itself", tx.id(), tx.debtor());
                    }
                    gross_total = gross_total.checked_add(tx.amount()).ok_or_else(|| {
                        SettlementError::AmountOverflow(format!("gross total at {}", tx.id()))
                    })?;
                    // Bounded by the gross total checked above.
                    cells[debtor * size + creditor] += tx.amount();
                }
                _ => {
                    warn!(
                        "dropping transaction {} ({} -> {}, {}): unknown bank",
                        tx.id(),
                        tx.debtor(),
                        tx.creditor(),
                        tx.amount()
                    );
                    unresolved.push(tx.clone());
                }
            }
        }

        Ok(Self {
            size,
            cells,
            unresolved,
            gross_total,
        })
    }

    /// Number of banks (rows and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Accumulated amount `debtor` owes `creditor`.
    pub fn amount(&self, debtor: usize, creditor: usize) -> Decimal {
        self.cells[debtor * self.size + creditor]
    }

    /// Total owed to `bank` (column sum), `None` on overflow.
    pub fn incoming_total(&self, bank: usize) -> Option<Decimal> {
        (0..self.size)
            .map(|i| self.amount(i, bank))
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Total owed by `bank` (row sum), `None` on overflow.
    pub fn outgoing_total(&self, bank: usize) -> Option<Decimal> {
        (0..self.size)
            .map(|j| self.amount(bank, j))
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Transactions dropped because a party was not in the network.
    pub fn unresolved(&self) -> &[Transaction] {
        &self.unresolved
    }

    /// Gross value of the transactions that were accumulated.
    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }
}
