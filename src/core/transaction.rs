use crate::core::bank::BankId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when constructing a transaction.
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error("transaction amount must be non-negative, got {amount} ({debtor} -> {creditor})")]
    NegativeAmount {
        debtor: BankId,
        creditor: BankId,
        amount: Decimal,
    },
}

/// A raw debt between two banks: `debtor` owes `creditor` an `amount`.
///
/// Transactions are the input of the settlement pipeline and are never
/// mutated by it. Zero amounts and self-referential transactions are
/// accepted; both contribute nothing to any net position.
///
/// # Examples
///
/// ```
/// use cashflow_engine::core::bank::BankId;
/// use cashflow_engine::core::transaction::Transaction;
/// use rust_decimal_macros::dec;
///
/// let tx = Transaction::new(BankId::new("A"), BankId::new("B"), dec!(100));
/// assert_eq!(tx.amount(), dec!(100));
///
/// let bad = Transaction::try_new(BankId::new("A"), BankId::new("B"), dec!(-1));
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, used to report transactions the engine could not resolve.
    id: Uuid,
    debtor: BankId,
    creditor: BankId,
    amount: Decimal,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative. Use [`Transaction::try_new`] for
    /// untrusted input.
    pub fn new(debtor: BankId, creditor: BankId, amount: Decimal) -> Self {
        assert!(
            amount >= Decimal::ZERO,
            "Transaction amount must be non-negative, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            debtor,
            creditor,
            amount,
        }
    }

    /// Create a transaction, rejecting negative amounts.
    pub fn try_new(
        debtor: BankId,
        creditor: BankId,
        amount: Decimal,
    ) -> Result<Self, TransactionError> {
        if amount < Decimal::ZERO {
            return Err(TransactionError::NegativeAmount {
                debtor,
                creditor,
                amount,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            debtor,
            creditor,
            amount,
        })
    }

    /// Replace the generated identifier (useful for testing / determinism).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn debtor(&self) -> &BankId {
        &self.debtor
    }

    pub fn creditor(&self) -> &BankId {
        &self.creditor
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_self_referential(&self) -> bool {
        self.debtor == self.creditor
    }
}

/// An ordered collection of transactions submitted for settlement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Total gross value of all transactions.
    pub fn gross_total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount()).sum()
    }
}

impl FromIterator<Transaction> for TransactionSet {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        Self {
            transactions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_creation() {
        let tx = Transaction::new(BankId::new("A"), BankId::new("B"), dec!(1000));
        assert_eq!(tx.debtor().as_str(), "A");
        assert_eq!(tx.creditor().as_str(), "B");
        assert_eq!(tx.amount(), dec!(1000));
        assert!(!tx.is_self_referential());
    }

    #[test]
    fn test_zero_amount_accepted() {
        let tx = Transaction::new(BankId::new("A"), BankId::new("B"), Decimal::ZERO);
        assert_eq!(tx.amount(), Decimal::ZERO);
    }

    #[test]
    #[should_panic(expected = "must be non-negative")]
    fn test_negative_amount_panics() {
        Transaction::new(BankId::new("A"), BankId::new("B"), dec!(-100));
    }

    #[test]
    fn test_try_new_rejects_negative() {
        let err = Transaction::try_new(BankId::new("A"), BankId::new("B"), dec!(-5)).unwrap_err();
        assert!(matches!(err, TransactionError::NegativeAmount { .. }));
    }

    #[test]
    fn test_with_id() {
        let id = Uuid::nil();
        let tx = Transaction::new(BankId::new("A"), BankId::new("A"), dec!(1)).with_id(id);
        assert_eq!(tx.id(), id);
        assert!(tx.is_self_referential());
    }

    #[test]
    fn test_transaction_set_gross() {
        let set: TransactionSet = vec![
            Transaction::new(BankId::new("A"), BankId::new("B"), dec!(100)),
            Transaction::new(BankId::new("B"), BankId::new("C"), dec!(200)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.gross_total(), dec!(300));
        assert_eq!(set.len(), 2);
    }
}
