use crate::core::bank::BankId;
use crate::core::channel::ChannelSet;
use crate::core::network::BankNetwork;
use crate::graph::debt_matrix::DebtMatrix;
use crate::optimization::settlement::SettlementError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The net balance of one bank.
///
/// A positive amount means the bank is owed (net creditor).
/// A negative amount means the bank owes (net debtor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPosition {
    /// Position of the bank in its network.
    pub index: usize,
    pub bank: BankId,
    pub net_amount: Decimal,
    pub channels: ChannelSet,
}

impl NetPosition {
    pub fn is_flat(&self) -> bool {
        self.net_amount.is_zero()
    }

    pub fn is_debtor(&self) -> bool {
        self.net_amount < Decimal::ZERO
    }

    pub fn is_creditor(&self) -> bool {
        self.net_amount > Decimal::ZERO
    }
}

/// Net positions of every bank in a network, in network order.
///
/// Created from a [`DebtMatrix`] and then driven to zero by the settlement
/// engine, one payment at a time. Every update moves the same amount out of
/// one position and into another, so the positions always sum to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    positions: Vec<NetPosition>,
}

impl Ledger {
    /// Reduce a debt matrix to one net position per bank:
    /// total owed to the bank minus total the bank owes.
    pub fn from_matrix(
        network: &BankNetwork,
        matrix: &DebtMatrix,
    ) -> Result<Self, SettlementError> {
        let positions = network
            .banks()
            .iter()
            .enumerate()
            .map(|(b, bank)| -> Result<NetPosition, SettlementError> {
                let net_amount = matrix
                    .incoming_total(b)
                    .zip(matrix.outgoing_total(b))
                    .and_then(|(incoming, outgoing)| incoming.checked_sub(outgoing))
                    .ok_or_else(|| {
                        SettlementError::AmountOverflow(format!("net position of {}", bank.name()))
                    })?;
                Ok(NetPosition {
                    index: b,
                    bank: bank.name().clone(),
                    net_amount,
                    channels: bank.channels().clone(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[NetPosition] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> &NetPosition {
        &self.positions[index]
    }

    pub fn net_amount(&self, index: usize) -> Decimal {
        self.positions[index].net_amount
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Record that `from` paid `to`: the payer's balance rises toward zero,
    /// the payee's falls by the same amount.
    pub fn apply_payment(
        &mut self,
        from: usize,
        to: usize,
        amount: Decimal,
    ) -> Result<(), SettlementError> {
        let paid = self.positions[from].net_amount.checked_add(amount);
        let received = self.positions[to].net_amount.checked_sub(amount);
        match (paid, received) {
            (Some(paid), Some(received)) => {
                self.positions[from].net_amount = paid;
                self.positions[to].net_amount = received;
                Ok(())
            }
            _ => Err(SettlementError::AmountOverflow(format!(
                "payment of {} from {} to {}",
                amount, self.positions[from].bank, self.positions[to].bank
            ))),
        }
    }

    /// Number of banks whose position is exactly zero.
    pub fn flat_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_flat()).count()
    }

    /// True once every position has been driven to zero.
    pub fn is_settled(&self) -> bool {
        self.flat_count() == self.positions.len()
    }

    /// Verify conservation: the sum of all positions is zero.
    /// A sum outside the decimal range counts as unbalanced.
    pub fn is_balanced(&self) -> bool {
        self.positions
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.net_amount))
            .map_or(false, |total| total.is_zero())
    }

    /// Sum of positive positions (equal to the sum of |negative| positions).
    /// This is the minimum total that has to move to settle the network.
    /// `None` if the sum leaves the decimal range.
    pub fn total_net_settlement(&self) -> Option<Decimal> {
        self.positions
            .iter()
            .map(|p| p.net_amount)
            .filter(|v| *v > Decimal::ZERO)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }
}
