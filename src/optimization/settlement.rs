use crate::core::bank::BankId;
use crate::core::channel::ChannelId;
use crate::core::ledger::Ledger;
use crate::core::network::{BankNetwork, NetworkError};
use crate::core::transaction::TransactionError;
use log::debug;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the settlement pipeline.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error("transaction {id} references a bank outside the network ({debtor} -> {creditor})")]
    UnresolvedReference {
        id: Uuid,
        debtor: BankId,
        creditor: BankId,
    },
    #[error("amount overflow in {0}")]
    AmountOverflow(String),
    #[error("settlement invariant violated: {0}")]
    InvariantViolation(String),
}

/// One cell of the settlement matrix: the total paid along an ordered pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementCell {
    pub amount: Decimal,
    /// Channel of the most recent payment recorded in this cell.
    pub channel: Option<ChannelId>,
}

impl SettlementCell {
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Square matrix of payments chosen by the greedy engine, indexed
/// `[payer][payee]`. A cell with a zero amount is absent.
#[derive(Debug, Clone)]
pub struct SettlementMatrix {
    size: usize,
    cells: Vec<SettlementCell>,
    /// Debt forwarded by the hub on behalf of banks with no usable channel.
    hub_routed: Decimal,
}

impl SettlementMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![SettlementCell::default(); size * size],
            hub_routed: Decimal::ZERO,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, from: usize, to: usize) -> &SettlementCell {
        &self.cells[from * self.size + to]
    }

    pub fn amount(&self, from: usize, to: usize) -> Decimal {
        self.cell(from, to).amount
    }

    /// Add a payment to the `[from][to]` cell.
    pub fn record(
        &mut self,
        from: usize,
        to: usize,
        amount: Decimal,
        channel: ChannelId,
    ) -> Result<(), SettlementError> {
        let cell = &mut self.cells[from * self.size + to];
        cell.amount = cell.amount.checked_add(amount).ok_or_else(|| {
            SettlementError::AmountOverflow(format!("settlement cell [{}][{}]", from, to))
        })?;
        cell.channel = Some(channel);
        Ok(())
    }

    /// Record a debt paid to the hub and forwarded to a creditor.
    fn record_hub_route(
        &mut self,
        debtor: usize,
        hub: usize,
        creditor: usize,
        amount: Decimal,
    ) -> Result<(), SettlementError> {
        self.record(debtor, hub, amount, ChannelId::any())?;
        self.record(hub, creditor, amount, ChannelId::any())?;
        self.hub_routed = self
            .hub_routed
            .checked_add(amount)
            .ok_or_else(|| SettlementError::AmountOverflow("hub-routed total".to_string()))?;
        Ok(())
    }

    /// Total value the hub forwarded between banks sharing no channel.
    /// Direct payments to or from the hub are not included.
    pub fn hub_routed(&self) -> Decimal {
        self.hub_routed
    }

    /// Remove and return the `[from][to]` cell, leaving it empty.
    pub fn take(&mut self, from: usize, to: usize) -> SettlementCell {
        std::mem::take(&mut self.cells[from * self.size + to])
    }

    /// Number of non-empty cells.
    pub fn payment_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

/// Index of the candidate with the greatest key.
///
/// Candidates must arrive in ascending index order; on equal keys the
/// earlier (lower) index is kept.
fn first_max_by_key<I>(candidates: I) -> Option<usize>
where
    I: Iterator<Item = (usize, Decimal)>,
{
    candidates
        .fold(None, |best: Option<(usize, Decimal)>, (index, key)| match best {
            Some((_, best_key)) if key <= best_key => best,
            _ => Some((index, key)),
        })
        .map(|(index, _)| index)
}

/// The bank with the most negative position, lowest index on ties.
pub fn select_debtor(ledger: &Ledger) -> Option<usize> {
    first_max_by_key(
        ledger
            .positions()
            .iter()
            .filter(|p| p.is_debtor())
            .map(|p| (p.index, -p.net_amount)),
    )
}

/// The largest creditor `debtor` can pay directly, with the channel to use.
///
/// Only creditors sharing a channel with the debtor are eligible; the hub
/// shares every channel. Lowest index wins on ties.
pub fn select_creditor(
    network: &BankNetwork,
    ledger: &Ledger,
    debtor: usize,
) -> Option<(usize, ChannelId)> {
    let creditor = first_max_by_key(
        ledger
            .positions()
            .iter()
            .filter(|p| p.is_creditor())
            .filter(|p| network.compatible_channel(debtor, p.index).is_some())
            .map(|p| (p.index, p.net_amount)),
    )?;
    let channel = network.compatible_channel(debtor, creditor)?;
    Some((creditor, channel))
}

/// The largest creditor overall, ignoring channels. Lowest index wins on ties.
pub fn select_largest_creditor(ledger: &Ledger) -> Option<usize> {
    first_max_by_key(
        ledger
            .positions()
            .iter()
            .filter(|p| p.is_creditor())
            .map(|p| (p.index, p.net_amount)),
    )
}

/// Drive every net position to zero and record the payments that do it.
///
/// Each round pairs the largest debtor with the largest creditor it can pay
/// directly and moves `min(|debt|, credit)`. When no creditor shares a channel
/// with the debtor, the whole debt is paid to the hub, which pays the same
/// amount on to the largest creditor; both legs use the wildcard channel.
///
/// Every round zeroes at least one position without reopening another, so
/// the loop ends after at most `n - 1` rounds.
pub fn settle_positions(
    network: &BankNetwork,
    mut ledger: Ledger,
) -> Result<SettlementMatrix, SettlementError> {
    if !ledger.is_balanced() {
        return Err(SettlementError::InvariantViolation(
            "net positions do not sum to zero".to_string(),
        ));
    }

    let hub = network.hub_index();
    let mut matrix = SettlementMatrix::new(network.len());
    let mut rounds = 0;

    while !ledger.is_settled() {
        rounds += 1;
        if rounds > network.len() {
            return Err(SettlementError::InvariantViolation(format!(
                "no convergence after {} rounds",
                network.len()
            )));
        }

        let debtor = select_debtor(&ledger).ok_or_else(|| {
            SettlementError::InvariantViolation(
                "open positions remain but none of them is a debtor".to_string(),
            )
        })?;
        let owed = -ledger.net_amount(debtor);

        match select_creditor(network, &ledger, debtor) {
            Some((creditor, channel)) => {
                let amount = owed.min(ledger.net_amount(creditor));
                debug!(
                    "{} pays {} {} via {}",
                    network.bank(debtor).name(),
                    network.bank(creditor).name(),
                    amount,
                    channel
                );
                ledger.apply_payment(debtor, creditor, amount)?;
                matrix.record(debtor, creditor, amount, channel)?;
            }
            None => {
                let creditor = select_largest_creditor(&ledger).ok_or_else(|| {
                    SettlementError::InvariantViolation(format!(
                        "{} owes {} but nobody is owed anything",
                        network.bank(debtor).name(),
                        owed
                    ))
                })?;
                if creditor == hub || debtor == hub {
                    return Err(SettlementError::InvariantViolation(
                        "hub cannot route a payment to or from itself".to_string(),
                    ));
                }
                debug!(
                    "{} pays {} {} via hub {}",
                    network.bank(debtor).name(),
                    network.bank(creditor).name(),
                    owed,
                    network.hub().name()
                );
                ledger.apply_payment(debtor, hub, owed)?;
                ledger.apply_payment(hub, creditor, owed)?;
                matrix.record_hub_route(debtor, hub, creditor, owed)?;
            }
        }
    }

    debug!("settled {} banks in {} rounds", network.len(), rounds);
    Ok(matrix)
}
