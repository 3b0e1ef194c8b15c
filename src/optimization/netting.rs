use crate::core::bank::BankId;
use crate::core::channel::ChannelId;
use crate::core::network::BankNetwork;
use crate::optimization::settlement::{SettlementCell, SettlementMatrix};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A final payment instruction: `from` pays `to` an `amount` over `channel`.
///
/// `channel` is a channel both parties support, or the wildcard `any` for
/// legs routed through the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub from: BankId,
    pub to: BankId,
    pub amount: Decimal,
    pub channel: ChannelId,
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} to {} via {}",
            self.from, self.amount, self.to, self.channel
        )
    }
}

/// Collapse opposing cells of the settlement matrix into single payments.
///
/// Each unordered pair `(i, j)` with `i < j` is visited once, in ascending
/// order of `i` then `j`:
///
/// - equal amounts in both directions cancel and nothing is emitted;
/// - unequal amounts emit the difference in the direction, and with the
///   channel, of the larger cell;
/// - a single non-empty direction is emitted unchanged.
///
/// Both cells of a pair are cleared once handled.
///
/// # Examples
///
/// ```
/// use cashflow_engine::prelude::*;
/// use cashflow_engine::optimization::netting::net_payments;
/// use rust_decimal_macros::dec;
///
/// let network = BankNetwork::new(vec![
///     Bank::with_channels("Hub", ["G"]),
///     Bank::with_channels("A", ["G"]),
/// ]).unwrap();
///
/// let mut matrix = SettlementMatrix::new(2);
/// matrix.record(1, 0, dec!(80), ChannelId::new("G")).unwrap();
/// matrix.record(0, 1, dec!(30), ChannelId::any()).unwrap();
///
/// let payments = net_payments(&network, matrix);
/// assert_eq!(payments.len(), 1);
/// assert_eq!(payments[0].amount, dec!(50));
/// assert_eq!(payments[0].channel, ChannelId::new("G"));
/// ```
pub fn net_payments(network: &BankNetwork, mut matrix: SettlementMatrix) -> Vec<Payment> {
    let mut payments = Vec::new();
    let size = matrix.size();

    for i in 0..size {
        for j in (i + 1)..size {
            let forward = matrix.take(i, j);
            let backward = matrix.take(j, i);

            let netted = match (forward.is_empty(), backward.is_empty()) {
                (true, true) => None,
                (false, true) => Some((i, j, forward)),
                (true, false) => Some((j, i, backward)),
                (false, false) => {
                    if forward.amount > backward.amount {
                        Some((i, j, excess(forward, backward.amount)))
                    } else if backward.amount > forward.amount {
                        Some((j, i, excess(backward, forward.amount)))
                    } else {
                        None
                    }
                }
            };

            if let Some((from, to, cell)) = netted {
                if cell.amount > Decimal::ZERO {
                    payments.push(Payment {
                        from: network.bank(from).name().clone(),
                        to: network.bank(to).name().clone(),
                        amount: cell.amount,
                        channel: cell.channel.unwrap_or_else(ChannelId::any),
                    });
                }
            }
        }
    }

    payments
}

fn excess(larger: SettlementCell, smaller: Decimal) -> SettlementCell {
    SettlementCell {
        amount: larger.amount - smaller,
        channel: larger.channel,
    }
}
