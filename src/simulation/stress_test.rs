//! Stress testing utilities for the settlement engine.
//!
//! Generates random bank networks with overlapping channel sets and
//! random debts between them.

use crate::core::bank::{Bank, BankId};
use crate::core::channel::{ChannelId, ChannelSet};
use crate::core::network::{BankNetwork, NetworkError};
use crate::core::transaction::{Transaction, TransactionSet};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Name given to the generated hub.
pub const HUB_NAME: &str = "HUB";

/// Configuration for generating a random network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of banks besides the hub.
    pub bank_count: usize,
    /// Channels available in the network. The hub declares all of them.
    pub channels: Vec<ChannelId>,
    /// Number of transactions to generate.
    pub transaction_count: usize,
    /// Minimum transaction amount (whole units).
    pub min_amount: u64,
    /// Maximum transaction amount (whole units, inclusive).
    pub max_amount: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bank_count: 10,
            channels: vec![
                ChannelId::new("Google_Pay"),
                ChannelId::new("PayTM"),
                ChannelId::new("UPI"),
            ],
            transaction_count: 30,
            min_amount: 1,
            max_amount: 10_000,
        }
    }
}

/// Generate a random network and transaction set.
///
/// Every bank supports a random non-empty subset of the configured
/// channels (empty when no channels are configured). Debtor and creditor
/// of each transaction differ.
pub fn generate_random_network(
    config: &NetworkConfig,
) -> Result<(BankNetwork, TransactionSet), NetworkError> {
    let mut rng = rand::thread_rng();

    let mut banks = vec![Bank::new(
        HUB_NAME,
        config.channels.iter().cloned().collect(),
    )];
    for i in 0..config.bank_count {
        banks.push(Bank::new(
            BankId::new(format!("BANK-{:03}", i)),
            random_channels(&mut rng, &config.channels),
        ));
    }
    let network = BankNetwork::new(banks)?;

    let mut set = TransactionSet::new();
    if network.len() < 2 {
        return Ok((network, set));
    }

    let (low, high) = if config.min_amount <= config.max_amount {
        (config.min_amount, config.max_amount)
    } else {
        (config.max_amount, config.min_amount)
    };

    for _ in 0..config.transaction_count {
        let debtor = rng.gen_range(0..network.len());
        let mut creditor = rng.gen_range(0..network.len());
        while creditor == debtor {
            creditor = rng.gen_range(0..network.len());
        }
        let amount = Decimal::from(rng.gen_range(low..=high));

        set.add(Transaction::new(
            network.bank(debtor).name().clone(),
            network.bank(creditor).name().clone(),
            amount,
        ));
    }

    Ok((network, set))
}

fn random_channels<R: Rng>(rng: &mut R, channels: &[ChannelId]) -> ChannelSet {
    if channels.is_empty() {
        return ChannelSet::new();
    }
    let count = rng.gen_range(1..=channels.len());
    channels.choose_multiple(rng, count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::engine::SettlementEngine;

    #[test]
    fn test_random_network_generation() {
        let config = NetworkConfig {
            bank_count: 5,
            transaction_count: 12,
            ..Default::default()
        };

        let (network, set) = generate_random_network(&config).unwrap();
        assert_eq!(network.len(), 6);
        assert_eq!(network.hub().name().as_str(), HUB_NAME);
        assert_eq!(network.hub().channels().len(), config.channels.len());
        assert_eq!(set.len(), 12);
        for bank in &network.banks()[1..] {
            assert!(!bank.channels().is_empty());
        }
        for tx in set.transactions() {
            assert!(!tx.is_self_referential());
            assert!(tx.amount() >= Decimal::from(config.min_amount));
        }
    }

    #[test]
    fn test_hub_only_network_has_no_transactions() {
        let config = NetworkConfig {
            bank_count: 0,
            ..Default::default()
        };
        let (network, set) = generate_random_network(&config).unwrap();
        assert_eq!(network.len(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_random_network_settles() {
        let config = NetworkConfig {
            bank_count: 20,
            transaction_count: 100,
            ..Default::default()
        };

        let (network, set) = generate_random_network(&config).unwrap();
        let report = SettlementEngine::default()
            .settle(&network, set.transactions())
            .unwrap();

        assert!(report.is_balanced());
        assert!(report.unresolved().is_empty());
    }
}
