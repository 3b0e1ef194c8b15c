use crate::core::bank::{Bank, BankId};
use crate::core::channel::{ChannelId, ChannelSet};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when assembling a bank network.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("a settlement network needs at least one bank")]
    Empty,
    #[error("bank names must be non-empty (position {0})")]
    EmptyName(usize),
    #[error("duplicate bank name: {0}")]
    DuplicateBank(BankId),
    #[error("hub {0} is not a member of the network")]
    UnknownHub(BankId),
    #[error("bank {0} declares the reserved wildcard channel")]
    ReservedChannel(BankId),
}

/// The ordered set of banks taking part in a settlement run.
///
/// One member is the hub: it is treated as supporting every channel and
/// intermediates payments between banks that share none. The first bank
/// is the hub unless another is designated with [`BankNetwork::with_hub`].
///
/// # Examples
///
/// ```
/// use cashflow_engine::core::bank::{Bank, BankId};
/// use cashflow_engine::core::network::BankNetwork;
///
/// let network = BankNetwork::new(vec![
///     Bank::with_channels("World_Bank", ["Google_Pay", "PayTM"]),
///     Bank::with_channels("A", ["Google_Pay"]),
/// ])
/// .unwrap();
///
/// assert_eq!(network.hub().name(), &BankId::new("World_Bank"));
/// assert_eq!(network.index_of(&BankId::new("A")), Some(1));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BankNetwork {
    banks: Vec<Bank>,
    hub: usize,
    #[serde(skip)]
    index: HashMap<BankId, usize>,
}

impl BankNetwork {
    /// Build a network whose hub is the first bank.
    pub fn new(banks: Vec<Bank>) -> Result<Self, NetworkError> {
        if banks.is_empty() {
            return Err(NetworkError::Empty);
        }

        let mut index = HashMap::with_capacity(banks.len());
        for (i, bank) in banks.iter().enumerate() {
            if bank.name().as_str().is_empty() {
                return Err(NetworkError::EmptyName(i));
            }
            if bank.channels().iter().any(ChannelId::is_any) {
                return Err(NetworkError::ReservedChannel(bank.name().clone()));
            }
            if index.insert(bank.name().clone(), i).is_some() {
                return Err(NetworkError::DuplicateBank(bank.name().clone()));
            }
        }

        Ok(Self {
            banks,
            hub: 0,
            index,
        })
    }

    /// Designate a different member as the hub.
    pub fn with_hub(mut self, hub: &BankId) -> Result<Self, NetworkError> {
        self.hub = self
            .index_of(hub)
            .ok_or_else(|| NetworkError::UnknownHub(hub.clone()))?;
        Ok(self)
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn bank(&self, index: usize) -> &Bank {
        &self.banks[index]
    }

    pub fn hub(&self) -> &Bank {
        &self.banks[self.hub]
    }

    pub fn hub_index(&self) -> usize {
        self.hub
    }

    pub fn is_hub(&self, index: usize) -> bool {
        index == self.hub
    }

    /// Position of a bank in the network, if it is a member.
    pub fn index_of(&self, name: &BankId) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The channel two members would use to pay each other directly.
    ///
    /// Regular banks must share a declared channel; the first one in
    /// sorted order is chosen. The hub accepts every channel, so a payment
    /// touching the hub uses the counterparty's first channel, or the
    /// wildcard when the counterparty declares none.
    pub fn compatible_channel(&self, a: usize, b: usize) -> Option<ChannelId> {
        let channels_a = self.banks[a].channels();
        let channels_b = self.banks[b].channels();
        match (self.is_hub(a), self.is_hub(b)) {
            (true, true) => Some(ChannelId::any()),
            (true, false) => Some(first_or_any(channels_b)),
            (false, true) => Some(first_or_any(channels_a)),
            (false, false) => channels_a.first_common(channels_b).cloned(),
        }
    }
}

fn first_or_any(channels: &ChannelSet) -> ChannelId {
    channels.first().cloned().unwrap_or_else(ChannelId::any)
}
