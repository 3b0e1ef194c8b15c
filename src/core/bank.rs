use crate::core::channel::{ChannelId, ChannelSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a bank in the settlement network.
///
/// # Examples
///
/// ```
/// use cashflow_engine::core::bank::BankId;
///
/// let a = BankId::new("Bank_A");
/// let b = BankId::new("Bank_B");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankId(String);

impl BankId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BankId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A participant in the network together with the payment channels it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    name: BankId,
    #[serde(default)]
    channels: ChannelSet,
}

impl Bank {
    pub fn new(name: impl Into<BankId>, channels: ChannelSet) -> Self {
        Self {
            name: name.into(),
            channels,
        }
    }

    /// Convenience constructor from channel names.
    pub fn with_channels<I, C>(name: impl Into<BankId>, channels: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelId>,
    {
        Self::new(name, channels.into_iter().collect())
    }

    pub fn name(&self) -> &BankId {
        &self.name
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn supports(&self, channel: &ChannelId) -> bool {
        self.channels.contains(channel)
    }
}

impl From<String> for BankId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
