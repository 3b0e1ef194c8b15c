use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Name of the wildcard channel used for legs routed through the hub.
pub const ANY_CHANNEL: &str = "any";

/// A named payment channel (e.g. "Google_Pay", "PayTM", "SWIFT").
///
/// Two banks can pay each other directly only if they share at least
/// one channel.
///
/// # Examples
///
/// ```
/// use cashflow_engine::core::channel::ChannelId;
///
/// let gpay = ChannelId::new("Google_Pay");
/// assert_eq!(gpay.as_str(), "Google_Pay");
/// assert!(!gpay.is_any());
/// assert!(ChannelId::any().is_any());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The wildcard channel recorded on hub-routed payments.
    pub fn any() -> Self {
        Self(ANY_CHANNEL.to_string())
    }

    pub fn is_any(&self) -> bool {
        self.0 == ANY_CHANNEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An ordered set of channels supported by a bank.
///
/// Backed by a `BTreeSet` so iteration order, and therefore the
/// "first common channel" between two banks, is the lexicographic
/// order of channel names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelSet(BTreeSet<ChannelId>);

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel: ChannelId) -> bool {
        self.0.insert(channel)
    }

    pub fn contains(&self, channel: &ChannelId) -> bool {
        self.0.contains(channel)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelId> {
        self.0.iter()
    }

    /// Lexicographically first channel in the set.
    pub fn first(&self) -> Option<&ChannelId> {
        self.0.iter().next()
    }

    /// Lexicographically first channel present in both sets.
    pub fn first_common<'a>(&'a self, other: &'a ChannelSet) -> Option<&'a ChannelId> {
        self.0.intersection(&other.0).next()
    }
}

impl<C: Into<ChannelId>> FromIterator<C> for ChannelSet {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|c| c.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
