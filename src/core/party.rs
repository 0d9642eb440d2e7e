use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a participant in a shared-expense group.
///
/// Participants are compared by their string form, and that ordering
/// decides which vertex each one is assigned when a graph is built.
///
/// # Examples
///
/// ```
/// use debt_optimizer::core::party::PartyId;
///
/// let alice = PartyId::new("alice");
/// let bob = PartyId::from("bob");
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
