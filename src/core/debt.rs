use crate::core::party::PartyId;
use crate::graph::debt_graph::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a debt could not be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebtError {
    #[error("Debt amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Amount },

    #[error("Debt parties must differ, got {party} twice")]
    SameParty { party: PartyId },
}

/// `debtor` owes `creditor` a positive `amount`.
///
/// # Examples
///
/// ```
/// use debt_optimizer::core::debt::Debt;
///
/// let debt = Debt::new("alice".into(), "bob".into(), 1_200);
/// assert_eq!(debt.amount(), 1_200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDebt")]
pub struct Debt {
    #[serde(rename = "from")]
    debtor: PartyId,
    #[serde(rename = "to")]
    creditor: PartyId,
    amount: Amount,
}

/// Wire form of [`Debt`], checked on the way in.
#[derive(Deserialize)]
struct RawDebt {
    from: PartyId,
    to: PartyId,
    amount: Amount,
}

impl TryFrom<RawDebt> for Debt {
    type Error = DebtError;

    fn try_from(raw: RawDebt) -> Result<Self, Self::Error> {
        Debt::try_new(raw.from, raw.to, raw.amount)
    }
}

impl Debt {
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if both parties are the same.
    pub fn new(debtor: PartyId, creditor: PartyId, amount: Amount) -> Self {
        match Self::try_new(debtor, creditor, amount) {
            Ok(debt) => debt,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(debtor: PartyId, creditor: PartyId, amount: Amount) -> Result<Self, DebtError> {
        if amount <= 0 {
            return Err(DebtError::NonPositiveAmount { amount });
        }
        if debtor == creditor {
            return Err(DebtError::SameParty { party: debtor });
        }
        Ok(Self {
            debtor,
            creditor,
            amount,
        })
    }

    pub fn debtor(&self) -> &PartyId {
        &self.debtor
    }

    pub fn creditor(&self) -> &PartyId {
        &self.creditor
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// The debts of one group, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSet {
    debts: Vec<Debt>,
}

impl DebtSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, debt: Debt) {
        self.debts.push(debt);
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    /// Sum of every recorded amount.
    pub fn gross_total(&self) -> Amount {
        self.debts.iter().map(Debt::amount).sum()
    }

    /// Every party mentioned, sorted and deduplicated.
    pub fn parties(&self) -> Vec<PartyId> {
        let mut parties: Vec<PartyId> = self
            .debts
            .iter()
            .flat_map(|d| [d.debtor.clone(), d.creditor.clone()])
            .collect();
        parties.sort();
        parties.dedup();
        parties
    }
}

impl FromIterator<Debt> for DebtSet {
    fn from_iter<T: IntoIterator<Item = Debt>>(iter: T) -> Self {
        Self {
            debts: iter.into_iter().collect(),
        }
    }
}
