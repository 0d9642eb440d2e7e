use crate::core::debt::Debt;
use crate::core::index::Transfer;
use crate::core::party::PartyId;
use crate::graph::debt_graph::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of every party.
///
/// A positive balance means the party is owed (net creditor), a negative
/// one that it owes (net debtor). Two settlements are equivalent exactly
/// when they produce the same ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    positions: BTreeMap<PartyId, Amount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_debts<'a>(debts: impl IntoIterator<Item = &'a Debt>) -> Self {
        let mut ledger = Self::new();
        for debt in debts {
            ledger.apply_debt(debt);
        }
        ledger
    }

    pub fn from_transfers<'a>(transfers: impl IntoIterator<Item = &'a Transfer>) -> Self {
        let mut ledger = Self::new();
        for transfer in transfers {
            ledger.apply_transfer(transfer);
        }
        ledger
    }

    /// Debtor loses, creditor gains.
    pub fn apply_debt(&mut self, debt: &Debt) {
        self.apply(debt.debtor(), debt.creditor(), debt.amount());
    }

    pub fn apply_transfer(&mut self, transfer: &Transfer) {
        self.apply(&transfer.from, &transfer.to, transfer.amount);
    }

    fn apply(&mut self, from: &PartyId, to: &PartyId, amount: Amount) {
        *self.positions.entry(from.clone()).or_insert(0) -= amount;
        *self.positions.entry(to.clone()).or_insert(0) += amount;
    }

    pub fn position(&self, party: &PartyId) -> Amount {
        self.positions.get(party).copied().unwrap_or(0)
    }

    /// Every party seen so far, zero positions included.
    pub fn positions(&self) -> &BTreeMap<PartyId, Amount> {
        &self.positions
    }

    /// Sum of all positions is zero.
    pub fn is_balanced(&self) -> bool {
        self.positions.values().sum::<Amount>() == 0
    }

    /// The amount that has to move at minimum: the sum of all creditor
    /// positions.
    pub fn total_net_settlement(&self) -> Amount {
        self.positions.values().filter(|&&v| v > 0).sum()
    }

    /// Whether both ledgers assign every party the same position, treating
    /// a missing party as zero.
    pub fn same_positions(&self, other: &Ledger) -> bool {
        self.positions
            .keys()
            .chain(other.positions.keys())
            .all(|party| self.position(party) == other.position(party))
    }
}
