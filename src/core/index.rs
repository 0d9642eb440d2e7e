use crate::core::debt::DebtSet;
use crate::core::party::PartyId;
use crate::graph::debt_graph::{Amount, DebtGraph};
use crate::graph::error::GraphError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One payment to make: `from` pays `to` a positive `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: PartyId,
    pub to: PartyId,
    pub amount: Amount,
}

/// Bidirectional mapping between parties and dense vertex indices.
///
/// Parties are numbered in sorted order, so the same set of parties always
/// produces the same graph.
#[derive(Debug, Clone, Default)]
pub struct ParticipantIndex {
    parties: Vec<PartyId>,
    positions: HashMap<PartyId, usize>,
}

impl ParticipantIndex {
    pub fn new(parties: impl IntoIterator<Item = PartyId>) -> Self {
        let mut parties: Vec<PartyId> = parties.into_iter().collect();
        parties.sort();
        parties.dedup();
        let positions = parties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        Self { parties, positions }
    }

    pub fn from_debts(debts: &DebtSet) -> Self {
        Self::new(debts.parties())
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    pub fn index_of(&self, party: &PartyId) -> Option<usize> {
        self.positions.get(party).copied()
    }

    pub fn party(&self, index: usize) -> Option<&PartyId> {
        self.parties.get(index)
    }

    pub fn parties(&self) -> &[PartyId] {
        &self.parties
    }

    /// Aggregate `debts` into one net edge per pair of parties.
    ///
    /// Debts in opposite directions cancel; pairs that net to zero leave no
    /// edge. A party missing from the index is reported as an out-of-range
    /// vertex.
    pub fn build_graph(&self, debts: &DebtSet) -> Result<DebtGraph, GraphError> {
        let mut graph = DebtGraph::new(self.len());
        for debt in debts.debts() {
            let from = self.vertex(debt.debtor())?;
            let to = self.vertex(debt.creditor())?;
            graph.plus_weight(from, to, debt.amount())?;
        }
        Ok(graph)
    }

    /// The graph's non-zero edges as transfers between named parties.
    pub fn transfers(&self, graph: &DebtGraph) -> Result<Vec<Transfer>, GraphError> {
        graph
            .transfers()
            .into_iter()
            .map(|edge| {
                Ok(Transfer {
                    from: self.name(edge.from)?.clone(),
                    to: self.name(edge.to)?.clone(),
                    amount: edge.weight,
                })
            })
            .collect()
    }

    fn vertex(&self, party: &PartyId) -> Result<usize, GraphError> {
        self.index_of(party).ok_or(GraphError::InvalidVertex {
            vertex: self.len(),
            vertex_count: self.len(),
        })
    }

    fn name(&self, vertex: usize) -> Result<&PartyId, GraphError> {
        self.party(vertex).ok_or(GraphError::InvalidVertex {
            vertex,
            vertex_count: self.len(),
        })
    }
}
