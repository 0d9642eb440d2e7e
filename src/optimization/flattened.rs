use crate::graph::debt_graph::{Amount, DebtGraph};
use crate::graph::error::GraphError;
use crate::graph::euler::EulerCircuit;
use crate::optimization::strategy::{CyclicCursor, WeightStrategy};
use std::collections::BTreeMap;

/// An Euler circuit laid out as a vertex sequence with its edge weights.
///
/// `weights[i]` is the amount on `circuit[i] -> circuit[i + 1]`. A fragment
/// produced by [`remove_and_split`](FlattenedGraph::remove_and_split) may be
/// an open path; its missing closing link is implicitly zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedGraph {
    cursor: CyclicCursor<WeightStrategy>,
    circuit: Vec<usize>,
    weights: Vec<Amount>,
    weight_frequency: BTreeMap<Amount, usize>,
}

impl FlattenedGraph {
    pub fn new(
        cursor: CyclicCursor<WeightStrategy>,
        circuit: Vec<usize>,
        weights: Vec<Amount>,
    ) -> Self {
        let weight_frequency = histogram(&weights);
        Self {
            cursor,
            circuit,
            weights,
            weight_frequency,
        }
    }

    pub fn from_circuit(cursor: CyclicCursor<WeightStrategy>, euler: EulerCircuit) -> Self {
        Self {
            cursor,
            circuit: euler.circuit,
            weights: euler.weights,
            weight_frequency: euler.weight_frequency,
        }
    }

    pub fn circuit(&self) -> &[usize] {
        &self.circuit
    }

    pub fn weights(&self) -> &[Amount] {
        &self.weights
    }

    pub fn weight_frequency(&self) -> &BTreeMap<Amount, usize> {
        &self.weight_frequency
    }

    pub fn cursor(&self) -> &CyclicCursor<WeightStrategy> {
        &self.cursor
    }

    /// The strategy this fragment will be cut with.
    pub fn strategy(&self) -> WeightStrategy {
        *self.cursor.value()
    }

    fn is_closed(&self) -> bool {
        self.circuit.first() == self.circuit.last()
    }

    /// Cancel the strategy's chosen amount around the circuit.
    ///
    /// Every edge carrying the chosen amount `w` drops out and the arcs
    /// between them become fragments of their own, with `w` subtracted from
    /// every remaining weight. Since the walk is closed, subtracting the
    /// same amount from each of its edges leaves every balance unchanged.
    ///
    /// A single occurrence of `w` yields one fragment; comparing its length
    /// with the input tells whether anything was removed.
    pub fn remove_and_split(&self) -> Vec<FlattenedGraph> {
        if self.circuit.len() < 2 {
            return vec![self.clone()];
        }

        let mut closed = self.clone();
        if !closed.is_closed() {
            closed.circuit.push(closed.circuit[0]);
            closed.weights.push(0);
            *closed.weight_frequency.entry(0).or_insert(0) += 1;
        }

        let Some(cut) = closed.strategy().select(&closed) else {
            return vec![self.clone()];
        };
        let positions: Vec<usize> = closed
            .weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w == cut)
            .map(|(i, _)| i)
            .collect();
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            return vec![self.clone()];
        };

        let cursor = self.cursor.advance();
        let reduce = |weights: &[Amount]| -> Vec<Amount> { weights.iter().map(|w| w - cut).collect() };
        let mut fragments = Vec::with_capacity(positions.len());

        for pair in positions.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            fragments.push(FlattenedGraph::new(
                cursor.clone(),
                closed.circuit[p + 1..=q].to_vec(),
                reduce(&closed.weights[p + 1..q]),
            ));
        }

        // the arc wrapping from the last occurrence back around to the first
        let end = closed.circuit.len() - 1;
        let mut circuit = closed.circuit[last + 1..end].to_vec();
        circuit.extend_from_slice(&closed.circuit[..=first]);
        let mut weights = reduce(&closed.weights[last + 1..]);
        weights.extend(reduce(&closed.weights[..first]));
        fragments.push(FlattenedGraph::new(cursor, circuit, weights));

        fragments
    }
}

fn histogram(weights: &[Amount]) -> BTreeMap<Amount, usize> {
    let mut frequency = BTreeMap::new();
    for &w in weights {
        *frequency.entry(w).or_insert(0) += 1;
    }
    frequency
}

impl DebtGraph {
    /// Add the edges walked by `flattened` onto this graph.
    pub fn add_flattened(&mut self, flattened: &FlattenedGraph) -> Result<(), GraphError> {
        for (step, &weight) in flattened.circuit().windows(2).zip(flattened.weights()) {
            self.plus_weight(step[0], step[1], weight)?;
        }
        Ok(())
    }
}
