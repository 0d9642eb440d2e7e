//! Eulerization and Euler-circuit extraction.
//!
//! A connected debt graph whose vertices all have even degree can be walked
//! as one closed circuit. The circuit is what the cycle-cancellation stage
//! operates on, so odd-degree vertices are first paired up and fixed.

use crate::graph::debt_graph::{Amount, DebtGraph};
use crate::graph::error::GraphError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A debt removed during Eulerization that must be settled directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cut {
    pub from: usize,
    pub to: usize,
    pub amount: Amount,
}

/// Outcome of [`DebtGraph::eulerize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eulerization {
    /// Vertex to start the Euler circuit from, if one was identified.
    pub start: Option<usize>,
    /// Edges removed because no alternative route existed.
    pub cuts: Vec<Cut>,
}

/// A closed walk produced by Hierholzer's algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EulerCircuit {
    /// Visited vertices; first and last coincide for a non-empty circuit.
    pub circuit: Vec<usize>,
    /// `weights[i]` is the weight of `circuit[i] -> circuit[i + 1]`.
    pub weights: Vec<Amount>,
    /// How often each weight value occurs in `weights`.
    pub weight_frequency: BTreeMap<Amount, usize>,
}

impl DebtGraph {
    /// Force every vertex to even degree without changing any balance.
    ///
    /// Odd-degree vertices are paired in index order. For a pair joined by a
    /// direct edge, the edge is removed and its amount rerouted along the
    /// shortest remaining path; when no such path exists the amount is
    /// returned as a [`Cut`] to be settled directly. A pair with no direct
    /// edge gets a zero-weight edge.
    pub fn eulerize(&mut self) -> Result<Eulerization, GraphError> {
        let mut odd = Vec::new();
        let mut start = None;
        for (&vertex, neighbors) in self.adjacency() {
            if neighbors.len() % 2 == 1 {
                odd.push(vertex);
            } else if start.is_none() {
                start = Some(vertex);
            }
        }

        let mut cuts = Vec::new();
        for pair in odd.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            match self.weight(a, b)? {
                Some(amount) => {
                    self.remove_edge(a, b)?;
                    let path = self.find_shortest_path(a, b)?;
                    if path.is_empty() {
                        cuts.push(Cut { from: a, to: b, amount });
                        continue;
                    }
                    start.get_or_insert(a);
                    for step in path.windows(2) {
                        self.compute_weight(step[0], step[1], |w| w + amount)?;
                    }
                }
                None => {
                    self.add_edge(a, b, 0)?;
                    start.get_or_insert(a);
                }
            }
        }

        Ok(Eulerization { start, cuts })
    }

    /// Hierholzer's algorithm over a private copy of the adjacency.
    ///
    /// Requires the edges reachable from `start` to form a connected graph
    /// with every vertex at even degree; `self` is never modified.
    pub fn find_euler_circuit(&self, start: usize) -> Result<EulerCircuit, GraphError> {
        self.neighbors(start)?;
        let mut remaining = self.adjacency().clone();

        let mut weight_frequency = BTreeMap::new();
        let mut circuit = Vec::new();
        let mut weights = Vec::new();

        let mut stack = vec![start];
        let mut arrived_by: Vec<Amount> = Vec::new();

        while let Some(&vertex) = stack.last() {
            match remaining.get_mut(&vertex).and_then(BTreeMap::pop_first) {
                Some((next, weight)) => {
                    if let Some(back) = remaining.get_mut(&next) {
                        back.remove(&vertex);
                    }
                    *weight_frequency.entry(weight).or_insert(0) += 1;
                    stack.push(next);
                    arrived_by.push(weight);
                }
                None => {
                    circuit.push(vertex);
                    stack.pop();
                    if let Some(weight) = arrived_by.pop() {
                        weights.push(weight);
                    }
                }
            }
        }

        circuit.reverse();
        weights.reverse();
        if weights.len() + 2 == circuit.len() {
            weights.push(0);
        }

        Ok(EulerCircuit {
            circuit,
            weights,
            weight_frequency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> DebtGraph {
        let mut g = DebtGraph::new(4);
        g.add_edge(0, 1, 5).unwrap();
        g.add_edge(1, 2, 5).unwrap();
        g.add_edge(2, 3, 5).unwrap();
        g.add_edge(3, 0, 5).unwrap();
        g
    }

    #[test]
    fn test_euler_circuit_of_square() {
        let g = square();
        let euler = g.find_euler_circuit(0).unwrap();
        assert_eq!(euler.circuit, vec![0, 1, 2, 3, 0]);
        assert_eq!(euler.weights, vec![5, 5, 5, 5]);
        assert_eq!(euler.weight_frequency.get(&5), Some(&4));
        // the graph itself is untouched
        assert_eq!(g, square());
    }

    #[test]
    fn test_euler_circuit_weights_follow_direction() {
        let mut g = DebtGraph::new(3);
        g.add_edge(0, 1, 3).unwrap();
        g.add_edge(2, 1, 4).unwrap();
        g.add_edge(2, 0, 6).unwrap();

        let euler = g.find_euler_circuit(0).unwrap();
        assert_eq!(euler.circuit, vec![0, 1, 2, 0]);
        // 0 -> 1 is 3, 1 -> 2 is -4, 2 -> 0 is 6
        assert_eq!(euler.weights, vec![3, -4, 6]);
    }

    #[test]
    fn test_euler_circuit_of_bowtie_uses_every_edge() {
        // two triangles sharing vertex 2
        let mut g = DebtGraph::new(5);
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(1, 2, 2).unwrap();
        g.add_edge(2, 0, 3).unwrap();
        g.add_edge(2, 3, 4).unwrap();
        g.add_edge(3, 4, 5).unwrap();
        g.add_edge(4, 2, 6).unwrap();

        let euler = g.find_euler_circuit(2).unwrap();
        assert_eq!(euler.circuit.len(), g.edge_count() + 1);
        assert_eq!(euler.circuit.first(), Some(&2));
        assert_eq!(euler.circuit.last(), Some(&2));

        let mut replay = DebtGraph::new(5);
        for (i, pair) in euler.circuit.windows(2).enumerate() {
            assert_eq!(g.weight(pair[0], pair[1]).unwrap(), Some(euler.weights[i]));
            replay.add_edge(pair[0], pair[1], euler.weights[i]).unwrap();
        }
        assert_eq!(replay.balances(), g.balances());
    }

    #[test]
    fn test_euler_circuit_invalid_start() {
        assert!(square().find_euler_circuit(9).is_err());
    }

    #[test]
    fn test_eulerize_adds_zero_edge_between_unconnected_pair() {
        // path 0 - 1 - 2: odd vertices 0 and 2 are not adjacent
        let mut g = DebtGraph::new(3);
        g.add_edge(0, 1, 4).unwrap();
        g.add_edge(1, 2, 6).unwrap();
        let before = g.balances();

        let result = g.eulerize().unwrap();
        assert_eq!(result.start, Some(1));
        assert!(result.cuts.is_empty());
        assert_eq!(g.weight(0, 2).unwrap(), Some(0));
        assert_eq!(g.balances(), before);
        for v in 0..3 {
            assert_eq!(g.degree(v).unwrap() % 2, 0);
        }
    }

    #[test]
    fn test_eulerize_reroutes_direct_edge() {
        // triangle 0-1-2 with pendants 0-3 and 1-4: odd pairs are (0, 1), (3, 4)
        let mut g = DebtGraph::new(5);
        g.add_edge(0, 1, 10).unwrap();
        g.add_edge(1, 2, 3).unwrap();
        g.add_edge(2, 0, 2).unwrap();
        g.add_edge(0, 3, 1).unwrap();
        g.add_edge(1, 4, 1).unwrap();
        let before = g.balances();

        let result = g.eulerize().unwrap();
        assert!(result.cuts.is_empty());
        assert_eq!(result.start, Some(2));
        assert_eq!(g.weight(0, 1).unwrap(), None);
        // 10 from 0 to 1 now flows 0 -> 2 -> 1
        assert_eq!(g.weight(0, 2).unwrap(), Some(8));
        assert_eq!(g.weight(2, 1).unwrap(), Some(7));
        assert_eq!(g.weight(3, 4).unwrap(), Some(0));
        assert_eq!(g.balances(), before);
    }

    #[test]
    fn test_eulerize_cuts_bridge() {
        // star centered at 0 with leaves 1, 2, 3: odd pairs are (0, 1), (2, 3)
        let mut g = DebtGraph::new(4);
        g.add_edge(0, 1, 7).unwrap();
        g.add_edge(0, 2, 8).unwrap();
        g.add_edge(3, 0, 9).unwrap();

        let result = g.eulerize().unwrap();
        assert_eq!(result.cuts, vec![Cut { from: 0, to: 1, amount: 7 }]);
        assert_eq!(result.start, Some(2));
        assert_eq!(g.weight(2, 3).unwrap(), Some(0));
        assert_eq!(g.edge_count(), 3);
    }
}
