use crate::graph::debt_graph::Amount;
use crate::optimization::flattened::FlattenedGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Rule for choosing the recurring amount to cancel around a circuit.
///
/// Every strategy is a pure function of a [`FlattenedGraph`]'s weights and
/// weight histogram. The `*Mid*` variants scan outward from the middle of
/// the weight list and only switch on a strict improvement, so ties go to
/// the entry closest to the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightStrategy {
    /// Largest weight.
    MaxRemove,
    /// Smallest weight.
    MinRemove,
    /// The weight in the middle of the circuit.
    MidPointRemove,
    /// Largest weight, middle-out.
    MaxMidRemove,
    /// Smallest weight, middle-out.
    MinMidRemove,
    /// Most frequent weight.
    MaxNumRemove,
    /// Least frequent weight.
    MinNumRemove,
    /// Most frequent weight, middle-out.
    MaxNumMidRemove,
    /// Least frequent weight, middle-out.
    MinNumMidRemove,
}

impl WeightStrategy {
    pub const ALL: [WeightStrategy; 9] = [
        WeightStrategy::MaxRemove,
        WeightStrategy::MinRemove,
        WeightStrategy::MidPointRemove,
        WeightStrategy::MaxMidRemove,
        WeightStrategy::MinMidRemove,
        WeightStrategy::MaxNumRemove,
        WeightStrategy::MinNumRemove,
        WeightStrategy::MaxNumMidRemove,
        WeightStrategy::MinNumMidRemove,
    ];

    /// Pick the weight to cancel on. `None` only for an empty circuit.
    pub fn select(&self, flattened: &FlattenedGraph) -> Option<Amount> {
        let weights = flattened.weights();
        if weights.is_empty() {
            return None;
        }
        let frequency = |w: Amount| flattened.weight_frequency().get(&w).copied().unwrap_or(0);

        match self {
            WeightStrategy::MaxRemove => weights.iter().copied().max(),
            WeightStrategy::MinRemove => weights.iter().copied().min(),
            WeightStrategy::MidPointRemove => Some(weights[weights.len() / 2]),
            WeightStrategy::MaxMidRemove => {
                middle_out_pick(weights, |w| w, Ordering::Greater).map(|i| weights[i])
            }
            WeightStrategy::MinMidRemove => {
                middle_out_pick(weights, |w| w, Ordering::Less).map(|i| weights[i])
            }
            WeightStrategy::MaxNumRemove => {
                histogram_pick(flattened.weight_frequency().iter(), Ordering::Greater)
            }
            WeightStrategy::MinNumRemove => {
                histogram_pick(flattened.weight_frequency().iter(), Ordering::Less)
            }
            WeightStrategy::MaxNumMidRemove => {
                middle_out_pick(weights, frequency, Ordering::Greater).map(|i| weights[i])
            }
            WeightStrategy::MinNumMidRemove => {
                middle_out_pick(weights, frequency, Ordering::Less).map(|i| weights[i])
            }
        }
    }
}

impl fmt::Display for WeightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Indices of `0..len` starting at `(len - 1) / 2` and then walking
/// symmetric pairs outward, left before right.
fn middle_out(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut order = Vec::with_capacity(len + 1);
    order.push((len - 1) / 2);

    let mut left = len / 2;
    let mut right = if len % 2 == 1 { len / 2 + 1 } else { len / 2 };
    while left > 0 {
        left -= 1;
        order.push(left);
        order.push(right);
        right += 1;
    }
    order
}

/// Index whose key compares as `prefer` against every other, middle-out.
fn middle_out_pick<K, F>(weights: &[Amount], key: F, prefer: Ordering) -> Option<usize>
where
    K: Ord,
    F: Fn(Amount) -> K,
{
    let order = middle_out(weights.len());
    let (&first, rest) = order.split_first()?;
    let mut best = first;
    for &i in rest {
        if key(weights[i]).cmp(&key(weights[best])) == prefer {
            best = i;
        }
    }
    Some(best)
}

/// Weight value whose count compares as `prefer` against every other; the
/// smallest value wins a tie.
fn histogram_pick<'a, I>(histogram: I, prefer: Ordering) -> Option<Amount>
where
    I: Iterator<Item = (&'a Amount, &'a usize)>,
{
    let mut best: Option<(Amount, usize)> = None;
    for (&weight, &count) in histogram {
        match best {
            Some((_, best_count)) if count.cmp(&best_count) != prefer => {}
            _ => best = Some((weight, count)),
        }
    }
    best.map(|(weight, _)| weight)
}

/// An immutable position in an endlessly repeating sequence.
///
/// `advance` never mutates; it hands back a new cursor one step further,
/// wrapping at the end. Cloning is cheap: the sequence is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicCursor<T> {
    items: Arc<[T]>,
    position: usize,
}

impl<T> CyclicCursor<T> {
    /// Cursor at the first element of `items`.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    pub fn begin(items: impl Into<Arc<[T]>>) -> Self {
        let items = items.into();
        assert!(!items.is_empty(), "a cyclic cursor needs at least one item");
        Self { items, position: 0 }
    }

    pub fn value(&self) -> &T {
        &self.items[self.position]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn advance(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            position: (self.position + 1) % self.items.len(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::euler::EulerCircuit;

    fn flattened(weights: &[Amount]) -> FlattenedGraph {
        let circuit: Vec<usize> = (0..=weights.len()).collect();
        let cursor = CyclicCursor::begin(vec![WeightStrategy::MinMidRemove]);
        FlattenedGraph::new(cursor, circuit, weights.to_vec())
    }

    #[test]
    fn test_middle_out_order() {
        assert_eq!(middle_out(0), Vec::<usize>::new());
        assert_eq!(middle_out(1), vec![0]);
        assert_eq!(middle_out(2), vec![0, 0, 1]);
        assert_eq!(middle_out(4), vec![1, 1, 2, 0, 3]);
        assert_eq!(middle_out(5), vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn test_global_extrema_and_midpoint() {
        let f = flattened(&[4, 9, 1, 7, 3]);
        assert_eq!(WeightStrategy::MaxRemove.select(&f), Some(9));
        assert_eq!(WeightStrategy::MinRemove.select(&f), Some(1));
        assert_eq!(WeightStrategy::MidPointRemove.select(&f), Some(1));
        assert_eq!(WeightStrategy::MaxMidRemove.select(&f), Some(9));
        assert_eq!(WeightStrategy::MinMidRemove.select(&f), Some(1));
    }

    #[test]
    fn test_frequency_strategies() {
        // 2 appears three times, 5 twice, 8 once
        let f = flattened(&[5, 2, 8, 2, 5, 2]);
        assert_eq!(WeightStrategy::MaxNumRemove.select(&f), Some(2));
        assert_eq!(WeightStrategy::MinNumRemove.select(&f), Some(8));
        assert_eq!(WeightStrategy::MaxNumMidRemove.select(&f), Some(2));
        assert_eq!(WeightStrategy::MinNumMidRemove.select(&f), Some(8));
    }

    #[test]
    fn test_mid_scan_prefers_center_on_ties() {
        // two frequency-1 candidates: 7 sits at the center, 9 at the edge
        let f = flattened(&[9, 3, 7, 3, 3]);
        assert_eq!(WeightStrategy::MinNumMidRemove.select(&f), Some(7));
        assert_eq!(WeightStrategy::MinNumRemove.select(&f), Some(7));
        // with frequency ties the smallest value wins for the histogram scan
        let g = flattened(&[9, 7]);
        assert_eq!(WeightStrategy::MaxNumRemove.select(&g), Some(7));
        assert_eq!(WeightStrategy::MaxNumMidRemove.select(&g), Some(9));
    }

    #[test]
    fn test_empty_weights_select_nothing() {
        let cursor = CyclicCursor::begin(vec![WeightStrategy::MaxRemove]);
        let f = FlattenedGraph::from_circuit(cursor, EulerCircuit::default());
        for strategy in WeightStrategy::ALL {
            assert_eq!(strategy.select(&f), None);
        }
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(WeightStrategy::MinMidRemove.to_string(), "MinMidRemove");
        let json = serde_json::to_string(&WeightStrategy::MaxNumMidRemove).unwrap();
        assert_eq!(json, "\"MaxNumMidRemove\"");
    }

    #[test]
    fn test_cursor_wraps_without_mutation() {
        let start = CyclicCursor::begin(vec!['a', 'b', 'c']);
        let second = start.advance();
        let wrapped = second.advance().advance();

        assert_eq!(*start.value(), 'a');
        assert_eq!(*second.value(), 'b');
        assert_eq!(*wrapped.value(), 'a');
        assert_eq!(wrapped, start);
    }

    #[test]
    #[should_panic(expected = "at least one item")]
    fn test_cursor_rejects_empty() {
        CyclicCursor::<u8>::begin(Vec::new());
    }
}
