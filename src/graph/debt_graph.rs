use crate::graph::error::{GraphError, ParseGraphError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Monetary amount in the smallest unit of the group's currency.
pub type Amount = i64;

static NO_NEIGHBORS: BTreeMap<usize, Amount> = BTreeMap::new();

/// A weighted, signed debt graph over a fixed set of participants.
///
/// Every edge is stored as an antisymmetric pair of adjacency entries:
/// `u -> v` with weight `w` means `u` owes `v` the amount `w`, and the
/// reverse entry `v -> u` holds `-w`. At most one edge exists per pair.
///
/// The balance of a vertex is the negated sum of its entries, so a net
/// debtor has a negative balance and a net creditor a positive one. The
/// balances of any graph sum to zero.
///
/// Storage is sparse: only vertices with at least one edge hold an
/// adjacency entry, so a component split out of a large group costs memory
/// in proportion to its own edges.
///
/// # Examples
///
/// ```
/// use debt_optimizer::graph::debt_graph::DebtGraph;
///
/// let mut graph = DebtGraph::new(3);
/// graph.add_edge(0, 1, 10).unwrap();
/// graph.add_edge(1, 2, 10).unwrap();
///
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.balances(), vec![-10, 0, 10]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebtGraph {
    vertex_count: usize,
    /// vertex -> (neighbor -> signed weight); never holds an empty map
    adjacency: BTreeMap<usize, BTreeMap<usize, Amount>>,
    edge_count: usize,
}

/// A single edge of the graph, oriented as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: Amount,
}

impl DebtGraph {
    /// Create a graph with `vertices` participants and no edges.
    pub fn new(vertices: usize) -> Self {
        Self {
            vertex_count: vertices,
            adjacency: BTreeMap::new(),
            edge_count: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of stored edges, zero-weight edges included.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Neighbors of `vertex` with the signed weight seen from `vertex`.
    pub fn neighbors(&self, vertex: usize) -> Result<&BTreeMap<usize, Amount>, GraphError> {
        self.check_vertex(vertex)?;
        Ok(self.adjacency.get(&vertex).unwrap_or(&NO_NEIGHBORS))
    }

    pub fn degree(&self, vertex: usize) -> Result<usize, GraphError> {
        Ok(self.neighbors(vertex)?.len())
    }

    /// Vertices with at least one edge, in ascending order.
    pub fn active_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn active_vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn adjacency(&self) -> &BTreeMap<usize, BTreeMap<usize, Amount>> {
        &self.adjacency
    }

    /// Every stored edge exactly once, as `(u, v, w)` with `u < v`.
    pub fn edges(&self) -> Vec<Edge> {
        self.adjacency
            .iter()
            .flat_map(|(&from, neighbors)| {
                neighbors
                    .range(from + 1..)
                    .map(move |(&to, &weight)| Edge { from, to, weight })
            })
            .collect()
    }

    /// Every non-zero edge exactly once, oriented so that the weight is
    /// positive: `from` pays `to`.
    pub fn transfers(&self) -> Vec<Edge> {
        self.edges()
            .into_iter()
            .filter(|e| e.weight != 0)
            .map(|e| {
                if e.weight > 0 {
                    e
                } else {
                    Edge {
                        from: e.to,
                        to: e.from,
                        weight: -e.weight,
                    }
                }
            })
            .collect()
    }

    /// Sum of all positive edge amounts: what would change hands if every
    /// edge were settled as-is.
    pub fn gross_total(&self) -> Amount {
        self.transfers().iter().map(|e| e.weight).sum()
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex >= self.vertex_count {
            return Err(GraphError::InvalidVertex {
                vertex,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }

    fn check_pair(&self, from: usize, to: usize) -> Result<(), GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)
    }

    fn entry(&self, from: usize, to: usize) -> Option<Amount> {
        self.adjacency.get(&from).and_then(|n| n.get(&to)).copied()
    }

    /// Drop the one-sided entry `from -> to`, and `from`'s map with it once
    /// it is empty.
    fn detach(&mut self, from: usize, to: usize) -> bool {
        let Some(neighbors) = self.adjacency.get_mut(&from) else {
            return false;
        };
        let removed = neighbors.remove(&to).is_some();
        if neighbors.is_empty() {
            self.adjacency.remove(&from);
        }
        removed
    }

    /// Add the edge `from -> to` with `weight`.
    ///
    /// Fails if either index is out of range, if `from == to`, or if an
    /// edge between the two vertices already exists in either direction.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: Amount) -> Result<(), GraphError> {
        self.check_pair(from, to)?;
        if from == to {
            return Err(GraphError::SelfLoop { vertex: from });
        }
        if self.entry(from, to).is_some() || self.entry(to, from).is_some() {
            return Err(GraphError::DuplicateEdge { from, to });
        }

        self.adjacency.entry(from).or_default().insert(to, weight);
        self.adjacency.entry(to).or_default().insert(from, -weight);
        self.edge_count += 1;
        Ok(())
    }

    /// Remove the edge between `from` and `to` in both directions.
    ///
    /// Returns `true` if a complete edge was removed.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> Result<bool, GraphError> {
        self.check_pair(from, to)?;
        let removed = self.detach(from, to);
        let removed_reverse = self.detach(to, from);

        if removed && removed_reverse {
            self.edge_count -= 1;
        }
        Ok(removed && removed_reverse)
    }

    /// Stored weight of `from -> to`, or `None` when there is no edge.
    pub fn weight(&self, from: usize, to: usize) -> Result<Option<Amount>, GraphError> {
        self.check_pair(from, to)?;
        Ok(self.entry(from, to))
    }

    /// Accumulate `delta` onto `from -> to`, creating or dropping the edge
    /// as needed. A resulting zero weight leaves no edge behind.
    pub fn plus_weight(&mut self, from: usize, to: usize, delta: Amount) -> Result<(), GraphError> {
        let weight = self.weight(from, to)?.unwrap_or(0) + delta;
        self.remove_edge(from, to)?;
        if weight != 0 {
            self.add_edge(from, to, weight)?;
        }
        Ok(())
    }

    /// Rewrite the weight of `from -> to` with `f`, keeping the reverse
    /// entry consistent.
    pub fn compute_weight<F>(&mut self, from: usize, to: usize, f: F) -> Result<(), GraphError>
    where
        F: Fn(Amount) -> Amount,
    {
        self.check_pair(from, to)?;
        let mut updated = false;

        if let Some(w) = self.adjacency.get_mut(&from).and_then(|n| n.get_mut(&to)) {
            *w = f(*w);
            updated = true;
        }
        if let Some(w) = self.adjacency.get_mut(&to).and_then(|n| n.get_mut(&from)) {
            *w = -f(-*w);
            updated = true;
        }

        if !updated {
            return Err(GraphError::MissingEdge { from, to });
        }
        Ok(())
    }

    /// Breadth-first shortest path from `from` to `to`, ignoring edge
    /// direction. Returns an empty path when `to` is unreachable.
    pub fn find_shortest_path(&self, from: usize, to: usize) -> Result<Vec<usize>, GraphError> {
        self.check_pair(from, to)?;

        // visited vertex -> the vertex it was reached from
        let mut parent: HashMap<usize, Option<usize>> = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(from);
        parent.insert(from, None);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut at = to;
                while let Some(&Some(prev)) = parent.get(&at) {
                    path.push(prev);
                    at = prev;
                }
                path.reverse();
                return Ok(path);
            }

            let Some(neighbors) = self.adjacency.get(&current) else {
                continue;
            };
            for &next in neighbors.keys() {
                if !parent.contains_key(&next) {
                    parent.insert(next, Some(current));
                    queue.push_back(next);
                }
            }
        }

        Ok(Vec::new())
    }

    /// Net position of every vertex: negative owes, positive is owed.
    pub fn balances(&self) -> Vec<Amount> {
        let mut balances = vec![0; self.vertex_count];
        for (vertex, balance) in self.active_balances() {
            balances[vertex] = balance;
        }
        balances
    }

    /// Net positions of the vertices that have edges.
    pub(crate) fn active_balances(&self) -> BTreeMap<usize, Amount> {
        self.adjacency
            .iter()
            .map(|(&vertex, neighbors)| (vertex, -neighbors.values().sum::<Amount>()))
            .collect()
    }

    /// Sum two graphs edge by edge into a new graph sized to the larger one.
    pub fn merge(a: &DebtGraph, b: &DebtGraph) -> Result<DebtGraph, GraphError> {
        let mut merged = DebtGraph::new(a.vertex_count().max(b.vertex_count()));
        merged.absorb(a)?;
        merged.absorb(b)?;
        Ok(merged)
    }

    /// Add every edge of `other` onto `self`.
    pub fn absorb(&mut self, other: &DebtGraph) -> Result<(), GraphError> {
        for edge in other.edges() {
            self.plus_weight(edge.from, edge.to, edge.weight)?;
        }
        Ok(())
    }

    /// Collapse chains `u -> d -> d2` carrying the same weight into a single
    /// edge `u -> d2` until no such chain is left.
    ///
    /// Balances are unchanged: `d` passed the amount straight through.
    /// Returns the number of collapses performed.
    pub fn integrate_same_weight(&mut self) -> Result<usize, GraphError> {
        let mut collapsed = 0;
        while let Some((u, d, d2, w)) = self.find_equal_weight_chain() {
            self.remove_edge(u, d)?;
            self.remove_edge(d, d2)?;
            self.plus_weight(u, d2, w)?;
            collapsed += 1;
        }
        Ok(collapsed)
    }

    fn find_equal_weight_chain(&self) -> Option<(usize, usize, usize, Amount)> {
        for (&u, neighbors) in &self.adjacency {
            for (&d, &w) in neighbors {
                let next = self
                    .adjacency
                    .get(&d)
                    .and_then(|onward| onward.iter().find(|&(&d2, &w2)| d2 != u && w2 == w));
                if let Some((&d2, _)) = next {
                    return Some((u, d, d2, w));
                }
            }
        }
        None
    }

    /// The closed-form two-hub settlement derived from balances alone.
    ///
    /// The first net debtor pays every other net creditor, every other net
    /// debtor pays the first net creditor, and a single hub-to-hub edge
    /// carries the remainder. Returns `None` when this form would not have
    /// fewer edges than the graph, and an empty graph when every balance is
    /// already zero.
    pub fn star_settlement(&self) -> Result<Option<DebtGraph>, GraphError> {
        let balances = self.active_balances();
        let payer_hub = balances.iter().find(|&(_, &b)| b < 0).map(|(&v, &b)| (v, b));
        let payee_hub = balances.iter().find(|&(_, &b)| b > 0).map(|(&v, _)| v);
        let positives = balances.values().filter(|&&b| b > 0).count().max(1);
        let negatives = balances.values().filter(|&&b| b < 0).count().max(1);

        if positives + negatives - 1 >= self.edge_count {
            return Ok(None);
        }

        let mut star = DebtGraph::new(self.vertex_count());
        let ((payer_hub, payer_balance), payee_hub) = match (payer_hub, payee_hub) {
            (Some(payer), Some(payee)) => (payer, payee),
            _ => return Ok(Some(star)),
        };

        let mut paid_by_hub = 0;
        for (&vertex, &balance) in &balances {
            if vertex == payer_hub || vertex == payee_hub {
                continue;
            }
            if balance > 0 {
                star.add_edge(payer_hub, vertex, balance)?;
                paid_by_hub += balance;
            } else if balance < 0 {
                star.add_edge(vertex, payee_hub, -balance)?;
            }
        }

        let remainder = -payer_balance - paid_by_hub;
        if remainder != 0 {
            star.add_edge(payer_hub, payee_hub, remainder)?;
        }
        Ok(Some(star))
    }

    /// Drop every zero-weight edge.
    pub fn remove_zero(&mut self) {
        let zero_edges: Vec<Edge> = self.edges().into_iter().filter(|e| e.weight == 0).collect();
        for edge in zero_edges {
            self.detach(edge.from, edge.to);
            self.detach(edge.to, edge.from);
            self.edge_count -= 1;
        }
    }

    /// Number of edges carrying a non-zero amount.
    pub fn nonzero_edge_count(&self) -> usize {
        self.edges().iter().filter(|e| e.weight != 0).count()
    }
}

impl fmt::Display for DebtGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph with {} vertices and {} edges:",
            self.vertex_count, self.edge_count
        )?;
        for vertex in 0..self.vertex_count {
            write!(f, "{} ->", vertex)?;
            for (to, weight) in self.adjacency.get(&vertex).unwrap_or(&NO_NEIGHBORS) {
                write!(f, " ({}, {})", to, weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the `Display` form back into a graph.
///
/// Only non-negative entries are read; the negative mirror entries are
/// implied by them.
impl FromStr for DebtGraph {
    type Err = ParseGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let header = lines.next().ok_or(ParseGraphError::MissingHeader)?;
        let vertex_count = header
            .strip_prefix("Graph with ")
            .and_then(|rest| rest.split_whitespace().next())
            .ok_or_else(|| ParseGraphError::InvalidHeader(header.to_string()))?
            .parse::<usize>()
            .map_err(|_| ParseGraphError::InvalidHeader(header.to_string()))?;

        let mut graph = DebtGraph::new(vertex_count);
        for (vertex, line) in lines.take(vertex_count).enumerate() {
            let Some((_, entries)) = line.split_once("->") else {
                continue;
            };
            for entry in entries.split('(').skip(1) {
                let mut numbers = entry
                    .trim_end_matches(|c: char| c == ')' || c.is_whitespace())
                    .split(',')
                    .map(str::trim);
                let to: usize = parse_number(numbers.next())?;
                let weight: Amount = parse_number(numbers.next())?;
                // zero-weight edges appear as 0 on both sides
                if weight > 0 || (weight == 0 && vertex < to) {
                    graph.add_edge(vertex, to, weight)?;
                }
            }
        }
        Ok(graph)
    }
}

fn parse_number<T: FromStr>(token: Option<&str>) -> Result<T, ParseGraphError> {
    let token = token.unwrap_or_default();
    token
        .parse()
        .map_err(|_| ParseGraphError::InvalidNumber(token.to_string()))
}
