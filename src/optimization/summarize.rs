//! Whole-graph debt simplification.
//!
//! The graph is split into connected components, and each component runs
//! through a chain of reductions:
//!
//! 1. substitute the closed-form star settlement when it is smaller,
//! 2. collapse pass-through chains of equal amounts,
//! 3. Eulerize, settling bridge edges directly,
//! 4. walk the Euler circuit and cancel recurring amounts around it.
//!
//! After every step the component is re-split, and anything with fewer than
//! two edges is settled as-is. Cancellation may leave several disjoint
//! pieces behind, which go back on the work queue.
//!
//! One pass over the queue can leave a result that a further pass shrinks
//! again, so passes repeat on their own output until the graphs they produce
//! start to recur without losing an edge.

use crate::graph::debt_graph::DebtGraph;
use crate::graph::error::GraphError;
use crate::graph::union_find::split_graph;
use crate::optimization::config::SummarizeConfig;
use crate::optimization::flattened::FlattenedGraph;
use crate::optimization::strategy::{CyclicCursor, WeightStrategy};
use log::{debug, trace, warn};
use std::collections::{HashSet, VecDeque};

/// Upper bound on whole-graph passes before the best result so far is kept.
const MAX_PASSES: usize = 64;

/// What became of a component after one pass.
enum Outcome {
    /// Added to the result.
    Settled,
    /// Broke into pieces that need another pass.
    Requeue(Vec<DebtGraph>),
}

impl DebtGraph {
    /// Simplify with [`SummarizeConfig::default`].
    pub fn summarize(&self) -> Result<DebtGraph, GraphError> {
        self.summarize_with(&SummarizeConfig::default())
    }

    /// Return an equivalent graph with no more non-zero edges than this one.
    ///
    /// Every vertex keeps its balance exactly; zero-weight edges never appear
    /// in the result. The result is a fixed point: summarizing it again
    /// yields the same number of edges.
    pub fn summarize_with(&self, config: &SummarizeConfig) -> Result<DebtGraph, GraphError> {
        let mut input = self.clone();
        input.remove_zero();
        let mut best = input.summarize_pass(config)?;
        debug!("pass 1: {} -> {} edges", input.edge_count(), best.edge_count());

        // graphs produced since the edge count last dropped
        let mut seen = HashSet::from([input, best.clone()]);
        let mut current = best.clone();
        for pass in 2..=MAX_PASSES {
            let next = current.summarize_pass(config)?;
            debug!(
                "pass {}: {} -> {} edges",
                pass,
                current.edge_count(),
                next.edge_count()
            );
            if next.edge_count() < best.edge_count() {
                best = next.clone();
                seen.clear();
            }
            if !seen.insert(next.clone()) {
                return Ok(best);
            }
            current = next;
        }

        warn!(
            "no fixed point after {} passes; keeping the best result with {} edges",
            MAX_PASSES,
            best.edge_count()
        );
        Ok(best)
    }

    /// One run of the component work queue over the whole graph.
    fn summarize_pass(&self, config: &SummarizeConfig) -> Result<DebtGraph, GraphError> {
        let rotation = config.rotation();
        let mut settled = DebtGraph::new(self.vertex_count());
        let mut queue: VecDeque<DebtGraph> = split_graph(self)?.into();
        let mut rounds = 0;

        while let Some(component) = queue.pop_front() {
            if rounds == config.max_rounds() {
                warn!(
                    "round budget of {} exhausted with {} components pending; settling them unchanged",
                    config.max_rounds(),
                    queue.len() + 1
                );
                settled.absorb(&component)?;
                for pending in queue.drain(..) {
                    settled.absorb(&pending)?;
                }
                break;
            }
            rounds += 1;

            debug!(
                "round {}: component with {} edges ({} queued)",
                rounds,
                component.edge_count(),
                queue.len()
            );
            match reduce_component(component, &rotation, &mut settled)? {
                Outcome::Settled => {}
                Outcome::Requeue(parts) => {
                    debug!("requeueing {} parts", parts.len());
                    queue.extend(parts);
                }
            }
        }

        settled.remove_zero();
        let input_edges = self.nonzero_edge_count();
        if settled.edge_count() > input_edges {
            warn!(
                "simplification produced {} edges from {}; keeping the input",
                settled.edge_count(),
                input_edges
            );
            let mut input = self.clone();
            input.remove_zero();
            return Ok(input);
        }
        Ok(settled)
    }
}

/// Settle `graph` if it has become trivial, or hand back its pieces if it
/// has fallen apart. `None` means it still needs work.
fn check_progress(graph: &DebtGraph, settled: &mut DebtGraph) -> Result<Option<Outcome>, GraphError> {
    let parts = split_graph(graph)?;
    if parts.len() >= 2 {
        return Ok(Some(Outcome::Requeue(parts)));
    }
    if graph.edge_count() < 2 {
        settled.absorb(graph)?;
        return Ok(Some(Outcome::Settled));
    }
    Ok(None)
}

fn reduce_component(
    mut graph: DebtGraph,
    rotation: &CyclicCursor<WeightStrategy>,
    settled: &mut DebtGraph,
) -> Result<Outcome, GraphError> {
    if graph.edge_count() < 2 {
        settled.absorb(&graph)?;
        return Ok(Outcome::Settled);
    }

    if let Some(star) = graph.star_settlement()? {
        debug!(
            "star settlement: {} -> {} edges",
            graph.edge_count(),
            star.edge_count()
        );
        graph = star;
        if let Some(outcome) = check_progress(&graph, settled)? {
            return Ok(outcome);
        }
    }

    let collapsed = graph.integrate_same_weight()?;
    if collapsed > 0 {
        debug!("collapsed {} equal-amount chains", collapsed);
    }
    if let Some(outcome) = check_progress(&graph, settled)? {
        return Ok(outcome);
    }

    let eulerization = graph.eulerize()?;
    for cut in &eulerization.cuts {
        debug!("settling bridge {} -> {} ({}) directly", cut.from, cut.to, cut.amount);
        settled.plus_weight(cut.from, cut.to, cut.amount)?;
    }
    if let Some(outcome) = check_progress(&graph, settled)? {
        return Ok(outcome);
    }

    let start = match eulerization.start {
        Some(vertex) if graph.degree(vertex)? > 0 => vertex,
        _ => match graph.active_vertices().next() {
            Some(vertex) => vertex,
            None => return Ok(Outcome::Settled),
        },
    };
    let root = FlattenedGraph::from_circuit(rotation.clone(), graph.find_euler_circuit(start)?);
    let fragments = cancel_cycles(root);

    let mut pieces = Vec::with_capacity(fragments.len());
    for fragment in &fragments {
        let mut piece = DebtGraph::new(graph.vertex_count());
        piece.add_flattened(fragment)?;
        pieces.push(piece);
    }

    if pieces.len() == 1 {
        settled.absorb(&pieces[0])?;
        return Ok(Outcome::Settled);
    }
    Ok(Outcome::Requeue(pieces))
}

/// Cut fragments repeatedly until each one stops shrinking.
fn cancel_cycles(root: FlattenedGraph) -> Vec<FlattenedGraph> {
    let mut queue = VecDeque::from([root]);
    let mut done = Vec::new();

    while let Some(fragment) = queue.pop_front() {
        let split = fragment.remove_and_split();
        if split.len() == 1 && split[0].circuit().len() == fragment.circuit().len() {
            done.push(fragment);
            continue;
        }
        trace!(
            "{} cut a {}-vertex fragment into {}",
            fragment.strategy(),
            fragment.circuit().len(),
            split.len()
        );
        queue.extend(split);
    }
    done
}
