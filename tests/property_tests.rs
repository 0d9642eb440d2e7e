use debt_optimizer::core::debt::{Debt, DebtSet};
use debt_optimizer::core::ledger::Ledger;
use debt_optimizer::core::party::PartyId;
use debt_optimizer::graph::debt_graph::{Amount, DebtGraph};
use debt_optimizer::graph::union_find::split_graph;
use debt_optimizer::optimization::config::SummarizeConfig;
use debt_optimizer::optimization::simplifier::DebtSimplifier;
use debt_optimizer::optimization::strategy::WeightStrategy;
use petgraph::graph::{NodeIndex, UnGraph};
use proptest::prelude::*;
use std::collections::BTreeSet;

const VERTICES: usize = 8;

/// Random graph over a small vertex pool; amounts are accumulated so
/// repeated pairs net out the way recorded debts do.
fn arb_graph() -> impl Strategy<Value = DebtGraph> {
    prop::collection::vec((0..VERTICES, 0..VERTICES, -500i64..500), 0..30).prop_map(|edges| {
        let mut g = DebtGraph::new(VERTICES);
        for (from, to, amount) in edges {
            if from != to {
                g.plus_weight(from, to, amount).unwrap();
            }
        }
        g
    })
}

/// Amounts drawn from a handful of values so equal weights are common.
fn arb_repetitive_graph() -> impl Strategy<Value = DebtGraph> {
    let amount = prop::sample::select(vec![5i64, 10, 20, 25]);
    prop::collection::vec((0..VERTICES, 0..VERTICES, amount), 0..24).prop_map(|edges| {
        let mut g = DebtGraph::new(VERTICES);
        for (from, to, amount) in edges {
            if from != to && g.weight(from, to).unwrap().is_none() {
                g.add_edge(from, to, amount).unwrap();
            }
        }
        g
    })
}

fn arb_party() -> impl Strategy<Value = PartyId> {
    prop::sample::select(vec![
        PartyId::new("alice"),
        PartyId::new("bob"),
        PartyId::new("carol"),
        PartyId::new("dave"),
        PartyId::new("erin"),
        PartyId::new("frank"),
    ])
}

fn arb_debt_set() -> impl Strategy<Value = DebtSet> {
    let debt = (arb_party(), arb_party(), 1i64..10_000).prop_filter_map(
        "debtor must differ from creditor",
        |(debtor, creditor, amount)| {
            if debtor == creditor {
                None
            } else {
                Some(Debt::new(debtor, creditor, amount))
            }
        },
    );
    prop::collection::vec(debt, 1..40).prop_map(|debts| debts.into_iter().collect::<DebtSet>())
}

fn arb_config() -> impl Strategy<Value = SummarizeConfig> {
    prop::collection::vec(prop::sample::select(WeightStrategy::ALL.to_vec()), 1..4)
        .prop_map(|strategies| SummarizeConfig::new(strategies, 10_000).unwrap())
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Balances always sum to zero.
    // ===================================================================
    #[test]
    fn balances_sum_to_zero(g in arb_graph()) {
        prop_assert_eq!(g.balances().iter().sum::<Amount>(), 0);
        let result = g.summarize().unwrap();
        prop_assert_eq!(result.balances().iter().sum::<Amount>(), 0);
    }

    // ===================================================================
    // INVARIANT 2: Summarizing never changes anyone's balance.
    // ===================================================================
    #[test]
    fn summarize_preserves_balances(g in arb_graph()) {
        let result = g.summarize().unwrap();
        prop_assert_eq!(result.balances(), g.balances());
    }

    #[test]
    fn summarize_preserves_balances_with_repeated_amounts(g in arb_repetitive_graph()) {
        let result = g.summarize().unwrap();
        prop_assert_eq!(result.balances(), g.balances());
    }

    // ===================================================================
    // INVARIANT 3: The result never has more transfers than the input,
    // and never carries a zero-weight edge.
    // ===================================================================
    #[test]
    fn summarize_never_adds_edges(g in arb_graph()) {
        let result = g.summarize().unwrap();
        prop_assert!(result.edge_count() <= g.nonzero_edge_count());
        prop_assert!(result.edges().iter().all(|e| e.weight != 0));
    }

    // ===================================================================
    // INVARIANT 4: Every strategy rotation is balance preserving.
    // ===================================================================
    #[test]
    fn any_rotation_preserves_balances(g in arb_repetitive_graph(), config in arb_config()) {
        let result = g.summarize_with(&config).unwrap();
        prop_assert_eq!(result.balances(), g.balances());
        prop_assert!(result.edge_count() <= g.nonzero_edge_count());
    }

    // ===================================================================
    // INVARIANT 5: Summarizing a summarized graph keeps the same
    // balances and the same number of edges.
    // ===================================================================
    #[test]
    fn second_pass_is_stable(g in arb_graph()) {
        let once = g.summarize().unwrap();
        let twice = once.summarize().unwrap();
        prop_assert_eq!(twice.balances(), once.balances());
        prop_assert_eq!(twice.edge_count(), once.edge_count());
    }

    #[test]
    fn second_pass_is_stable_with_repeated_amounts(g in arb_repetitive_graph()) {
        let once = g.summarize().unwrap();
        let twice = once.summarize().unwrap();
        prop_assert_eq!(twice.edge_count(), once.edge_count());
    }

    // ===================================================================
    // INVARIANT 6: Splitting partitions the edges, and the number of
    // components agrees with petgraph.
    // ===================================================================
    #[test]
    fn split_matches_petgraph_components(g in arb_graph()) {
        let parts = split_graph(&g).unwrap();

        let mut pg = UnGraph::<(), ()>::new_undirected();
        for _ in 0..g.vertex_count() {
            pg.add_node(());
        }
        for e in g.edges() {
            pg.add_edge(NodeIndex::new(e.from), NodeIndex::new(e.to), ());
        }
        let isolated = (0..g.vertex_count())
            .filter(|&v| g.degree(v).unwrap() == 0)
            .count();
        prop_assert_eq!(parts.len() + isolated, petgraph::algo::connected_components(&pg));

        let total: usize = parts.iter().map(|p| p.edge_count()).sum();
        prop_assert_eq!(total, g.edge_count());
        let mut rebuilt = DebtGraph::new(g.vertex_count());
        for part in &parts {
            rebuilt.absorb(part).unwrap();
        }
        prop_assert_eq!(rebuilt.balances(), g.balances());
    }

    // ===================================================================
    // INVARIANT 7: After Eulerization every component has an Euler
    // circuit that uses each of its edges exactly once.
    // ===================================================================
    #[test]
    fn eulerized_components_have_circuits(g in arb_graph()) {
        let mut g = g;
        let before = g.balances();
        let eulerization = g.eulerize().unwrap();

        let mut with_cuts = g.clone();
        for cut in &eulerization.cuts {
            with_cuts.plus_weight(cut.from, cut.to, cut.amount).unwrap();
        }
        prop_assert_eq!(with_cuts.balances(), before);

        for part in split_graph(&g).unwrap() {
            let start = (0..part.vertex_count())
                .find(|&v| part.degree(v).unwrap() > 0)
                .unwrap();
            let euler = part.find_euler_circuit(start).unwrap();

            prop_assert_eq!(euler.circuit.len(), part.edge_count() + 1);
            prop_assert_eq!(euler.weights.len(), part.edge_count());
            prop_assert_eq!(euler.circuit.first(), euler.circuit.last());

            let mut seen = BTreeSet::new();
            for (step, &weight) in euler.circuit.windows(2).zip(&euler.weights) {
                prop_assert_eq!(part.weight(step[0], step[1]).unwrap(), Some(weight));
                prop_assert!(seen.insert((step[0].min(step[1]), step[0].max(step[1]))));
            }
        }
    }

    // ===================================================================
    // INVARIANT 8: The facade's transfers reproduce the recorded ledger.
    // ===================================================================
    #[test]
    fn simplifier_output_is_valid(set in arb_debt_set()) {
        let result = DebtSimplifier::simplify(&set).unwrap();
        prop_assert!(result.is_valid());
        prop_assert!(result.transfers_after() <= result.transfers_before());
        prop_assert!(result.simplified().iter().all(|t| t.amount > 0 && t.from != t.to));

        let recorded = Ledger::from_debts(set.debts());
        let settled = Ledger::from_transfers(result.simplified());
        prop_assert!(recorded.same_positions(&settled));
    }
}
