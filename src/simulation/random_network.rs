//! Random debt networks for testing and benchmarking.
//!
//! Generation is seeded, so the same [`NetworkConfig`] always produces the
//! same [`DebtSet`].

use crate::core::debt::{Debt, DebtSet};
use crate::core::party::PartyId;
use crate::graph::debt_graph::Amount;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for generating a random debt network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of parties in the group.
    pub party_count: usize,
    /// Number of debts to record.
    pub debt_count: usize,
    /// Smallest amount of a single debt.
    pub min_amount: Amount,
    /// Largest amount of a single debt, inclusive.
    pub max_amount: Amount,
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            party_count: 10,
            debt_count: 30,
            min_amount: 1,
            max_amount: 10_000,
            seed: 42,
        }
    }
}

/// Parties are named `P-000`, `P-001`, ...; debtor and creditor of each
/// debt are always distinct. Fewer than two parties yield an empty set.
pub fn generate_random_network(config: &NetworkConfig) -> DebtSet {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut set = DebtSet::new();
    if config.party_count < 2 {
        return set;
    }

    let parties: Vec<PartyId> = (0..config.party_count)
        .map(|i| PartyId::new(format!("P-{:03}", i)))
        .collect();
    let min_amount = config.min_amount.max(1);
    let max_amount = config.max_amount.max(min_amount);

    for _ in 0..config.debt_count {
        let debtor = rng.gen_range(0..parties.len());
        // skip over the debtor so the pair is always distinct
        let mut creditor = rng.gen_range(0..parties.len() - 1);
        if creditor >= debtor {
            creditor += 1;
        }
        let amount = rng.gen_range(min_amount..=max_amount);

        set.add(Debt::new(
            parties[debtor].clone(),
            parties[creditor].clone(),
            amount,
        ));
    }

    set
}
