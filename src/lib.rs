//! # debt-optimizer
//!
//! Debt simplification for shared-expense groups.
//!
//! Given who owes whom, this crate computes an equivalent set of payments
//! with far fewer transfers while leaving every participant's net balance
//! exactly as it was. Finding the true minimum is NP-hard; the engine is a
//! heuristic built from component splitting, Eulerian circuits and
//! cancellation of recurring amounts around them.
//!
//! ## Architecture
//!
//! - **core** — Parties, debts, the party/vertex index and the ledger
//! - **graph** — The signed debt graph, union-find splitting, Eulerization
//! - **optimization** — Cycle cancellation, weight strategies, the
//!   `summarize` pipeline and the [`DebtSimplifier`](optimization::simplifier::DebtSimplifier) facade
//! - **simulation** — Seeded random debt networks
//!
//! ## Example
//!
//! ```
//! use debt_optimizer::prelude::*;
//!
//! let debts: DebtSet = vec![
//!     Debt::new("alice".into(), "bob".into(), 40),
//!     Debt::new("bob".into(), "carol".into(), 40),
//! ]
//! .into_iter()
//! .collect();
//!
//! let result = DebtSimplifier::simplify(&debts).unwrap();
//! assert_eq!(result.transfers_after(), 1);
//! assert!(result.is_valid());
//! ```

pub mod core;
pub mod graph;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::debt::{Debt, DebtError, DebtSet};
    pub use crate::core::index::{ParticipantIndex, Transfer};
    pub use crate::core::ledger::Ledger;
    pub use crate::core::party::PartyId;
    pub use crate::graph::debt_graph::{Amount, DebtGraph};
    pub use crate::graph::error::GraphError;
    pub use crate::optimization::config::SummarizeConfig;
    pub use crate::optimization::simplifier::{DebtSimplifier, SimplificationResult};
    pub use crate::optimization::strategy::WeightStrategy;
}
