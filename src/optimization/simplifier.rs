use crate::core::debt::DebtSet;
use crate::core::index::{ParticipantIndex, Transfer};
use crate::core::ledger::Ledger;
use crate::graph::debt_graph::Amount;
use crate::graph::error::GraphError;
use crate::optimization::config::SummarizeConfig;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Before-and-after view of one simplification.
///
/// `original` holds the recorded debts already netted per pair, so a pair
/// with debts both ways counts once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplificationResult {
    original: Vec<Transfer>,
    simplified: Vec<Transfer>,
    ledger: Ledger,
    recorded_debts: usize,
    gross_before: Amount,
    gross_after: Amount,
    valid: bool,
}

impl SimplificationResult {
    pub fn original(&self) -> &[Transfer] {
        &self.original
    }

    /// The transfers that settle the group.
    pub fn simplified(&self) -> &[Transfer] {
        &self.simplified
    }

    /// Net position of every party, as recorded.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Number of debts submitted, before any netting.
    pub fn recorded_debts(&self) -> usize {
        self.recorded_debts
    }

    pub fn transfers_before(&self) -> usize {
        self.original.len()
    }

    pub fn transfers_after(&self) -> usize {
        self.simplified.len()
    }

    /// Total amount moved by the pairwise-netted debts.
    pub fn gross_before(&self) -> Amount {
        self.gross_before
    }

    /// Total amount moved by the simplified transfers.
    pub fn gross_after(&self) -> Amount {
        self.gross_after
    }

    /// Share of transfers removed, in percent.
    pub fn reduction_percent(&self) -> f64 {
        if self.original.is_empty() {
            return 0.0;
        }
        let removed = self.original.len() - self.simplified.len();
        removed as f64 * 100.0 / self.original.len() as f64
    }

    /// Whether the simplified transfers leave every party with its recorded
    /// position.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Turns a group's debts into the smallest set of transfers it can find.
pub struct DebtSimplifier;

impl DebtSimplifier {
    pub fn simplify(debts: &DebtSet) -> Result<SimplificationResult, GraphError> {
        Self::simplify_with(debts, &SummarizeConfig::default())
    }

    /// # Algorithm
    ///
    /// 1. Index the parties and net the debts into one edge per pair.
    /// 2. Summarize the resulting graph.
    /// 3. Map the summarized edges back to named transfers and check them
    ///    against the ledger of the recorded debts.
    pub fn simplify_with(
        debts: &DebtSet,
        config: &SummarizeConfig,
    ) -> Result<SimplificationResult, GraphError> {
        let index = ParticipantIndex::from_debts(debts);
        let graph = index.build_graph(debts)?;
        let summarized = graph.summarize_with(config)?;

        let original = index.transfers(&graph)?;
        let simplified = index.transfers(&summarized)?;
        let ledger = Ledger::from_debts(debts.debts());
        let valid = ledger.is_balanced() && ledger.same_positions(&Ledger::from_transfers(&simplified));

        info!(
            "simplified {} debts among {} parties: {} -> {} transfers",
            debts.len(),
            index.len(),
            original.len(),
            simplified.len()
        );

        Ok(SimplificationResult {
            gross_before: graph.gross_total(),
            gross_after: summarized.gross_total(),
            recorded_debts: debts.len(),
            original,
            simplified,
            ledger,
            valid,
        })
    }
}

impl fmt::Display for SimplificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simplification Result ===")?;
        writeln!(f, "Recorded debts:    {}", self.recorded_debts)?;
        writeln!(f, "Transfers before:  {}", self.transfers_before())?;
        writeln!(f, "Transfers after:   {}", self.transfers_after())?;
        writeln!(f, "Reduction:         {:.1}%", self.reduction_percent())?;
        writeln!(f, "Gross before:      {}", self.gross_before)?;
        writeln!(f, "Gross after:       {}", self.gross_after)?;
        writeln!(f, "Valid:             {}", self.valid)?;

        if !self.simplified.is_empty() {
            writeln!(f, "\n--- Transfers ---")?;
            for t in &self.simplified {
                writeln!(f, "  {} pays {} {}", t.from, t.to, t.amount)?;
            }
        }
        Ok(())
    }
}
