//! Settling a shared trip.
//!
//! Six friends paid for different parts of a weekend away. This example
//! shows how many transfers the recorded debts would take and how many
//! the simplified settlement needs.

use debt_optimizer::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  debt-optimizer: Group Trip Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let recorded = [
        ("alice", "bob", 4_500),   // cabin deposit
        ("carol", "bob", 4_500),
        ("dave", "bob", 4_500),
        ("bob", "erin", 1_200),    // groceries
        ("alice", "erin", 1_200),
        ("erin", "frank", 800),    // fuel
        ("frank", "carol", 2_300), // dinner
        ("dave", "carol", 2_300),
        ("carol", "alice", 650),   // boat rental
        ("frank", "alice", 650),
        ("bob", "dave", 900),      // tickets
    ];

    let debts: DebtSet = recorded
        .iter()
        .map(|&(from, to, amount)| Debt::new(PartyId::new(from), PartyId::new(to), amount))
        .collect();

    println!("━━━ Recorded debts ━━━\n");
    for d in debts.debts() {
        println!("  {:<6} owes {:<6} {:>6}", d.debtor(), d.creditor(), d.amount());
    }

    println!("\n━━━ Net balances ━━━\n");
    let ledger = Ledger::from_debts(debts.debts());
    for (party, balance) in ledger.positions() {
        println!("  {:<6} {:>+7}", party, balance);
    }

    let result = match DebtSimplifier::simplify(&debts) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("simplification failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n{}", result);

    println!("━━━ Interpretation ━━━\n");
    println!(
        "  {} recorded debts net to {} pairwise transfers; the group can",
        result.recorded_debts(),
        result.transfers_before()
    );
    println!(
        "  settle with {} instead, and everyone ends up exactly even.",
        result.transfers_after()
    );
}
