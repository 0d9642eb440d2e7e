pub mod debt;
pub mod index;
pub mod ledger;
pub mod party;
