pub mod debt_graph;
pub mod error;
pub mod euler;
pub mod union_find;
