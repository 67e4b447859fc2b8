//! Topologically declared DAG and the queries run against it:
//! leaves, memoized ancestor sets and bisection.

pub mod bisect;
pub mod graph;
pub mod loader;

pub use graph::Dag;
pub use loader::{load_declarations, parse_declarations, InputFormat};
