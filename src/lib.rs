pub mod config;
pub mod dag;
pub mod error;
pub mod reports;
pub mod types;

pub use dag::Dag;
pub use error::{DagError, DagResult};
pub use types::Declaration;
