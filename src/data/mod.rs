//! Tabular datasets and the train/test split consumed by the search.

mod csv;
mod dataset;
mod split;
mod synthetic;

pub use dataset::*;
pub use split::*;
pub use synthetic::*;
