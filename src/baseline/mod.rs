//! Classical baseline the learned ranking is measured against.

mod compare;
mod rfe;

pub use compare::*;
pub use rfe::*;
