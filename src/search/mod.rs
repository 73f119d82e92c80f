//! Lattice search over feature subsets.
//!
//! States are subsets, transitions add one feature, and the AOR table
//! credits each feature with the values of the states it was added to.

mod aor;
mod exploration;
mod memo;
mod ranking;
mod selector;
mod stagnation;
mod state;
mod transition;

pub use aor::*;
pub use exploration::*;
pub use memo::*;
pub use ranking::*;
pub use selector::*;
pub use stagnation::*;
pub use state::*;
pub use transition::*;
