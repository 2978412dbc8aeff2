//! Output assembly: final reshape, regression guard and the stage trail.

pub mod guard;
pub mod state;

pub use guard::{Assembler, Selection};
pub use state::StageTrail;
