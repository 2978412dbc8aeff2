//! Context correlation and moment mapping.

pub mod copula;
pub mod mapper;

pub use mapper::{CopulaMomentMapper, MomentBreakdown};
