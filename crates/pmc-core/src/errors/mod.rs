//! Error handling for the PMC engine.
//! One error enum per concern, `thiserror` only, zero `anyhow`.
//!
//! Only input validation and configuration loading can fail. Numerical
//! trouble inside the engine degrades to a documented fallback and is
//! reported through `Recovery` diagnostics instead.

pub mod config_error;
pub mod error_code;
pub mod estimation_error;
pub mod input_error;

pub use config_error::ConfigError;
pub use error_code::PmcErrorCode;
pub use estimation_error::EstimationError;
pub use input_error::InputError;
