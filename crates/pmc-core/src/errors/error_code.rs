//! PmcErrorCode trait for the spreadsheet/API boundary.

/// Trait for converting PMC errors to structured error codes.
/// Every error enum implements this so the API layer can surface a
/// stable code string next to the human-readable message.
pub trait PmcErrorCode {
    /// Returns the error code string (e.g., "INPUT_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted API error string: `[ERROR_CODE] message`.
    fn api_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the API boundary.
pub const INPUT_ERROR: &str = "INPUT_ERROR";
pub const OUT_OF_ORDER: &str = "OUT_OF_ORDER";
pub const ZERO_RANGE: &str = "ZERO_RANGE";
pub const NON_FINITE: &str = "NON_FINITE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const BUDGET_EXHAUSTED: &str = "BUDGET_EXHAUSTED";
