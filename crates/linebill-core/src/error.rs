//! Unified error handling for LineBill
//!
//! Every failure a contract, a phone line or the configuration layer can
//! report is a variant of [`BillingError`]. Contract operations are
//! all-or-nothing: when one returns `Err`, neither the contract nor its
//! bound bill has been modified.

use thiserror::Error;

/// Main billing error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    // ==================== Contract State Errors ====================
    #[error("No bill is bound to the contract; advance it to a month first")]
    UnboundBill,

    #[error("Contract has been cancelled")]
    ContractCancelled,

    // ==================== Input Errors ====================
    #[error("Invalid billing period: month {month} of {year}")]
    InvalidPeriod { month: u32, year: i32 },

    #[error("Invalid term: ends {end} before it starts {start}")]
    InvalidTerm { start: String, end: String },

    #[error("Invalid prepaid top-up amount: {0}")]
    InvalidTopUp(f64),

    #[error("Adding {0} minutes would overflow the bill's minute counter")]
    MinuteOverflow(u32),

    #[error("Call {src} -> {dst} does not belong to line {line}")]
    LineMismatch {
        line: String,
        src: String,
        dst: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BillingError {
    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BillingError::UnboundBill => "unbound_bill",
            BillingError::ContractCancelled => "contract_cancelled",
            BillingError::InvalidPeriod { .. } => "invalid_period",
            BillingError::InvalidTerm { .. } => "invalid_term",
            BillingError::InvalidTopUp(_) => "invalid_top_up",
            BillingError::MinuteOverflow(_) => "minute_overflow",
            BillingError::LineMismatch { .. } => "line_mismatch",
            BillingError::Validation(_) => "validation_error",
            BillingError::Config(_) => "config_error",
            BillingError::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the error is a caller precondition violation on a contract
    /// (operating on it before its first month or after cancellation)
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            BillingError::UnboundBill | BillingError::ContractCancelled
        )
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for BillingError {
    fn from(err: serde_json::Error) -> Self {
        BillingError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for BillingError {
    fn from(err: config::ConfigError) -> Self {
        BillingError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BillingError {
    fn from(err: validator::ValidationErrors) -> Self {
        BillingError::Validation(err.to_string())
    }
}
