//! LineBill Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the LineBill system. It includes:
//!
//! - Domain models (Bill, Call, BillingPeriod, ContractKind)
//! - The `Contract` trait every contract variant implements
//! - Unified error handling with stable error codes
//! - Tariff configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::BillingConfig;
pub use error::BillingError;
pub use traits::Contract;

/// Result type alias using BillingError
pub type BillingResult<T> = Result<T, BillingError>;

/// Default tariff constants
///
/// These seed the serde defaults of [`BillingConfig`] and the `new`
/// constructors of each contract.
pub mod constants {
    /// Monthly fee of a month-to-month contract
    pub const MTM_MONTHLY_FEE: f64 = 50.00;

    /// Per-minute rate of a month-to-month contract
    pub const MTM_MINS_COST: f64 = 0.05;

    /// Monthly fee of a term contract
    pub const TERM_MONTHLY_FEE: f64 = 20.00;

    /// One-time deposit charged in the first month of a term contract
    pub const TERM_DEPOSIT: f64 = 300.00;

    /// Free minutes included each month in a term contract
    pub const TERM_MINS: u32 = 100;

    /// Per-minute rate of a term contract
    pub const TERM_MINS_COST: f64 = 0.1;

    /// Per-minute rate of a prepaid contract
    pub const PREPAID_MINS_COST: f64 = 0.025;

    /// Remaining prepaid credit below which a month starts with a top-up
    pub const PREPAID_TOP_UP_THRESHOLD: f64 = 10.00;

    /// Credit added by one prepaid top-up
    pub const PREPAID_TOP_UP_AMOUNT: f64 = 25.00;
}
