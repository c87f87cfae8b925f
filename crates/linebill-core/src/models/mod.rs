//! Domain models for LineBill
//!
//! This module contains all the core domain models used throughout the application.

pub mod bill;
pub mod call;
pub mod contract;
pub mod period;

pub use bill::{Bill, BillSummary};
pub use call::{Call, Location};
pub use contract::{ContractKind, ContractStatus};
pub use period::BillingPeriod;
