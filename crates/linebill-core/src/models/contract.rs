//! Contract classification
//!
//! The kind of contract a line is on and the lifecycle state the contract
//! is in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract type enumeration
///
/// Serialized and displayed as the bill's type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Fixed-term contract with deposit and free minutes
    #[serde(rename = "TermContract")]
    Term,
    /// Month-to-month contract with a flat fee
    #[serde(rename = "MTMContract")]
    MonthToMonth,
    /// Prepaid contract debiting a credit balance
    #[serde(rename = "PrepaidContract")]
    Prepaid,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Term => write!(f, "TermContract"),
            ContractKind::MonthToMonth => write!(f, "MTMContract"),
            ContractKind::Prepaid => write!(f, "PrepaidContract"),
        }
    }
}

impl ContractKind {
    /// Parse from string (case-insensitive)
    ///
    /// Accepts both the short names used in customer records
    /// (`term`, `mtm`, `prepaid`) and the bill labels.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "term" | "termcontract" => Some(ContractKind::Term),
            "mtm" | "mtmcontract" => Some(ContractKind::MonthToMonth),
            "prepaid" | "prepaidcontract" => Some(ContractKind::Prepaid),
            _ => None,
        }
    }
}

/// Contract lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Constructed, not yet advanced to any month
    #[default]
    Pending,
    /// Bound to a month's bill
    Active,
    /// Cancelled - terminal
    Cancelled,
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Pending => write!(f, "pending"),
            ContractStatus::Active => write!(f, "active"),
            ContractStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl ContractStatus {
    /// Check if calls can be billed in this state
    pub fn can_bill(&self) -> bool {
        matches!(self, ContractStatus::Active)
    }

    /// Check if the contract can still be advanced to a new month
    pub fn can_advance(&self) -> bool {
        !matches!(self, ContractStatus::Cancelled)
    }
}
