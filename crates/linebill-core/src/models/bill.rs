//! Bill model
//!
//! The per-line, per-month ledger a contract charges against. A bill is
//! pure arithmetic: the owning contract decides what goes into it.

use serde::{Deserialize, Serialize};

use super::ContractKind;
use crate::{BillingError, BillingResult};

/// One month of charges for one line
///
/// Created fresh at every month advancement and handed to the line's
/// contract, which sets the rate and fixed charges and then bills calls
/// against it. Total cost is `fixed + min_rate * billed_min`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bill {
    contract_type: Option<ContractKind>,
    fixed: f64,
    free_min: u32,
    billed_min: u32,
    min_rate: f64,
}

impl Bill {
    /// Create an empty bill
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contract type label and the per-minute rate
    pub fn set_rate(&mut self, contract_type: ContractKind, min_rate: f64) {
        self.contract_type = Some(contract_type);
        self.min_rate = min_rate;
    }

    /// Add a one-time or monthly charge
    ///
    /// Negative amounts are allowed: prepaid credit is carried as a
    /// negative fixed cost.
    pub fn add_fixed_cost(&mut self, amount: f64) {
        self.fixed += amount;
    }

    /// Grant free minutes for the month
    ///
    /// Fails without modifying the bill if the counter would overflow.
    pub fn add_free_minutes(&mut self, minutes: u32) -> BillingResult<()> {
        self.free_min = self
            .free_min
            .checked_add(minutes)
            .ok_or(BillingError::MinuteOverflow(minutes))?;
        Ok(())
    }

    /// Replace the remaining free minutes
    pub fn set_free_minutes(&mut self, minutes: u32) {
        self.free_min = minutes;
    }

    /// Add minutes charged at the per-minute rate
    ///
    /// Fails without modifying the bill if the counter would overflow.
    pub fn add_billed_minutes(&mut self, minutes: u32) -> BillingResult<()> {
        self.billed_min = self
            .billed_min
            .checked_add(minutes)
            .ok_or(BillingError::MinuteOverflow(minutes))?;
        Ok(())
    }

    #[inline]
    pub fn contract_type(&self) -> Option<ContractKind> {
        self.contract_type
    }

    #[inline]
    pub fn fixed_cost(&self) -> f64 {
        self.fixed
    }

    #[inline]
    pub fn free_minutes(&self) -> u32 {
        self.free_min
    }

    #[inline]
    pub fn billed_minutes(&self) -> u32 {
        self.billed_min
    }

    #[inline]
    pub fn min_rate(&self) -> f64 {
        self.min_rate
    }

    /// Total cost of the month so far
    #[inline]
    pub fn cost(&self) -> f64 {
        self.fixed + self.min_rate * f64::from(self.billed_min)
    }

    /// Read-only summary for statements
    pub fn summary(&self) -> BillSummary {
        BillSummary {
            contract_type: self.contract_type,
            fixed: self.fixed,
            free_mins: self.free_min,
            billed_mins: self.billed_min,
            min_rate: self.min_rate,
            total: self.cost(),
        }
    }
}

/// Snapshot of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    /// Contract type label (None until a contract has set the rate)
    #[serde(rename = "type")]
    pub contract_type: Option<ContractKind>,

    /// Accumulated fixed charges
    pub fixed: f64,

    /// Free minutes still available
    pub free_mins: u32,

    /// Minutes charged at the per-minute rate
    pub billed_mins: u32,

    /// Per-minute rate
    pub min_rate: f64,

    /// `fixed + min_rate * billed_mins`
    pub total: f64,
}
