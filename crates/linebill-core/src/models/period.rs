//! Billing period model
//!
//! A billing period is one calendar month of one year. Periods order
//! chronologically (by year, then month).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BillingError;
use crate::BillingResult;

/// A validated (month, year) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts")]
pub struct BillingPeriod {
    // Field order drives the derived ordering: year first.
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct PeriodParts {
    year: i32,
    month: u32,
}

impl TryFrom<PeriodParts> for BillingPeriod {
    type Error = BillingError;

    fn try_from(parts: PeriodParts) -> Result<Self, Self::Error> {
        BillingPeriod::new(parts.month, parts.year)
    }
}

impl BillingPeriod {
    /// Create a period, rejecting months outside 1..=12
    pub fn new(month: u32, year: i32) -> BillingResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(BillingError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// The period a calendar date falls in
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The period immediately after this one
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
