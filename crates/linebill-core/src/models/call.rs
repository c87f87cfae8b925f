//! Call model
//!
//! A call placed between two phone lines, as delivered by the ingestion layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::BillingPeriod;

/// (longitude, latitude) of a call endpoint
pub type Location = (f64, f64);

/// Seconds per billed minute
const SECONDS_PER_MINUTE: u32 = 60;

/// A single call record
///
/// Contracts only read `duration`; the remaining fields identify the call
/// for line history and statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Calling line number
    pub src_number: String,

    /// Called line number
    pub dst_number: String,

    /// When the call was placed
    pub time: NaiveDateTime,

    /// Call duration in seconds
    pub duration: u32,

    /// Caller location
    pub src_loc: Location,

    /// Callee location
    pub dst_loc: Location,
}

impl Call {
    pub fn new(
        src_number: impl Into<String>,
        dst_number: impl Into<String>,
        time: NaiveDateTime,
        duration: u32,
        src_loc: Location,
        dst_loc: Location,
    ) -> Self {
        Self {
            src_number: src_number.into(),
            dst_number: dst_number.into(),
            time,
            duration,
            src_loc,
            dst_loc,
        }
    }

    /// Duration in whole minutes, rounded up
    ///
    /// A zero-second call bills zero minutes; one second bills one minute.
    #[inline]
    pub fn billed_minutes(&self) -> u32 {
        self.duration.div_ceil(SECONDS_PER_MINUTE)
    }

    /// The billing period the call falls in
    pub fn bill_period(&self) -> BillingPeriod {
        BillingPeriod::of_date(self.time.date())
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Call from {} to {} at {}, dur {}s",
            self.src_number, self.dst_number, self.time, self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn call_lasting(duration: u32) -> Call {
        let time = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Call::new("1234", "5678", time, duration, (-79.5, 43.7), (-79.4, 43.65))
    }

    #[test]
    fn test_billed_minutes_rounds_up() {
        assert_eq!(call_lasting(0).billed_minutes(), 0);
        assert_eq!(call_lasting(1).billed_minutes(), 1);
        assert_eq!(call_lasting(59).billed_minutes(), 1);
        assert_eq!(call_lasting(60).billed_minutes(), 1);
        assert_eq!(call_lasting(61).billed_minutes(), 2);
        assert_eq!(call_lasting(240_100).billed_minutes(), 4002);
    }

    #[test]
    fn test_bill_period() {
        let period = call_lasting(120).bill_period();
        assert_eq!(period.month(), 1);
        assert_eq!(period.year(), 2020);
    }

    #[test]
    fn test_display() {
        let s = call_lasting(120).to_string();
        assert!(s.contains("1234"));
        assert!(s.contains("5678"));
        assert!(s.contains("dur"));
    }

    #[test]
    fn test_serde_locations_as_pairs() {
        let call = call_lasting(10);
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["src_loc"][0], -79.5);
        assert_eq!(json["duration"], 10);

        let back: Call = serde_json::from_value(json).unwrap();
        assert_eq!(back, call);
    }
}
