//! Phone line driver
//!
//! A [`PhoneLine`] owns one contract and sequences it: it creates the bill
//! for every month, forwards outgoing calls to the contract, keeps the
//! line's call history, and archives the summary of each month as the
//! contract moves past it so statements stay available.

use linebill_core::{
    models::{Bill, BillSummary, BillingPeriod, Call},
    BillingError, BillingResult, Contract,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

use crate::contracts::AnyContract;

/// Monthly statement of one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub number: String,
    pub period: BillingPeriod,
    pub summary: BillSummary,
}

/// Outgoing and incoming calls of a line, grouped by billing period
#[derive(Debug, Clone, Default)]
pub struct CallHistory {
    outgoing: BTreeMap<BillingPeriod, Vec<Call>>,
    incoming: BTreeMap<BillingPeriod, Vec<Call>>,
}

impl CallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_outgoing(&mut self, call: Call) {
        self.outgoing.entry(call.bill_period()).or_default().push(call);
    }

    pub fn register_incoming(&mut self, call: Call) {
        self.incoming.entry(call.bill_period()).or_default().push(call);
    }

    /// Outgoing and incoming calls of one period, in arrival order
    pub fn monthly(&self, period: BillingPeriod) -> (&[Call], &[Call]) {
        let outgoing = self.outgoing.get(&period).map_or(&[][..], Vec::as_slice);
        let incoming = self.incoming.get(&period).map_or(&[][..], Vec::as_slice);
        (outgoing, incoming)
    }

    /// All outgoing and incoming calls, oldest period first
    pub fn all(&self) -> (Vec<&Call>, Vec<&Call>) {
        (
            self.outgoing.values().flatten().collect(),
            self.incoming.values().flatten().collect(),
        )
    }
}

/// A phone number and its contract
#[derive(Debug, Clone)]
pub struct PhoneLine {
    number: String,
    contract: AnyContract,
    current: Option<BillingPeriod>,
    archive: BTreeMap<BillingPeriod, BillSummary>,
    history: CallHistory,
}

impl PhoneLine {
    pub fn new(number: impl Into<String>, contract: impl Into<AnyContract>) -> Self {
        Self {
            number: number.into(),
            contract: contract.into(),
            current: None,
            archive: BTreeMap::new(),
            history: CallHistory::new(),
        }
    }

    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[inline]
    pub fn contract(&self) -> &AnyContract {
        &self.contract
    }

    /// The month the line was last advanced to
    #[inline]
    pub fn current_period(&self) -> Option<BillingPeriod> {
        self.current
    }

    /// Advance the line to `month` of `year` with a fresh bill
    ///
    /// Advancing to the month the line is already in restarts that month's
    /// bill.
    #[instrument(skip(self), fields(number = %self.number))]
    pub fn new_month(&mut self, month: u32, year: i32) -> BillingResult<()> {
        let period = BillingPeriod::new(month, year)?;
        let closing = self.contract.bill().map(Bill::summary);

        self.contract.new_month(month, year, Bill::new())?;

        if let (Some(previous), Some(summary)) = (self.current, closing) {
            if previous != period {
                self.archive.insert(previous, summary);
            }
        }
        self.current = Some(period);

        info!("Line {} advanced to {}", self.number, period);
        Ok(())
    }

    /// Record and bill a call placed from this line
    #[instrument(skip(self, call), fields(number = %self.number, duration = call.duration))]
    pub fn make_call(&mut self, call: Call) -> BillingResult<()> {
        if call.src_number != self.number {
            return Err(self.mismatch(&call));
        }

        self.contract.bill_call(&call)?;
        self.history.register_outgoing(call);
        Ok(())
    }

    /// Record a call received by this line. Incoming calls are not billed.
    pub fn receive_call(&mut self, call: Call) -> BillingResult<()> {
        if call.dst_number != self.number {
            return Err(self.mismatch(&call));
        }

        self.history.register_incoming(call);
        Ok(())
    }

    pub fn monthly_history(&self, period: BillingPeriod) -> (&[Call], &[Call]) {
        self.history.monthly(period)
    }

    #[inline]
    pub fn call_history(&self) -> &CallHistory {
        &self.history
    }

    /// Statement for `month` of `year`: the live bill for the current month,
    /// the archived summary for an earlier one, `None` if the line was never
    /// billed for it
    pub fn statement(&self, month: u32, year: i32) -> Option<Statement> {
        let period = BillingPeriod::new(month, year).ok()?;

        let summary = if self.current == Some(period) {
            self.contract.bill().map(Bill::summary)
        } else {
            self.archive.get(&period).cloned()
        }?;

        Some(Statement {
            number: self.number.clone(),
            period,
            summary,
        })
    }

    /// Cancel the line's contract and return the settlement
    #[instrument(skip(self), fields(number = %self.number))]
    pub fn cancel(&mut self) -> BillingResult<f64> {
        let settlement = self.contract.cancel()?;
        info!("Line {} cancelled, settlement {}", self.number, settlement);
        Ok(settlement)
    }

    fn mismatch(&self, call: &Call) -> BillingError {
        warn!("Call {} routed to unrelated line {}", call, self.number);
        BillingError::LineMismatch {
            line: self.number.clone(),
            src: call.src_number.clone(),
            dst: call.dst_number.clone(),
        }
    }
}
