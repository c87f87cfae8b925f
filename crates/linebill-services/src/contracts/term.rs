//! Term contract
//!
//! A fixed-term contract: a one-time deposit in the start month, a monthly
//! fee, and a monthly allotment of free minutes. Calls beyond the free
//! minutes are billed at the term rate. Cancelling on or after the term's
//! final month refunds the deposit; cancelling earlier forfeits it.

use chrono::NaiveDate;
use linebill_core::{
    config::TermPlan,
    models::{Bill, BillingPeriod, Call, ContractKind, ContractStatus},
    BillingError, BillingResult, Contract,
};
use tracing::{debug, info, instrument};
use validator::Validate;

use super::ContractState;

/// Fixed-term contract
#[derive(Debug, Clone)]
pub struct TermContract {
    state: ContractState,
    end: NaiveDate,
    current: BillingPeriod,
    plan: TermPlan,
}

impl TermContract {
    /// Create a term contract with the default tariff
    pub fn new(start: NaiveDate, end: NaiveDate) -> BillingResult<Self> {
        Self::with_plan(start, end, TermPlan::default())
    }

    /// Create a term contract with an explicit tariff
    ///
    /// Fails when the tariff is invalid or the term's final month precedes
    /// its start month.
    pub fn with_plan(start: NaiveDate, end: NaiveDate, plan: TermPlan) -> BillingResult<Self> {
        plan.validate()?;

        let first = BillingPeriod::of_date(start);
        if BillingPeriod::of_date(end) < first {
            return Err(BillingError::InvalidTerm {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self {
            state: ContractState::new(start),
            end,
            current: first,
            plan,
        })
    }

    /// Contractual expiry date
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The month the line was last advanced to (the start month before
    /// any advancement)
    #[inline]
    pub fn current_period(&self) -> BillingPeriod {
        self.current
    }

    #[inline]
    pub fn plan(&self) -> &TermPlan {
        &self.plan
    }
}

impl Contract for TermContract {
    #[instrument(skip(self, bill), fields(start = %self.state.start()))]
    fn new_month(&mut self, month: u32, year: i32, bill: Bill) -> BillingResult<()> {
        let first = BillingPeriod::of_date(self.state.start());
        let (period, bill) = self.state.bind(month, year, bill)?;

        if period == first {
            bill.add_fixed_cost(self.plan.deposit);
            info!("Charging term deposit {} for {}", self.plan.deposit, period);
        }

        bill.set_rate(ContractKind::Term, self.plan.minute_rate);
        bill.add_fixed_cost(self.plan.monthly_fee);
        bill.set_free_minutes(self.plan.free_minutes);

        self.current = period;
        debug!("Term contract advanced to {}", period);
        Ok(())
    }

    #[instrument(skip(self, call), fields(duration = call.duration))]
    fn bill_call(&mut self, call: &Call) -> BillingResult<()> {
        let minutes = call.billed_minutes();
        let bill = self.state.current_bill_mut()?;
        let free = bill.free_minutes();

        if minutes < free {
            bill.set_free_minutes(free - minutes);
        } else {
            // A call of exactly the remaining free minutes bills nothing.
            let overflow = minutes - free;
            bill.add_billed_minutes(overflow)?;
            bill.set_free_minutes(0);
            debug!("Free minutes exhausted, billing {} of {} minutes", overflow, minutes);
        }

        Ok(())
    }

    #[instrument(skip(self), fields(start = %self.state.start(), end = %self.end))]
    fn cancel(&mut self) -> BillingResult<f64> {
        let cost = self.state.current_bill()?.cost();
        let last = BillingPeriod::of_date(self.end);

        let settlement = if self.current < last {
            info!(
                "Term cancelled early at {} (ends {}), deposit forfeited",
                self.current, last
            );
            cost
        } else {
            info!("Term cancelled at {}, refunding deposit", self.current);
            cost - self.plan.deposit
        };

        self.state.close();
        Ok(settlement)
    }

    fn start(&self) -> NaiveDate {
        self.state.start()
    }

    fn kind(&self) -> ContractKind {
        ContractKind::Term
    }

    fn status(&self) -> ContractStatus {
        self.state.status()
    }

    fn bill(&self) -> Option<&Bill> {
        self.state.bill()
    }
}
