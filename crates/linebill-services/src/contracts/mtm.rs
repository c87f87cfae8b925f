//! Month-to-month contract
//!
//! Flat monthly fee, no deposit, no free minutes: every minute is billed.

use chrono::NaiveDate;
use linebill_core::{
    config::MtmPlan,
    models::{Bill, Call, ContractKind, ContractStatus},
    BillingResult, Contract,
};
use tracing::{debug, info, instrument};
use validator::Validate;

use super::ContractState;

/// Month-to-month contract
#[derive(Debug, Clone)]
pub struct MtmContract {
    state: ContractState,
    plan: MtmPlan,
}

impl MtmContract {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            state: ContractState::new(start),
            plan: MtmPlan::default(),
        }
    }

    /// Create a month-to-month contract with an explicit tariff
    pub fn with_plan(start: NaiveDate, plan: MtmPlan) -> BillingResult<Self> {
        plan.validate()?;

        Ok(Self {
            state: ContractState::new(start),
            plan,
        })
    }

    #[inline]
    pub fn plan(&self) -> &MtmPlan {
        &self.plan
    }
}

impl Contract for MtmContract {
    #[instrument(skip(self, bill), fields(start = %self.state.start()))]
    fn new_month(&mut self, month: u32, year: i32, bill: Bill) -> BillingResult<()> {
        let (period, bill) = self.state.bind(month, year, bill)?;
        bill.set_rate(ContractKind::MonthToMonth, self.plan.minute_rate);
        bill.add_fixed_cost(self.plan.monthly_fee);

        debug!("MTM contract advanced to {}", period);
        Ok(())
    }

    #[instrument(skip(self, call), fields(duration = call.duration))]
    fn bill_call(&mut self, call: &Call) -> BillingResult<()> {
        let bill = self.state.current_bill_mut()?;
        bill.add_billed_minutes(call.billed_minutes())?;
        Ok(())
    }

    #[instrument(skip(self), fields(start = %self.state.start()))]
    fn cancel(&mut self) -> BillingResult<f64> {
        let settlement = self.state.current_bill()?.cost();
        self.state.close();

        info!("MTM contract cancelled, settlement {}", settlement);
        Ok(settlement)
    }

    fn start(&self) -> NaiveDate {
        self.state.start()
    }

    fn kind(&self) -> ContractKind {
        ContractKind::MonthToMonth
    }

    fn status(&self) -> ContractStatus {
        self.state.status()
    }

    fn bill(&self) -> Option<&Bill> {
        self.state.bill()
    }
}
