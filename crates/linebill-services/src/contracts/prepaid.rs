//! Prepaid contract
//!
//! The customer buys credit up front. The contract keeps a running balance
//! across months (negative = credit left, positive = owed); every month
//! starts by carrying that balance into the bill as a fixed cost, topping
//! the credit up first when it has run low. Calls debit the balance at the
//! prepaid rate.

use chrono::NaiveDate;
use linebill_core::{
    config::PrepaidPlan,
    models::{Bill, Call, ContractKind, ContractStatus},
    BillingError, BillingResult, Contract,
};
use tracing::{debug, info, instrument};
use validator::Validate;

use super::ContractState;

/// Prepaid contract
#[derive(Debug, Clone)]
pub struct PrepaidContract {
    state: ContractState,
    balance: f64,
    plan: PrepaidPlan,
}

impl PrepaidContract {
    /// Create a prepaid contract holding `top_up` of credit, with the
    /// default tariff
    pub fn new(start: NaiveDate, top_up: f64) -> BillingResult<Self> {
        Self::with_plan(start, top_up, PrepaidPlan::default())
    }

    /// Create a prepaid contract with an explicit tariff
    ///
    /// `top_up` must be a positive, finite amount and the tariff must
    /// validate.
    pub fn with_plan(start: NaiveDate, top_up: f64, plan: PrepaidPlan) -> BillingResult<Self> {
        plan.validate()?;
        if !top_up.is_finite() || top_up <= 0.0 {
            return Err(BillingError::InvalidTopUp(top_up));
        }

        Ok(Self {
            state: ContractState::new(start),
            balance: -top_up,
            plan,
        })
    }

    /// Running balance: negative while credit remains, positive when owed
    #[inline]
    pub fn balance(&self) -> f64 {
        self.balance
    }

    #[inline]
    pub fn plan(&self) -> &PrepaidPlan {
        &self.plan
    }
}

impl Contract for PrepaidContract {
    #[instrument(skip(self, bill), fields(start = %self.state.start(), balance = self.balance))]
    fn new_month(&mut self, month: u32, year: i32, bill: Bill) -> BillingResult<()> {
        let (period, bill) = self.state.bind(month, year, bill)?;
        bill.set_rate(ContractKind::Prepaid, self.plan.minute_rate);

        if self.balance > -self.plan.top_up_threshold {
            self.balance -= self.plan.top_up_amount;
            info!(
                "Credit low, topped up {} for {} (balance now {})",
                self.plan.top_up_amount, period, self.balance
            );
        }

        bill.add_fixed_cost(self.balance);
        debug!("Prepaid contract advanced to {}", period);
        Ok(())
    }

    #[instrument(skip(self, call), fields(duration = call.duration))]
    fn bill_call(&mut self, call: &Call) -> BillingResult<()> {
        let minutes = call.billed_minutes();
        let bill = self.state.current_bill_mut()?;
        bill.add_billed_minutes(minutes)?;

        // The balance outlives the bill, so it tracks the charge on its own.
        self.balance += f64::from(minutes) * self.plan.minute_rate;
        Ok(())
    }

    #[instrument(skip(self), fields(start = %self.state.start(), balance = self.balance))]
    fn cancel(&mut self) -> BillingResult<f64> {
        self.state.current_bill()?;

        // Unused credit is forfeited, not refunded.
        let settlement = if self.balance <= 0.0 { 0.0 } else { self.balance };
        self.state.close();

        info!("Prepaid contract cancelled, settlement {}", settlement);
        Ok(settlement)
    }

    fn start(&self) -> NaiveDate {
        self.state.start()
    }

    fn kind(&self) -> ContractKind {
        ContractKind::Prepaid
    }

    fn status(&self) -> ContractStatus {
        self.state.status()
    }

    fn bill(&self) -> Option<&Bill> {
        self.state.bill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::testing::*;
    use linebill_core::constants::{PREPAID_MINS_COST, PREPAID_TOP_UP_AMOUNT};
    use proptest::prelude::*;

    fn prepaid(top_up: f64) -> PrepaidContract {
        PrepaidContract::new(date(2017, 12, 25), top_up).unwrap()
    }

    #[test]
    fn test_top_up_stored_as_credit() {
        assert_eq!(prepaid(100.0).balance(), -100.0);
    }

    #[test]
    fn test_invalid_top_up_rejected() {
        let start = date(2017, 12, 25);
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = PrepaidContract::new(start, amount).unwrap_err();
            assert_eq!(err.error_code(), "invalid_top_up");
        }
    }

    #[test]
    fn test_first_month_carries_credit() {
        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();

        let summary = contract.bill().unwrap().summary();
        assert_eq!(summary.fixed, -100.0);
        assert_eq!(summary.total, -100.0);
        assert_eq!(summary.min_rate, PREPAID_MINS_COST);
        assert_eq!(summary.free_mins, 0);
        assert_eq!(summary.contract_type, Some(ContractKind::Prepaid));
    }

    #[test]
    fn test_calls_debit_balance_and_bill() {
        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        contract.bill_call(&call_of_minutes(1)).unwrap();

        assert_close(contract.balance(), -99.975);
        assert_close(contract.bill().unwrap().cost(), -99.975);

        // next month carries the debited balance
        contract.new_month(1, 2018, Bill::new()).unwrap();
        assert_close(contract.bill().unwrap().fixed_cost(), -99.975);
        assert_eq!(contract.bill().unwrap().billed_minutes(), 0);
    }

    #[test]
    fn test_no_top_up_at_exact_threshold() {
        let mut contract = prepaid(10.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        assert_eq!(contract.balance(), -10.0);
        assert_eq!(contract.bill().unwrap().fixed_cost(), -10.0);
    }

    #[test]
    fn test_top_up_when_credit_low() {
        let mut contract = prepaid(5.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        assert_eq!(contract.balance(), -5.0 - PREPAID_TOP_UP_AMOUNT);
        assert_eq!(contract.bill().unwrap().fixed_cost(), -30.0);

        // credit is healthy again, no second top-up
        contract.new_month(1, 2018, Bill::new()).unwrap();
        assert_eq!(contract.balance(), -30.0);
    }

    #[test]
    fn test_top_up_when_in_debt() {
        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        // 4400 minutes at 0.025 = 110
        contract.bill_call(&call_of_minutes(4400)).unwrap();
        assert_close(contract.balance(), 10.0);

        contract.new_month(1, 2018, Bill::new()).unwrap();
        assert_close(contract.balance(), -15.0);
        assert_close(contract.bill().unwrap().cost(), -15.0);
    }

    #[test]
    fn test_bill_reflects_overdrawn_credit() {
        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        contract.bill_call(&call_of_minutes(4001)).unwrap();

        let expected = -100.0 + 4001.0 * PREPAID_MINS_COST;
        assert!(expected > 0.0);
        assert_close(contract.bill().unwrap().cost(), expected);
    }

    #[test]
    fn test_cancel_with_credit_returns_zero() {
        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        assert_eq!(contract.cancel().unwrap(), 0.0);
    }

    #[test]
    fn test_cancel_with_debt_returns_balance() {
        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, Bill::new()).unwrap();
        contract.bill_call(&call_of_seconds(240_100)).unwrap();

        let balance = contract.balance();
        assert!(balance > 0.0);
        assert_eq!(contract.cancel().unwrap(), balance);
    }

    #[test]
    fn test_cancel_requires_bound_bill() {
        let mut contract = prepaid(100.0);
        assert_eq!(contract.cancel().unwrap_err(), BillingError::UnboundBill);
    }

    #[test]
    fn test_rejected_call_does_not_touch_balance() {
        let mut contract = prepaid(100.0);
        assert!(contract.bill_call(&call_of_minutes(10)).is_err());
        assert_eq!(contract.balance(), -100.0);
    }

    #[test]
    fn test_negative_top_up_plan_rejected() {
        let plan = PrepaidPlan {
            top_up_amount: -25.0,
            ..PrepaidPlan::default()
        };
        let err = PrepaidContract::with_plan(date(2017, 12, 25), 100.0, plan).unwrap_err();
        assert_eq!(err.error_code(), "validation_error");
    }

    #[test]
    fn test_overflowing_call_leaves_balance_untouched() {
        let mut full = Bill::new();
        full.add_billed_minutes(u32::MAX).unwrap();

        let mut contract = prepaid(100.0);
        contract.new_month(12, 2017, full).unwrap();

        let err = contract.bill_call(&call_of_minutes(1)).unwrap_err();
        assert_eq!(err.error_code(), "minute_overflow");
        assert_eq!(contract.balance(), -100.0);
        assert_eq!(contract.bill().unwrap().billed_minutes(), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_balance_never_decreases_between_months(
            durations in prop::collection::vec(0u32..=36_000, 0..=15)
        ) {
            let mut contract = prepaid(50.0);
            contract.new_month(6, 2018, Bill::new()).unwrap();
            let mut previous = contract.balance();
            for d in &durations {
                contract.bill_call(&call_of_seconds(*d)).unwrap();
                prop_assert!(contract.balance() >= previous);
                previous = contract.balance();
            }

            let s = contract.bill().unwrap().summary();
            prop_assert_eq!(s.fixed + s.min_rate * f64::from(s.billed_mins), s.total);
        }

        #[test]
        fn prop_at_most_one_top_up_per_month(top_up in 0.01f64..200.0) {
            let mut contract = prepaid(top_up);
            let before = contract.balance();
            contract.new_month(6, 2018, Bill::new()).unwrap();
            let after = contract.balance();

            if before > -10.0 {
                prop_assert_eq!(after, before - PREPAID_TOP_UP_AMOUNT);
            } else {
                prop_assert_eq!(after, before);
            }
            prop_assert_eq!(contract.bill().unwrap().fixed_cost(), after);
        }
    }
}
