//! Contract variants
//!
//! Every variant embeds a [`ContractState`] holding what all contracts
//! share: the start date, the bill of the current month and the
//! cancellation flag. The variant modules add their own tariff logic on
//! top of it.

pub mod mtm;
pub mod prepaid;
pub mod term;

pub use mtm::MtmContract;
pub use prepaid::PrepaidContract;
pub use term::TermContract;

use chrono::NaiveDate;
use linebill_core::{
    models::{Bill, BillingPeriod, Call, ContractKind, ContractStatus},
    BillingError, BillingResult, Contract,
};
use tracing::warn;

/// State shared by every contract variant
#[derive(Debug, Clone)]
pub struct ContractState {
    start: NaiveDate,
    bill: Option<Bill>,
    cancelled: bool,
}

impl ContractState {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            bill: None,
            cancelled: false,
        }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn status(&self) -> ContractStatus {
        if self.cancelled {
            ContractStatus::Cancelled
        } else if self.bill.is_some() {
            ContractStatus::Active
        } else {
            ContractStatus::Pending
        }
    }

    #[inline]
    pub fn bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    /// Validate the period and bind `bill` as the current month's ledger
    ///
    /// Nothing is modified when validation fails.
    pub fn bind(
        &mut self,
        month: u32,
        year: i32,
        bill: Bill,
    ) -> BillingResult<(BillingPeriod, &mut Bill)> {
        self.ensure_open()?;
        let period = BillingPeriod::new(month, year)?;
        Ok((period, self.bill.insert(bill)))
    }

    /// The current month's bill, for charging
    pub fn current_bill_mut(&mut self) -> BillingResult<&mut Bill> {
        self.ensure_billable()?;
        self.bill.as_mut().ok_or(BillingError::UnboundBill)
    }

    /// The current month's bill, for settlement
    pub fn current_bill(&self) -> BillingResult<&Bill> {
        self.ensure_billable()?;
        self.bill.as_ref().ok_or(BillingError::UnboundBill)
    }

    /// Mark the contract cancelled. The final bill stays readable.
    pub fn close(&mut self) {
        self.cancelled = true;
    }

    fn ensure_open(&self) -> BillingResult<()> {
        if !self.status().can_advance() {
            warn!("Rejected operation on cancelled contract started {}", self.start);
            return Err(BillingError::ContractCancelled);
        }
        Ok(())
    }

    fn ensure_billable(&self) -> BillingResult<()> {
        self.ensure_open()?;
        if !self.status().can_bill() {
            warn!("Contract started {} has no bill bound", self.start);
            return Err(BillingError::UnboundBill);
        }
        Ok(())
    }
}

/// Any of the three contract variants
///
/// Lets a line own its contract by value without boxing.
#[derive(Debug, Clone)]
pub enum AnyContract {
    Term(TermContract),
    MonthToMonth(MtmContract),
    Prepaid(PrepaidContract),
}

impl Contract for AnyContract {
    fn new_month(&mut self, month: u32, year: i32, bill: Bill) -> BillingResult<()> {
        match self {
            AnyContract::Term(c) => c.new_month(month, year, bill),
            AnyContract::MonthToMonth(c) => c.new_month(month, year, bill),
            AnyContract::Prepaid(c) => c.new_month(month, year, bill),
        }
    }

    fn bill_call(&mut self, call: &Call) -> BillingResult<()> {
        match self {
            AnyContract::Term(c) => c.bill_call(call),
            AnyContract::MonthToMonth(c) => c.bill_call(call),
            AnyContract::Prepaid(c) => c.bill_call(call),
        }
    }

    fn cancel(&mut self) -> BillingResult<f64> {
        match self {
            AnyContract::Term(c) => c.cancel(),
            AnyContract::MonthToMonth(c) => c.cancel(),
            AnyContract::Prepaid(c) => c.cancel(),
        }
    }

    fn start(&self) -> NaiveDate {
        match self {
            AnyContract::Term(c) => c.start(),
            AnyContract::MonthToMonth(c) => c.start(),
            AnyContract::Prepaid(c) => c.start(),
        }
    }

    fn kind(&self) -> ContractKind {
        match self {
            AnyContract::Term(_) => ContractKind::Term,
            AnyContract::MonthToMonth(_) => ContractKind::MonthToMonth,
            AnyContract::Prepaid(_) => ContractKind::Prepaid,
        }
    }

    fn status(&self) -> ContractStatus {
        match self {
            AnyContract::Term(c) => c.status(),
            AnyContract::MonthToMonth(c) => c.status(),
            AnyContract::Prepaid(c) => c.status(),
        }
    }

    fn bill(&self) -> Option<&Bill> {
        match self {
            AnyContract::Term(c) => c.bill(),
            AnyContract::MonthToMonth(c) => c.bill(),
            AnyContract::Prepaid(c) => c.bill(),
        }
    }
}

impl From<TermContract> for AnyContract {
    fn from(contract: TermContract) -> Self {
        AnyContract::Term(contract)
    }
}

impl From<MtmContract> for AnyContract {
    fn from(contract: MtmContract) -> Self {
        AnyContract::MonthToMonth(contract)
    }
}

impl From<PrepaidContract> for AnyContract {
    fn from(contract: PrepaidContract) -> Self {
        AnyContract::Prepaid(contract)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_state_lifecycle() {
        let mut state = ContractState::new(date(2017, 12, 25));
        assert_eq!(state.status(), ContractStatus::Pending);
        assert_eq!(state.current_bill().unwrap_err(), BillingError::UnboundBill);

        state.bind(12, 2017, Bill::new()).unwrap();
        assert_eq!(state.status(), ContractStatus::Active);
        assert!(state.current_bill_mut().is_ok());

        state.close();
        assert_eq!(state.status(), ContractStatus::Cancelled);
        assert_eq!(
            state.current_bill().unwrap_err(),
            BillingError::ContractCancelled
        );
        assert!(state.bill().is_some());
    }

    #[test]
    fn test_state_errors_follow_status() {
        let mut state = ContractState::new(date(2017, 12, 25));
        assert!(!state.status().can_bill());
        assert_eq!(state.current_bill_mut().unwrap_err(), BillingError::UnboundBill);

        state.close();
        assert!(!state.status().can_advance());
        assert_eq!(
            state.current_bill_mut().unwrap_err(),
            BillingError::ContractCancelled
        );
        assert_eq!(
            state.bind(1, 2018, Bill::new()).unwrap_err(),
            BillingError::ContractCancelled
        );
        assert!(state.bill().is_none());
    }

    #[test]
    fn test_bind_rejects_invalid_month_without_binding() {
        let mut state = ContractState::new(date(2017, 12, 25));
        let err = state.bind(13, 2017, Bill::new()).unwrap_err();
        assert_eq!(err.error_code(), "invalid_period");
        assert_eq!(state.status(), ContractStatus::Pending);
    }

    #[test]
    fn test_any_contract_dispatch() {
        let start = date(2017, 12, 25);
        let mut contracts: Vec<AnyContract> = vec![
            TermContract::new(start, date(2019, 6, 25)).unwrap().into(),
            MtmContract::new(start).into(),
            PrepaidContract::new(start, 100.0).unwrap().into(),
        ];

        let kinds: Vec<ContractKind> = contracts.iter().map(Contract::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ContractKind::Term,
                ContractKind::MonthToMonth,
                ContractKind::Prepaid
            ]
        );

        for contract in contracts.iter_mut() {
            contract.new_month(12, 2017, Bill::new()).unwrap();
            contract.bill_call(&call_of_minutes(2)).unwrap();
            assert_eq!(contract.status(), ContractStatus::Active);
            assert_eq!(contract.start(), start);
            assert_eq!(
                contract.bill().and_then(Bill::contract_type),
                Some(contract.kind())
            );
        }

        let settlements: Vec<f64> = contracts
            .iter_mut()
            .map(|c| c.cancel().unwrap())
            .collect();
        // deposit forfeited, flat fee plus two minutes, unused credit forfeited
        assert_close(settlements[0], 320.0);
        assert_close(settlements[1], 50.1);
        assert_close(settlements[2], 0.0);
        assert!(contracts.iter().all(|c| !c.is_active()));
    }

    #[test]
    fn test_contracts_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AnyContract>();
        assert_send::<TermContract>();
        assert_send::<MtmContract>();
        assert_send::<PrepaidContract>();
    }
}
