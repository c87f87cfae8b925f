//! Common traits for contracts
//!
//! Defines the uniform surface a per-line scheduler drives.

use chrono::NaiveDate;

use crate::models::{Bill, Call, ContractKind, ContractStatus};
use crate::BillingResult;

/// A phone line's contract
///
/// A contract is driven month by month: the scheduler hands it a fresh
/// [`Bill`] through [`Contract::new_month`], forwards the month's calls to
/// [`Contract::bill_call`], and eventually closes it with
/// [`Contract::cancel`]. Cancellation is terminal; every operation on a
/// cancelled contract fails with `ContractCancelled`.
pub trait Contract: Send {
    /// Advance to `month` of `year`, taking ownership of `bill` as the
    /// month's ledger and dropping the previous month's bill.
    ///
    /// Sets the bill's rate and type label and applies the variant's monthly
    /// charges. This may be the contract's first month.
    fn new_month(&mut self, month: u32, year: i32, bill: Bill) -> BillingResult<()>;

    /// Charge `call` against the current month's bill
    ///
    /// Fails with `UnboundBill` if no month has been started.
    fn bill_call(&mut self, call: &Call) -> BillingResult<()>;

    /// Close the contract and return the settlement owed
    ///
    /// A negative settlement is a refund to the customer. Fails with
    /// `UnboundBill` if no month has been started.
    fn cancel(&mut self) -> BillingResult<f64>;

    /// Contract start date
    fn start(&self) -> NaiveDate;

    /// The variant of this contract
    fn kind(&self) -> ContractKind;

    /// Current lifecycle state
    fn status(&self) -> ContractStatus;

    /// The bill bound for the current month, if any
    fn bill(&self) -> Option<&Bill>;

    /// Whether the contract can still be billed or advanced
    fn is_active(&self) -> bool {
        self.status() != ContractStatus::Cancelled
    }
}
