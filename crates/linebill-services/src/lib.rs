//! Contract state machines and per-line billing for LineBill
//!
//! This crate contains the contract variants that charge calls against a
//! monthly bill, and the per-line driver that sequences them.
//!
//! # Architecture
//!
//! - Each contract exclusively owns the bill of its current month; a new
//!   month hands it a fresh bill and the previous one is dropped
//! - Contracts are single-owner values: lines can be processed in parallel,
//!   one line per worker, without any shared state
//! - All operations are instrumented with tracing
//! - Misuse (billing before the first month, touching a cancelled contract)
//!   surfaces as `BillingError`, never as a silent no-op
//!
//! # Services
//!
//! - `TermContract` - deposit, monthly fee and free minutes over a fixed term
//! - `MtmContract` - flat monthly fee, every minute billed
//! - `PrepaidContract` - credit balance with automatic top-ups
//! - `AnyContract` - closed dispatch over the three variants
//! - `PhoneLine` - per-line month sequencing, call history and statements

pub mod contracts;
pub mod line;

pub use contracts::{AnyContract, ContractState, MtmContract, PrepaidContract, TermContract};
pub use line::{CallHistory, PhoneLine, Statement};
