//! Expense-claim core: list an employee's bills and submit new ones.

pub mod bills;
pub mod config;
pub mod error;
pub mod events;
pub mod routes;
pub mod session;
pub mod store;
pub mod worker;

pub use error::BillError;
