//! Bill list reading and new-bill submission.

/// Date and status formatting for display.
pub mod format;
/// Bill records, payloads and form inputs.
pub mod model;
/// New-bill draft lifecycle.
pub mod new_bill;
/// Bill list fetching.
pub mod reader;

pub use model::{BillPayload, BillStatus, DisplayBill, NewBillForm, RawBill};
pub use new_bill::{AcceptedFile, DraftState, NewBillSubmitter};
pub use reader::BillsReader;
