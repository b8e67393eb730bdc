//! Route identifiers understood by the navigation layer.

pub const LOGIN: &str = "/";
pub const BILLS: &str = "#employee/bills";
pub const NEW_BILL: &str = "#employee/bill/new";
pub const DASHBOARD: &str = "#admin/dashboard";
