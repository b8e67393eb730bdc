//! Current user session, read once from local storage and passed explicitly.

use serde::{Deserialize, Serialize};

use crate::error::BillError;

/// Key-value storage backends.
pub mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage};

/// Storage key of the serialized user record.
pub const USER_KEY: &str = "user";
/// Storage key of the bearer token used by the API store.
pub const JWT_KEY: &str = "jwt";

/// User record as serialized under the `user` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account type, e.g. "Employee" or "Admin".
    #[serde(rename = "type")]
    pub kind: String,
    /// Missing on some older records.
    #[serde(default)]
    pub email: String,
}

/// Snapshot of the local session threaded into the bill components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub jwt: Option<String>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user, jwt: None }
    }

    /// Read the user record (and token, if any) from storage.
    pub async fn load(storage: &dyn LocalStorage) -> Result<Self, BillError> {
        let raw = storage
            .get_item(USER_KEY)
            .await
            .map_err(BillError::Storage)?
            .ok_or(BillError::NoSession)?;
        let user: User = serde_json::from_str(&raw)?;
        let jwt = storage
            .get_item(JWT_KEY)
            .await
            .map_err(BillError::Storage)?;
        tracing::debug!("session loaded for {}", user.email);
        Ok(Self { user, jwt })
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn is_employee(&self) -> bool {
        self.user.kind.eq_ignore_ascii_case("employee")
    }
}
