//! Persistence API consumed by the bill components.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::bills::model::{BillPayload, RawBill};

/// REST backend implementation.
pub mod api;

#[cfg(test)]
pub mod mock;

pub use api::ApiStore;

/// Attachment selected in the new-bill form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFile {
    /// File name as chosen by the user, extension included.
    pub name: String,
    /// Declared MIME type.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Upload creating the draft record that holds the attachment.
#[derive(Clone, Debug)]
pub struct FileUpload {
    pub email: String,
    pub file: LocalFile,
}

/// Backend answer to a create call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedBill {
    /// Identifier of the new record, used as the update selector.
    #[serde(alias = "key")]
    pub id: String,
    /// Reference to the stored attachment.
    #[serde(rename = "fileUrl", default)]
    pub file_url: String,
}

/// Bill resource of the persistence API. Errors carry the transport message.
#[async_trait]
pub trait BillsStore: Send + Sync {
    /// All bills visible to the current session, one JSON value per record.
    ///
    /// Records are left undecoded so one bad record cannot fail the list.
    async fn list(&self) -> Result<Vec<Value>>;
    /// Create a draft bill holding the uploaded attachment.
    async fn create(&self, upload: FileUpload) -> Result<CreatedBill>;
    /// Replace the bill `id` with `payload`.
    async fn update(&self, id: &str, payload: &BillPayload) -> Result<RawBill>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_bill_accepts_key_alias() {
        let created: CreatedBill = serde_json::from_str(
            r#"{"fileUrl":"https://localhost:3456/images/test.jpg","key":"1234"}"#,
        )
        .unwrap();
        assert_eq!(created.id, "1234");
        assert_eq!(created.file_url, "https://localhost:3456/images/test.jpg");

        let created: CreatedBill = serde_json::from_str(r#"{"id":"12345"}"#).unwrap();
        assert_eq!(created.id, "12345");
        assert_eq!(created.file_url, "");
    }
}
