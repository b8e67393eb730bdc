//! Recording store for unit tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::{BillsStore, CreatedBill, FileUpload};
use crate::bills::model::{BillPayload, RawBill};

pub const MOCK_FILE_URL: &str = "https://localhost:3456/images/test.jpg";
pub const MOCK_BILL_ID: &str = "1234";

/// One recorded call.
#[derive(Clone, Debug)]
pub enum Call {
    List,
    Create(FileUpload),
    Update { id: String, payload: BillPayload },
}

/// Returns canned data and records every call; each operation can be failed.
#[derive(Default)]
pub struct MockStore {
    pub records: Vec<Value>,
    pub list_error: Option<String>,
    pub create_error: Option<String>,
    pub update_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockStore {
    pub fn with_bills(bills: Vec<RawBill>) -> Self {
        Self::with_records(
            bills
                .iter()
                .map(|b| serde_json::to_value(b).unwrap())
                .collect(),
        )
    }

    /// Serve these JSON records as-is, malformed ones included.
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing_list(message: &str) -> Self {
        Self {
            list_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_create(message: &str) -> Self {
        Self {
            create_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_update(message: &str) -> Self {
        Self {
            update_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BillsStore for MockStore {
    async fn list(&self) -> Result<Vec<Value>> {
        self.record(Call::List);
        match &self.list_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.records.clone()),
        }
    }

    async fn create(&self, upload: FileUpload) -> Result<CreatedBill> {
        self.record(Call::Create(upload));
        match &self.create_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(CreatedBill {
                id: MOCK_BILL_ID.into(),
                file_url: MOCK_FILE_URL.into(),
            }),
        }
    }

    async fn update(&self, id: &str, payload: &BillPayload) -> Result<RawBill> {
        self.record(Call::Update {
            id: id.to_string(),
            payload: payload.clone(),
        });
        match &self.update_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => {
                let mut bill = RawBill::new(payload.date.clone(), payload.status.code());
                bill.id = Some(id.to_string());
                Ok(bill)
            }
        }
    }
}
