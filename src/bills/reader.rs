//! Bill list fetching and display transformation.

use serde_json::Value;
use std::sync::Arc;

use crate::{
    bills::{
        format::{format_date, format_status},
        model::{DisplayBill, RawBill},
    },
    error::BillError,
    session::Session,
    store::BillsStore,
};

/// Fetches the current user's bills and turns them into display records.
pub struct BillsReader {
    store: Arc<dyn BillsStore>,
    session: Session,
}

impl BillsReader {
    pub fn new(store: Arc<dyn BillsStore>, session: Session) -> Self {
        Self { store, session }
    }

    /// One `list` call; records stay in API order.
    ///
    /// A record that does not have the bill shape, or whose date cannot be
    /// formatted, keeps its raw values (its status is still translated). Only
    /// a failing `list` call fails the whole fetch.
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>, BillError> {
        tracing::info!("fetching bills for {}", self.session.email());
        let raw = self.store.list().await.map_err(|e| {
            tracing::error!("bill list failed: {e}");
            BillError::Transport(e)
        })?;
        tracing::info!("bill list success: {} records", raw.len());

        let bills = raw
            .into_iter()
            .map(|value| match decode(&value) {
                Ok(display) => display,
                Err(e) => {
                    let bill = RawBill::lossy(value);
                    tracing::warn!("{e} for bill {:?}", bill.id);
                    untransformed(bill)
                }
            })
            .collect();
        Ok(bills)
    }
}

/// Decode one listed record and turn it into a display record.
fn decode(value: &Value) -> Result<DisplayBill, BillError> {
    let bill = RawBill::from_value(value.clone()).map_err(|e| BillError::MalformedRecord {
        reason: e.to_string(),
    })?;
    to_display(&bill)
}

/// Format the date and translate the status of one record.
pub fn to_display(bill: &RawBill) -> Result<DisplayBill, BillError> {
    Ok(DisplayBill {
        id: bill.id.clone(),
        date: format_date(&bill.date)?,
        status: format_status(&bill.status),
        fields: bill.fields.clone(),
    })
}

/// Fallback for a record `to_display` rejected: raw date, translated status.
fn untransformed(bill: RawBill) -> DisplayBill {
    DisplayBill {
        status: format_status(&bill.status),
        id: bill.id,
        date: bill.date,
        fields: bill.fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        session::User,
        store::mock::{Call, MockStore},
    };
    use serde_json::json;

    fn session() -> Session {
        Session::new(User {
            kind: "Employee".into(),
            email: "a@a".into(),
        })
    }

    fn reader(store: MockStore) -> (BillsReader, Arc<MockStore>) {
        let store = Arc::new(store);
        (BillsReader::new(store.clone(), session()), store)
    }

    #[tokio::test]
    async fn test_get_bills_formats_dates_and_statuses() {
        let (reader, store) = reader(MockStore::with_bills(vec![
            RawBill::new("2021-04-01", "pending"),
            RawBill::new("2021-03-01", "accepted"),
        ]));

        let bills = reader.get_bills().await.unwrap();
        assert_eq!(
            bills,
            vec![
                DisplayBill::new("1 Avr. 21", "En attente"),
                DisplayBill::new("1 Mar. 21", "Accepté"),
            ]
        );
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_get_bills_keeps_corrupted_date() {
        let (reader, _) = reader(MockStore::with_bills(vec![RawBill::new(
            "invalid-date",
            "pending",
        )]));

        let bills = reader.get_bills().await.unwrap();
        assert_eq!(bills, vec![DisplayBill::new("invalid-date", "En attente")]);
    }

    #[tokio::test]
    async fn test_one_corrupted_record_does_not_fail_the_list() {
        let (reader, _) = reader(MockStore::with_bills(vec![
            RawBill::new("2004-04-04", "refused"),
            RawBill::new("", "pending"),
            RawBill::new("2001-01-01", "archived"),
        ]));

        let bills = reader.get_bills().await.unwrap();
        let got: Vec<(&str, &str)> = bills
            .iter()
            .map(|b| (b.date.as_str(), b.status.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("4 Avr. 04", "Refusé"),
                ("", "En attente"),
                ("1 Jan. 01", "archived"),
            ]
        );
    }

    #[tokio::test]
    async fn test_mistyped_record_does_not_fail_the_list() {
        let (reader, _) = reader(MockStore::with_records(vec![
            json!({"date": "2021-04-01", "status": "pending"}),
            json!({"date": null, "status": "pending", "name": "null date"}),
            json!({"id": 5, "date": 20210401, "status": "accepted"}),
        ]));

        let bills = reader.get_bills().await.unwrap();
        assert_eq!(bills.len(), 3);
        assert_eq!(bills[0], DisplayBill::new("1 Avr. 21", "En attente"));
        assert_eq!((bills[1].date.as_str(), bills[1].status.as_str()), ("", "En attente"));
        assert_eq!(bills[1].field_str("name"), Some("null date"));
        assert_eq!(bills[2].id.as_deref(), Some("5"));
        assert_eq!(bills[2].date, "20210401");
        assert_eq!(bills[2].status, "Accepté");
    }

    #[tokio::test]
    async fn test_other_fields_pass_through() {
        let mut raw = RawBill::new("2003-03-03", "accepted");
        raw.id = Some("BeKy5Mo4jkmdfPGYpTxZ".into());
        raw.fields.insert("amount".into(), json!(100));
        raw.fields.insert("name".into(), json!("test3"));
        let (reader, _) = reader(MockStore::with_bills(vec![raw]));

        let bills = reader.get_bills().await.unwrap();
        assert_eq!(bills[0].id.as_deref(), Some("BeKy5Mo4jkmdfPGYpTxZ"));
        assert_eq!(bills[0].fields["amount"], json!(100));
        assert_eq!(bills[0].field_str("name"), Some("test3"));
    }

    #[tokio::test]
    async fn test_list_failure_propagates_404() {
        let (reader, store) = reader(MockStore::failing_list("Erreur 404"));
        let err = reader.get_bills().await.unwrap_err();
        assert!(matches!(err, BillError::Transport(_)));
        assert!(err.to_string().contains("Erreur 404"));
        assert!(matches!(store.calls().as_slice(), [Call::List]));
    }

    #[tokio::test]
    async fn test_list_failure_propagates_500() {
        let (reader, _) = reader(MockStore::failing_list("Erreur 500"));
        let err = reader.get_bills().await.unwrap_err();
        assert!(err.to_string().contains("Erreur 500"));
    }
}
