//! Events emitted toward the UI layer.

use tokio::sync::mpsc;

use crate::bills::model::DisplayBill;

/// Notifications the UI layer reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Blocking user alert (e.g. rejected attachment).
    Alert(String),
    /// Go to the given route (see `routes`).
    Navigate(String),
    /// Bill list fetched and formatted, in API order.
    BillsLoaded(Vec<DisplayBill>),
    /// Attachment uploaded for the open draft.
    FileAccepted { file_name: String },
    /// User-visible error message.
    Error(String),
}

pub type EventSender = mpsc::Sender<UiEvent>;
