//! Background worker driving the bill components.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    bills::{BillsReader, NewBillForm, NewBillSubmitter},
    events::{EventSender, UiEvent},
    routes,
    session::Session,
    store::{BillsStore, LocalFile},
};

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCmd {
    /// Fetch and format the bill list.
    RefreshBills,
    /// Start a new draft, discarding any open one.
    OpenNewBill,
    /// Attachment selected in the open draft.
    ChangeFile(LocalFile),
    /// Submit the open draft with these form values.
    Submit(NewBillForm),
}

/// Main worker loop: handle commands sequentially until the channel closes.
pub async fn run(
    mut rx: mpsc::Receiver<WorkerCmd>,
    tx: EventSender,
    store: Arc<dyn BillsStore>,
    session: Session,
) {
    tracing::info!("worker started");
    let reader = BillsReader::new(store.clone(), session.clone());
    // At most one draft is open at a time.
    let mut draft: Option<NewBillSubmitter> = None;

    while let Some(cmd) = rx.recv().await {
        match cmd {
            WorkerCmd::RefreshBills => {
                tracing::info!("refresh bills");
                match reader.get_bills().await {
                    Ok(bills) => {
                        let _ = tx.send(UiEvent::BillsLoaded(bills)).await;
                    }
                    Err(e) => {
                        let _ = tx.send(UiEvent::Error(e.to_string())).await;
                    }
                }
            }

            WorkerCmd::OpenNewBill => {
                if draft.is_some() {
                    tracing::info!("discarding open draft");
                }
                draft = Some(NewBillSubmitter::new(
                    store.clone(),
                    session.clone(),
                    tx.clone(),
                ));
                let _ = tx.send(UiEvent::Navigate(routes::NEW_BILL.into())).await;
            }

            WorkerCmd::ChangeFile(file) => match draft.as_mut() {
                Some(submitter) => submitter.handle_file_change(file).await,
                None => {
                    tracing::warn!("file change without open draft");
                    let _ = tx.send(UiEvent::Error("no bill form open".into())).await;
                }
            },

            WorkerCmd::Submit(form) => match draft.as_mut() {
                Some(submitter) => match submitter.handle_submit(form).await {
                    // The submitter already emitted the navigation event.
                    Ok(()) => draft = None,
                    Err(e) => {
                        let _ = tx.send(UiEvent::Error(e.to_string())).await;
                    }
                },
                None => {
                    tracing::warn!("submit without open draft");
                    let _ = tx.send(UiEvent::Error("no bill form open".into())).await;
                }
            },
        }
    }
    tracing::info!("worker stopped");
}
