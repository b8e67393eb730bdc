//! New-bill draft: attachment validation, upload and submission.

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    bills::model::{BillPayload, BillStatus, NewBillForm, parse_leading_int},
    error::{BillError, INVALID_FILE_TYPE_MESSAGE},
    events::{EventSender, UiEvent},
    routes,
    session::Session,
    store::{BillsStore, FileUpload, LocalFile},
};

/// Attachment extensions accepted for a bill, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Attachment stored server-side for this draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedFile {
    /// Record created by the upload; the submission updates it.
    pub bill_id: String,
    pub file_url: String,
    pub file_name: String,
}

/// Where the draft is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftState {
    /// Form open, nothing attached.
    Idle,
    /// Last selection had an unsupported extension.
    FileRejected,
    /// Last selection was valid but the upload call failed.
    UploadFailed,
    /// Attachment uploaded; the form can be submitted.
    FileAccepted(AcceptedFile),
    /// Update call issued and not yet answered.
    Submitted(AcceptedFile),
    /// Update call failed; the attachment is kept for another try.
    Failed(AcceptedFile),
    /// Bill saved; the draft is spent.
    Completed { bill_id: String },
}

impl DraftState {
    /// The attachment a submission would use, if any.
    pub fn accepted_file(&self) -> Option<&AcceptedFile> {
        match self {
            DraftState::FileAccepted(file)
            | DraftState::Submitted(file)
            | DraftState::Failed(file) => Some(file),
            _ => None,
        }
    }
}

/// Composes one new bill. Create a fresh submitter per form interaction.
pub struct NewBillSubmitter {
    /// Correlates the log lines of one form interaction.
    draft_id: Uuid,
    store: Arc<dyn BillsStore>,
    session: Session,
    events: EventSender,
    state: DraftState,
}

impl NewBillSubmitter {
    pub fn new(store: Arc<dyn BillsStore>, session: Session, events: EventSender) -> Self {
        let draft_id = Uuid::new_v4();
        tracing::info!(draft = %draft_id, "new bill form opened");
        Self {
            draft_id,
            store,
            session,
            events,
            state: DraftState::Idle,
        }
    }

    pub fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn file_name(&self) -> Option<&str> {
        self.state.accepted_file().map(|f| f.file_name.as_str())
    }

    pub fn file_url(&self) -> Option<&str> {
        self.state.accepted_file().map(|f| f.file_url.as_str())
    }

    pub fn bill_id(&self) -> Option<&str> {
        match &self.state {
            DraftState::Completed { bill_id } => Some(bill_id),
            other => other.accepted_file().map(|f| f.bill_id.as_str()),
        }
    }

    /// Validate the selected attachment and upload it.
    ///
    /// An unsupported extension clears the attachment and raises one alert
    /// without touching the store. An upload failure is logged, reported as an
    /// error event with the transport message and leaves the draft without an
    /// attachment.
    pub async fn handle_file_change(&mut self, file: LocalFile) {
        if let Err(e) = validate_file_name(&file.name) {
            tracing::warn!(draft = %self.draft_id, "attachment rejected: {e}");
            self.state = DraftState::FileRejected;
            self.emit(UiEvent::Alert(INVALID_FILE_TYPE_MESSAGE.into()))
                .await;
            return;
        }

        let file_name = file.name.clone();
        tracing::info!(draft = %self.draft_id, "uploading attachment {file_name}");
        let upload = FileUpload {
            email: self.session.email().to_string(),
            file,
        };
        match self.store.create(upload).await {
            Ok(created) => {
                tracing::info!(draft = %self.draft_id, "attachment stored as bill {}", created.id);
                self.state = DraftState::FileAccepted(AcceptedFile {
                    bill_id: created.id,
                    file_url: created.file_url,
                    file_name: file_name.clone(),
                });
                self.emit(UiEvent::FileAccepted { file_name }).await;
            }
            Err(e) => {
                tracing::error!(draft = %self.draft_id, "attachment upload failed: {e}");
                self.state = DraftState::UploadFailed;
                self.emit(UiEvent::Error(e.to_string())).await;
            }
        }
    }

    /// Build the payload from `form` and persist it with one update call.
    ///
    /// Navigates back to the bill list on success. Failures are returned and
    /// the attachment is kept so the form can be submitted again.
    pub async fn handle_submit(&mut self, form: NewBillForm) -> Result<(), BillError> {
        let Some(file) = self.state.accepted_file().cloned() else {
            tracing::warn!(draft = %self.draft_id, "submit without accepted attachment");
            return Err(BillError::MissingFile);
        };

        let payload = self.build_payload(&form, &file);
        self.state = DraftState::Submitted(file.clone());
        tracing::info!(draft = %self.draft_id, "submitting bill {}", file.bill_id);

        match self.store.update(&file.bill_id, &payload).await {
            Ok(_) => {
                tracing::info!(draft = %self.draft_id, "bill {} submitted", file.bill_id);
                self.state = DraftState::Completed {
                    bill_id: file.bill_id,
                };
                self.emit(UiEvent::Navigate(routes::BILLS.into())).await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(draft = %self.draft_id, "bill submission failed: {e}");
                self.state = DraftState::Failed(file);
                Err(BillError::Transport(e))
            }
        }
    }

    /// Payload for `form`; numeric fields that do not parse become NaN.
    pub fn build_payload(&self, form: &NewBillForm, file: &AcceptedFile) -> BillPayload {
        BillPayload {
            email: self.session.email().to_string(),
            expense_type: form.expense_type.clone(),
            name: form.name.clone(),
            amount: parse_leading_int(&form.amount),
            date: form.date.clone(),
            vat: form.vat.clone(),
            pct: parse_leading_int(&form.pct),
            commentary: form.commentary.clone(),
            file_url: file.file_url.clone(),
            file_name: file.file_name.clone(),
            status: BillStatus::Pending,
        }
    }

    async fn emit(&self, event: UiEvent) {
        let _ = self.events.send(event).await;
    }
}

/// Check the extension after the last dot against `ACCEPTED_EXTENSIONS`.
pub fn validate_file_name(file_name: &str) -> Result<(), BillError> {
    let accepted = file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|ok| ext.eq_ignore_ascii_case(ok))
        })
        .unwrap_or(false);
    if accepted {
        Ok(())
    } else {
        Err(BillError::InvalidFileType {
            file_name: file_name.to_string(),
        })
    }
}
