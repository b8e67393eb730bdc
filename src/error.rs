//! Error taxonomy for the bill pipeline.

use thiserror::Error;

/// Alert text shown when an attachment is not an accepted image.
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Seuls les fichiers jpg, jpeg et png sont acceptés.";

#[derive(Debug, Error)]
pub enum BillError {
    /// Attachment extension outside `{jpg, jpeg, png}`. Surfaced as an alert.
    #[error("Seuls les fichiers jpg, jpeg et png sont acceptés. ({file_name})")]
    InvalidFileType { file_name: String },

    /// Persistence API rejection, message kept as the store produced it.
    #[error("{0}")]
    Transport(#[from] anyhow::Error),

    /// A single record could not be decoded or transformed for display.
    #[error("malformed bill record: {reason}")]
    MalformedRecord { reason: String },

    #[error("no accepted attachment on this draft")]
    MissingFile,

    /// Local key-value storage could not be read.
    #[error("local storage error: {0}")]
    Storage(anyhow::Error),

    #[error("no user in local storage")]
    NoSession,

    #[error("invalid user record in local storage: {0}")]
    InvalidSession(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_transport_message_is_unmodified() {
        let e = BillError::from(anyhow!("Erreur 404"));
        assert_eq!(e.to_string(), "Erreur 404");
    }
}
