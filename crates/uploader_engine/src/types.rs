use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type UploadId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    pub upload_id: UploadId,
    /// Rounded percentage of bytes sent, 0..=100.
    pub percent: u8,
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(TransferProgress),
    UploadCompleted {
        upload_id: UploadId,
        result: Result<UploadReceipt, TransferError>,
    },
    DeleteCompleted {
        file_name: String,
        result: Result<DeleteReceipt, TransferError>,
    },
}

/// Server acknowledgement for a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Name the server stored the file under.
    pub file_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReceipt {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransferError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransferError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Io,
    /// The response body could not be understood.
    BadResponse,
    /// The endpoint answered but flagged the operation as unsuccessful.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::BadResponse => write!(f, "bad response"),
            FailureKind::Rejected => write!(f, "rejected by server"),
        }
    }
}

// Wire shapes of the upload endpoint: a multipart POST answered with
// `{ data: { fileName }, message, success }`, and a DELETE carrying
// `{ filename }` answered with `{ message, success }`.

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponseBody {
    pub data: Option<UploadResponseData>,
    #[serde(default)]
    pub message: String,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponseData {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteResponseBody {
    #[serde(default)]
    pub message: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRequestBody<'a> {
    pub filename: &'a str,
}
