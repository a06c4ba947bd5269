use crate::store::{FileRef, UploadId};

/// Outcome of one finished transfer, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User dropped or picked files for upload.
    FilesChosen(Vec<FileRef>),
    /// Engine progress for an in-flight transfer.
    TransferProgress { upload_id: UploadId, percent: u8 },
    /// Engine completion or failure for a transfer.
    TransferDone {
        upload_id: UploadId,
        outcome: UploadOutcome,
    },
    /// User clicked retry on a failed item.
    RetryClicked { upload_id: UploadId },
    /// User clicked remove on an item.
    RemoveClicked { upload_id: UploadId },
    /// User cleared the whole list.
    ClearClicked,
    /// Configuration panel: new maximum file size.
    MaxSizeChanged { bytes: u64 },
    /// Configuration panel: one allowed format switched on or off.
    FormatToggled { format: String, active: bool },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
