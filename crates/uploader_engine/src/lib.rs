//! Uploader engine: HTTP transfer execution and progress reporting.
mod engine;
mod transfer;
mod types;

pub use engine::EngineHandle;
pub use transfer::{
    ChannelProgressSink, PayloadSource, ProgressSink, ReqwestUploader, TransferSettings,
    UploadPayload, Uploader,
};
pub use types::{
    DeleteReceipt, EngineEvent, FailureKind, TransferError, TransferProgress, UploadId,
    UploadReceipt,
};
