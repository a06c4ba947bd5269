//! Uploader core: pure state machine and view-model helpers.
mod effect;
mod highlight;
mod msg;
mod state;
mod store;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use highlight::{highlight, Segment};
pub use msg::{Msg, UploadOutcome};
pub use state::{AppState, DROP_HINT_TEXT};
pub use store::{FileRef, FileSource, UploadId, UploadRecord, UploadStatus, UploadTracker};
pub use update::update;
pub use validate::{UploadPolicy, ValidationError, DEFAULT_MAX_SIZE_BYTES};
pub use view_model::{AppViewModel, UploadRowView};
