use crate::highlight::highlight;
use crate::msg::UploadOutcome;
use crate::store::{FileRef, UploadId, UploadRecord, UploadStatus, UploadTracker};
use crate::validate::{UploadPolicy, ValidationError};
use crate::view_model::{AppViewModel, UploadRowView};

/// Hint line shown above the drop zone.
pub const DROP_HINT_TEXT: &str = "Drag & drop a file or browse to upload";
const DROP_HINT_KEYWORDS: [&str; 2] = ["file", "browse"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    uploads: UploadTracker,
    policy: UploadPolicy,
    next_upload_seq: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_policy(UploadPolicy::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UploadPolicy) -> Self {
        Self {
            uploads: UploadTracker::new(),
            policy,
            next_upload_seq: 0,
            dirty: false,
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn uploads(&self) -> &UploadTracker {
        &self.uploads
    }

    pub fn view(&self) -> AppViewModel {
        let formats = self.policy.allowed_formats();
        AppViewModel {
            uploads: self.uploads.iter().map(UploadRowView::from_record).collect(),
            upload_count: self.uploads.len(),
            any_uploading: self.uploads.any_uploading(),
            max_size_bytes: self.policy.max_size_bytes(),
            allowed_formats: formats.to_vec(),
            drop_hint: highlight(DROP_HINT_TEXT, &DROP_HINT_KEYWORDS),
            format_hint: highlight(&format_hint_text(formats), formats),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Adds an `Uploading` record for `file` under a freshly minted id.
    pub(crate) fn begin_upload(&mut self, file: FileRef) -> UploadId {
        let upload_id = self.mint_upload_id(&file.name);
        self.uploads.add(UploadRecord::uploading(upload_id.clone(), file));
        self.mark_dirty();
        upload_id
    }

    /// Adds a `Failed` record for a file rejected by validation.
    pub(crate) fn reject_upload(&mut self, file: FileRef, error: ValidationError) -> UploadId {
        let upload_id = self.mint_upload_id(&file.name);
        self.uploads
            .add(UploadRecord::failed(upload_id.clone(), file, error.to_string()));
        self.mark_dirty();
        upload_id
    }

    pub(crate) fn apply_progress(&mut self, upload_id: &str, percent: u8) {
        if !self.uploads.contains(upload_id) {
            return;
        }
        self.uploads.update_progress(upload_id, percent);
        self.mark_dirty();
    }

    pub(crate) fn apply_done(&mut self, upload_id: &str, outcome: UploadOutcome) {
        if !self.uploads.contains(upload_id) {
            return;
        }
        match outcome {
            UploadOutcome::Success => {
                self.uploads
                    .update_status(upload_id, UploadStatus::Completed, None);
            }
            UploadOutcome::Failed { message } => {
                self.uploads
                    .update_status(upload_id, UploadStatus::Failed, Some(message));
            }
        }
        self.mark_dirty();
    }

    /// Marks an existing record as failed with a validation error.
    pub(crate) fn mark_failed(&mut self, upload_id: &str, error: ValidationError) {
        if !self.uploads.contains(upload_id) {
            return;
        }
        self.uploads
            .update_status(upload_id, UploadStatus::Failed, Some(error.to_string()));
        self.mark_dirty();
    }

    /// Removes and returns the record, so the caller can decide on follow-up
    /// effects based on its status.
    pub(crate) fn remove_upload(&mut self, upload_id: &str) -> Option<UploadRecord> {
        let removed = self.uploads.get(upload_id).cloned();
        if removed.is_some() {
            self.uploads.remove(upload_id);
            self.mark_dirty();
        }
        removed
    }

    pub(crate) fn clear_uploads(&mut self) {
        if self.uploads.is_empty() {
            return;
        }
        self.uploads.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_max_size(&mut self, bytes: u64) {
        if self.policy.max_size_bytes() == bytes {
            return;
        }
        self.policy.set_max_size_bytes(bytes);
        self.mark_dirty();
    }

    pub(crate) fn toggle_format(&mut self, format: &str, active: bool) {
        let before = self.policy.allowed_formats().len();
        self.policy.set_format(format, active);
        if self.policy.allowed_formats().len() != before {
            self.mark_dirty();
        }
    }

    /// Ids follow the `upload-{seq}-{name}` shape: opaque, unique for the
    /// state's lifetime, still recognizable in logs.
    fn mint_upload_id(&mut self, name: &str) -> UploadId {
        self.next_upload_seq += 1;
        format!("upload-{}-{}", self.next_upload_seq, name)
    }
}

fn format_hint_text(formats: &[String]) -> String {
    format!("File must be {}", formats.join(" or "))
}
