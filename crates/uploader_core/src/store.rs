use std::path::PathBuf;
use std::sync::Arc;

/// Identifier of one tracked upload attempt. Opaque to the tracker; must be
/// unique across the tracker's lifetime.
pub type UploadId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Completed,
    Failed,
}

/// Handle to the payload behind an upload attempt. The tracker only stores
/// the reference; the bytes stay with whoever produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Declared media type, when the source provides one (e.g. "image/png").
    pub media_type: Option<String>,
    pub source: FileSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<Vec<u8>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub id: UploadId,
    pub file: FileRef,
    /// Percent, expected in 0..=100. Stored as given; producers clamp.
    pub progress: u8,
    pub status: UploadStatus,
    /// Set only while `status` is `Failed`.
    pub error: Option<String>,
}

impl UploadRecord {
    /// A fresh record for a transfer that is about to start.
    pub fn uploading(id: impl Into<UploadId>, file: FileRef) -> Self {
        Self {
            id: id.into(),
            file,
            progress: 0,
            status: UploadStatus::Uploading,
            error: None,
        }
    }

    /// A record for a file rejected before any transfer started.
    pub fn failed(id: impl Into<UploadId>, file: FileRef, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file,
            progress: 0,
            status: UploadStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// Ordered registry of upload attempts, at most one record per id.
///
/// Insertion order is preserved and is the display order. All operations are
/// synchronous and mutate in place under a single writer; operations on an
/// absent id are no-ops so that late transfer events cannot corrupt the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadTracker {
    records: Vec<UploadRecord>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` at the tail. A record whose id is already present is
    /// rejected (with a warning) to keep the one-record-per-id invariant.
    pub fn add(&mut self, record: UploadRecord) {
        if self.position(&record.id).is_some() {
            log::warn!("ignoring add for duplicate upload id {}", record.id);
            return;
        }
        self.records.push(record);
    }

    /// Removes the record with the given id, if present.
    pub fn remove(&mut self, id: &str) {
        if let Some(index) = self.position(id) {
            self.records.remove(index);
        }
    }

    /// Sets `progress` on the matching record, leaving all other fields
    /// untouched. Values are stored as-is, without clamping.
    pub fn update_progress(&mut self, id: &str, progress: u8) {
        if let Some(record) = self.get_mut(id) {
            record.progress = progress;
        }
    }

    /// Sets `status` and `error` together. The error is retained only for
    /// `Failed`; any other status clears it, so a record can never carry a
    /// stale error alongside a non-failed status.
    pub fn update_status(&mut self, id: &str, status: UploadStatus, error: Option<String>) {
        if let Some(record) = self.get_mut(id) {
            record.status = status;
            record.error = match status {
                UploadStatus::Failed => error,
                UploadStatus::Uploading | UploadStatus::Completed => None,
            };
        }
    }

    /// Empties the list.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn get(&self, id: &str) -> Option<&UploadRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn any_uploading(&self) -> bool {
        self.records
            .iter()
            .any(|record| record.status == UploadStatus::Uploading)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut UploadRecord> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}
