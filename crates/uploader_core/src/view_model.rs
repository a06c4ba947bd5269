use crate::highlight::Segment;
use crate::store::{UploadId, UploadRecord, UploadStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub uploads: Vec<UploadRowView>,
    pub upload_count: usize,
    /// True while any record is still `Uploading`.
    pub any_uploading: bool,
    pub max_size_bytes: u64,
    pub allowed_formats: Vec<String>,
    /// "Drag & drop a file or browse to upload", pre-segmented for emphasis.
    pub drop_hint: Vec<Segment>,
    /// "File must be .X or .Y", with the allowed formats as keywords.
    pub format_hint: Vec<Segment>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRowView {
    pub upload_id: UploadId,
    pub file_name: String,
    pub size_bytes: u64,
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
}

impl UploadRowView {
    pub(crate) fn from_record(record: &UploadRecord) -> Self {
        Self {
            upload_id: record.id.clone(),
            file_name: record.file.name.clone(),
            size_bytes: record.file.size,
            progress: record.progress,
            status: record.status,
            error: record.error.clone(),
        }
    }
}
