use thiserror::Error;

use crate::store::FileRef;

/// Default size ceiling: 10 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Rejection reasons detected before a transfer starts.
///
/// The display strings double as the user-facing error text stored on the
/// rejected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported format")]
    UnsupportedFormat,
    #[error("Too Large")]
    TooLarge,
}

/// What the uploader accepts: an explicit structure with named fields instead
/// of loose per-call options.
///
/// A format entry is either a file extension (".JPG") or a media type
/// ("image/png"); matching is case-insensitive. An empty format list rejects
/// every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    max_size_bytes: u64,
    allowed_formats: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            allowed_formats: vec![".JPG".to_string(), ".PNG".to_string()],
        }
    }
}

impl UploadPolicy {
    pub fn new(max_size_bytes: u64, allowed_formats: Vec<String>) -> Self {
        Self {
            max_size_bytes,
            allowed_formats,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn allowed_formats(&self) -> &[String] {
        &self.allowed_formats
    }

    pub fn set_max_size_bytes(&mut self, bytes: u64) {
        self.max_size_bytes = bytes;
    }

    /// Switches one format on or off. The list stays duplicate-free and keeps
    /// the order in which formats were first enabled.
    pub fn set_format(&mut self, format: &str, active: bool) {
        if active {
            if !self.allowed_formats.iter().any(|f| f == format) {
                self.allowed_formats.push(format.to_string());
            }
        } else {
            self.allowed_formats.retain(|f| f != format);
        }
    }

    /// Checks `file` against the policy. The format check runs before the
    /// size check, so a file failing both reports `UnsupportedFormat`.
    pub fn validate(&self, file: &FileRef) -> Result<(), ValidationError> {
        if !self.is_format_allowed(file) {
            return Err(ValidationError::UnsupportedFormat);
        }
        if file.size > self.max_size_bytes {
            return Err(ValidationError::TooLarge);
        }
        Ok(())
    }

    /// A format matches when it equals the declared media type or is a suffix
    /// of the file name, both case-insensitively.
    fn is_format_allowed(&self, file: &FileRef) -> bool {
        let name = file.name.to_lowercase();
        self.allowed_formats.iter().any(|format| {
            let format = format.to_lowercase();
            let media_match = file
                .media_type
                .as_deref()
                .is_some_and(|media| media.to_lowercase() == format);
            media_match || name.ends_with(&format)
        })
    }
}
