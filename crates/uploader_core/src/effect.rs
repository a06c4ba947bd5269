use crate::store::{FileRef, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the file to the transfer engine under the given id.
    StartUpload { upload_id: UploadId, file: FileRef },
    /// Ask the remote endpoint to forget an already-uploaded file.
    DeleteRemote { file_name: String },
}
