use crate::{AppState, Effect, Msg, UploadStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesChosen(files) => {
            let mut effects = Vec::with_capacity(files.len());
            for file in files {
                match state.policy().validate(&file) {
                    Ok(()) => {
                        let upload_id = state.begin_upload(file.clone());
                        effects.push(Effect::StartUpload { upload_id, file });
                    }
                    Err(error) => {
                        // Rejected files never reach the engine; the record
                        // itself carries the reason.
                        state.reject_upload(file, error);
                    }
                }
            }
            effects
        }
        Msg::TransferProgress { upload_id, percent } => {
            state.apply_progress(&upload_id, percent);
            Vec::new()
        }
        Msg::TransferDone { upload_id, outcome } => {
            state.apply_done(&upload_id, outcome);
            Vec::new()
        }
        Msg::RetryClicked { upload_id } => retry(&mut state, &upload_id),
        Msg::RemoveClicked { upload_id } => match state.remove_upload(&upload_id) {
            Some(record) if record.status == UploadStatus::Completed => {
                vec![Effect::DeleteRemote {
                    file_name: record.file.name,
                }]
            }
            // An uploading record is only forgotten; the transfer keeps
            // running and its late events land on an absent id.
            _ => Vec::new(),
        },
        Msg::ClearClicked => {
            state.clear_uploads();
            Vec::new()
        }
        Msg::MaxSizeChanged { bytes } => {
            state.set_max_size(bytes);
            Vec::new()
        }
        Msg::FormatToggled { format, active } => {
            state.toggle_format(&format, active);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Retry is delete-then-recreate: the failed record is replaced by a fresh
/// `Uploading` record under a new id, never flipped back in place. The stored
/// file is re-validated first, since the policy may have changed.
fn retry(state: &mut AppState, upload_id: &str) -> Vec<Effect> {
    let Some(record) = state.uploads().get(upload_id) else {
        return Vec::new();
    };
    if record.status != UploadStatus::Failed {
        return Vec::new();
    }
    let file = record.file.clone();

    match state.policy().validate(&file) {
        Ok(()) => {
            state.remove_upload(upload_id);
            let new_id = state.begin_upload(file.clone());
            vec![Effect::StartUpload {
                upload_id: new_id,
                file,
            }]
        }
        Err(error) => {
            state.mark_failed(upload_id, error);
            Vec::new()
        }
    }
}
