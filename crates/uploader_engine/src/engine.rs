use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::engine_debug;

use crate::transfer::{
    ChannelProgressSink, ReqwestUploader, TransferSettings, UploadPayload, Uploader,
};
use crate::types::{EngineEvent, UploadId};

enum EngineCommand {
    Upload {
        upload_id: UploadId,
        payload: UploadPayload,
    },
    Delete {
        file_name: String,
    },
}

/// Handle to the background transfer engine: commands go in over a channel,
/// events come back out and are drained with `try_recv` from the caller's
/// event loop.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: TransferSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let uploader = Arc::new(ReqwestUploader::new(settings));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let uploader = uploader.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(uploader.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn upload(&self, upload_id: impl Into<UploadId>, payload: UploadPayload) {
        let _ = self.cmd_tx.send(EngineCommand::Upload {
            upload_id: upload_id.into(),
            payload,
        });
    }

    pub fn delete(&self, file_name: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Delete {
            file_name: file_name.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Upload { upload_id, payload } => {
            engine_debug!("upload command for {} ({})", upload_id, payload.file_name);
            let sink = Arc::new(ChannelProgressSink::new(event_tx.clone()));
            let result = uploader.upload(&upload_id, payload, sink).await;
            let _ = event_tx.send(EngineEvent::UploadCompleted { upload_id, result });
        }
        EngineCommand::Delete { file_name } => {
            engine_debug!("delete command for {}", file_name);
            let result = uploader.delete(&file_name).await;
            let _ = event_tx.send(EngineEvent::DeleteCompleted { file_name, result });
        }
    }
}
