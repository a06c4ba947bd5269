use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use uploader_core::{Effect, FileSource, Msg, UploadOutcome};
use uploader_engine::{EngineEvent, EngineHandle, PayloadSource, TransferSettings, UploadPayload};

const PUMP_INTERVAL: Duration = Duration::from_millis(25);

/// Executes effects against the transfer engine and pumps engine events back
/// into the message channel. The engine lives on its own thread; the state
/// machine only ever sees plain `Msg` values.
pub(crate) struct EffectRunner {
    effect_tx: mpsc::Sender<Effect>,
}

impl EffectRunner {
    pub(crate) fn new(settings: TransferSettings, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (effect_tx, effect_rx) = mpsc::channel::<Effect>();

        thread::spawn(move || {
            let engine = EngineHandle::new(settings);
            loop {
                loop {
                    match effect_rx.try_recv() {
                        Ok(effect) => run_effect(&engine, effect),
                        Err(mpsc::TryRecvError::Empty) => break,
                        Err(mpsc::TryRecvError::Disconnected) => return,
                    }
                }
                while let Some(event) = engine.try_recv() {
                    if forward_event(&msg_tx, event).is_err() {
                        return;
                    }
                }
                thread::sleep(PUMP_INTERVAL);
            }
        });

        Self { effect_tx }
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            let _ = self.effect_tx.send(effect);
        }
    }
}

fn run_effect(engine: &EngineHandle, effect: Effect) {
    match effect {
        Effect::StartUpload { upload_id, file } => {
            engine_info!("StartUpload {} ({} bytes)", upload_id, file.size);
            let source = match file.source {
                FileSource::Path(path) => PayloadSource::Path(path),
                FileSource::Memory(bytes) => PayloadSource::Memory(bytes.as_ref().clone()),
            };
            engine.upload(
                upload_id,
                UploadPayload {
                    file_name: file.name,
                    source,
                },
            );
        }
        Effect::DeleteRemote { file_name } => {
            engine_info!("DeleteRemote {}", file_name);
            engine.delete(file_name);
        }
    }
}

fn forward_event(
    msg_tx: &mpsc::Sender<Msg>,
    event: EngineEvent,
) -> Result<(), mpsc::SendError<Msg>> {
    match event {
        EngineEvent::Progress(progress) => msg_tx.send(Msg::TransferProgress {
            upload_id: progress.upload_id,
            percent: progress.percent,
        }),
        EngineEvent::UploadCompleted { upload_id, result } => {
            let outcome = match result {
                Ok(receipt) => {
                    engine_info!("upload {} stored as {}", upload_id, receipt.file_name);
                    UploadOutcome::Success
                }
                Err(err) => UploadOutcome::Failed {
                    message: err.message,
                },
            };
            msg_tx.send(Msg::TransferDone { upload_id, outcome })
        }
        EngineEvent::DeleteCompleted { file_name, result } => {
            match result {
                Ok(_) => engine_info!("remote delete of {} confirmed", file_name),
                Err(err) => engine_warn!("remote delete of {} failed: {}", file_name, err),
            }
            msg_tx.send(Msg::NoOp)
        }
    }
}
