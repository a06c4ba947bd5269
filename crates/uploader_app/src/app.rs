use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context;
use engine_logging::engine_info;
use uploader_core::{update, AppState, AppViewModel, FileRef, FileSource, Msg};
use uploader_engine::TransferSettings;

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::render;

/// Drives the state machine until every chosen file reaches a terminal
/// status. Returns the final view so the caller can decide the exit code.
pub(crate) fn run(config: &AppConfig, paths: Vec<PathBuf>) -> anyhow::Result<AppViewModel> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let settings = TransferSettings {
        endpoint: config.endpoint.clone(),
        ..TransferSettings::default()
    };
    let runner = EffectRunner::new(settings, msg_tx.clone());

    let mut state = AppState::with_policy(config.policy());
    render::hints(&state.view());

    let files = paths
        .into_iter()
        .map(file_ref_from_path)
        .collect::<anyhow::Result<Vec<_>>>()?;
    msg_tx
        .send(Msg::FilesChosen(files))
        .map_err(|_| anyhow::anyhow!("message channel closed"))?;

    loop {
        let msg = msg_rx.recv()?;
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        if state.consume_dirty() {
            render::status_lines(&state.view());
        }
        if !state.uploads().any_uploading() {
            break;
        }
    }

    engine_info!("all transfers settled");
    Ok(state.view())
}

fn file_ref_from_path(path: PathBuf) -> anyhow::Result<FileRef> {
    let metadata =
        std::fs::metadata(&path).with_context(|| format!("cannot stat {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileRef {
        name,
        size: metadata.len(),
        media_type: None,
        source: FileSource::Path(path),
    })
}
