mod app;
mod config;
mod effects;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::bail;
use uploader_core::UploadStatus;

use crate::logging::LogDestination;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = parse_args(&args)?;

    logging::initialize(parsed.log_destination);
    let config = config::load_config(&parsed.config_path);

    if parsed.files.is_empty() {
        bail!("usage: uploader_app [--config <path>] [--log-file] <file>...");
    }

    let view = app::run(&config, parsed.files)?;

    let failed = view
        .uploads
        .iter()
        .filter(|row| row.status == UploadStatus::Failed)
        .count();
    if failed > 0 {
        bail!("{failed} upload(s) failed");
    }
    Ok(())
}

struct ParsedArgs {
    config_path: PathBuf,
    log_destination: LogDestination,
    files: Vec<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut config_path = PathBuf::from(config::CONFIG_FILENAME);
    let mut log_destination = LogDestination::Terminal;
    let mut files = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => config_path = PathBuf::from(path),
                None => bail!("--config needs a path"),
            },
            "--log-file" => log_destination = LogDestination::Both,
            _ => files.push(PathBuf::from(arg)),
        }
    }

    Ok(ParsedArgs {
        config_path,
        log_destination,
        files,
    })
}
