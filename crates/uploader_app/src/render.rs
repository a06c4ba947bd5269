//! Plain-text rendering of the view model. Keyword segments are wrapped in
//! brackets, standing in for the emphasis a widget would apply.

use uploader_core::{AppViewModel, Segment, UploadRowView, UploadStatus};

pub(crate) fn hints(view: &AppViewModel) {
    println!("{}", segments_to_line(&view.drop_hint));
    println!("{}", segments_to_line(&view.format_hint));
    println!("Max size: {:.1}MB", view.max_size_bytes as f64 / (1024.0 * 1024.0));
}

pub(crate) fn status_lines(view: &AppViewModel) {
    for row in &view.uploads {
        println!("{}", row_line(row));
    }
}

fn segments_to_line(segments: &[Segment]) -> String {
    let mut line = String::new();
    for segment in segments {
        match segment {
            Segment::Plain(text) => line.push_str(text),
            Segment::Keyword { text, .. } => {
                line.push('[');
                line.push_str(text);
                line.push(']');
            }
        }
    }
    line
}

fn row_line(row: &UploadRowView) -> String {
    let status = match row.status {
        UploadStatus::Uploading => format!("uploading {}%", row.progress),
        UploadStatus::Completed => "completed".to_string(),
        UploadStatus::Failed => match &row.error {
            Some(reason) => format!("failed - {reason}"),
            None => "failed".to_string(),
        },
    };
    format!("{} ({}) {}", row.file_name, human_size(row.size_bytes), status)
}

fn human_size(bytes: u64) -> String {
    if bytes > 1024 * 1024 {
        format!("{:.2}MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2}KB", bytes as f64 / 1024.0)
    }
}
