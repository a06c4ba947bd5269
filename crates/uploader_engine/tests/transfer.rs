use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use uploader_engine::{
    EngineEvent, FailureKind, PayloadSource, ProgressSink, ReqwestUploader, TransferProgress,
    TransferSettings, UploadPayload, Uploader,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings(server: &MockServer) -> TransferSettings {
    TransferSettings {
        endpoint: server.uri(),
        ..TransferSettings::default()
    }
}

fn memory_payload(file_name: &str, len: usize) -> UploadPayload {
    UploadPayload {
        file_name: file_name.to_string(),
        source: PayloadSource::Memory(vec![7u8; len]),
    }
}

fn upload_ok_body(file_name: &str) -> String {
    format!(
        r#"{{"data":{{"fileName":"{file_name}"}},"message":"uploaded","success":true}}"#
    )
}

#[tokio::test]
async fn upload_returns_receipt_and_emits_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(upload_ok_body("stored-photo.jpg"), "application/json"),
        )
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(settings(&server));
    let sink = Arc::new(TestSink::default());
    let payload = memory_payload("photo.jpg", 256 * 1024);

    let receipt = uploader
        .upload("upload-1-photo.jpg", payload, sink.clone())
        .await
        .expect("upload ok");
    assert_eq!(receipt.file_name, "stored-photo.jpg");
    assert_eq!(receipt.message, "uploaded");

    let progress: Vec<TransferProgress> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(progress) => Some(progress),
            _ => None,
        })
        .collect();
    assert!(!progress.is_empty());
    assert_eq!(progress.first().unwrap().percent, 0);
    assert_eq!(progress.last().unwrap().percent, 100);
    assert_eq!(progress.last().unwrap().bytes_sent, 256 * 1024);
    assert!(progress.windows(2).all(|w| w[0].percent <= w[1].percent));
    assert!(progress
        .iter()
        .all(|p| p.upload_id == "upload-1-photo.jpg" && p.bytes_total == 256 * 1024));
}

#[tokio::test]
async fn upload_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(settings(&server));
    let sink = Arc::new(TestSink::default());

    let err = uploader
        .upload("u1", memory_payload("photo.jpg", 64), sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn upload_fails_when_server_flags_no_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"data":null,"message":"quota exceeded","success":false}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(settings(&server));
    let sink = Arc::new(TestSink::default());

    let err = uploader
        .upload("u1", memory_payload("photo.jpg", 64), sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "quota exceeded");
}

#[tokio::test]
async fn upload_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(settings(&server));
    let sink = Arc::new(TestSink::default());

    let err = uploader
        .upload("u1", memory_payload("photo.jpg", 64), sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::BadResponse);
}

#[tokio::test]
async fn upload_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(upload_ok_body("late.jpg"), "application/json"),
        )
        .mount(&server)
        .await;

    let mut slow = settings(&server);
    slow.request_timeout = Duration::from_millis(50);
    let uploader = ReqwestUploader::new(slow);
    let sink = Arc::new(TestSink::default());

    let err = uploader
        .upload("u1", memory_payload("photo.jpg", 64), sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn upload_reads_payload_from_disk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(upload_ok_body("stored-note.txt"), "application/json"),
        )
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello from disk").unwrap();
    file.flush().unwrap();

    let uploader = ReqwestUploader::new(settings(&server));
    let sink = Arc::new(TestSink::default());
    let payload = UploadPayload {
        file_name: "note.txt".to_string(),
        source: PayloadSource::Path(file.path().to_path_buf()),
    };

    let receipt = uploader
        .upload("u1", payload, sink.clone())
        .await
        .expect("upload ok");
    assert_eq!(receipt.file_name, "stored-note.txt");

    let last_progress = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(progress) => Some(progress),
            _ => None,
        })
        .last()
        .unwrap();
    assert_eq!(last_progress.percent, 100);
    assert_eq!(last_progress.bytes_total, b"hello from disk".len() as u64);
}

#[tokio::test]
async fn upload_fails_on_missing_file() {
    let uploader = ReqwestUploader::new(TransferSettings::default());
    let sink = Arc::new(TestSink::default());
    let payload = UploadPayload {
        file_name: "gone.txt".to_string(),
        source: PayloadSource::Path("/definitely/not/here.txt".into()),
    };

    let err = uploader.upload("u1", payload, sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn upload_rejects_invalid_endpoint() {
    let uploader = ReqwestUploader::new(TransferSettings {
        endpoint: "not a url".to_string(),
        ..TransferSettings::default()
    });
    let sink = Arc::new(TestSink::default());

    let err = uploader
        .upload("u1", memory_payload("photo.jpg", 64), sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn delete_sends_filename_and_parses_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/upload"))
        .and(body_json(serde_json::json!({ "filename": "stored.jpg" })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"message":"deleted","success":true}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(settings(&server));
    let receipt = uploader.delete("stored.jpg").await.expect("delete ok");
    assert_eq!(receipt.message, "deleted");
}

#[tokio::test]
async fn delete_propagates_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"message":"unknown file","success":false}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let uploader = ReqwestUploader::new(settings(&server));
    let err = uploader.delete("ghost.jpg").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "unknown file");
}
