use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{mpsc, Arc};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::Stream;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;

use crate::types::{
    DeleteReceipt, DeleteRequestBody, DeleteResponseBody, EngineEvent, FailureKind, TransferError,
    TransferProgress, UploadId, UploadReceipt, UploadResponseBody,
};

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct TransferSettings {
    /// Base URL of the upload service; requests go to `{endpoint}/upload`.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Payload handed to the engine for one transfer.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub source: PayloadSource,
}

#[derive(Debug, Clone)]
pub enum PayloadSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl PayloadSource {
    async fn read(&self) -> Result<Vec<u8>, TransferError> {
        match self {
            PayloadSource::Memory(bytes) => Ok(bytes.clone()),
            PayloadSource::Path(path) => tokio::fs::read(path).await.map_err(|err| {
                TransferError::new(FailureKind::Io, format!("{}: {err}", path.display()))
            }),
        }
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Sends `payload` as a multipart `file` part, emitting progress events
    /// through `sink` while the body streams out.
    async fn upload(
        &self,
        upload_id: &str,
        payload: UploadPayload,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<UploadReceipt, TransferError>;

    /// Asks the endpoint to forget a previously uploaded file.
    async fn delete(&self, file_name: &str) -> Result<DeleteReceipt, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: TransferSettings,
}

impl ReqwestUploader {
    pub fn new(settings: TransferSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransferError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| TransferError::new(FailureKind::Network, err.to_string()))
    }

    fn upload_url(&self) -> Result<reqwest::Url, TransferError> {
        let raw = format!("{}/upload", self.settings.endpoint.trim_end_matches('/'));
        reqwest::Url::parse(&raw)
            .map_err(|err| TransferError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        upload_id: &str,
        payload: UploadPayload,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<UploadReceipt, TransferError> {
        let url = self.upload_url()?;
        let client = self.build_client()?;

        let bytes = payload.source.read().await?;
        let total = bytes.len() as u64;

        sink.emit(EngineEvent::Progress(TransferProgress {
            upload_id: upload_id.to_string(),
            percent: 0,
            bytes_sent: 0,
            bytes_total: total,
        }));

        let body = ProgressBody::new(bytes, upload_id.to_string(), sink);
        let part = multipart::Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(payload.file_name.clone());
        let form = multipart::Form::new().part("file", part);

        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        let parsed: UploadResponseBody = serde_json::from_str(&text)
            .map_err(|err| TransferError::new(FailureKind::BadResponse, err.to_string()))?;
        if !parsed.success {
            return Err(TransferError::new(FailureKind::Rejected, parsed.message));
        }
        let data = parsed.data.ok_or_else(|| {
            TransferError::new(FailureKind::BadResponse, "missing data in upload response")
        })?;

        Ok(UploadReceipt {
            file_name: data.file_name,
            message: parsed.message,
        })
    }

    async fn delete(&self, file_name: &str) -> Result<DeleteReceipt, TransferError> {
        let url = self.upload_url()?;
        let client = self.build_client()?;
        let body = serde_json::to_string(&DeleteRequestBody {
            filename: file_name,
        })
        .map_err(|err| TransferError::new(FailureKind::BadResponse, err.to_string()))?;

        let response = client
            .delete(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        let parsed: DeleteResponseBody = serde_json::from_str(&text)
            .map_err(|err| TransferError::new(FailureKind::BadResponse, err.to_string()))?;
        if !parsed.success {
            return Err(TransferError::new(FailureKind::Rejected, parsed.message));
        }

        Ok(DeleteReceipt {
            message: parsed.message,
        })
    }
}

/// Rounded percentage of bytes sent, the way browser clients report it.
fn percent(sent: u64, total: u64) -> u8 {
    let total = total.max(1);
    let rounded = (sent * 100 + total / 2) / total;
    rounded.min(100) as u8
}

fn map_reqwest_error(err: reqwest::Error) -> TransferError {
    if err.is_timeout() {
        return TransferError::new(FailureKind::Timeout, err.to_string());
    }
    TransferError::new(FailureKind::Network, err.to_string())
}

/// Request body that counts the chunks it hands to the HTTP client and emits
/// one progress event per percent step.
struct ProgressBody {
    chunks: std::vec::IntoIter<Bytes>,
    sent: u64,
    total: u64,
    last_percent: Option<u8>,
    upload_id: UploadId,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressBody {
    fn new(bytes: Vec<u8>, upload_id: UploadId, sink: Arc<dyn ProgressSink>) -> Self {
        let total = bytes.len() as u64;
        let payload = Bytes::from(bytes);
        let mut chunks = Vec::with_capacity(payload.len() / CHUNK_SIZE + 1);
        let mut offset = 0;
        while offset < payload.len() {
            let end = (offset + CHUNK_SIZE).min(payload.len());
            chunks.push(payload.slice(offset..end));
            offset = end;
        }
        Self {
            chunks: chunks.into_iter(),
            sent: 0,
            total,
            // The 0% event is emitted by the caller before the request starts.
            last_percent: Some(0),
            upload_id,
            sink,
        }
    }
}

impl Stream for ProgressBody {
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.chunks.next() {
            Some(chunk) => {
                this.sent += chunk.len() as u64;
                let percent = percent(this.sent, this.total);
                if this.last_percent != Some(percent) {
                    this.last_percent = Some(percent);
                    this.sink.emit(EngineEvent::Progress(TransferProgress {
                        upload_id: this.upload_id.clone(),
                        percent,
                        bytes_sent: this.sent,
                        bytes_total: this.total,
                    }));
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            None => Poll::Ready(None),
        }
    }
}
