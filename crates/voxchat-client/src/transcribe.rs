//! Client for the transcription service.
//!
//! Streams a validated audio clip as the multipart field `file` to
//! `POST {base_url}/api/transcribe`, reporting percentage progress chunk by
//! chunk, with a hard request timeout.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use reqwest::Body;
use serde::Deserialize;

use voxchat_core::types::AudioSource;

use crate::error::ClientError;
use crate::progress::ProgressSender;

/// Request path on the transcription host.
const TRANSCRIBE_PATH: &str = "/api/transcribe";

/// Upload chunk size. Small enough that progress moves visibly for clips
/// near the 10 MiB cap.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Content error raised when the reply carries no transcription text.
pub const NO_TRANSCRIPTION: &str = "No transcription returned from server";

/// A service that turns an audio clip into recognized text.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Upload `source` and return the transcription, reporting progress
    /// through `progress` as bytes go out.
    async fn transcribe(
        &self,
        source: AudioSource,
        progress: ProgressSender,
    ) -> Result<String, ClientError>;
}

/// Reply shape of the transcription service.
///
/// `text` is the canonical field; `transcription` and `result` are
/// compatibility shims for older server builds.
#[derive(Debug, Deserialize)]
pub struct TranscribeReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

impl TranscribeReply {
    /// The transcription, preferring the canonical field. Empty strings
    /// count as absent.
    pub fn transcript(self) -> Option<String> {
        self.text
            .filter(|s| !s.is_empty())
            .or(self.transcription.filter(|s| !s.is_empty()))
            .or(self.result.filter(|s| !s.is_empty()))
    }
}

/// Optional JSON body attached to an error status.
#[derive(Debug, Default, Deserialize)]
struct TranscribeErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP implementation of [`TranscriptionService`] over `reqwest`.
pub struct TranscriptionClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl TranscriptionClient {
    /// Build a client for the given base URL and per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TRANSCRIBE_PATH)
    }

    /// Split the clip into a counted byte stream that advances `progress`
    /// as each chunk is handed to the transport.
    fn counted_chunks(
        data: Vec<u8>,
        progress: ProgressSender,
    ) -> impl futures::Stream<Item = Result<Bytes, std::io::Error>> {
        let total = data.len() as u64;
        let chunks: Vec<Bytes> = data
            .chunks(UPLOAD_CHUNK_BYTES)
            .map(Bytes::copy_from_slice)
            .collect();
        let mut sent = 0u64;
        futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            progress.report(sent, total);
            Ok::<Bytes, std::io::Error>(chunk)
        }))
    }
}

#[async_trait]
impl TranscriptionService for TranscriptionClient {
    async fn transcribe(
        &self,
        source: AudioSource,
        progress: ProgressSender,
    ) -> Result<String, ClientError> {
        let total = source.len();
        let part = multipart::Part::stream_with_length(
            Body::wrap_stream(Self::counted_chunks(source.data, progress)),
            total,
        )
        .file_name(source.name)
        .mime_str(&source.mime_type)
        .map_err(|e| ClientError::Content(format!("Invalid MIME type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(bytes = total, "Uploading audio for transcription");

        let response = self
            .http
            .post(self.endpoint())
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ClientError::from_request)?;

        let status = response.status();
        if status.is_success() {
            let reply: TranscribeReply = response
                .json()
                .await
                .map_err(|e| ClientError::Content(format!("Malformed reply: {}", e)))?;
            let text = reply
                .transcript()
                .ok_or_else(|| ClientError::Content(NO_TRANSCRIPTION.to_string()))?;
            tracing::debug!(text_len = text.len(), "Audio transcribed");
            Ok(text)
        } else {
            let code = status.as_u16();
            let body: TranscribeErrorBody = response.json().await.unwrap_or_default();
            tracing::warn!(status = code, "Transcription request failed");
            match body.error.filter(|s| !s.is_empty()) {
                Some(message) => Err(ClientError::Server {
                    status: code,
                    message,
                }),
                None => Err(ClientError::Status(code)),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_prefers_text_field() {
        let reply: TranscribeReply =
            serde_json::from_str(r#"{"text": "hello", "transcription": "old", "result": "older"}"#)
                .unwrap();
        assert_eq!(reply.transcript().unwrap(), "hello");
    }

    #[test]
    fn test_reply_falls_back_to_transcription() {
        let reply: TranscribeReply =
            serde_json::from_str(r#"{"transcription": "from shim", "result": "older"}"#).unwrap();
        assert_eq!(reply.transcript().unwrap(), "from shim");
    }

    #[test]
    fn test_reply_falls_back_to_result() {
        let reply: TranscribeReply = serde_json::from_str(r#"{"result": "oldest"}"#).unwrap();
        assert_eq!(reply.transcript().unwrap(), "oldest");
    }

    #[test]
    fn test_reply_empty_strings_count_as_absent() {
        let reply: TranscribeReply =
            serde_json::from_str(r#"{"text": "", "transcription": "", "result": ""}"#).unwrap();
        assert!(reply.transcript().is_none());
    }

    #[test]
    fn test_reply_missing_all_is_none() {
        let reply: TranscribeReply = serde_json::from_str(r#"{"duration": 3.2}"#).unwrap();
        assert!(reply.transcript().is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client =
            TranscriptionClient::new("http://localhost:5000/", Duration::from_secs(30)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/api/transcribe");
    }

    #[tokio::test]
    async fn test_counted_chunks_report_full_progress() {
        use futures::StreamExt;

        let progress = ProgressSender::new();
        let data = vec![7u8; UPLOAD_CHUNK_BYTES * 2 + 100];
        let total = data.len();
        let mut stream =
            Box::pin(TranscriptionClient::counted_chunks(data, progress.clone()));

        // Draining the stream drives the counter to completion.
        let mut seen = Vec::new();
        let mut drained = 0usize;
        while let Some(chunk) = stream.next().await {
            drained += chunk.unwrap().len();
            seen.push(progress.current());
        }
        assert_eq!(drained, total);
        assert_eq!(progress.current(), 100);
        // Monotone while draining.
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_counted_chunks_empty_clip() {
        use futures::StreamExt;

        let progress = ProgressSender::new();
        let mut stream =
            Box::pin(TranscriptionClient::counted_chunks(Vec::new(), progress.clone()));
        assert!(stream.next().await.is_none());
        assert_eq!(progress.current(), 0);
    }
}
