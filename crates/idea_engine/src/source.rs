use std::time::Duration;

use futures_util::StreamExt;
use idea_logging::{idea_debug, idea_info};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};

use crate::sse::SseDecoder;
use crate::{ConnectionId, EngineEvent, FailureKind, StreamError, StreamSummary};

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Limit on establishing the TCP/TLS connection. `None` waits forever.
    pub connect_timeout: Option<Duration>,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            allowed_content_types: vec![EVENT_STREAM_CONTENT_TYPE.to_string()],
            user_agent: format!("idea_stream/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub trait FragmentSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelFragmentSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelFragmentSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl FragmentSink for ChannelFragmentSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// A server-push text stream.
///
/// Implementations deliver `Opened` once the stream is accepted, then one
/// `Fragment` per message event in order, and return when the stream ends.
/// The final `Ended` event is produced by the caller from the return value.
#[async_trait::async_trait]
pub trait FragmentSource: Send + Sync {
    async fn stream(
        &self,
        connection: ConnectionId,
        url: &str,
        sink: &dyn FragmentSink,
    ) -> Result<StreamSummary, StreamError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFragmentSource {
    settings: StreamSettings,
}

impl ReqwestFragmentSource {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, StreamError> {
        let mut builder = reqwest::Client::builder().user_agent(self.settings.user_agent.clone());
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| StreamError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl FragmentSource for ReqwestFragmentSource {
    async fn stream(
        &self,
        connection: ConnectionId,
        url: &str,
        sink: &dyn FragmentSink,
    ) -> Result<StreamSummary, StreamError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| StreamError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        idea_info!("Connecting stream {} to {}", connection, parsed);
        let response = client
            .get(parsed)
            .header(ACCEPT, EVENT_STREAM_CONTENT_TYPE)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !self.is_content_type_allowed(&content_type) {
            return Err(StreamError::new(
                FailureKind::UnsupportedContentType { content_type },
                "not an event stream",
            ));
        }

        sink.emit(EngineEvent::Opened { connection });

        let mut decoder = SseDecoder::new();
        let mut summary = StreamSummary::default();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            summary.bytes += chunk.len() as u64;
            for event in decoder.feed(&chunk) {
                if !event.is_message() {
                    idea_debug!(
                        "Stream {} skipped '{}' event ({} bytes)",
                        connection,
                        event.event,
                        event.data.len()
                    );
                    continue;
                }
                summary.fragments += 1;
                sink.emit(EngineEvent::Fragment {
                    connection,
                    text: event.data,
                });
            }
        }

        Ok(summary)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> StreamError {
    if err.is_timeout() {
        return StreamError::new(FailureKind::Timeout, err.to_string());
    }
    StreamError::new(FailureKind::Network, err.to_string())
}
