//! HTTP adapter for the [`DebateBackend`] port.
//!
//! REST calls are plain JSON request/response. Streaming turns are a
//! chunked response with one JSON event per line; a background reader
//! task reassembles lines across chunk boundaries, parses each with the
//! domain's event parser, and forwards events over a channel. Malformed
//! lines are logged and skipped — they never abort the stream.

use crate::backend::protocol::{
    AdvanceStageRequest, CoinTossResponse, CreateSessionRequest, CreateSessionResponse,
    DecideNextResponse, PostMessageRequest, SnapshotResponse, StreamRequest,
};
use async_trait::async_trait;
use futures::StreamExt;
use podium_application::{
    BackendError, DebateBackend, RoleAssignment, SessionSnapshot, StreamHandle,
};
use podium_domain::{
    CoinTossResult, NextAction, ParticipantId, SessionId, Stage, StreamEvent, parse_event_line,
};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of the stream event channel; applies backpressure to the
/// transport read when the consumer falls behind.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Debate backend over HTTP.
pub struct HttpDebateBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDebateBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::SessionNotFound(
                response.text().await.unwrap_or_default(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::ConnectionError(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::ProtocolError(e.to_string()))
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::ConnectionError(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::ProtocolError(e.to_string()))
    }

    async fn post_ack<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::ConnectionError(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }
}

#[async_trait]
impl DebateBackend for HttpDebateBackend {
    async fn create_session(
        &self,
        topic: &str,
        assignments: &[RoleAssignment],
    ) -> Result<SessionId, BackendError> {
        let request = CreateSessionRequest {
            topic: topic.to_string(),
            assignments: assignments.iter().map(Into::into).collect(),
        };
        let response: CreateSessionResponse = self.post_json("/api/sessions", &request).await?;
        Ok(response.session_id)
    }

    async fn load_session(&self, id: &SessionId) -> Result<SessionSnapshot, BackendError> {
        let response: SnapshotResponse =
            self.get_json(&format!("/api/sessions/{}", id)).await?;
        Ok(response.into())
    }

    async fn coin_toss(&self, id: &SessionId) -> Result<CoinTossResult, BackendError> {
        let response: CoinTossResponse = self
            .post_json(&format!("/api/sessions/{}/coin-toss", id), &())
            .await?;
        Ok(response.result.into())
    }

    async fn advance_stage(&self, id: &SessionId, next: Stage) -> Result<(), BackendError> {
        self.post_ack(
            &format!("/api/sessions/{}/advance", id),
            &AdvanceStageRequest { next_stage: next },
        )
        .await
    }

    async fn post_message(
        &self,
        id: &SessionId,
        participant_id: &ParticipantId,
        content: &str,
    ) -> Result<(), BackendError> {
        self.post_ack(
            &format!("/api/sessions/{}/messages", id),
            &PostMessageRequest {
                participant_id: participant_id.clone(),
                content: content.to_string(),
            },
        )
        .await
    }

    async fn decide_next(&self, id: &SessionId) -> Result<NextAction, BackendError> {
        let response: DecideNextResponse =
            self.get_json(&format!("/api/sessions/{}/next", id)).await?;
        response.into_action()
    }

    async fn stream_participant(
        &self,
        id: &SessionId,
        participant_id: &ParticipantId,
        stage: Stage,
        language: &str,
    ) -> Result<StreamHandle, BackendError> {
        let response = self
            .client
            .post(self.url(&format!(
                "/api/sessions/{}/participants/{}/stream",
                id, participant_id
            )))
            .json(&StreamRequest {
                stage,
                language: language.to_string(),
            })
            .send()
            .await
            .map_err(|e| BackendError::ConnectionError(e.to_string()))?;
        let response = Self::check(response).await?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let reader = tokio::spawn(read_event_stream(response, tx));
        Ok(StreamHandle::new(rx, reader))
    }
}

/// Background reader: chunked bytes → lines → events.
async fn read_event_stream(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut chunks = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                // Transport failure mid-stream: surface and stop.
                let _ = tx
                    .send(StreamEvent::Error(format!("stream transport: {}", e)))
                    .await;
                return;
            }
        };
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        for line in drain_lines(&mut buffer) {
            if forward_line(&line, &tx).await {
                return;
            }
        }
    }

    // Transport ended; a final line may lack its newline.
    let trailing = buffer.trim().to_string();
    if !trailing.is_empty() {
        forward_line(&trailing, &tx).await;
    }
    debug!("Event stream closed");
}

/// Parse and send one line. Returns true when the stream is finished
/// (terminal event or receiver gone).
async fn forward_line(line: &str, tx: &mpsc::Sender<StreamEvent>) -> bool {
    match parse_event_line(line) {
        Ok(event) => {
            let terminal = event.is_terminal();
            tx.send(event).await.is_err() || terminal
        }
        Err(e) => {
            // Skip-and-continue: one bad line must not kill the turn.
            warn!("Skipping malformed stream line: {}", e);
            false
        }
    }
}

/// Remove and return every complete line in the buffer, leaving any
/// partial trailing line for the next chunk.
fn drain_lines(buffer: &mut String) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(pos) = buffer.find('\n') {
        let line = buffer[..pos].trim().to_string();
        buffer.drain(..=pos);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}
