//! Scripted transport for unit tests.

use std::sync::Mutex;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use crate::net::options::Headers;
use crate::net::transport::{
    BodyStream, ResponseHead, Transport, TransportError, TransportRequest, TransportResponse,
};

pub(crate) type ChunkSender = mpsc::UnboundedSender<Result<Bytes, TransportError>>;

/// Returns a body stream fed by the sender. Dropping the sender ends the body.
pub(crate) fn body_channel() -> (ChunkSender, BodyStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let body = stream::unfold(rx, |mut rx| async move {
        let Some(item) = rx.recv().await else {
            return None;
        };
        Some((item, rx))
    })
    .boxed();
    (tx, body)
}

/// Body stream that yields `chunks` and ends.
pub(crate) fn body_from(chunks: &[&'static str]) -> BodyStream {
    let items: Vec<Result<Bytes, TransportError>> =
        chunks.iter().map(|c| Ok(Bytes::from_static(c.as_bytes()))).collect();
    stream::iter(items).boxed()
}

pub(crate) fn head(status: u16, status_text: &str) -> ResponseHead {
    ResponseHead {
        status,
        status_text: status_text.to_string(),
        headers: Headers::new(),
    }
}

enum Outcome {
    Respond(ResponseHead, BodyStream),
    Fail(String),
}

/// Records every request and answers with a single scripted outcome.
pub(crate) struct ScriptedTransport {
    outcome: Mutex<Option<Outcome>>,
    pub(crate) requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn respond(head: ResponseHead, body: BodyStream) -> Self {
        Self::new(Outcome::Respond(head, body))
    }

    pub(crate) fn fail(message: &str) -> Self {
        Self::new(Outcome::Fail(message.to_string()))
    }

    fn new(outcome: Outcome) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Transport for ScriptedTransport {
    async fn open(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);

        match self.outcome.lock().unwrap().take() {
            Some(Outcome::Respond(head, body)) => Ok(TransportResponse { head, body }),
            Some(Outcome::Fail(message)) => Err(TransportError::Io(message)),
            None => Err(TransportError::Io("scripted transport already used".into())),
        }
    }
}
