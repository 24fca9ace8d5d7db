//! Response wrapper with a single-use, eagerly buffered body.
//!
//! As soon as a [`Response`] is built it starts draining the body stream on a
//! background task and keeps every chunk until the stream ends. The body can then
//! be claimed exactly once through [`Response::buffer`], [`Response::text`] or
//! [`Response::json`]; any later claim fails with [`FetchError::BodyUsed`].
//!
//! ## Notes
//! - Buffering starts whether or not the body is ever claimed, and there is no
//!   backpressure: the whole body is held in memory.
//! - Claiming happens when the accessor is *called*, not when its future is
//!   awaited. Two calls in a row fail on the second one even if the first has not
//!   finished yet.
//! - The accessor futures do not borrow the response.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::errors::FetchError;
use crate::net::options::Headers;
use crate::net::transport::{BodyStream, ResponseHead, TransportError};

type BufferedBody = oneshot::Receiver<Result<Bytes, TransportError>>;

pub struct Response {
    /// Numeric HTTP status code (e.g., `200`, `404`).
    status: u16,
    /// Reason phrase as reported by the transport.
    status_text: String,
    /// Headers captured when the response arrived.
    headers: Headers,
    /// Pending or finished body. `None` once claimed.
    body: Option<BufferedBody>,
}

impl Response {
    /// Wraps a response whose head has arrived and starts buffering its body.
    ///
    /// Buffering runs on the current tokio runtime; without one this fails with
    /// [`FetchError::NoRuntime`].
    pub(crate) fn new(head: ResponseHead, body: BodyStream) -> Result<Self, FetchError> {
        let runtime = Handle::try_current().map_err(|_| FetchError::NoRuntime)?;
        let (tx, rx) = oneshot::channel();

        runtime.spawn(async move {
            let result = collect_body(body).await;
            if let Err(e) = &result {
                log::debug!("Response body failed while buffering: {e}");
            }
            // Nobody listening means the response was dropped unclaimed.
            let _ = tx.send(result);
        });

        Ok(Self {
            status: head.status,
            status_text: head.status_text,
            headers: head.headers,
            body: Some(rx),
        })
    }

    /// True when the status code is in the `200..300` range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Reports whether the body can still be claimed: `true` until one of the
    /// body accessors has been called, `false` afterwards.
    pub fn body_used(&self) -> bool {
        self.body.is_some()
    }

    /// Claims the body as raw bytes.
    ///
    /// The returned future resolves once the whole body has been received. If the
    /// body was claimed before, it resolves immediately with
    /// [`FetchError::BodyUsed`].
    pub fn buffer(&mut self) -> BodyFuture {
        BodyFuture {
            inner: self.body.take(),
        }
    }

    /// Claims the body and decodes it as UTF-8, replacing invalid sequences.
    pub fn text(&mut self) -> impl Future<Output = Result<String, FetchError>> + Send + 'static {
        let body = self.buffer();
        async move {
            let bytes = body.await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }

    /// Claims the body and parses its text as JSON.
    pub fn json<T: DeserializeOwned + Send + 'static>(
        &mut self,
    ) -> impl Future<Output = Result<T, FetchError>> + Send + 'static {
        let text = self.text();
        async move {
            let text = text.await?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .field("body_used", &self.body_used())
            .finish()
    }
}

/// Future returned by [`Response::buffer`].
#[must_use = "futures do nothing unless awaited"]
pub struct BodyFuture {
    inner: Option<BufferedBody>,
}

impl Future for BodyFuture {
    type Output = Result<Bytes, FetchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.inner.as_mut() else {
            return Poll::Ready(Err(FetchError::BodyUsed));
        };

        match Pin::new(rx).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(Ok(bytes))) => Poll::Ready(Ok(bytes)),
            Poll::Ready(Ok(Err(e))) => Poll::Ready(Err(FetchError::Stream(e))),
            // The buffering task went away without reporting.
            Poll::Ready(Err(_)) => Poll::Ready(Err(FetchError::Stream(TransportError::Closed))),
        }
    }
}

/// Drains `body` in arrival order. Partial data is dropped on error.
async fn collect_body(mut body: BodyStream) -> Result<Bytes, TransportError> {
    let mut chunks: Vec<Bytes> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        log::trace!("Buffered body chunk of {} bytes", chunk.len());
        chunks.push(chunk);
    }

    Ok(concat(chunks))
}

fn concat(mut chunks: Vec<Bytes>) -> Bytes {
    if chunks.len() == 1 {
        return chunks.remove(0);
    }

    let total = chunks.iter().map(Bytes::len).sum();
    let mut buf = BytesMut::with_capacity(total);
    for chunk in &chunks {
        buf.extend_from_slice(chunk);
    }
    buf.freeze()
}
