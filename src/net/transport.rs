//! HTTP transport seam.
//!
//! A [`Transport`] opens one request and hands back the response head together with
//! a stream of body chunks. It owns the connection; nothing in this crate pools or
//! reuses connections. The body stream carries the three events a response body can
//! produce:
//!
//! - `Some(Ok(chunk))`: data arrived
//! - `None`: the body ended
//! - `Some(Err(e))`: the body failed, no further items follow

mod reqwest_client;
#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use bytes::Bytes;
use futures::stream::BoxStream;
use url::Url;

use crate::net::method::Method;
use crate::net::options::Headers;

pub use reqwest_client::ReqwestTransport;

/// Body chunks as they arrive from the connection.
pub type BodyStream = BoxStream<'static, Result<Bytes, TransportError>>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("{0}")]
    Io(String),

    #[error("body stream closed before the response completed")]
    Closed,
}

/// Everything a transport needs to issue one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// URL scheme without the trailing colon (`http` or `https`).
    pub protocol: String,
    /// Host as it appears in the URL; IPv6 literals keep their brackets.
    pub hostname: String,
    /// Explicit port, `None` for the scheme default.
    pub port: Option<u16>,
    /// Path plus optional `?query`; always starts with `/`.
    pub path: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// Rebuilds the absolute URL the request targets.
    pub fn url(&self) -> Result<Url, TransportError> {
        let authority = match self.port {
            Some(port) => format!("{}:{}", self.hostname, port),
            None => self.hostname.clone(),
        };

        Ok(Url::parse(&format!("{}://{}{}", self.protocol, authority, self.path))?)
    }
}

/// Status line and headers, available as soon as the response starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
}

pub struct TransportResponse {
    pub head: ResponseHead,
    pub body: BodyStream,
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// The underlying request/response primitive.
///
/// The body stream is drained on a tokio task, so responses can only be turned into
/// a [`Response`](crate::net::Response) inside a tokio runtime.
pub trait Transport: Send + Sync {
    /// Sends `request` and resolves once the response head has arrived, or with the
    /// error that prevented it (DNS, connect, write failures).
    fn open(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}
