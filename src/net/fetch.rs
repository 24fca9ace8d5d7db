use url::Url;

use crate::config::{FetchConfig, PathPolicy};
use crate::errors::FetchError;
use crate::net::options::FetchOptions;
use crate::net::response::Response;
use crate::net::transport::{ReqwestTransport, Transport, TransportRequest};

/// Issues requests through a transport using a fixed configuration.
///
/// A `Fetcher` holds no per-request state; every call opens its own connection and
/// its responses are independent of each other.
#[derive(Debug, Clone)]
pub struct Fetcher<T = ReqwestTransport> {
    transport: T,
    config: FetchConfig,
}

impl Fetcher<ReqwestTransport> {
    /// Creates a fetcher backed by `reqwest`.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        config.validate()?;
        Ok(Self {
            transport: ReqwestTransport::new(&config),
            config,
        })
    }
}

impl Default for Fetcher<ReqwestTransport> {
    fn default() -> Self {
        let config = FetchConfig::default();
        Self {
            transport: ReqwestTransport::new(&config),
            config,
        }
    }
}

impl<T: Transport> Fetcher<T> {
    /// Uses a custom transport. [`fetch`](Self::fetch) must still be awaited inside a
    /// tokio runtime, which buffers response bodies; elsewhere it fails with
    /// [`FetchError::NoRuntime`].
    pub fn with_transport(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Sends a request and resolves with the response as soon as its headers are in.
    ///
    /// The body is not awaited here; it buffers in the background and is claimed
    /// through the accessors on [`Response`].
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<Response, FetchError> {
        let request = prepare_request(url, options, self.config.path_policy)?;

        log::debug!(
            "Fetching {} {}://{}{}",
            request.method,
            request.protocol,
            request.hostname,
            request.path
        );

        let res = self
            .transport
            .open(request)
            .await
            .map_err(FetchError::Transport)?;

        log::debug!("Received {} {}", res.head.status, res.head.status_text);

        Response::new(res.head, res.body)
    }
}

/// Loads an URL with the default configuration and the `reqwest` transport.
pub async fn fetch(url: &str, options: FetchOptions) -> Result<Response, FetchError> {
    Fetcher::<ReqwestTransport>::default().fetch(url, options).await
}

/// Turns a URL and options into the request handed to the transport.
pub(crate) fn prepare_request(
    url: &str,
    mut options: FetchOptions,
    path_policy: PathPolicy,
) -> Result<TransportRequest, FetchError> {
    let parsed = Url::parse(url)?;

    let protocol = parsed.scheme();
    if protocol != "http" && protocol != "https" {
        return Err(FetchError::UnsupportedProtocol(protocol.to_string()));
    }

    let hostname = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| FetchError::MissingHost(url.to_string()))?;

    let path = match path_policy {
        PathPolicy::Forward => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        PathPolicy::RootOnly => {
            if parsed.path() != "/" || parsed.query().is_some() {
                log::debug!("Dropping path of {url}, requesting `/` instead");
            }
            "/".to_string()
        }
    };

    let headers = options.outgoing_headers();
    let body = options
        .body
        .take()
        .filter(|b| !b.is_empty())
        .map(|b| b.into_bytes());

    Ok(TransportRequest {
        protocol: protocol.to_string(),
        hostname: hostname.to_string(),
        port: parsed.port(),
        path,
        method: options.method.unwrap_or_default(),
        headers,
        body,
    })
}
