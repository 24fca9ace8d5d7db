use futures::stream::{self, StreamExt};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Extensions, StatusCode};
use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;

use crate::config::FetchConfig;
use crate::net::options::Headers;
use crate::net::transport::{
    ResponseHead, Transport, TransportError, TransportRequest, TransportResponse,
};

/// Transport backed by `reqwest`.
///
/// A new client is built for every request, so each call gets its own connection.
/// Redirects are returned to the caller as-is.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    user_agent: Option<String>,
}

impl ReqwestTransport {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
        }
    }

    fn client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().redirect(Policy::none());
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        Ok(builder.build()?)
    }
}

impl Transport for ReqwestTransport {
    async fn open(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = request.url()?;
        let headers = to_header_map(&request.headers)?;
        let client = self.client()?;

        let mut req_builder = client.request(request.method.into(), url).headers(headers);
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let res = req_builder.send().await?;

        let status = res.status();
        let head = ResponseHead {
            status: status.as_u16(),
            status_text: status_text(status, res.extensions()),
            headers: from_header_map(res.headers()),
        };

        // Pull chunks until the body ends; stop after the first error.
        let body = stream::unfold(Some(res), |state| async move {
            let Some(mut res) = state else {
                return None;
            };
            match res.chunk().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(res))),
                Ok(None) => None,
                Err(e) => Some((Err(TransportError::from(e)), None)),
            }
        })
        .boxed();

        Ok(TransportResponse { head, body })
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| TransportError::InvalidHeader {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        map.append(name, value);
    }

    Ok(map)
}

// Collect all the headers we've received. Repeated names are joined with ", ".
fn from_header_map(headers: &HeaderMap) -> Headers {
    let mut out = Headers::with_capacity(headers.keys_len());

    for (k, v) in headers {
        let value = v.to_str().unwrap_or("");
        out.entry(k.to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    out
}

// hyper only records the reason phrase when the server's text differs from the
// canonical one for the code.
fn status_text(status: StatusCode, extensions: &Extensions) -> String {
    match extensions.get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
