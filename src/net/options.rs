use std::collections::HashMap;

use crate::net::body::Body;
use crate::net::method::Method;

/// Header map as handed to and received from the transport. Keys keep the case the
/// caller used; a key that is written twice keeps its last value. Response headers
/// arriving more than once are joined with `", "`.
pub type Headers = HashMap<String, String>;

/// Header key the referrer is sent under. The misspelling is the one HTTP
/// standardised, not a typo here.
pub const REFERER: &str = "referer";

/// Options accepted by [`fetch`](crate::net::fetch()). Unset fields fall back to the
/// transport defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    pub method: Option<Method>,
    pub headers: Option<Headers>,
    pub body: Option<Body>,
    pub referrer: Option<String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Adds a single header, creating the header map when needed.
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replaces the whole header map.
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn body<B: Into<Body>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn referrer<S: Into<String>>(mut self, referrer: S) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Takes the headers that go out on the wire out of the options: the caller's map with the
    /// referrer merged in under [`REFERER`]. An empty referrer is ignored.
    pub(crate) fn outgoing_headers(&mut self) -> Headers {
        let mut headers = self.headers.take();

        if let Some(referrer) = self.referrer.take().filter(|r| !r.is_empty()) {
            headers
                .get_or_insert_with(Headers::new)
                .insert(REFERER.to_string(), referrer);
        }

        headers.unwrap_or_default()
    }
}
