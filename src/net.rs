//! Network layer: the `fetch` entry point, its options and the response wrapper.
//!
//! The actual bytes on the wire are moved by a [`Transport`]. The default one is
//! backed by `reqwest`; tests and embedders can plug in their own.

pub mod body;
pub mod fetch;
pub mod method;
pub mod options;
pub mod response;
pub mod transport;

pub use body::Body;
pub use fetch::{fetch, Fetcher};
pub use method::Method;
pub use options::{FetchOptions, Headers, REFERER};
pub use response::{BodyFuture, Response};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};
