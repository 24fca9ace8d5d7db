pub mod config;
pub mod errors;
pub mod net;

pub use config::{FetchConfig, PathPolicy};
pub use errors::FetchError;
pub use net::{fetch, Body, FetchOptions, Fetcher, Headers, Method, Response};
