//! Fetch configuration.
//!
//! `FetchConfig` holds the few knobs a [`Fetcher`](crate::net::Fetcher) carries
//! between calls. Nothing in here is shared state: every call still opens its own
//! connection and owns its own body buffer.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_fetch::config::{FetchConfig, PathPolicy};
//! let cfg = FetchConfig::default();
//! assert_eq!(cfg.path_policy, PathPolicy::Forward);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use gosub_fetch::config::{FetchConfig, PathPolicy};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = FetchConfig::builder()
//!     .user_agent("MyShim/2.0")
//!     .path_policy(PathPolicy::RootOnly)
//!     .build()?; // returns Result<FetchConfig, FetchConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `user_agent`: UA string handed to the transport (`None` sends no UA).
//! - `path_policy`: whether the URL path and query reach the transport.

use std::fmt;

use http::HeaderValue;
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "GosubFetch/0.1";

/// Decides what request path the transport receives.
///
/// Early versions of this shim only handed protocol, host and port to the
/// transport, so every request went to `/`. Callers that depend on that keep it by
/// selecting [`PathPolicy::RootOnly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPolicy {
    /// Send the URL's path and query string.
    #[default]
    Forward,
    /// Always request `/`, dropping path and query.
    RootOnly,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: Option<String>,
    pub path_policy: PathPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            path_policy: PathPolicy::Forward,
        }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }

    /// Checks a config that was assembled by hand instead of through the builder.
    pub fn validate(&self) -> Result<(), FetchConfigError> {
        validate(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchConfigBuilder {
    inner: FetchConfig,
}

impl FetchConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut FetchConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = Some(ua.into())) }
    pub fn no_user_agent(self) -> Self { self.map(|c| c.user_agent = None) }
    pub fn path_policy(self, policy: PathPolicy) -> Self { self.map(|c| c.path_policy = policy) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut FetchConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<FetchConfig, FetchConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchConfigError {
    EmptyUserAgent,
    InvalidUserAgent(String),
}

impl fmt::Display for FetchConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchConfigError::EmptyUserAgent =>
                write!(f, "user_agent must not be empty (use no_user_agent() to omit it)"),
            FetchConfigError::InvalidUserAgent(ua) =>
                write!(f, "user_agent {ua:?} is not a valid header value"),
        }
    }
}
impl std::error::Error for FetchConfigError {}

fn validate(c: &FetchConfig) -> Result<(), FetchConfigError> {
    if let Some(ua) = &c.user_agent {
        if ua.trim().is_empty() {
            return Err(FetchConfigError::EmptyUserAgent);
        }
        if HeaderValue::from_str(ua).is_err() {
            return Err(FetchConfigError::InvalidUserAgent(ua.clone()));
        }
    }
    Ok(())
}
