//! Harness settings.
//!
//! Target environment, service base URLs and the knobs that drive the
//! client (timeout, retries, workers, logging).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::Headers;

/// Target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development (default).
    #[default]
    Dev,
    /// Staging.
    Staging,
    /// Production.
    Prod,
}

impl Environment {
    /// Returns the environment name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }

    /// Returns the base URL of a service in this environment.
    ///
    /// All environments currently point at the same public services.
    #[must_use]
    pub const fn base_url(self, service: Service) -> &'static str {
        match (self, service) {
            (Self::Dev | Self::Staging | Self::Prod, Service::FakeRest) => {
                "https://jsonplaceholder.typicode.com"
            }
            (Self::Dev | Self::Staging | Self::Prod, Service::AuthSandbox) => {
                "https://reqres.in/api"
            }
            (Self::Dev | Self::Staging | Self::Prod, Service::Echo) => "https://httpbin.org",
            (Self::Dev | Self::Staging | Self::Prod, Service::UserManagement) => {
                "https://gorest.co.in/public/v2"
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            other => Err(DomainError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Remote services exercised by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Fake REST data service (posts).
    FakeRest,
    /// Login/auth sandbox.
    AuthSandbox,
    /// HTTP echo/introspection service.
    Echo,
    /// Token-authenticated user management service.
    UserManagement,
}

impl Service {
    /// Returns the short service key used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FakeRest => "jsonplaceholder",
            Self::AuthSandbox => "reqres",
            Self::Echo => "httpbin",
            Self::UserManagement => "gorest",
        }
    }

    /// Returns true if calls to this service need a bearer token.
    #[must_use]
    pub const fn requires_token(self) -> bool {
        matches!(self, Self::UserManagement)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "jsonplaceholder" | "fake_rest" => Ok(Self::FakeRest),
            "reqres" | "auth_sandbox" => Ok(Self::AuthSandbox),
            "httpbin" | "echo" => Ok(Self::Echo),
            "gorest" | "user_management" => Ok(Self::UserManagement),
            other => Err(DomainError::UnknownService(other.to_string())),
        }
    }
}

/// Resolved harness settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target environment.
    pub environment: Environment,
    /// Bearer token for the user management service.
    pub user_management_token: Option<String>,
    /// Default request timeout.
    pub timeout: Duration,
    /// Total attempts per request, including the first.
    pub retry_count: u32,
    /// Worker concurrency for performance cases.
    pub parallel_workers: usize,
    /// Log filter directive (e.g. "info", "debug").
    pub log_level: String,
    /// Whether request/response events are emitted.
    pub log_requests: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            user_management_token: None,
            timeout: Duration::from_secs(30),
            retry_count: 3,
            parallel_workers: 4,
            log_level: "info".to_string(),
            log_requests: true,
        }
    }
}

impl Settings {
    /// Returns the base URL of a service.
    #[must_use]
    pub const fn base_url(&self, service: Service) -> &'static str {
        self.environment.base_url(service)
    }

    /// Joins a service base URL and a path.
    #[must_use]
    pub fn endpoint(&self, service: Service, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url(service).trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Returns the JSON headers a caller should send to `service`.
    ///
    /// The user management service also gets an `Authorization` header
    /// when a token is configured. Nothing here is merged implicitly;
    /// callers pass the result to the client themselves.
    #[must_use]
    pub fn headers_for(&self, service: Service) -> Headers {
        let mut headers = Headers::new()
            .with("Content-Type", "application/json")
            .with("Accept", "application/json");

        if service.requires_token() {
            if let Some(token) = self.token() {
                headers.insert("Authorization", format!("Bearer {token}"));
            }
        }

        headers
    }

    /// Returns the configured token, ignoring empty values.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.user_management_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    /// Applies an explicit token that takes priority over the configured one.
    #[must_use]
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.user_management_token = Some(token);
        }
        self
    }
}
