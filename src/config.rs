//! Client configuration.

use std::time::Duration;

/// Default endpoint when `ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str = "https://localhost:9200";

/// Default AWS region when `AWS_REGION` is not set in signed mode.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Endpoints with this prefix get certificate validation disabled: local
/// development clusters ship self-signed certificates.
const LOCALHOST_TLS_PREFIX: &str = "https://localhost:";

/// Transport mode: direct connection versus AWS-signed requests.
///
/// The two modes are mutually exclusive. Signed mode carries no user
/// credentials in the request itself; the SigV4 signature authenticates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Direct TLS connection, optionally with basic auth.
    SelfHosted {
        /// Basic auth username.
        username: Option<String>,
        /// Basic auth password.
        password: Option<String>,
    },
    /// AWS SigV4-signed connection.
    AwsSigned {
        /// Signing service name (`es` for managed domains, `aoss` for Serverless).
        service: String,
        /// AWS region to sign for.
        region: String,
    },
}

/// TLS options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsOptions {
    /// Skip certificate and hostname verification (local development only).
    pub danger_accept_invalid_certs: bool,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL.
    pub endpoint: String,
    /// Transport mode.
    pub mode: ConnectionMode,
    /// TLS options.
    pub tls: TlsOptions,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for an endpoint, in anonymous self-hosted mode.
    ///
    /// Endpoints starting with `https://localhost:` get certificate
    /// validation disabled automatically.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let tls = TlsOptions {
            danger_accept_invalid_certs: endpoint.starts_with(LOCALHOST_TLS_PREFIX),
        };
        Self {
            endpoint,
            mode: ConnectionMode::SelfHosted {
                username: None,
                password: None,
            },
            tls,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Resolve configuration from the environment.
    ///
    /// Recognized variables: `ENDPOINT` (default `https://localhost:9200`),
    /// `SERVICE` (selects AWS-signed mode), `AWS_REGION` (default
    /// `us-east-1`, signed mode only), `USERNAME` and `PASSWORD` (basic
    /// auth, self-hosted mode, both required).
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let config = Self::new(endpoint);

        match std::env::var("SERVICE") {
            Ok(service) => {
                let region =
                    std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
                config.with_aws_signing(service, region)
            }
            Err(_) => match (std::env::var("USERNAME"), std::env::var("PASSWORD")) {
                (Ok(username), Ok(password)) => config.with_basic_auth(username, password),
                _ => config,
            },
        }
    }

    /// Set basic authentication credentials (self-hosted mode).
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.mode = ConnectionMode::SelfHosted {
            username: Some(username.into()),
            password: Some(password.into()),
        };
        self
    }

    /// Switch to AWS-signed mode for the given service and region.
    pub fn with_aws_signing(mut self, service: impl Into<String>, region: impl Into<String>) -> Self {
        self.mode = ConnectionMode::AwsSigned {
            service: service.into(),
            region: region.into(),
        };
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Skip certificate verification (DANGER: only for development).
    pub fn with_insecure_tls(mut self) -> Self {
        self.tls.danger_accept_invalid_certs = true;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
