//! Runtime configuration.
//!
//! Configuration is read from the environment once per invocation and then
//! passed explicitly to the client constructors.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use atlas_pauser_core::{PauserError, Result};

use crate::cli_client::CliAtlasClient;
use crate::client::AtlasClient;
use crate::http_client::HttpAtlasClient;

/// Public API key variable.
pub const PUBLIC_KEY_VAR: &str = "MCLI_PUBLIC_API_KEY";
/// Private API key variable.
pub const PRIVATE_KEY_VAR: &str = "MCLI_PRIVATE_API_KEY";
/// API root override variable.
pub const BASE_URL_VAR: &str = "ATLAS_BASE_URL";
/// Transport selection variable.
pub const TRANSPORT_VAR: &str = "ATLAS_PAUSER_TRANSPORT";
/// CLI binary override variable.
pub const MONGOCLI_PATH_VAR: &str = "MCLI_PATH";
/// Debug mode variable.
pub const DEBUG_VAR: &str = "DEBUG";

/// Programmatic API key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    public_key: String,
    private_key: String,
}

impl Credentials {
    /// Create a key pair.
    #[must_use]
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// The public key, used as the digest user name.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The private key, used as the digest password.
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// How the control plane is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Direct HTTPS calls with digest authentication.
    #[default]
    Http,
    /// Shell out to `mongocli`.
    Cli,
}

impl Transport {
    /// Returns the configuration name of this transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Cli => "cli",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = PauserError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" => Ok(Self::Http),
            "cli" => Ok(Self::Cli),
            other => Err(PauserError::Config(format!(
                "unknown transport '{other}', expected 'http' or 'cli'"
            ))),
        }
    }
}

/// Configuration for one invocation.
#[derive(Debug, Clone)]
pub struct PauserConfig {
    /// API key pair.
    pub credentials: Credentials,
    /// Root of the Atlas admin API, without trailing slash.
    pub base_url: String,
    /// Selected transport.
    pub transport: Transport,
    /// `mongocli` binary used by the CLI transport.
    pub mongocli_path: PathBuf,
    /// When set, failures propagate out of `main` instead of being reported.
    pub debug: bool,
}

impl PauserConfig {
    /// Default API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://cloud.mongodb.com/api/atlas/v1.0";

    /// Default CLI binary.
    pub const DEFAULT_MONGOCLI: &'static str = "mongocli";

    /// Create a configuration with default settings.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            transport: Transport::default(),
            mongocli_path: PathBuf::from(Self::DEFAULT_MONGOCLI),
            debug: false,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::MissingEnv` if a credential variable is unset and
    /// `PauserError::Config` if the transport name is not recognized.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// See [`PauserConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let public_key = lookup(PUBLIC_KEY_VAR).ok_or(PauserError::MissingEnv(PUBLIC_KEY_VAR))?;
        let private_key =
            lookup(PRIVATE_KEY_VAR).ok_or(PauserError::MissingEnv(PRIVATE_KEY_VAR))?;

        let mut config = Self::new(Credentials::new(public_key, private_key));

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(transport) = lookup(TRANSPORT_VAR).filter(|v| !v.trim().is_empty()) {
            config.transport = transport.parse()?;
        }
        if let Some(path) = lookup(MONGOCLI_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            config.mongocli_path = PathBuf::from(path);
        }
        config.debug = debug_enabled(lookup(DEBUG_VAR).as_deref());

        Ok(config)
    }

    /// Replace the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Build the client for the configured transport.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::Config` if the HTTP client cannot be created.
    pub fn build_client(&self) -> Result<Arc<dyn AtlasClient>> {
        tracing::debug!(transport = %self.transport, base_url = %self.base_url, "Building Atlas client");

        match self.transport {
            Transport::Http => Ok(Arc::new(HttpAtlasClient::new(
                self.base_url.clone(),
                self.credentials.clone(),
            )?)),
            Transport::Cli => Ok(Arc::new(CliAtlasClient::new(
                self.mongocli_path.clone(),
                self.credentials.clone(),
            ))),
        }
    }
}

/// Returns true if the `DEBUG` value turns on debug mode.
#[must_use]
pub fn debug_enabled(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use atlas_pauser_core::ErrorKind;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const KEYS: [(&str, &str); 2] = [(PUBLIC_KEY_VAR, "pub"), (PRIVATE_KEY_VAR, "secret")];

    #[test]
    fn defaults() {
        let config = PauserConfig::from_lookup(lookup(&KEYS)).unwrap();

        assert_eq!(config.credentials.public_key(), "pub");
        assert_eq!(config.credentials.private_key(), "secret");
        assert_eq!(config.base_url, PauserConfig::DEFAULT_BASE_URL);
        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.mongocli_path, PathBuf::from("mongocli"));
        assert!(!config.debug);
    }

    #[test]
    fn missing_credentials_are_environment_errors() {
        let err = PauserConfig::from_lookup(lookup(&[(PRIVATE_KEY_VAR, "secret")])).unwrap_err();
        assert!(matches!(err, PauserError::MissingEnv(PUBLIC_KEY_VAR)));
        assert_eq!(err.kind(), ErrorKind::Environment);

        let err = PauserConfig::from_lookup(lookup(&[(PUBLIC_KEY_VAR, "pub")])).unwrap_err();
        assert!(matches!(err, PauserError::MissingEnv(PRIVATE_KEY_VAR)));
    }

    #[test]
    fn overrides() {
        let mut vars = KEYS.to_vec();
        vars.extend([
            (BASE_URL_VAR, "http://localhost:9000/api/"),
            (TRANSPORT_VAR, "cli"),
            (MONGOCLI_PATH_VAR, "/opt/bin/mongocli"),
            (DEBUG_VAR, "true"),
        ]);
        let config = PauserConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.transport, Transport::Cli);
        assert_eq!(config.mongocli_path, PathBuf::from("/opt/bin/mongocli"));
        assert!(config.debug);
    }

    #[test]
    fn unknown_transport_rejected() {
        for transport in ["grpc", "mongocli", "HTTP", "Cli", " cli"] {
            let mut vars = KEYS.to_vec();
            vars.push((TRANSPORT_VAR, transport));
            let err = PauserConfig::from_lookup(lookup(&vars)).unwrap_err();

            assert!(matches!(err, PauserError::Config(_)), "{transport:?} accepted");
            assert_eq!(err.kind(), ErrorKind::Environment);
        }
    }

    #[test]
    fn debug_only_on_exact_true() {
        assert!(debug_enabled(Some("true")));
        assert!(!debug_enabled(Some("TRUE")));
        assert!(!debug_enabled(Some("1")));
        assert!(!debug_enabled(None));
    }

    #[test]
    fn credentials_debug_redacts_private_key() {
        let rendered = format!("{:?}", Credentials::new("pub", "hunter2"));
        assert!(rendered.contains("pub"));
        assert!(!rendered.contains("hunter2"));
    }
}
