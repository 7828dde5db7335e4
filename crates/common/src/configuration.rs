use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::consts::{
    API_KEY_ENV, BIND_ADDRESS_ENV, CONFIG_PATH_ENV, DEFAULT_BIND_ADDRESS, DEFAULT_DOCUMENT_ROOT,
    DEFAULT_UPSTREAM_ENDPOINT, DEFAULT_UPSTREAM_TIMEOUT_SECS, PROXY_ENV_VARS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid upstream endpoint '{0}': {1}")]
    InvalidEndpoint(String, url::ParseError),

    #[error("invalid proxy url: {0}")]
    InvalidProxy(url::ParseError),
}

/// Shape of the optional YAML config file. Every key may be omitted.
/// The upstream credential is deliberately not representable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigurationFile {
    pub bind_address: Option<String>,
    pub document_root: Option<PathBuf>,
    pub upstream: Option<UpstreamFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpstreamFile {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Upstream credential. Debug output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for an empty value, which counts as "not configured".
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(ApiKey(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 8 characters followed by an ellipsis, for startup logs.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub api_key: Option<ApiKey>,
    pub proxy: Option<String>,
}

impl UpstreamConfig {
    pub fn new(endpoint: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        UpstreamConfig {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            api_key,
            proxy: None,
        }
    }
}

/// Process-wide settings, built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub bind_address: String,
    pub document_root: PathBuf,
    pub upstream: UpstreamConfig,
}

impl Configuration {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|name| std::env::var(name).ok())
    }

    /// Defaults, then the YAML file named by `NEWSREVIEW_CONFIG_PATH`, then
    /// environment overrides. `env` looks up a single variable.
    pub fn load<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match non_empty(&env, CONFIG_PATH_ENV) {
            Some(path) => read_configuration_file(&path)?,
            None => ConfigurationFile::default(),
        };
        let upstream_file = file.upstream.unwrap_or_default();

        let endpoint = upstream_file
            .endpoint
            .unwrap_or_else(|| DEFAULT_UPSTREAM_ENDPOINT.to_string());
        Url::parse(&endpoint).map_err(|err| ConfigError::InvalidEndpoint(endpoint.clone(), err))?;

        let proxy = resolve_proxy(&env);
        if let Some(proxy) = &proxy {
            Url::parse(proxy).map_err(ConfigError::InvalidProxy)?;
        }

        let bind_address = non_empty(&env, BIND_ADDRESS_ENV)
            .or(file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Configuration {
            bind_address,
            document_root: file
                .document_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_ROOT)),
            upstream: UpstreamConfig {
                endpoint,
                timeout: Duration::from_secs(
                    upstream_file
                        .timeout_secs
                        .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
                ),
                api_key: env(API_KEY_ENV).and_then(ApiKey::new),
                proxy,
            },
        })
    }
}

/// Picks the proxy from `https_proxy`, `HTTPS_PROXY`, `http_proxy`,
/// `HTTP_PROXY`, in that order. Empty values are skipped.
pub fn resolve_proxy<F>(env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    PROXY_ENV_VARS
        .iter()
        .find_map(|name| non_empty(&env, name))
}

fn non_empty<F>(env: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(name).filter(|value| !value.is_empty())
}

fn read_configuration_file(path: &str) -> Result<ConfigurationFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}
