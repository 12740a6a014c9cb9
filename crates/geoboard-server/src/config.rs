//! Configuration management for the Geoboard server
//!
//! Read from `MESSAGE_SERVICE_*` environment variables (a `.env` file is
//! loaded first by `main`). The DEV life cycle fills in defaults for
//! everything except the PostgreSQL url.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use geoboard::{LifeCycle, MessageRepositoryKind};

const LIFE_CYCLE_KEY: &str = "MESSAGE_SERVICE_ENVIRONMENT";
const REPO_TYPE_KEY: &str = "MESSAGE_SERVICE_REPO_TYPE";
const TIMEOUT_SECONDS_KEY: &str = "MESSAGE_SERVICE_TIMEOUT";
const PORT_KEY: &str = "MESSAGE_SERVICE_PORT";
const PG_URL_KEY: &str = "MESSAGE_SERVICE_PG_URL";
const INIT_DATASET_KEY: &str = "MESSAGE_SERVICE_INIT_DATASET";
const TOKEN_SECRET_KEY: &str = "MESSAGE_SERVICE_TOKEN_SECRET";
const TOKEN_PUBLIC_KEY: &str = "MESSAGE_SERVICE_TOKEN_PUB";

const DEV_TIMEOUT_SECONDS: u64 = 60;
const DEV_PORT: u16 = 3333;
const DEV_TOKEN_SECRET: &str = "secret";

/// Key used to verify bearer tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKey {
    /// Shared HMAC secret (HS256)
    Secret(String),
    /// PEM encoded RSA public key (RS256)
    RsaPublicPem(Vec<u8>),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub life_cycle: LifeCycle,
    pub repo_kind: MessageRepositoryKind,
    /// Deadline applied to every repository call
    pub timeout: Duration,
    pub port: u16,
    pub pg_url: Option<String>,
    /// JSON file of messages to load at startup
    pub init_dataset: Option<PathBuf>,
    pub token_key: TokenKey,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let life_cycle = match get(LIFE_CYCLE_KEY) {
            Some(value) => value.parse::<LifeCycle>().map_err(anyhow::Error::msg)?,
            None => LifeCycle::Dev,
        };

        let repo_kind = match get(REPO_TYPE_KEY) {
            Some(value) => value
                .parse::<MessageRepositoryKind>()
                .map_err(anyhow::Error::msg)?,
            None if life_cycle.is_dev() => MessageRepositoryKind::InMemory,
            None => bail!("No repo type configured, set {} environment variable", REPO_TYPE_KEY),
        };

        let timeout = match get(TIMEOUT_SECONDS_KEY) {
            Some(value) => Duration::from_secs(value.trim().parse::<u64>().with_context(|| {
                format!("Invalid timeout, set {} to a number of seconds", TIMEOUT_SECONDS_KEY)
            })?),
            None if life_cycle.is_dev() => Duration::from_secs(DEV_TIMEOUT_SECONDS),
            None => bail!("No timeout configured, set {} environment variable", TIMEOUT_SECONDS_KEY),
        };

        let port = match get(PORT_KEY) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid port, set {} to a port number", PORT_KEY))?,
            None if life_cycle.is_dev() => DEV_PORT,
            None => bail!("No port configured, set {} environment variable", PORT_KEY),
        };

        let pg_url = get(PG_URL_KEY);
        if repo_kind == MessageRepositoryKind::Postgresql && pg_url.is_none() {
            bail!(
                "No PostgreSQL url configured, set {} environment variable",
                PG_URL_KEY
            );
        }

        let init_dataset = get(INIT_DATASET_KEY).map(PathBuf::from);

        let token_key = match (get(TOKEN_SECRET_KEY), get(TOKEN_PUBLIC_KEY)) {
            (Some(secret), _) => TokenKey::Secret(secret),
            (None, Some(path)) => {
                let pem = std::fs::read(&path)
                    .with_context(|| format!("Failed to read token public key from {}", path))?;
                TokenKey::RsaPublicPem(pem)
            }
            (None, None) if life_cycle.is_dev() => TokenKey::Secret(DEV_TOKEN_SECRET.to_string()),
            (None, None) => bail!(
                "Set either {} or {} environment variable",
                TOKEN_SECRET_KEY,
                TOKEN_PUBLIC_KEY
            ),
        };

        Ok(Self {
            life_cycle,
            repo_kind,
            timeout,
            port,
            pg_url,
            init_dataset,
            token_key,
        })
    }
}
