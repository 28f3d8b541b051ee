//! Process-level server settings.

use std::net::{AddrParseError, SocketAddr};

use mockable::Env;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DEV_LOGIN_ENV: &str = crate::inbound::http::auth::DEV_LOGIN_ENV;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("invalid BIND_ADDR '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

/// Where to listen, which store to use and whether dev sign-in is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: Option<String>,
    dev_login: bool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            database_url: None,
            dev_login: false,
        }
    }

    /// Read `BIND_ADDR`, `DATABASE_URL` and `AUTH_DEV_LOGIN`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerConfigError::BindAddr`] when `BIND_ADDR` is not a
    /// socket address.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ServerConfigError> {
        let raw = env
            .string(BIND_ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw
            .parse()
            .map_err(|source| ServerConfigError::BindAddr { value: raw, source })?;
        let database_url = env
            .string(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty());
        let dev_login = env.string(DEV_LOGIN_ENV).as_deref() == Some("1");
        Ok(Self {
            bind_addr,
            database_url,
            dev_login,
        })
    }

    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_dev_login(mut self, enabled: bool) -> Self {
        self.dev_login = enabled;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    #[must_use]
    pub fn dev_login(&self) -> bool {
        self.dev_login
    }
}
