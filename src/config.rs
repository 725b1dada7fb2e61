//! IMAP connection configuration

use crate::error::{Error, Result};
use std::env;
use std::fmt;

/// How the IMAP channel is encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// TLS from the first byte (IMAPS, port 993).
    #[default]
    Tls,
    /// Plain greeting, then `STARTTLS` upgrade (port 143).
    StartTls,
}

impl Security {
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Tls => 993,
            Self::StartTls => 143,
        }
    }
}

/// Credentials and endpoint of the single account a run operates on
#[derive(Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: Security,
    /// Skip certificate verification (local bridges, self-signed certs).
    pub accept_invalid_certs: bool,
}

impl ImapConfig {
    /// Load IMAP configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `EMAIL_HOST`
    /// - `EMAIL_USERNAME`
    /// - `EMAIL_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `EMAIL_SECURITY` (`tls` or `starttls`, default: `tls`)
    /// - `EMAIL_PORT` (default: 993 for `tls`, 143 for `starttls`)
    /// - `EMAIL_ACCEPT_INVALID_CERTS` (default: `false`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or an
    /// optional one cannot be parsed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key/value lookup using the same
    /// variable names as [`ImapConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required key is absent or an
    /// optional one cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| Error::Config(format!("{key} not set")));

        let security = match lookup("EMAIL_SECURITY").as_deref() {
            None => Security::default(),
            Some(s) if s.eq_ignore_ascii_case("tls") => Security::Tls,
            Some(s) if s.eq_ignore_ascii_case("starttls") => Security::StartTls,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid EMAIL_SECURITY: {other} (expected `tls` or `starttls`)"
                )));
            }
        };

        let port = match lookup("EMAIL_PORT") {
            Some(p) => p
                .parse()
                .map_err(|e| Error::Config(format!("Invalid EMAIL_PORT: {e}")))?,
            None => security.default_port(),
        };

        let accept_invalid_certs = lookup("EMAIL_ACCEPT_INVALID_CERTS")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            host: required("EMAIL_HOST")?,
            port,
            username: required("EMAIL_USERNAME")?,
            password: required("EMAIL_PASSWORD")?,
            security,
            accept_invalid_certs,
        })
    }
}

impl fmt::Debug for ImapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImapConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("security", &self.security)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}
