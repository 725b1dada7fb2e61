//! Error types for mail-org
//!
//! Errors fall into two classes. Validation and protocol errors
//! (`UnknownOperation`, `Protocol`) are recovered locally: the batch
//! entry that raised them is reported and skipped. Everything else is
//! fatal and aborts the remaining run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Invalid operation document: {0}")]
    Format(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{verb} failed: {detail}")]
    Protocol { verb: &'static str, detail: String },

    #[error("Operation #{index} skipped: {reason}")]
    UnknownOperation { index: usize, reason: String },

    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run aborted at operation #{index} ({optype}): {source}")]
    Aborted {
        index: usize,
        optype: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this error must stop the remaining operations.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Protocol { .. } | Self::UnknownOperation { .. })
    }

    /// Map an `async-imap` failure for the given verb.
    ///
    /// Tagged `NO`/`BAD` completions are protocol errors; a dropped
    /// connection or socket failure is a connection error; a response
    /// the client could not decode is a parse error.
    pub(crate) fn from_imap(verb: &'static str, err: async_imap::error::Error) -> Self {
        use async_imap::error::Error as ImapError;

        match err {
            ImapError::No(detail) | ImapError::Bad(detail) => Self::Protocol { verb, detail },
            ImapError::Io(e) => Self::Connection(format!("{verb}: {e}")),
            ImapError::ConnectionLost => Self::Connection(format!("{verb}: connection lost")),
            ImapError::Parse(e) => Self::Parse(format!("{verb}: {e}")),
            other => Self::Imap(format!("{verb}: {other}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
