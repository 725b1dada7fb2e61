//! Session lifecycle
//!
//! A [`Session`] owns the one connection a batch run uses. Teardown is
//! best-effort: CLOSE and LOGOUT are each attempted regardless of the
//! other's outcome, failures are logged, and nothing is propagated.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::transport::{ImapTransport, Transport};
use tracing::{debug, error, info};

/// Whether the session still holds a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Outcome of each teardown step.
///
/// Purely informational: teardown never fails the run.
#[derive(Debug)]
pub struct Teardown {
    pub close: Result<()>,
    pub logout: Result<()>,
}

impl Teardown {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.close.is_ok() && self.logout.is_ok()
    }
}

/// One authenticated IMAP session.
pub struct Session<T: Transport> {
    transport: T,
    host: String,
    principal: String,
    selected: Option<Folder>,
    state: SessionState,
}

impl Session<ImapTransport> {
    /// Connect to `config.host` and log in.
    ///
    /// # Errors
    ///
    /// Returns a connection, TLS or authentication error.
    pub async fn open(config: &ImapConfig) -> Result<Self> {
        let transport = ImapTransport::connect(config).await?;
        Ok(Self::new(transport, &config.host, &config.username))
    }
}

impl<T: Transport> Session<T> {
    /// Wrap an already-authenticated transport.
    #[must_use]
    pub fn new(transport: T, host: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            transport,
            host: host.into(),
            principal: principal.into(),
            selected: None,
            state: SessionState::Open,
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The folder the last successful SELECT opened.
    #[must_use]
    pub const fn selected_folder(&self) -> Option<&Folder> {
        self.selected.as_ref()
    }

    pub(crate) const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// SELECT `folder` read-write.
    ///
    /// Always issued, even when `folder` is already selected, so the
    /// server's view of the folder is fresh.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the session is closed, or the
    /// transport's error if SELECT fails.
    pub async fn select(&mut self, folder: &Folder) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(Error::Connection(format!("session to {} is closed", self.host)));
        }

        // A failed SELECT leaves no folder selected (RFC 3501 6.3.1).
        self.selected = None;
        self.transport.select(folder).await?;
        self.selected = Some(folder.clone());
        Ok(())
    }

    /// Close the selected folder and log out.
    ///
    /// Both steps are attempted independently. Calling this on an
    /// already closed session attempts nothing and reports success.
    pub async fn close(&mut self) -> Teardown {
        if self.state == SessionState::Closed {
            return Teardown {
                close: Ok(()),
                logout: Ok(()),
            };
        }
        self.state = SessionState::Closed;

        debug!("Closing session to {}", self.host);
        let close = self.transport.close().await;
        if let Err(e) = &close {
            error!("CLOSE on {} failed: {}", self.host, e);
        }

        let logout = self.transport.logout().await;
        if let Err(e) = &logout {
            error!("LOGOUT of {} from {} failed: {}", self.principal, self.host, e);
        }

        self.selected = None;
        info!("Disconnected from {}", self.host);
        Teardown { close, logout }
    }

    /// Run `f` against this session, then tear it down.
    ///
    /// Teardown happens whether `f` succeeds or fails; `f`'s result is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub async fn scoped<F, R>(mut self, f: F) -> Result<R>
    where
        F: AsyncFnOnce(&mut Self) -> Result<R>,
    {
        let result = f(&mut self).await;
        self.close().await;
        result
    }
}
