//! Batch runs
//!
//! Applies a [`Script`] in document order over one session. Invalid
//! entries and protocol refusals are reported and skipped; any other
//! error aborts the remaining entries. The session is torn down on
//! every exit path.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::report::{Outcome, RunReport};
use crate::script::Script;
use crate::session::Session;
use crate::transport::{ImapTransport, Transport};
use tracing::{info, warn};

/// Owns the session for one batch run.
pub struct Engine<T: Transport> {
    session: Session<T>,
}

impl Engine<ImapTransport> {
    /// Connect and log in with `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration, connection, TLS or authentication error.
    pub async fn connect(config: &ImapConfig) -> Result<Self> {
        info!("Connecting to {}:{} as {}", config.host, config.port, config.username);
        Ok(Self::new(Session::open(config).await?))
    }
}

impl<T: Transport> Engine<T> {
    #[must_use]
    pub const fn new(session: Session<T>) -> Self {
        Self { session }
    }

    /// Apply every entry of `script`, then close the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aborted`] naming the entry that hit a fatal error.
    pub async fn run(self, script: &Script) -> Result<RunReport> {
        self.session
            .scoped(async |session| dispatch(script, session).await)
            .await
    }
}

/// Apply every entry of `script` over an open session.
///
/// # Errors
///
/// Returns [`Error::Aborted`] naming the entry that hit a fatal error.
/// Entries after it are not attempted.
pub async fn dispatch<T: Transport>(script: &Script, session: &mut Session<T>) -> Result<RunReport> {
    let mut report = RunReport::default();
    let mut executor = Executor::new(session);

    for entry in script.entries() {
        let operation = match &entry.operation {
            Ok(operation) => operation,
            Err(e) => {
                warn!("{e}");
                report.push(entry.index, Outcome::Skipped { reason: e.to_string() });
                continue;
            }
        };

        info!("Operation #{}: {}", entry.index, operation.kind());
        match executor.execute(operation).await {
            Ok(stats) => report.push(entry.index, Outcome::Applied { stats }),
            Err(e) if !e.is_fatal() => {
                warn!("Operation #{} ({}) skipped: {e}", entry.index, operation.kind());
                report.push(entry.index, Outcome::Skipped { reason: e.to_string() });
            }
            Err(e) => {
                return Err(Error::Aborted {
                    index: entry.index,
                    optype: operation.kind(),
                    source: Box::new(e),
                });
            }
        }
    }

    info!(
        "Run finished: {} applied, {} skipped",
        report.applied(),
        report.skipped()
    );
    Ok(report)
}

/// Connect with `config`, apply `script`, and disconnect.
///
/// # Errors
///
/// Returns a connection error, or [`Error::Aborted`] if an entry hits a
/// fatal error.
pub async fn run(config: &ImapConfig, script: &Script) -> Result<RunReport> {
    Engine::connect(config).await?.run(script).await
}
