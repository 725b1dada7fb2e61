//! Batch mailbox operations over IMAP
//!
//! Reads a JSON document of `move`, `delete` and `download` operations
//! and applies them in order to a single IMAP account over TLS or
//! STARTTLS. Messages are matched by sender, recipient, or taken whole
//! from a folder; moves and deletes address messages by UID, and
//! downloads are stored content-addressed as `<sha1>.txt`.
//!
//! ```no_run
//! use mail_org::{ImapConfig, Script};
//! use std::path::Path;
//!
//! # async fn example() -> mail_org::Result<()> {
//! let script = Script::load(Path::new("mail-org.json")).await?;
//! let config = ImapConfig::from_env()?;
//! let report = mail_org::run(&config, &script).await?;
//! println!("{} applied, {} skipped", report.applied(), report.skipped());
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod download;
mod engine;
mod error;
mod executor;
mod folder;
mod operation;
mod report;
mod script;
mod selector;
mod session;
mod transport;
mod uid;

pub use config::{ImapConfig, Security};
pub use connection::ImapSession;
pub use download::{Stored, content_hash, expand_home, store_message};
pub use engine::{Engine, dispatch, run};
pub use error::{Error, Result};
pub use executor::Executor;
pub use folder::Folder;
pub use operation::{Addresses, DeleteOp, DownloadOp, MoveOp, Operation};
pub use report::{DeleteStats, DownloadStats, EntryReport, MoveStats, Outcome, RunReport, Stats};
pub use script::{Entry, Script};
pub use selector::{Criterion, MessageRef, parse_search_ids};
pub use session::{Session, SessionState, Teardown};
pub use transport::{ImapTransport, Transport};
pub use uid::{MessageUid, parse_uid_response};
