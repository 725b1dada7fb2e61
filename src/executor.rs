//! Move, delete and download
//!
//! Every method selects its source folder afresh, so operations never
//! depend on the folder a previous one left selected. Messages are
//! handled newest first, in the order the selector returns them.

use crate::download::{self, Stored};
use crate::error::Result;
use crate::folder::Folder;
use crate::operation::{DeleteOp, DownloadOp, MoveOp, Operation};
use crate::report::{DeleteStats, DownloadStats, MoveStats, Stats};
use crate::selector::MessageRef;
use crate::session::Session;
use crate::transport::Transport;
use crate::uid::MessageUid;
use tracing::{debug, info, warn};

pub struct Executor<'s, T: Transport> {
    session: &'s mut Session<T>,
}

impl<'s, T: Transport> Executor<'s, T> {
    #[must_use]
    pub const fn new(session: &'s mut Session<T>) -> Self {
        Self { session }
    }

    /// Run one operation.
    ///
    /// # Errors
    ///
    /// Returns the first error the operation hits; messages handled
    /// before it stay handled.
    pub async fn execute(&mut self, operation: &Operation) -> Result<Stats> {
        match operation {
            Operation::Move(op) => self.move_messages(op).await.map(Stats::Move),
            Operation::Delete(op) => self.delete(op).await.map(Stats::Delete),
            Operation::Download(op) => self.download(op).await.map(Stats::Download),
        }
    }

    /// Delete every message from each sender in `op.from_addrs`.
    ///
    /// Each message is flagged `\Deleted` and expunged on its own, so an
    /// interrupted run has removed exactly the messages it got through.
    ///
    /// # Errors
    ///
    /// Fails on the first selection, UID resolution, STORE or EXPUNGE
    /// error.
    pub async fn delete(&mut self, op: &DeleteOp) -> Result<DeleteStats> {
        let folder = op.src_folder.clone().unwrap_or_default();
        let mut stats = DeleteStats::default();

        for from_addr in &op.from_addrs {
            info!("Delete {from_addr}: {folder}");
            let refs = self.session.select_by_sender(&folder, from_addr).await?;
            stats.matched += refs.len();

            for (i, message) in refs.iter().enumerate() {
                let uid = self.session.resolve_uid(*message).await?;
                info!("Deleting {} of {}: UID {uid}", i + 1, refs.len());
                self.delete_uid(uid).await?;
                stats.deleted += 1;
            }
        }
        Ok(stats)
    }

    /// Move messages from `op.src_folder` to `op.dst_folder`.
    ///
    /// Runs one search per pair in `from_addrs` × `to_addrs`. A recipient
    /// address, when present, is the search criterion for its pair.
    /// Servers without MOVE get UID COPY followed by delete; a refused
    /// copy is counted and the message left in place.
    ///
    /// # Errors
    ///
    /// Fails on the first selection, UID resolution or MOVE error, and on
    /// any fatal error during the copy fallback.
    pub async fn move_messages(&mut self, op: &MoveOp) -> Result<MoveStats> {
        let folder = op.src_folder.clone().unwrap_or_default();
        let recipients: Vec<Option<&str>> = if op.to_addrs.is_empty() {
            vec![None]
        } else {
            op.to_addrs.iter().map(|a| Some(a.as_str())).collect()
        };

        let native = self.session.transport_mut().supports_move().await?;
        let mut stats = MoveStats {
            native,
            ..MoveStats::default()
        };

        for (i, from_addr) in op.from_addrs.iter().enumerate() {
            info!(
                "Move {} of {}: {folder} to {}",
                i + 1,
                op.from_addrs.len(),
                op.dst_folder
            );
            for to_addr in &recipients {
                let refs = match to_addr {
                    Some(to_addr) => self.session.select_by_recipient(&folder, to_addr).await?,
                    None => self.session.select_by_sender(&folder, from_addr).await?,
                };
                info!("{} to move", refs.len());
                stats.matched += refs.len();

                for message in refs {
                    if self.move_one(message, &op.dst_folder, native).await? {
                        stats.moved += 1;
                    } else {
                        stats.copy_failures += 1;
                    }
                }
            }
        }
        Ok(stats)
    }

    /// Returns `false` when the fallback copy was refused.
    async fn move_one(&mut self, message: MessageRef, destination: &Folder, native: bool) -> Result<bool> {
        let subject = self.session.transport_mut().fetch_subject(message).await?;
        let uid = self.session.resolve_uid(message).await?;
        info!("Moving UID {uid} to {destination}: {subject}");

        if native {
            self.session
                .transport_mut()
                .uid_move(uid, destination)
                .await?;
            return Ok(true);
        }

        match self.session.transport_mut().uid_copy(uid, destination).await {
            Ok(()) => {
                self.delete_uid(uid).await?;
                Ok(true)
            }
            Err(e) if !e.is_fatal() => {
                warn!("Copy of UID {uid} to {destination} failed, leaving it in place: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_uid(&mut self, uid: MessageUid) -> Result<()> {
        let transport = self.session.transport_mut();
        transport.uid_store_deleted(uid).await?;
        transport.expunge().await
    }

    /// Download `op.src_folder` into `op.dst_dir_name`, newest first.
    ///
    /// Stops at the first message whose file already exists, assuming
    /// everything older was fetched by an earlier run. That assumption
    /// only holds if the server numbers messages in delivery order.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created, on selection or fetch
    /// errors, or if a file cannot be written.
    pub async fn download(&mut self, op: &DownloadOp) -> Result<DownloadStats> {
        let folder = op.src_folder.clone().unwrap_or_default();
        let dir = download::expand_home(&op.dst_dir_name);
        info!("Download folder {folder} to directory {}", dir.display());
        tokio::fs::create_dir_all(&dir).await?;

        let refs = self.session.select_all(&folder).await?;
        info!("Downloading {} emails", refs.len());
        let mut stats = DownloadStats {
            listed: refs.len(),
            ..DownloadStats::default()
        };

        for message in refs {
            let raw = self.session.transport_mut().fetch_message(message).await?;
            match download::store_message(&dir, &raw).await? {
                Stored::Written(path) => {
                    debug!("Message {message} written to {}", path.display());
                    stats.downloaded += 1;
                }
                Stored::AlreadyPresent(path) => {
                    info!(
                        "Message {message} already downloaded as {}, stopping",
                        path.display()
                    );
                    stats.stopped_at_existing = true;
                    break;
                }
            }
        }
        Ok(stats)
    }
}
