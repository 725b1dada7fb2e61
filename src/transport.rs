//! The IMAP verbs the engine issues
//!
//! [`Transport`] is the seam between the operation engine and the
//! wire. SEARCH and UID FETCH hand back their untagged payload as text
//! (`"4 9 12"`, `"12 (UID 445)"`) so that parsing, and the decision to
//! fail loudly on malformed data, lives in the selector and UID
//! resolver rather than in each transport.

use crate::config::ImapConfig;
use crate::connection::{self, ImapSession};
use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::selector::MessageRef;
use crate::uid::MessageUid;
use futures::StreamExt;
use tracing::debug;

/// Flag query used to mark a message for expunge.
pub const DELETED_FLAG: &str = "+FLAGS (\\Deleted)";

/// Fetch item naming the subject header, without setting `\Seen`.
pub const SUBJECT_ITEM: &str = "BODY.PEEK[HEADER.FIELDS (SUBJECT)]";

/// Raw IMAP verbs over one authenticated connection.
///
/// Message references are sequence numbers in the currently selected
/// folder; UIDs are only used by the terminal verbs.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// `SELECT` the folder read-write.
    async fn select(&mut self, folder: &Folder) -> Result<()>;

    /// `SEARCH <query>`; returns the space-separated ids of the
    /// untagged `* SEARCH` response.
    async fn search(&mut self, query: &str) -> Result<String>;

    /// `FETCH <seq> (UID)`; returns the response payload, normally
    /// `"<seq> (UID <uid>)"`.
    async fn fetch_uid(&mut self, message: MessageRef) -> Result<String>;

    /// `FETCH <seq> RFC822`; returns the full raw message.
    async fn fetch_message(&mut self, message: MessageRef) -> Result<Vec<u8>>;

    /// Fetch the subject header of a message for logging.
    async fn fetch_subject(&mut self, message: MessageRef) -> Result<String>;

    /// `UID STORE <uid> +FLAGS (\Deleted)`.
    async fn uid_store_deleted(&mut self, uid: MessageUid) -> Result<()>;

    /// `EXPUNGE` the selected folder.
    async fn expunge(&mut self) -> Result<()>;

    /// Whether the server advertises the `MOVE` extension (RFC 6851).
    async fn supports_move(&mut self) -> Result<bool>;

    /// `UID MOVE <uid> <folder>`.
    async fn uid_move(&mut self, uid: MessageUid, destination: &Folder) -> Result<()>;

    /// `UID COPY <uid> <folder>`.
    async fn uid_copy(&mut self, uid: MessageUid, destination: &Folder) -> Result<()>;

    /// `CLOSE` the selected folder.
    async fn close(&mut self) -> Result<()>;

    /// `LOGOUT`.
    async fn logout(&mut self) -> Result<()>;
}

/// [`Transport`] over a TLS-wrapped `async-imap` session.
pub struct ImapTransport {
    session: ImapSession,
    move_capable: Option<bool>,
}

impl ImapTransport {
    /// Connect and log in.
    ///
    /// # Errors
    ///
    /// See [`connection::connect`].
    pub async fn connect(config: &ImapConfig) -> Result<Self> {
        Ok(Self::new(connection::connect(config).await?))
    }

    #[must_use]
    pub const fn new(session: ImapSession) -> Self {
        Self {
            session,
            move_capable: None,
        }
    }
}

impl Transport for ImapTransport {
    async fn select(&mut self, folder: &Folder) -> Result<()> {
        debug!("SELECT {folder}");
        self.session
            .select(folder.as_str())
            .await
            .map_err(|e| Error::from_imap("SELECT", e))?;
        Ok(())
    }

    async fn search(&mut self, query: &str) -> Result<String> {
        debug!("SEARCH {query}");
        let ids = self
            .session
            .search(query)
            .await
            .map_err(|e| Error::from_imap("SEARCH", e))?;

        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        Ok(ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "))
    }

    async fn fetch_uid(&mut self, message: MessageRef) -> Result<String> {
        debug!("FETCH {message} (UID)");
        let mut stream = self
            .session
            .fetch(message.to_string(), "(UID)")
            .await
            .map_err(|e| Error::from_imap("FETCH", e))?;

        let mut payload = String::new();
        while let Some(item) = stream.next().await {
            let fetch = item.map_err(|e| Error::from_imap("FETCH", e))?;
            if fetch.message != message.get() {
                continue;
            }
            // Re-rendered as text so a test transport can feed malformed
            // responses through the same parser.
            payload = match fetch.uid {
                Some(uid) => format!("{} (UID {uid})", fetch.message),
                None => format!("{} ()", fetch.message),
            };
        }
        Ok(payload)
    }

    async fn fetch_message(&mut self, message: MessageRef) -> Result<Vec<u8>> {
        debug!("FETCH {message} RFC822");
        let mut stream = self
            .session
            .fetch(message.to_string(), "RFC822")
            .await
            .map_err(|e| Error::from_imap("FETCH", e))?;

        let mut body = None;
        while let Some(item) = stream.next().await {
            let fetch = item.map_err(|e| Error::from_imap("FETCH", e))?;
            if fetch.message == message.get() {
                body = fetch.body().map(<[u8]>::to_vec);
            }
        }

        body.ok_or_else(|| Error::Protocol {
            verb: "FETCH",
            detail: format!("no RFC822 data for message {message}"),
        })
    }

    async fn fetch_subject(&mut self, message: MessageRef) -> Result<String> {
        debug!("FETCH {message} {SUBJECT_ITEM}");
        let mut stream = self
            .session
            .fetch(message.to_string(), SUBJECT_ITEM)
            .await
            .map_err(|e| Error::from_imap("FETCH", e))?;

        let mut subject = String::new();
        while let Some(item) = stream.next().await {
            let fetch = item.map_err(|e| Error::from_imap("FETCH", e))?;
            if fetch.message != message.get() {
                continue;
            }
            if let Some(header) = fetch.header() {
                subject = String::from_utf8_lossy(header).trim().to_string();
            }
        }
        Ok(subject)
    }

    async fn uid_store_deleted(&mut self, uid: MessageUid) -> Result<()> {
        debug!("UID STORE {uid} {DELETED_FLAG}");
        let _: Vec<_> = self
            .session
            .uid_store(uid.to_string(), DELETED_FLAG)
            .await
            .map_err(|e| Error::from_imap("UID STORE", e))?
            .collect()
            .await;
        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        debug!("EXPUNGE");
        let _: Vec<_> = self
            .session
            .expunge()
            .await
            .map_err(|e| Error::from_imap("EXPUNGE", e))?
            .collect()
            .await;
        Ok(())
    }

    async fn supports_move(&mut self) -> Result<bool> {
        if let Some(capable) = self.move_capable {
            return Ok(capable);
        }
        debug!("CAPABILITY");
        let capable = self
            .session
            .capabilities()
            .await
            .map_err(|e| Error::from_imap("CAPABILITY", e))?
            .has_str("MOVE");
        self.move_capable = Some(capable);
        Ok(capable)
    }

    async fn uid_move(&mut self, uid: MessageUid, destination: &Folder) -> Result<()> {
        debug!("UID MOVE {uid} {destination}");
        self.session
            .uid_mv(uid.to_string(), destination.as_str())
            .await
            .map_err(|e| Error::from_imap("UID MOVE", e))
    }

    async fn uid_copy(&mut self, uid: MessageUid, destination: &Folder) -> Result<()> {
        debug!("UID COPY {uid} {destination}");
        self.session
            .uid_copy(uid.to_string(), destination.as_str())
            .await
            .map_err(|e| Error::from_imap("UID COPY", e))
    }

    async fn close(&mut self) -> Result<()> {
        debug!("CLOSE");
        self.session
            .close()
            .await
            .map_err(|e| Error::from_imap("CLOSE", e))
    }

    async fn logout(&mut self) -> Result<()> {
        debug!("LOGOUT");
        self.session
            .logout()
            .await
            .map_err(|e| Error::from_imap("LOGOUT", e))
    }
}
