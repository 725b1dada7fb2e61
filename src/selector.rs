//! Message selection
//!
//! Selects a folder read-write and returns the sequence numbers of the
//! messages matching a [`Criterion`], newest first. Processing in
//! descending order keeps every remaining reference valid while
//! earlier ones are expunged or moved out: removing message N only
//! renumbers messages above N.

use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::session::Session;
use crate::transport::Transport;
use std::fmt;
use tracing::debug;

/// A message sequence number.
///
/// Only meaningful within the folder selection that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageRef(u32);

impl MessageRef {
    #[must_use]
    pub const fn new(seq: u32) -> Self {
        Self(seq)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a search matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    All,
    From(String),
    To(String),
}

impl Criterion {
    /// The IMAP SEARCH key for this criterion.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::All => "ALL".to_string(),
            Self::From(addr) => format!("FROM {}", quote(addr)),
            Self::To(addr) => format!("TO {}", quote(addr)),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// IMAP quoted string.
fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Parse the id list of a `* SEARCH` response.
///
/// Returns the ids in strictly descending order. Blank input is an
/// empty result; any token that is not a number is a protocol problem
/// and fails rather than being dropped.
///
/// # Errors
///
/// Returns [`Error::Parse`] on a non-numeric token.
pub fn parse_search_ids(payload: &str) -> Result<Vec<MessageRef>> {
    let mut ids = payload
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .map(MessageRef)
                .map_err(|_| Error::Parse(format!("non-numeric SEARCH id `{token}` in `{payload}`")))
        })
        .collect::<Result<Vec<_>>>()?;

    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.dedup();
    Ok(ids)
}

impl<T: Transport> Session<T> {
    /// Messages in `folder` sent by `from_addr`, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be selected, the search is rejected,
    /// or the response cannot be parsed.
    pub async fn select_by_sender(&mut self, folder: &Folder, from_addr: &str) -> Result<Vec<MessageRef>> {
        self.select_matching(folder, &Criterion::From(from_addr.to_string()))
            .await
    }

    /// Messages in `folder` addressed to `to_addr`, newest first.
    ///
    /// # Errors
    ///
    /// See [`Session::select_by_sender`].
    pub async fn select_by_recipient(&mut self, folder: &Folder, to_addr: &str) -> Result<Vec<MessageRef>> {
        self.select_matching(folder, &Criterion::To(to_addr.to_string()))
            .await
    }

    /// Every message in `folder`, newest first.
    ///
    /// # Errors
    ///
    /// See [`Session::select_by_sender`].
    pub async fn select_all(&mut self, folder: &Folder) -> Result<Vec<MessageRef>> {
        self.select_matching(folder, &Criterion::All).await
    }

    /// Select `folder` read-write and search it for `criterion`.
    ///
    /// # Errors
    ///
    /// See [`Session::select_by_sender`].
    pub async fn select_matching(&mut self, folder: &Folder, criterion: &Criterion) -> Result<Vec<MessageRef>> {
        self.select(folder).await?;

        let query = criterion.to_query();
        let payload = self.transport_mut().search(&query).await?;
        let ids = parse_search_ids(&payload).map_err(|e| match e {
            Error::Parse(detail) => Error::Parse(format!("SEARCH {query} in {folder}: {detail}")),
            other => other,
        })?;

        debug!("{} message(s) in {} match {}", ids.len(), folder, query);
        Ok(ids)
    }
}
