//! UID resolution
//!
//! Sequence numbers shift as messages are expunged; the terminal verbs
//! (STORE, MOVE, COPY) address messages by UID instead.

use crate::error::{Error, Result};
use crate::selector::MessageRef;
use crate::session::Session;
use crate::transport::Transport;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static UID_RESPONSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+ \(UID (\d+)\)").expect("valid UID pattern"));

/// A message UID, stable within one folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageUid(u32);

impl MessageUid {
    #[must_use]
    pub const fn new(uid: u32) -> Self {
        Self(uid)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract the UID from a FETCH payload of the form `<seq> (UID <uid>)`.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the payload does not match.
///
/// # Examples
///
/// ```
/// use mail_org::parse_uid_response;
///
/// assert_eq!(parse_uid_response("12 (UID 445)").unwrap().get(), 445);
/// assert!(parse_uid_response("12 (FLAGS (\\Seen))").is_err());
/// ```
pub fn parse_uid_response(payload: &str) -> Result<MessageUid> {
    UID_RESPONSE
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .map(MessageUid)
        .ok_or_else(|| Error::Parse(format!("unexpected UID FETCH response `{payload}`")))
}

impl<T: Transport> Session<T> {
    /// Resolve a sequence number in the selected folder to its UID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the server's response does not carry
    /// a UID, or the transport's error if the fetch itself fails.
    pub async fn resolve_uid(&mut self, message: MessageRef) -> Result<MessageUid> {
        let payload = self.transport_mut().fetch_uid(message).await?;
        parse_uid_response(&payload).map_err(|e| match e {
            Error::Parse(detail) => Error::Parse(format!(
                "message {message} in {}: {detail}",
                self.selected_folder().map_or("<none>", |f| f.as_str())
            )),
            other => other,
        })
    }
}
