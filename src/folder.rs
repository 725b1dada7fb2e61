//! IMAP folder names
//!
//! Operation documents name folders as plain strings and may omit the
//! source folder entirely; [`Folder`] gives that a type with `INBOX`
//! as the default.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An IMAP mailbox folder.
///
/// `INBOX` is case-insensitive per RFC 3501 and normalizes to
/// [`Folder::Inbox`]. Every other name is kept verbatim.
///
/// # Examples
///
/// ```
/// use mail_org::Folder;
///
/// assert_eq!(Folder::default(), Folder::Inbox);
/// assert_eq!(Folder::from("inbox").as_str(), "INBOX");
/// assert_eq!(Folder::from("Archive/2024").as_str(), "Archive/2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Folder {
    #[default]
    Inbox,
    Named(String),
}

impl Folder {
    /// The IMAP folder name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbox => "INBOX",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Folder {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("inbox") {
            Self::Inbox
        } else {
            Self::Named(s.to_string())
        }
    }
}

impl From<String> for Folder {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("inbox") {
            Self::Inbox
        } else {
            Self::Named(s)
        }
    }
}

impl Serialize for Folder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Folder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
