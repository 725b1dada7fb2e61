//! Operation records
//!
//! Each entry of an operation document is an object whose `optype`
//! names the kind and whose remaining fields are that kind's
//! parameters. Address fields accept a single string or a list.

use crate::error::{Error, Result};
use crate::folder::Folder;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Addresses given as `"a@x.com"` or `["a@x.com", "b@y.org"]`.
///
/// For `to_addrs`, `null` and an absent field both mean no addresses.
/// `from_addrs` is required and must not be empty. Empty strings are
/// rejected: searching `FROM ""` would match every message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Addresses(Vec<String>);

impl Addresses {
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Addresses {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Addresses {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Addresses {
    fn checked<E: de::Error>(value: Option<OneOrMany>) -> std::result::Result<Self, E> {
        let addrs = match value {
            None => Vec::new(),
            Some(OneOrMany::One(addr)) => vec![addr],
            Some(OneOrMany::Many(addrs)) => addrs,
        };
        if addrs.iter().any(|a| a.trim().is_empty()) {
            return Err(E::custom("empty address"));
        }
        Ok(Self(addrs))
    }

    /// Like [`Deserialize`], but the field must be present and name at
    /// least one address.
    fn deserialize_required<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let addrs = Self::checked(Some(OneOrMany::deserialize(deserializer)?))?;
        if addrs.is_empty() {
            return Err(de::Error::custom("expected at least one address"));
        }
        Ok(addrs)
    }
}

impl<'de> Deserialize<'de> for Addresses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Self::checked(Option::<OneOrMany>::deserialize(deserializer)?)
    }
}

/// Move messages from one folder to another.
///
/// When `to_addrs` is non-empty, messages are matched by recipient and
/// `from_addrs` only controls how many times each search runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MoveOp {
    #[serde(deserialize_with = "Addresses::deserialize_required")]
    pub from_addrs: Addresses,
    #[serde(default)]
    pub src_folder: Option<Folder>,
    pub dst_folder: Folder,
    #[serde(default)]
    pub to_addrs: Addresses,
}

/// Delete every message from the given senders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteOp {
    #[serde(deserialize_with = "Addresses::deserialize_required")]
    pub from_addrs: Addresses,
    #[serde(default)]
    pub src_folder: Option<Folder>,
}

/// Download a folder into a directory of `<sha1>.txt` files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadOp {
    #[serde(default)]
    pub src_folder: Option<Folder>,
    pub dst_dir_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "optype", rename_all = "lowercase")]
pub enum Operation {
    Move(MoveOp),
    Delete(DeleteOp),
    Download(DownloadOp),
}

impl Operation {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Move(_) => "move",
            Self::Delete(_) => "delete",
            Self::Download(_) => "download",
        }
    }

    /// Interpret one document entry.
    ///
    /// `index` is the entry's 1-based position, used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`] if the entry is not an object,
    /// lacks a string `optype`, names an unknown kind, or carries
    /// parameters that kind does not accept.
    pub fn from_value(index: usize, value: Value) -> Result<Self> {
        let unknown = |reason: String| Error::UnknownOperation { index, reason };

        let Value::Object(mut fields) = value else {
            return Err(unknown(format!("expected an object, found {value}")));
        };
        let optype = match fields.remove("optype") {
            Some(Value::String(optype)) => optype,
            Some(other) => return Err(unknown(format!("`optype` must be a string, found {other}"))),
            None => return Err(unknown("missing `optype`".to_string())),
        };

        let params = Value::Object(fields);
        let invalid = |e: serde_json::Error| unknown(format!("invalid parameters for `{optype}`: {e}"));
        match optype.as_str() {
            "move" => serde_json::from_value(params).map(Self::Move).map_err(invalid),
            "delete" => serde_json::from_value(params).map(Self::Delete).map_err(invalid),
            "download" => serde_json::from_value(params).map(Self::Download).map_err(invalid),
            other => Err(unknown(format!("unknown optype `{other}`"))),
        }
    }
}
