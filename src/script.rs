//! Operation documents
//!
//! A document is a JSON array of operation records. Structural problems
//! (unreadable file, invalid JSON, not an array) reject the whole
//! document. A bad record only invalidates itself: it is kept in place
//! as an error so the run can report and skip it.

use crate::error::{Error, Result};
use crate::operation::Operation;
use serde_json::Value;
use std::path::Path;

/// One record of a document, at its 1-based position.
#[derive(Debug)]
pub struct Entry {
    pub index: usize,
    pub operation: Result<Operation>,
}

#[derive(Debug, Default)]
pub struct Script {
    entries: Vec<Entry>,
}

impl Script {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if `text` is not JSON or not an array.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::Format(format!("invalid JSON: {e}")))?;

        let Value::Array(records) = value else {
            return Err(Error::Format(
                "expected an array of operations at the top level".into(),
            ));
        };

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Entry {
                index: i + 1,
                operation: Operation::from_value(i + 1, record),
            })
            .collect();
        Ok(Self { entries })
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Format(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text).map_err(|e| match e {
            Error::Format(detail) => Error::Format(format!("{}: {detail}", path.display())),
            other => other,
        })
    }

    /// Every record in document order, valid or not.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The valid operations in document order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.entries.iter().filter_map(|e| e.operation.as_ref().ok())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
