//! Content-addressed message storage
//!
//! Each downloaded message is written once as `<sha1>.txt`. Finding the
//! file already present is how a download run knows it has reached
//! mail fetched by an earlier run.

use crate::error::Result;
use sha1::{Digest, Sha1};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Lowercase hex SHA-1 of the raw message bytes.
#[must_use]
pub fn content_hash(raw: &[u8]) -> String {
    format!("{:x}", Sha1::digest(raw))
}

/// Expand a leading `~` to the user's home directory.
///
/// `~user` forms are left untouched, as is everything when no home
/// directory can be determined.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Result of storing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored {
    Written(PathBuf),
    AlreadyPresent(PathBuf),
}

/// Write `raw` to `<dir>/<sha1>.txt` unless that file already exists.
///
/// The file is created exclusively, so an existing file is never
/// overwritten. Bytes that are not valid UTF-8 are replaced so the
/// file is always UTF-8 text.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be created or written.
pub async fn store_message(dir: &Path, raw: &[u8]) -> Result<Stored> {
    let path = dir.join(format!("{}.txt", content_hash(raw)));

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(Stored::AlreadyPresent(path)),
        Err(e) => return Err(e.into()),
    };

    let text = String::from_utf8_lossy(raw);
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(Stored::Written(path))
}
