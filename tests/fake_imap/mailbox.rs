//! Test data model for the fake IMAP server
//!
//! ```ignore
//! let mailbox = MailboxBuilder::new()
//!     .folder("INBOX")
//!         .email(1, &message("a@x.com", "me@y.org", "Hello"))
//!     .folder("Archive")
//!     .without_move()
//!     .build();
//! ```
//!
//! Sequence numbers are positions in a folder's `emails` list, so
//! removing an email renumbers everything after it, as on a real
//! server.

/// Every folder the server knows about, plus server-wide behavior.
#[derive(Debug, Clone)]
pub struct Mailbox {
    pub folders: Vec<Folder>,
    /// Advertise and accept `MOVE` (RFC 6851).
    pub supports_move: bool,
    /// Follow every FETCH reply with the same item for the folder's
    /// other messages, as unsolicited responses.
    pub unsolicited_fetches: bool,
}

impl Mailbox {
    /// Look up a folder by name (case-sensitive, matching real IMAP).
    pub fn get_folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn get_folder_mut(&mut self, name: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.name == name)
    }

    /// UIDs in `folder`, in sequence order. Empty for a missing folder.
    pub fn uids(&self, folder: &str) -> Vec<u32> {
        self.get_folder(folder)
            .map(|f| f.emails.iter().map(|e| e.uid).collect())
            .unwrap_or_default()
    }

    /// Subject headers in `folder`, in sequence order.
    pub fn subjects(&self, folder: &str) -> Vec<String> {
        self.get_folder(folder)
            .map(|f| {
                f.emails
                    .iter()
                    .map(|e| e.header("Subject").unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub emails: Vec<TestEmail>,
}

impl Folder {
    pub fn next_uid(&self) -> u32 {
        self.emails.iter().map(|e| e.uid).max().map_or(1, |max| max + 1)
    }

    /// Drop every `\Deleted` email, returning the sequence number each
    /// had at the moment it was removed.
    pub fn expunge(&mut self) -> Vec<usize> {
        let mut removed = Vec::new();
        let mut idx = 0;
        while idx < self.emails.len() {
            if self.emails[idx].deleted {
                self.emails.remove(idx);
                removed.push(idx + 1);
            } else {
                idx += 1;
            }
        }
        removed
    }
}

/// A message in a folder; `raw` is the full RFC 5322 text.
#[derive(Debug, Clone)]
pub struct TestEmail {
    pub uid: u32,
    pub deleted: bool,
    pub raw: Vec<u8>,
}

impl TestEmail {
    /// Value of the first header named `name`, without its name.
    pub fn header(&self, name: &str) -> Option<String> {
        let text = String::from_utf8_lossy(&self.raw);
        text.lines()
            .take_while(|line| !line.is_empty())
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case(name)
                    .then(|| value.trim().to_string())
            })
    }
}

/// Build a minimal message with `From`, `To` and `Subject` headers.
pub fn message(from: &str, to: &str, subject: &str) -> Vec<u8> {
    format!("From: {from}\r\nTo: {to}\r\nSubject: {subject}\r\n\r\nBody of {subject}\r\n").into_bytes()
}

pub struct MailboxBuilder {
    folders: Vec<Folder>,
    supports_move: bool,
    unsolicited_fetches: bool,
}

impl MailboxBuilder {
    pub fn new() -> Self {
        Self {
            folders: Vec::new(),
            supports_move: true,
            unsolicited_fetches: false,
        }
    }

    /// Add a new folder. Subsequent `.email()` calls add to this folder.
    pub fn folder(mut self, name: &str) -> Self {
        self.folders.push(Folder {
            name: name.to_string(),
            emails: Vec::new(),
        });
        self
    }

    /// Add an email to the most recently added folder.
    ///
    /// # Panics
    ///
    /// Panics if called before any `.folder()` call.
    pub fn email(mut self, uid: u32, raw: &[u8]) -> Self {
        self.folders
            .last_mut()
            .expect("call .folder() before .email()")
            .emails
            .push(TestEmail {
                uid,
                deleted: false,
                raw: raw.to_vec(),
            });
        self
    }

    /// Behave like a server without the MOVE extension.
    pub const fn without_move(mut self) -> Self {
        self.supports_move = false;
        self
    }

    /// Append unsolicited FETCH data for other messages to each reply.
    pub const fn with_unsolicited_fetches(mut self) -> Self {
        self.unsolicited_fetches = true;
        self
    }

    pub fn build(self) -> Mailbox {
        Mailbox {
            folders: self.folders,
            supports_move: self.supports_move,
            unsolicited_fetches: self.unsolicited_fetches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .email(1, &message("a@x.com", "b@y.org", "Hi"))
            .build();
        let email = &mailbox.get_folder("INBOX").unwrap().emails[0];

        assert_eq!(email.header("from").as_deref(), Some("a@x.com"));
        assert_eq!(email.header("SUBJECT").as_deref(), Some("Hi"));
        assert_eq!(email.header("Cc"), None);
    }

    #[test]
    fn expunge_reports_shifting_sequence_numbers() {
        let raw = message("a@x.com", "b@y.org", "Hi");
        let mut mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .email(1, &raw)
            .email(2, &raw)
            .email(3, &raw)
            .build();
        let folder = mailbox.get_folder_mut("INBOX").unwrap();
        folder.emails[0].deleted = true;
        folder.emails[2].deleted = true;

        // Removing #1 shifts the old #3 down to #2.
        assert_eq!(folder.expunge(), vec![1, 2]);
        assert_eq!(mailbox.uids("INBOX"), vec![2]);
    }
}
