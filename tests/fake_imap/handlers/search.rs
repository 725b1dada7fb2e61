//! SEARCH (sequence numbers, not UIDs).
//!
//! Supports the keys the client sends: `ALL`, `FROM` and `TO`, the
//! latter two as case-insensitive substring matches on the header.
//! Results are listed ascending, as most servers do; the client is
//! responsible for its own ordering.

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::{Mailbox, TestEmail};
use imap_codec::imap_types::search::SearchKey;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

pub async fn handle_search<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    criteria: &[SearchKey<'_>],
    mailbox: &Mailbox,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder) = selected_folder.and_then(|name| mailbox.get_folder(name)) else {
        let _ = write_line(stream, &format!("{tag} BAD No mailbox selected\r\n")).await;
        return;
    };

    let seqs: Vec<String> = folder
        .emails
        .iter()
        .enumerate()
        .filter(|(_, e)| criteria.iter().all(|key| matches_key(e, key)))
        .map(|(i, _)| (i + 1).to_string())
        .collect();

    let line = if seqs.is_empty() {
        "* SEARCH\r\n".to_string()
    } else {
        format!("* SEARCH {}\r\n", seqs.join(" "))
    };
    let _ = write_line(stream, &line).await;
    let _ = write_line(stream, &format!("{tag} OK SEARCH completed\r\n")).await;
}

fn header_contains(email: &TestEmail, header: &str, needle: &[u8]) -> bool {
    let needle = String::from_utf8_lossy(needle).to_ascii_lowercase();
    email
        .header(header)
        .is_some_and(|value| value.to_ascii_lowercase().contains(&needle))
}

fn matches_key(email: &TestEmail, key: &SearchKey<'_>) -> bool {
    match key {
        SearchKey::All => true,
        SearchKey::From(addr) => header_contains(email, "From", addr.as_ref()),
        SearchKey::To(addr) => header_contains(email, "To", addr.as_ref()),
        SearchKey::And(keys) => keys.as_ref().iter().all(|k| matches_key(email, k)),
        SearchKey::Not(k) => !matches_key(email, k),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::handlers::testing::{output, stream};
    use crate::fake_imap::mailbox::{MailboxBuilder, message};
    use imap_codec::imap_types::core::AString;

    fn mailbox() -> Mailbox {
        MailboxBuilder::new()
            .folder("INBOX")
            .email(10, &message("Alice <a@x.com>", "me@y.org", "one"))
            .email(11, &message("b@x.com", "list@y.org", "two"))
            .email(12, &message("A@X.COM", "me@y.org", "three"))
            .build()
    }

    async fn run(criteria: &[SearchKey<'_>], selected: Option<&str>) -> String {
        let (client, mut server) = stream();
        handle_search("S1", criteria, &mailbox(), selected, &mut server).await;
        drop(server);
        output(client).await
    }

    fn astring(s: &'static str) -> AString<'static> {
        AString::try_from(s).unwrap()
    }

    #[tokio::test]
    async fn all_lists_every_sequence_number() {
        let out = run(&[SearchKey::All], Some("INBOX")).await;
        assert!(out.starts_with("* SEARCH 1 2 3\r\n"));
    }

    #[tokio::test]
    async fn from_matches_case_insensitively() {
        let out = run(&[SearchKey::From(astring("a@x.com"))], Some("INBOX")).await;
        assert!(out.starts_with("* SEARCH 1 3\r\n"));
    }

    #[tokio::test]
    async fn to_matches_recipient_header() {
        let out = run(&[SearchKey::To(astring("list@y.org"))], Some("INBOX")).await;
        assert!(out.starts_with("* SEARCH 2\r\n"));
    }

    #[tokio::test]
    async fn no_match_is_empty_search() {
        let out = run(&[SearchKey::From(astring("z@z.com"))], Some("INBOX")).await;
        assert!(out.starts_with("* SEARCH\r\n"));
        assert!(out.ends_with("S1 OK SEARCH completed\r\n"));
    }

    #[tokio::test]
    async fn requires_selected_folder() {
        let out = run(&[SearchKey::All], None).await;
        assert_eq!(out, "S1 BAD No mailbox selected\r\n");
    }
}
