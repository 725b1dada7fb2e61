//! IMAP command handlers for the fake server.
//!
//! Each module answers one command family. Handlers write the untagged
//! data and the tagged completion; the server loop only decodes and
//! routes.

mod search;

pub use capability::{handle_capability, handle_noop};
pub use expunge::{handle_close, handle_expunge};
pub use fetch::handle_fetch;
pub use login::{handle_login, handle_logout};
pub use search::handle_search;
pub use select::handle_select;
pub use transfer::{handle_uid_copy, handle_uid_move};
pub use uid_store::{StoreArgs, handle_uid_store};

use imap_codec::imap_types::sequence::{SeqOrUid, Sequence, SequenceSet};

/// Expand a sequence set into its numbers, with `*` standing for `max`.
pub fn sequence_values(set: &SequenceSet, max: u32) -> Vec<u32> {
    let value = |v: &SeqOrUid| match v {
        SeqOrUid::Value(v) => v.get(),
        SeqOrUid::Asterisk => max,
    };
    set.0
        .as_ref()
        .iter()
        .flat_map(|seq| match seq {
            Sequence::Single(v) => {
                let v = value(v);
                v..=v
            }
            Sequence::Range(a, b) => {
                let (a, b) = (value(a), value(b));
                a.min(b)..=a.max(b)
            }
        })
        .collect()
}

#[cfg(test)]
pub mod testing {
    use tokio::io::{AsyncReadExt, BufReader, DuplexStream};

    /// Server half of an in-memory connection.
    pub fn stream() -> (DuplexStream, BufReader<DuplexStream>) {
        let (client, server) = tokio::io::duplex(16 * 1024);
        (client, BufReader::new(server))
    }

    /// Everything the handler wrote, once the server half is dropped.
    pub async fn output(mut client: DuplexStream) -> String {
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn nz(v: u32) -> SeqOrUid {
        SeqOrUid::Value(NonZeroU32::new(v).unwrap())
    }

    #[test]
    fn expands_singles_and_ranges() {
        let set = SequenceSet(
            vec![Sequence::Single(nz(7)), Sequence::Range(nz(2), nz(4))]
                .try_into()
                .unwrap(),
        );
        assert_eq!(sequence_values(&set, 10), vec![7, 2, 3, 4]);
    }

    #[test]
    fn asterisk_is_max() {
        let set = SequenceSet(
            vec![Sequence::Range(nz(3), SeqOrUid::Asterisk)]
                .try_into()
                .unwrap(),
        );
        assert_eq!(sequence_values(&set, 5), vec![3, 4, 5]);
    }
}
