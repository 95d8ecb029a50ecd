//! On-disk layout of the compiled index.
//!
//! The index file is a headerless run of fixed-width rows:
//!
//! ```text
//! | digest (28) | offset (u64 LE) | length (u64 LE) |
//! ```
//!
//! Rows are sorted ascending by digest. The payload file is the raw
//! concatenation of normalized templates in row order.

use crate::digest::BangDigest;

pub const DIGEST_LEN: usize = 28;
pub const OFFSET_LEN: usize = 8;
pub const LENGTH_LEN: usize = 8;
pub const ENTRY_LEN: usize = DIGEST_LEN + OFFSET_LEN + LENGTH_LEN;

/// Stands in for the query inside stored templates. Never valid in UTF-8.
pub const SENTINEL: u8 = 0xC0;

/// Human-readable query marker used in source templates.
pub const PLACEHOLDER: &str = "<q>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub digest: BangDigest,
    pub offset: u64,
    pub length: u64,
}

impl IndexEntry {
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.digest.as_bytes());
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());
    }

    /// Decode one row. Returns `None` unless `row` is exactly [`ENTRY_LEN`] bytes.
    pub fn decode(row: &[u8]) -> Option<Self> {
        if row.len() != ENTRY_LEN {
            return None;
        }
        let (digest, rest) = row.split_at(DIGEST_LEN);
        let (offset, length) = rest.split_at(OFFSET_LEN);
        Some(Self {
            digest: BangDigest::from_slice(digest)?,
            offset: read_u64_le(offset)?,
            length: read_u64_le(length)?,
        })
    }

    /// End of the referenced payload range, or `None` on overflow.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }
}

fn read_u64_le(bytes: &[u8]) -> Option<u64> {
    let raw: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_le_bytes(raw))
}

/// Replace every [`PLACEHOLDER`] in `text` with [`SENTINEL`].
pub fn normalize_template(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for (i, part) in text.split(PLACEHOLDER).enumerate() {
        if i > 0 {
            out.push(SENTINEL);
        }
        out.extend_from_slice(part.as_bytes());
    }
    out
}

pub fn has_placeholder(text: &str) -> bool {
    text.contains(PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry_layout_is_digest_then_le_offset_and_length() {
        let entry = IndexEntry {
            digest: BangDigest::of("gh"),
            offset: 0x0102,
            length: 7,
        };
        let mut row = Vec::new();
        entry.encode_into(&mut row);

        assert_eq!(row.len(), ENTRY_LEN);
        assert_eq!(&row[..DIGEST_LEN], entry.digest.as_bytes());
        assert_eq!(&row[DIGEST_LEN..DIGEST_LEN + 2], &[0x02, 0x01]);
        assert_eq!(row[DIGEST_LEN + OFFSET_LEN], 7);
        assert_eq!(IndexEntry::decode(&row), Some(entry));
    }

    #[test]
    fn decode_rejects_short_rows() {
        assert_eq!(IndexEntry::decode(&[0u8; ENTRY_LEN - 1]), None);
        assert_eq!(IndexEntry::decode(&[]), None);
    }

    #[test]
    fn normalize_replaces_every_placeholder() {
        assert_eq!(
            normalize_template("https://x.test/?q=<q>&r=<q>"),
            b"https://x.test/?q=\xC0&r=\xC0".to_vec()
        );
        assert_eq!(normalize_template("https://x.test/"), b"https://x.test/".to_vec());
        assert_eq!(normalize_template("<q"), b"<q".to_vec());
    }

    #[test]
    fn end_detects_overflow() {
        let entry = IndexEntry {
            digest: BangDigest::of("x"),
            offset: u64::MAX,
            length: 1,
        };
        assert_eq!(entry.end(), None);
    }
}
