use crate::digest::BangDigest;
use crate::format::{IndexEntry, DIGEST_LEN, ENTRY_LEN};
use crate::{IndexError, Result};
use std::cmp::Ordering;
use std::path::Path;

/// Result of a single index lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Matching entry with an in-bounds template.
    Found(&'a [u8]),
    /// No entry for this digest.
    Missing,
    /// The index has no complete rows, or the payload is empty.
    Empty,
    /// Matching entry whose range falls outside the payload.
    OutOfBounds {
        offset: u64,
        length: u64,
        payload_len: usize,
    },
}

impl<'a> Lookup<'a> {
    pub fn template(self) -> Option<&'a [u8]> {
        match self {
            Self::Found(template) => Some(template),
            _ => None,
        }
    }
}

/// Borrowed index/payload pair. All searching happens here.
#[derive(Debug, Clone, Copy)]
pub struct IndexView<'a> {
    index: &'a [u8],
    payload: &'a [u8],
}

impl<'a> IndexView<'a> {
    pub const fn new(index: &'a [u8], payload: &'a [u8]) -> Self {
        Self { index, payload }
    }

    /// Number of complete rows. Trailing partial rows are ignored.
    pub const fn rows(&self) -> usize {
        self.index.len() / ENTRY_LEN
    }

    pub const fn index_bytes(&self) -> &'a [u8] {
        self.index
    }

    pub const fn payload_bytes(&self) -> &'a [u8] {
        self.payload
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.payload.is_empty()
    }

    pub fn entry(&self, row: usize) -> Option<IndexEntry> {
        let start = row.checked_mul(ENTRY_LEN)?;
        let end = start.checked_add(ENTRY_LEN)?;
        IndexEntry::decode(self.index.get(start..end)?)
    }

    fn digest_at(&self, row: usize) -> Option<&'a [u8]> {
        let start = row.checked_mul(ENTRY_LEN)?;
        self.index.get(start..start.checked_add(DIGEST_LEN)?)
    }

    /// Binary search for `digest`, then bounds-check the referenced range.
    pub fn lookup(&self, digest: &BangDigest) -> Lookup<'a> {
        if self.is_empty() {
            return Lookup::Empty;
        }

        let key = digest.as_bytes().as_slice();
        let mut left = 0usize;
        let mut right = self.rows();

        while left < right {
            let row = left + (right - left) / 2;
            let Some(candidate) = self.digest_at(row) else {
                break;
            };
            match key.cmp(candidate) {
                Ordering::Equal => return self.resolve_row(row),
                Ordering::Greater => left = row + 1,
                Ordering::Less => right = row,
            }
        }

        Lookup::Missing
    }

    pub fn find(&self, digest: &BangDigest) -> Option<&'a [u8]> {
        self.lookup(digest).template()
    }

    pub fn find_trigger(&self, trigger: &str) -> Option<&'a [u8]> {
        self.find(&BangDigest::of(trigger))
    }

    fn resolve_row(&self, row: usize) -> Lookup<'a> {
        let Some(entry) = self.entry(row) else {
            return Lookup::Missing;
        };
        match self.template_for(&entry) {
            Some(template) => Lookup::Found(template),
            None => {
                log::warn!(
                    "Bang index entry out of bounds: row={row}, offset={}, length={}, payload size={}",
                    entry.offset,
                    entry.length,
                    self.payload.len()
                );
                Lookup::OutOfBounds {
                    offset: entry.offset,
                    length: entry.length,
                    payload_len: self.payload.len(),
                }
            }
        }
    }

    pub(crate) fn template_for(&self, entry: &IndexEntry) -> Option<&'a [u8]> {
        let start = usize::try_from(entry.offset).ok()?;
        let end = usize::try_from(entry.end()?).ok()?;
        self.payload.get(start..end)
    }
}

/// Owned index and payload, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct BangIndex {
    index: Vec<u8>,
    payload: Vec<u8>,
}

impl BangIndex {
    pub fn from_parts(index: Vec<u8>, payload: Vec<u8>) -> Self {
        let trailing = index.len() % ENTRY_LEN;
        if trailing != 0 {
            log::warn!(
                "Bang index length {} is not a multiple of {ENTRY_LEN}; ignoring {trailing} trailing bytes",
                index.len()
            );
        }
        if index.is_empty() {
            log::warn!("Bang index appears to be empty; every lookup will fall back");
        } else if payload.is_empty() {
            log::warn!("Bang payload appears to be empty; every lookup will fall back");
        }
        Self { index, payload }
    }

    /// Read both artifacts into memory. They must come from the same build;
    /// see [`crate::BuiltIndex::write`] for replacing them safely.
    pub fn load(index_path: impl AsRef<Path>, payload_path: impl AsRef<Path>) -> Result<Self> {
        let index_path = index_path.as_ref();
        let payload_path = payload_path.as_ref();
        let read = |path: &Path| {
            std::fs::read(path).map_err(|source| IndexError::ArtifactRead {
                path: path.to_path_buf(),
                source,
            })
        };
        let index = read(index_path)?;
        let payload = read(payload_path)?;
        log::info!(
            "Loaded bang index from {:?} ({} bytes) and {:?} ({} bytes)",
            index_path,
            index.len(),
            payload_path,
            payload.len()
        );
        Ok(Self::from_parts(index, payload))
    }

    pub fn view(&self) -> IndexView<'_> {
        IndexView::new(&self.index, &self.payload)
    }

    pub fn lookup(&self, digest: &BangDigest) -> Lookup<'_> {
        self.view().lookup(digest)
    }

    pub fn find(&self, digest: &BangDigest) -> Option<&[u8]> {
        self.view().find(digest)
    }

    pub fn rows(&self) -> usize {
        self.view().rows()
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }
}
