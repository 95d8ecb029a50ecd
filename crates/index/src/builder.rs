use crate::digest::BangDigest;
use crate::format::{has_placeholder, normalize_template, IndexEntry, ENTRY_LEN};
use crate::source::BangRecord;
use crate::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when two triggers hash to the same digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the earliest record in source order and drop the others.
    #[default]
    KeepFirst,
    /// Fail the build.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub entries: usize,
    pub duplicates_dropped: usize,
    pub templates_without_placeholder: usize,
    pub index_bytes: usize,
    pub payload_bytes: usize,
}

struct Pending {
    digest: BangDigest,
    trigger: String,
    template: Vec<u8>,
}

/// Compiles (trigger, template) pairs into the index and payload buffers.
///
/// Output depends only on the pushed records and their order, so the same
/// source list always produces byte-identical artifacts.
#[derive(Default)]
pub struct IndexBuilder {
    policy: DuplicatePolicy,
    pending: Vec<Pending>,
    without_placeholder: usize,
}

impl IndexBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn push(&mut self, trigger: &str, template: &str) {
        if !has_placeholder(template) {
            log::debug!("Bang '{trigger}' has no query placeholder");
            self.without_placeholder += 1;
        }
        self.pending.push(Pending {
            digest: BangDigest::of(trigger),
            trigger: trigger.to_string(),
            template: normalize_template(template),
        });
    }

    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a BangRecord>) {
        for record in records {
            self.push(&record.trigger, &record.template);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn build(self) -> Result<BuiltIndex> {
        let Self {
            policy,
            mut pending,
            without_placeholder,
        } = self;

        // Stable: equal digests stay in source order.
        pending.sort_by(|a, b| a.digest.cmp(&b.digest));

        let mut stats = BuildStats {
            templates_without_placeholder: without_placeholder,
            ..BuildStats::default()
        };
        let payload_len: usize = pending.iter().map(|p| p.template.len()).sum();
        let mut index = Vec::with_capacity(pending.len() * ENTRY_LEN);
        let mut payload = Vec::with_capacity(payload_len);
        let mut last: Option<&Pending> = None;

        for item in &pending {
            if let Some(prev) = last.filter(|prev| prev.digest == item.digest) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(IndexError::DuplicateTrigger {
                            trigger: item.trigger.clone(),
                            existing: prev.trigger.clone(),
                        });
                    }
                    DuplicatePolicy::KeepFirst => {
                        log::warn!(
                            "Dropping bang '{}': digest collides with '{}'",
                            item.trigger,
                            prev.trigger
                        );
                        stats.duplicates_dropped += 1;
                        continue;
                    }
                }
            }

            let entry = IndexEntry {
                digest: item.digest,
                offset: payload.len() as u64,
                length: item.template.len() as u64,
            };
            entry.encode_into(&mut index);
            payload.extend_from_slice(&item.template);
            stats.entries += 1;
            last = Some(item);
        }

        stats.index_bytes = index.len();
        stats.payload_bytes = payload.len();
        if stats.entries == 0 {
            log::warn!("Built an empty bang index; every lookup will fall back");
        }
        log::info!(
            "Built bang index: {} entries, {} index bytes, {} payload bytes",
            stats.entries,
            stats.index_bytes,
            stats.payload_bytes
        );

        Ok(BuiltIndex {
            index,
            payload,
            stats,
        })
    }
}

pub fn build_index(records: &[BangRecord], policy: DuplicatePolicy) -> Result<BuiltIndex> {
    let mut builder = IndexBuilder::new(policy);
    builder.extend(records);
    builder.build()
}

#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub index: Vec<u8>,
    pub payload: Vec<u8>,
    pub stats: BuildStats,
}

impl BuiltIndex {
    /// Write both artifacts, each through a temp file and rename.
    ///
    /// Each file is replaced atomically, but the pair is not: a reader that
    /// loads between the two renames sees the new payload with the old index.
    /// Replace artifacts under a running server only by writing them to a
    /// staging directory and swapping the directory, or stop the server first.
    pub fn write(&self, index_path: &Path, payload_path: &Path) -> Result<()> {
        write_atomic(payload_path, &self.payload)?;
        write_atomic(index_path, &self.index)?;
        log::info!("Wrote {:?} and {:?}", index_path, payload_path);
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
