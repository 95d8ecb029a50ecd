use crate::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One entry of the human-edited bang list.
///
/// Matches the `bangs.json` shape: `{"t": "gh", "u": "https://github.com/search?q=<q>"}`.
/// Any other fields on a record are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BangRecord {
    #[serde(rename = "t")]
    pub trigger: String,
    #[serde(rename = "u")]
    pub template: String,
}

impl BangRecord {
    pub fn new(trigger: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            template: template.into(),
        }
    }
}

/// Read a bang list from `path`, or from stdin when `path` is `-`.
pub fn load_source(path: impl AsRef<Path>) -> Result<Vec<BangRecord>> {
    let path = path.as_ref();
    let read_err = |source| IndexError::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf).map_err(read_err)?;
        buf
    } else {
        std::fs::read(path).map_err(read_err)?
    };

    let records = parse_source(&bytes).map_err(|source| IndexError::SourceParse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} bang records from {:?}", records.len(), path);
    Ok(records)
}

pub fn parse_source(bytes: &[u8]) -> std::result::Result<Vec<BangRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
