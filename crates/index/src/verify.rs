use crate::format::ENTRY_LEN;
use crate::reader::IndexView;
use serde::{Deserialize, Serialize};

/// Structural health of an index/payload pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub rows: usize,
    pub trailing_bytes: usize,
    pub payload_bytes: usize,
    /// Bytes of payload covered by in-bounds entries.
    pub referenced_bytes: u64,
    /// Rows whose digest is smaller than the previous row's.
    pub unsorted_rows: Vec<usize>,
    /// Rows whose digest equals the previous row's.
    pub duplicate_rows: Vec<usize>,
    pub out_of_bounds_rows: Vec<usize>,
}

impl VerifyReport {
    pub fn is_healthy(&self) -> bool {
        self.rows > 0
            && self.payload_bytes > 0
            && self.trailing_bytes == 0
            && self.unsorted_rows.is_empty()
            && self.duplicate_rows.is_empty()
            && self.out_of_bounds_rows.is_empty()
    }

    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.rows == 0 {
            out.push("index has no rows".to_string());
        }
        if self.payload_bytes == 0 {
            out.push("payload is empty".to_string());
        }
        if self.trailing_bytes > 0 {
            out.push(format!(
                "{} trailing bytes after the last complete row",
                self.trailing_bytes
            ));
        }
        if !self.unsorted_rows.is_empty() {
            out.push(format!("{} rows out of order", self.unsorted_rows.len()));
        }
        if !self.duplicate_rows.is_empty() {
            out.push(format!("{} duplicate digests", self.duplicate_rows.len()));
        }
        if !self.out_of_bounds_rows.is_empty() {
            out.push(format!(
                "{} rows point outside the payload",
                self.out_of_bounds_rows.len()
            ));
        }
        out
    }
}

/// Walk every row once and record anything that would break lookups.
pub fn verify(view: &IndexView<'_>) -> VerifyReport {
    let mut report = VerifyReport {
        rows: view.rows(),
        trailing_bytes: view.index_bytes().len() % ENTRY_LEN,
        payload_bytes: view.payload_bytes().len(),
        ..VerifyReport::default()
    };

    let mut prev = None;
    for row in 0..report.rows {
        let Some(entry) = view.entry(row) else {
            continue;
        };
        if let Some(prev) = prev {
            if entry.digest < prev {
                report.unsorted_rows.push(row);
            } else if entry.digest == prev {
                report.duplicate_rows.push(row);
            }
        }
        prev = Some(entry.digest);

        match view.template_for(&entry) {
            Some(template) => report.referenced_bytes += template.len() as u64,
            None => report.out_of_bounds_rows.push(row),
        }
    }

    report
}
