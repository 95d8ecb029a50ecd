//! # Bangs Index
//!
//! Compiled lookup table that maps bang triggers (`!gh`) to redirect templates.
//!
//! ## Pipeline
//!
//! ```text
//! bangs.json  [{"t": "gh", "u": "https://github.com/search?q=<q>"}, ...]
//!     │
//!     ├──> IndexBuilder (offline)
//!     │      ├─> SHA3-224(trigger), `<q>` -> 0xC0
//!     │      └─> stable sort by digest
//!     │
//!     ├──> bangs.idx   sorted 44-byte rows: digest | offset | length
//!     └──> bangs.dat   concatenated templates
//!
//! BangIndex (online, read-only)
//!     └──> binary search by digest -> template slice
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bangs_index::{load_source, build_index, BangDigest, BangIndex, DuplicatePolicy};
//!
//! fn main() -> anyhow::Result<()> {
//!     let records = load_source("bangs.json")?;
//!     let built = build_index(&records, DuplicatePolicy::KeepFirst)?;
//!     built.write("bangs.idx".as_ref(), "bangs.dat".as_ref())?;
//!
//!     let index = BangIndex::load("bangs.idx", "bangs.dat")?;
//!     let template = index.find(&BangDigest::of("gh"));
//!     println!("{:?}", template.map(String::from_utf8_lossy));
//!     Ok(())
//! }
//! ```

mod builder;
mod digest;
mod error;
mod format;
mod reader;
mod source;
mod verify;

pub use builder::{build_index, BuildStats, BuiltIndex, DuplicatePolicy, IndexBuilder};
pub use digest::BangDigest;
pub use error::{IndexError, Result};
pub use format::{
    has_placeholder, normalize_template, IndexEntry, DIGEST_LEN, ENTRY_LEN, LENGTH_LEN,
    OFFSET_LEN, PLACEHOLDER, SENTINEL,
};
pub use reader::{BangIndex, IndexView, Lookup};
pub use source::{load_source, parse_source, BangRecord};
pub use verify::{verify, VerifyReport};
