//! # Bangs Redirect
//!
//! Turns a raw search query into a redirect URL.
//!
//! ```text
//! "golang !gh"
//!     │
//!     ├──> extract_trigger   -> ("golang ", "gh")   last 32 bytes only
//!     ├──> BangDigest::of    -> SHA3-224("gh")
//!     ├──> BangIndex::lookup -> "https://github.com/search?q=\xC0"
//!     └──> compose           -> "https://github.com/search?q=golang "
//! ```
//!
//! Misses, bare `!`, and degraded indexes all fall back to the default
//! template with the full query.

mod compose;
mod error;
mod extract;
mod resolver;
mod template;

pub use compose::compose;
pub use error::{ConfigError, Result};
pub use extract::{extract_trigger, Extracted, TRIGGER_MARKER, TRIGGER_WINDOW};
pub use resolver::{Outcome, Redirector, Resolution, Target};
pub use template::{Template, DEFAULT_SEARCH_TEMPLATE};
