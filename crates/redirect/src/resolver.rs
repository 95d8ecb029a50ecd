use crate::compose::compose;
use crate::extract::extract_trigger;
use crate::template::Template;
use bangs_index::{BangDigest, BangIndex, Lookup};
use serde::Serialize;
use std::borrow::Cow;

/// How a redirect target was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A bang matched an index entry.
    Matched,
    /// The query carried no usable trigger.
    NoTrigger,
    /// A trigger was present but not in the index.
    Unknown,
    /// The matching entry pointed outside the payload.
    Corrupt,
    /// The index has nothing in it.
    EmptyIndex,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Matched,
        Outcome::NoTrigger,
        Outcome::Unknown,
        Outcome::Corrupt,
        Outcome::EmptyIndex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NoTrigger => "no_trigger",
            Self::Unknown => "unknown",
            Self::Corrupt => "corrupt",
            Self::EmptyIndex => "empty_index",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub template: &'a [u8],
    /// Text substituted into the template.
    pub query: &'a str,
    pub trigger: Option<&'a str>,
    pub outcome: Outcome,
}

impl<'a> Target<'a> {
    pub fn compose(&self) -> String {
        self.compose_with(Cow::Borrowed)
    }

    /// Compose after passing the query through `encode` (e.g. URL-encoding).
    pub fn compose_with(&self, encode: impl FnOnce(&'a str) -> Cow<'a, str>) -> String {
        let query = encode(self.query);
        let url = compose(self.template, query.as_bytes());
        match String::from_utf8(url) {
            Ok(url) => url,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Empty query: show the home page instead of redirecting.
    DefaultPage,
    Redirect(Target<'a>),
}

/// Extract -> digest -> lookup -> choose template. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Redirector {
    index: BangIndex,
    default: Template,
}

impl Redirector {
    pub fn new(index: BangIndex, default: Template) -> Self {
        Self { index, default }
    }

    pub fn index(&self) -> &BangIndex {
        &self.index
    }

    pub fn default_template(&self) -> &Template {
        &self.default
    }

    pub fn resolve<'a>(&'a self, query: &'a str, fallback: Option<&'a Template>) -> Resolution<'a> {
        if query.is_empty() {
            return Resolution::DefaultPage;
        }

        let fallback = fallback.unwrap_or(&self.default).as_bytes();
        let miss = |trigger: Option<&'a str>, outcome: Outcome| {
            Resolution::Redirect(Target {
                template: fallback,
                query,
                trigger,
                outcome,
            })
        };

        let Some(extracted) = extract_trigger(query) else {
            return miss(None, Outcome::NoTrigger);
        };

        let digest = BangDigest::of(extracted.trigger);
        match self.index.lookup(&digest) {
            Lookup::Found([]) => {
                log::debug!("Bang '{}' has an empty template", extracted.trigger);
                miss(Some(extracted.trigger), Outcome::Unknown)
            }
            Lookup::Found(template) => {
                log::debug!("Bang '{}' matched", extracted.trigger);
                Resolution::Redirect(Target {
                    template,
                    query: extracted.query,
                    trigger: Some(extracted.trigger),
                    outcome: Outcome::Matched,
                })
            }
            Lookup::Missing => miss(Some(extracted.trigger), Outcome::Unknown),
            Lookup::Empty => miss(Some(extracted.trigger), Outcome::EmptyIndex),
            Lookup::OutOfBounds { .. } => miss(Some(extracted.trigger), Outcome::Corrupt),
        }
    }
}
