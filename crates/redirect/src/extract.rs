/// Only the last this-many bytes of a query are scanned for `!`.
pub const TRIGGER_WINDOW: usize = 32;

pub const TRIGGER_MARKER: u8 = b'!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted<'a> {
    /// Everything before the `!`.
    pub query: &'a str,
    /// Everything after the `!`. Never empty.
    pub trigger: &'a str,
}

/// Find the right-most `!` within the last [`TRIGGER_WINDOW`] bytes.
///
/// A `!` in final position yields `None`, as does a query whose only `!` sits
/// further back than the window.
pub fn extract_trigger(query: &str) -> Option<Extracted<'_>> {
    let bytes = query.as_bytes();
    let window_start = bytes.len().saturating_sub(TRIGGER_WINDOW);
    let pos = bytes[window_start..]
        .iter()
        .rposition(|&b| b == TRIGGER_MARKER)?
        + window_start;

    // `!` is ASCII, so both halves split on char boundaries.
    let trigger = &query[pos + 1..];
    if trigger.is_empty() {
        return None;
    }
    Some(Extracted {
        query: &query[..pos],
        trigger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn splits_trailing_trigger() {
        assert_eq!(
            extract_trigger("golang !gh"),
            Some(Extracted {
                query: "golang ",
                trigger: "gh"
            })
        );
    }

    #[test]
    fn bare_marker_is_not_a_trigger() {
        assert_eq!(extract_trigger("!"), None);
        assert_eq!(extract_trigger("wow!"), None);
    }

    #[test]
    fn empty_and_markerless_queries_have_no_trigger() {
        assert_eq!(extract_trigger(""), None);
        assert_eq!(extract_trigger("plain query"), None);
    }

    #[test]
    fn right_most_marker_wins() {
        assert_eq!(
            extract_trigger("a !b !c"),
            Some(Extracted {
                query: "a !b ",
                trigger: "c"
            })
        );
        // Trailing bang with nothing after hides earlier ones.
        assert_eq!(extract_trigger("a !b!"), None);
    }

    #[test]
    fn marker_beyond_window_is_ignored() {
        let query = format!("x !gh {}", "y".repeat(TRIGGER_WINDOW));
        assert_eq!(extract_trigger(&query), None);

        let trigger = "z".repeat(TRIGGER_WINDOW - 1);
        let query = format!("x !{trigger}");
        assert_eq!(extract_trigger(&query).map(|e| e.trigger), Some(trigger.as_str()));

        let query = format!("x !{}", "z".repeat(TRIGGER_WINDOW));
        assert_eq!(extract_trigger(&query), None);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        assert_eq!(
            extract_trigger("café ünïcödé !w"),
            Some(Extracted {
                query: "café ünïcödé ",
                trigger: "w"
            })
        );
        assert_eq!(extract_trigger("q !日本").map(|e| e.trigger), Some("日本"));
    }

    proptest! {
        #[test]
        fn query_and_trigger_rebuild_the_input(prefix in ".{0,40}", trigger in "[a-z0-9]{1,20}") {
            let input = format!("{prefix}!{trigger}");
            let extracted = extract_trigger(&input).expect("trigger");
            prop_assert_eq!(format!("{}!{}", extracted.query, extracted.trigger), input.clone());
            prop_assert_eq!(extracted.trigger, trigger.as_str());
        }
    }
}
