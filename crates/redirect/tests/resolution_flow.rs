use bangs_index::{build_index, parse_source, BangIndex, DuplicatePolicy};
use bangs_redirect::{Outcome, Redirector, Resolution, Template};
use pretty_assertions::assert_eq;

fn redirector_from_json(json: &str) -> Redirector {
    let records = parse_source(json.as_bytes()).expect("valid source");
    let built = build_index(&records, DuplicatePolicy::KeepFirst).expect("build");
    Redirector::new(
        BangIndex::from_parts(built.index, built.payload),
        Template::default(),
    )
}

fn url_for(redirector: &Redirector, query: &str) -> Option<(String, Outcome)> {
    match redirector.resolve(query, None) {
        Resolution::Redirect(target) => Some((target.compose(), target.outcome)),
        Resolution::DefaultPage => None,
    }
}

#[test]
fn github_bang_from_source_list() {
    let r = redirector_from_json(r#"[{"t":"gh","u":"https://github.com/search?q=<q>"}]"#);
    assert_eq!(
        url_for(&r, "golang !gh"),
        Some((
            "https://github.com/search?q=golang ".to_string(),
            Outcome::Matched
        ))
    );
}

#[test]
fn bare_bang_uses_default_template() {
    let r = redirector_from_json(r#"[{"t":"gh","u":"https://github.com/search?q=<q>"}]"#);
    assert_eq!(
        url_for(&r, "!"),
        Some((
            "https://www.google.com/search?q=!".to_string(),
            Outcome::NoTrigger
        ))
    );
}

#[test]
fn empty_query_serves_default_page() {
    let r = redirector_from_json(r#"[{"t":"gh","u":"https://github.com/search?q=<q>"}]"#);
    assert_eq!(url_for(&r, ""), None);
}

#[test]
fn trigger_outside_window_is_not_resolved() {
    let r = redirector_from_json(r#"[{"t":"gh","u":"https://github.com/search?q=<q>"}]"#);
    let query = format!("x !gh {}", "pad".repeat(12));
    let (url, outcome) = url_for(&r, &query).expect("redirect");
    assert_eq!(outcome, Outcome::NoTrigger);
    assert!(url.starts_with("https://www.google.com/search?q=x !gh "));
}

#[test]
fn empty_source_list_degrades_every_query() {
    let r = redirector_from_json("[]");
    for query in ["golang !gh", "plain", "!"] {
        let (url, _) = url_for(&r, query).expect("redirect");
        assert_eq!(url, format!("https://www.google.com/search?q={query}"));
    }
}
