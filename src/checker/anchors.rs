//! Anchor resolver: does a fetched page contain a given fragment target?
//!
//! A fragment matches when it equals an element's `id` attribute or a
//! `name` attribute anywhere in the markup. Matching is exact and
//! case-sensitive; there is no fuzzy or partial matching.

use scraper::{Html, Selector};

/// Scans fetched page content for an element matching the fragment
///
/// # Arguments
///
/// * `html` - The fetched document content
/// * `anchor` - The fragment identifier, without the leading `#`
///
/// # Returns
///
/// `true` if any element carries an `id` or `name` attribute exactly
/// equal to the fragment
pub fn page_has_anchor(html: &str, anchor: &str) -> bool {
    if anchor.is_empty() {
        return false;
    }

    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("[id], [name]") {
        for element in document.select(&selector) {
            if element.value().attr("id") == Some(anchor)
                || element.value().attr("name") == Some(anchor)
            {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_id_attribute() {
        let html = r#"<html><body><h1 id="intro">Intro</h1></body></html>"#;
        assert!(page_has_anchor(html, "intro"));
    }

    #[test]
    fn test_finds_name_attribute() {
        let html = r#"<html><body><a name="legacy-anchor">old style</a></body></html>"#;
        assert!(page_has_anchor(html, "legacy-anchor"));
    }

    #[test]
    fn test_absent_anchor() {
        let html = r#"<html><body><h1 id="intro">Intro</h1></body></html>"#;
        assert!(!page_has_anchor(html, "does-not-exist"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let html = r#"<html><body><div id="Section"></div></body></html>"#;
        assert!(page_has_anchor(html, "Section"));
        assert!(!page_has_anchor(html, "section"));
    }

    #[test]
    fn test_no_partial_match() {
        let html = r#"<html><body><div id="introduction"></div></body></html>"#;
        assert!(!page_has_anchor(html, "intro"));
    }

    #[test]
    fn test_anchor_deep_in_document() {
        let html = r#"
            <html><body>
                <div><section><p><span id="deep">text</span></p></section></div>
            </body></html>
        "#;
        assert!(page_has_anchor(html, "deep"));
    }

    #[test]
    fn test_empty_fragment_never_matches() {
        let html = r#"<html><body><div id="">x</div></body></html>"#;
        assert!(!page_has_anchor(html, ""));
    }

    #[test]
    fn test_empty_document() {
        assert!(!page_has_anchor("", "top"));
    }
}
