//! Plain-text rendering of HTML content fragments

use scraper::Html;

/// Strip markup from an HTML fragment, collapsing whitespace runs
///
/// Entities are decoded by the parser, so `&amp;` comes back as `&`.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let raw: String = fragment.root_element().text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(
            html_to_text("Dyslexia is a <strong>hidden disability</strong>."),
            "Dyslexia is a hidden disability."
        );
    }

    #[test]
    fn test_keeps_link_text() {
        let html = r#"<a href="https://example.com" target="_blank">What is dyslexia?</a>."#;
        assert_eq!(html_to_text(html), "What is dyslexia?.");
    }

    #[test]
    fn test_decodes_entities_and_whitespace() {
        assert_eq!(html_to_text("Fish &amp;   chips\n here"), "Fish & chips here");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(html_to_text("Read X"), "Read X");
        assert_eq!(html_to_text(""), "");
    }
}
