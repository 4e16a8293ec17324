//! Markdown export

use crate::annotations::Highlight;

use super::{HIGHLIGHTS_HEADING, REFLECTIONS_HEADING};

/// Render highlights and journal as Markdown
///
/// The highlights section is left out when there are none. The reflections
/// section is always present, even with an empty journal.
pub fn to_markdown(title: &str, highlights: &[Highlight], journal: &str) -> String {
    let mut out = format!("# {}\n\n", title);

    if !highlights.is_empty() {
        out.push_str(&format!("## {}\n\n", HIGHLIGHTS_HEADING));
        let quotes: Vec<String> = highlights.iter().map(|h| quote(&h.text)).collect();
        out.push_str(&quotes.join("\n"));
        out.push('\n');
    }

    out.push_str(&format!("## {}\n\n", REFLECTIONS_HEADING));
    out.push_str(journal);
    out
}

/// Quote every line so multi-line highlights stay inside one blockquote
fn quote(text: &str) -> String {
    let mut quoted = String::new();
    for line in text.lines() {
        if line.is_empty() {
            quoted.push_str(">\n");
        } else {
            quoted.push_str("> ");
            quoted.push_str(line);
            quoted.push('\n');
        }
    }
    if quoted.is_empty() {
        quoted.push_str(">\n");
    }
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn highlight(text: &str) -> Highlight {
        Highlight {
            id: text.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_export() {
        let md = to_markdown(
            "Guide Notes",
            &[highlight("first"), highlight("second")],
            "My thoughts",
        );
        assert_eq!(
            md,
            "# Guide Notes\n\n## Highlights\n\n> first\n\n> second\n\n## Reflections\n\nMy thoughts"
        );
    }

    #[test]
    fn test_no_highlights_omits_section() {
        let md = to_markdown("Guide Notes", &[], "");
        assert_eq!(md, "# Guide Notes\n\n## Reflections\n\n");
        assert!(!md.contains("Highlights"));
    }

    #[test]
    fn test_multiline_highlight_stays_quoted() {
        let md = to_markdown("T", &[highlight("line one\n\nline two")], "");
        assert!(md.contains("> line one\n>\n> line two\n"));
    }

    #[test]
    fn test_journal_verbatim() {
        let journal = "> \"quoted\"\n\nfree text *with* markdown";
        let md = to_markdown("T", &[], journal);
        assert!(md.ends_with(journal));
    }
}
