//! HTML escaping for untrusted text
//!
//! Every renderer passes server- and user-supplied text through
//! [`escape_html`] before it is placed into markup.

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace line breaks with `<br>`. Input must already be escaped.
pub fn newlines_to_breaks(escaped: &str) -> String {
    escaped.replace("\r\n", "\n").replace('\n', "<br>")
}

/// Escape `text` and split it into `<p>` blocks.
///
/// Blank lines separate paragraphs; single newlines inside a paragraph
/// become `<br>`.
pub fn text_to_paragraphs(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut out = String::new();
    for paragraph in normalized.split("\n\n") {
        let paragraph = paragraph.trim_matches('\n');
        if paragraph.trim().is_empty() {
            continue;
        }
        out.push_str("<p>");
        out.push_str(&newlines_to_breaks(&escape_html(paragraph)));
        out.push_str("</p>");
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: escaped output never contains raw markup characters
        #[test]
        fn escaped_output_has_no_markup_chars(s in ".*") {
            let escaped = escape_html(&s);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('\''));
        }

        /// Property: every ampersand in the output starts an entity
        #[test]
        fn ampersands_are_entities(s in ".*") {
            let escaped = escape_html(&s);
            let entities = escaped.matches("&amp;").count()
                + escaped.matches("&lt;").count()
                + escaped.matches("&gt;").count()
                + escaped.matches("&quot;").count()
                + escaped.matches("&#039;").count();
            prop_assert_eq!(escaped.matches('&').count(), entities);
        }
    }
}
