//! Page-title extraction and normalization from canonical text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// First `<title ...>` element; the capture runs to the next `<`, so the
/// closing tag need not be well formed beyond that. An unterminated title
/// (no subsequent `<` at all) does not match and counts as absent.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)<").expect("title pattern"));

/// Extract the normalized page title, or `None` when the page has no
/// usable title. `None` is an exclusion signal, not an error.
pub fn extract_title(text: &str) -> Option<String> {
    let caps = TITLE_RE.captures(text)?;
    let unescaped: Cow<'_, str> = html_escape::decode_html_entities(&caps[1]);
    let normalized = unescaped.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title() {
        assert_eq!(
            extract_title("<html><head><title>Welcome</title></head>").as_deref(),
            Some("Welcome")
        );
    }

    #[test]
    fn case_insensitive_element() {
        assert_eq!(
            extract_title("<TITLE>Upper</TITLE>").as_deref(),
            Some("Upper")
        );
    }

    #[test]
    fn attributes_on_the_element_are_tolerated() {
        assert_eq!(
            extract_title(r#"<title id="main">Attributed</title>"#).as_deref(),
            Some("Attributed")
        );
    }

    #[test]
    fn entities_are_unescaped() {
        assert_eq!(
            extract_title("<title>Tips &amp; Tricks</title>").as_deref(),
            Some("Tips & Tricks")
        );
        assert_eq!(
            extract_title("<title>&#x3042;</title>").as_deref(),
            Some("\u{3042}")
        );
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            extract_title("<title>\n  Spread\tout\r\n title  </title>").as_deref(),
            Some("Spread out title")
        );
    }

    #[test]
    fn first_of_multiple_titles_wins() {
        assert_eq!(
            extract_title("<title>First</title><title>Second</title>").as_deref(),
            Some("First")
        );
    }

    #[test]
    fn missing_title_is_none() {
        assert_eq!(extract_title("<html><body>no head</body></html>"), None);
    }

    #[test]
    fn unterminated_title_is_none() {
        assert_eq!(extract_title("<title>Runs off the end"), None);
    }

    #[test]
    fn whitespace_only_title_is_none() {
        assert_eq!(extract_title("<title>   \n\t </title>"), None);
    }

    #[test]
    fn empty_title_is_none() {
        assert_eq!(extract_title("<title></title>"), None);
    }

    #[test]
    fn malformed_closing_tag_still_captures() {
        assert_eq!(
            extract_title("<title>Partial<body>rest").as_deref(),
            Some("Partial")
        );
    }
}
