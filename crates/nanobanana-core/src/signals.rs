use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Literal marker for Google's invisible image watermark. Matched case-sensitively.
pub const WATERMARK_MARKER: &str = "SynthID";

static BINARY_ENCODING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(inline[-_ ]?data|base64|MIME)").unwrap());

/// Boolean facts derived from the documentation text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub has_watermark_marker: bool,
    pub mentions_binary_encoding: bool,
}

/// Scan a documentation page for the signals merged into the rule document.
/// Navigation and footer text is excluded when the page has a `main` or `article` region.
pub fn extract_signals(html: &str) -> Signals {
    let text = content_text(html);
    Signals {
        has_watermark_marker: text.contains(WATERMARK_MARKER),
        mentions_binary_encoding: BINARY_ENCODING_RE.is_match(&text),
    }
}

/// Reduce a page to the text of its primary content region: `main`, then `article`,
/// then the whole document.
pub fn content_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    for region in ["main", "article"] {
        let text = region_text(&doc, region);
        if !text.is_empty() {
            return text;
        }
    }
    doc.root_element().text().collect()
}

fn region_text(doc: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };
    doc.select(&selector).flat_map(|el| el.text()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_marker_sets_watermark() {
        let s = extract_signals("<p>Images carry a SynthID watermark.</p>");
        assert!(s.has_watermark_marker);
        assert!(!s.mentions_binary_encoding);
    }

    #[test]
    fn lowercase_marker_is_ignored() {
        let s = extract_signals("<p>images carry a synthid watermark</p>");
        assert!(!s.has_watermark_marker);
    }

    #[test]
    fn binary_encoding_terms_any_case() {
        for text in [
            "Send the image as Base64.",
            "Use inline-data parts.",
            "use INLINE_DATA",
            "inline data",
            "inlineData",
            "set the mime type",
            "MIME",
        ] {
            let s = extract_signals(&format!("<p>{text}</p>"));
            assert!(s.mentions_binary_encoding, "no match for {text:?}");
        }
    }

    #[test]
    fn no_terms_no_signals() {
        let s = extract_signals("<html><body><p>Generate pictures from prompts.</p></body></html>");
        assert_eq!(s, Signals::default());
    }

    #[test]
    fn empty_document() {
        assert_eq!(extract_signals(""), Signals::default());
    }

    #[test]
    fn main_region_wins_over_navigation() {
        let html = r#"<html><body>
            <nav>SynthID base64</nav>
            <main><p>Plain prompting guide.</p></main>
        </body></html>"#;
        assert_eq!(extract_signals(html), Signals::default());
    }

    #[test]
    fn article_used_without_main() {
        let html = r#"<html><body>
            <nav>nothing here</nav>
            <article>Output includes a SynthID mark.</article>
        </body></html>"#;
        let text = content_text(html);
        assert!(text.contains("SynthID"));
        assert!(!text.contains("nothing here"));
    }

    #[test]
    fn whole_document_fallback() {
        let html = "<html><body><div>Pass base64 bytes.</div></body></html>";
        let s = extract_signals(html);
        assert!(s.mentions_binary_encoding);
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = "<main>SynthID and MIME</main>";
        let first = extract_signals(html);
        for _ in 0..3 {
            assert_eq!(extract_signals(html), first);
        }
    }
}
