//! Body extraction: best-effort readable text from a payload tree.
//!
//! Scan policy (depth-first, first match wins): for each child in order,
//! a `text/plain` leaf with data is returned as-is, otherwise a `text/html`
//! leaf with data is returned with its markup stripped, otherwise a nested
//! container is searched recursively. A bad part never aborts the scan:
//! undecodable or empty nodes are skipped and the next sibling is tried.

use std::sync::LazyLock;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use tracing::{debug, warn};

use crate::types::Payload;

/// Returned when no node in the tree yields readable text.
pub const NO_CONTENT: &str = "No Content";

/// Containers nested deeper than this are treated as empty.
pub const MAX_PAYLOAD_DEPTH: usize = 32;

/// URL-safe base64 that accepts both padded and unpadded input.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});
static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static P_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Extract the readable body of a message payload.
///
/// Returns [`NO_CONTENT`] when nothing in the tree decodes to text.
pub fn extract_body(payload: &Payload) -> String {
    let found = match payload {
        Payload::Container { children, .. } => scan_children(children, 0),
        Payload::Leaf {
            data: Some(data), ..
        } => decode_body(data),
        Payload::Leaf { data: None, .. } => None,
    };

    found.unwrap_or_else(|| NO_CONTENT.to_string())
}

/// Scan children in order; `None` means nothing usable at this level.
fn scan_children(children: &[Payload], depth: usize) -> Option<String> {
    for child in children {
        match child {
            Payload::Leaf {
                data: Some(data), ..
            } if child.is_type("text/plain") => {
                if let Some(text) = decode_body(data) {
                    return Some(text);
                }
            }
            Payload::Leaf {
                data: Some(data), ..
            } if child.is_type("text/html") => {
                if let Some(text) = decode_body(data).map(|html| html_to_text(&html)) {
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
            Payload::Container { children, .. } => {
                if depth + 1 >= MAX_PAYLOAD_DEPTH {
                    warn!(depth, "payload nesting too deep, skipping subtree");
                    continue;
                }
                if let Some(text) = scan_children(children, depth + 1) {
                    return Some(text);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode a URL-safe base64 body into UTF-8 text.
///
/// Failures and empty bodies yield `None` so the caller moves on.
fn decode_body(data: &str) -> Option<String> {
    let bytes = match BODY_ENGINE.decode(data.trim()) {
        Ok(b) => b,
        Err(e) => {
            debug!(error = %e, "skipping part with undecodable body");
            return None;
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "skipping part with non-UTF-8 body");
            None
        }
    }
}

/// Convert HTML to its visible text.
pub fn html_to_text(html: &str) -> String {
    let text = COMMENT_RE.replace_all(html, "");
    let text = SCRIPT_STYLE_RE.replace_all(&text, "");
    let text = BR_RE.replace_all(&text, "\n");
    let text = P_CLOSE_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");

    // Entities are decoded once, after tags are gone.
    html_escape::decode_html_entities(&text)
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    fn b64(s: &str) -> String {
        URL_SAFE.encode(s)
    }

    #[test]
    fn test_plain_text_part() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![Payload::leaf("text/plain", b64("Hello"))],
        );
        assert_eq!(extract_body(&payload), "Hello");
    }

    #[test]
    fn test_html_part_is_stripped() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![Payload::leaf("text/html", b64("<p>Hi</p>"))],
        );
        assert_eq!(extract_body(&payload), "Hi");
    }

    #[test]
    fn test_plain_preferred_when_first() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![
                Payload::leaf("text/plain", b64("plain body")),
                Payload::leaf("text/html", b64("<b>html body</b>")),
            ],
        );
        assert_eq!(extract_body(&payload), "plain body");
    }

    #[test]
    fn test_plain_in_nested_container_before_html_sibling() {
        let payload = Payload::container(
            "multipart/mixed",
            vec![
                Payload::container(
                    "multipart/alternative",
                    vec![Payload::leaf("text/plain", b64("nested plain"))],
                ),
                Payload::leaf("text/html", b64("<div>later html</div>")),
            ],
        );
        assert_eq!(extract_body(&payload), "nested plain");
    }

    #[test]
    fn test_empty_nested_container_continues_to_sibling() {
        let payload = Payload::container(
            "multipart/mixed",
            vec![
                Payload::container("multipart/alternative", vec![]),
                Payload::container(
                    "multipart/related",
                    vec![Payload::empty_leaf("image/png")],
                ),
                Payload::leaf("text/plain", b64("found it")),
            ],
        );
        assert_eq!(extract_body(&payload), "found it");
    }

    #[test]
    fn test_no_data_bearing_leaf_returns_sentinel() {
        let payload = Payload::container(
            "multipart/mixed",
            vec![
                Payload::empty_leaf("text/plain"),
                Payload::container("multipart/alternative", vec![Payload::empty_leaf("text/html")]),
            ],
        );
        assert_eq!(extract_body(&payload), NO_CONTENT);
    }

    #[test]
    fn test_empty_container_returns_sentinel() {
        let payload = Payload::container("multipart/mixed", vec![]);
        assert_eq!(extract_body(&payload), NO_CONTENT);
    }

    #[test]
    fn test_attachment_leaf_with_data_is_ignored() {
        let payload = Payload::container(
            "multipart/mixed",
            vec![Payload::leaf("application/pdf", b64("%PDF-1.4"))],
        );
        assert_eq!(extract_body(&payload), NO_CONTENT);
    }

    #[test]
    fn test_root_leaf_with_data() {
        let payload = Payload::leaf("text/plain", b64("single part"));
        assert_eq!(extract_body(&payload), "single part");
    }

    #[test]
    fn test_root_leaf_without_data() {
        assert_eq!(extract_body(&Payload::empty_leaf("text/plain")), NO_CONTENT);
    }

    #[test]
    fn test_decode_failure_does_not_abort_siblings() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![
                Payload::leaf("text/plain", "***not base64***"),
                Payload::leaf("text/html", b64("<p>fallback</p>")),
            ],
        );
        assert_eq!(extract_body(&payload), "fallback");
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![
                Payload::leaf("text/plain", URL_SAFE.encode([0xff, 0xfe, 0xfd])),
                Payload::leaf("text/plain", b64("second")),
            ],
        );
        assert_eq!(extract_body(&payload), "second");
    }

    #[test]
    fn test_unpadded_base64_accepted() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![Payload::leaf("text/plain", URL_SAFE_NO_PAD.encode("Hi!!"))],
        );
        assert_eq!(extract_body(&payload), "Hi!!");
    }

    #[test]
    fn test_url_safe_alphabet() {
        // "??>" encodes to "Pz8-" in the URL-safe alphabet.
        let payload = Payload::container(
            "multipart/alternative",
            vec![Payload::leaf("text/plain", "Pz8-")],
        );
        assert_eq!(extract_body(&payload), "??>");
    }

    #[test]
    fn test_depth_guard_stops_runaway_nesting() {
        let mut node = Payload::leaf("text/plain", b64("too deep"));
        for _ in 0..(MAX_PAYLOAD_DEPTH + 5) {
            node = Payload::container("multipart/mixed", vec![node]);
        }
        assert_eq!(extract_body(&node), NO_CONTENT);
    }

    #[test]
    fn test_nesting_within_limit_is_found() {
        let mut node = Payload::leaf("text/plain", b64("deep but fine"));
        for _ in 0..5 {
            node = Payload::container("multipart/mixed", vec![node]);
        }
        assert_eq!(extract_body(&node), "deep but fine");
    }

    #[test]
    fn test_html_to_text_line_breaks() {
        assert_eq!(html_to_text("Hello<br>World"), "Hello\nWorld");
        assert_eq!(html_to_text("Hello<br/>World"), "Hello\nWorld");
        assert_eq!(html_to_text("<p>One</p><p>Two</p>"), "One\nTwo");
    }

    #[test]
    fn test_html_to_text_drops_script_and_style() {
        let html = "<style>p{color:red}</style><p>Visible</p><script>alert(1)</script>";
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn test_html_to_text_entities() {
        assert_eq!(html_to_text("Tom &amp; Jerry &lt;3"), "Tom & Jerry <3");
        assert_eq!(html_to_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_html_to_text_named_and_numeric_entities() {
        assert_eq!(
            html_to_text("<p>Don&#8217;t miss &eacute;t&eacute; &rsquo;24&#x21;</p>"),
            "Don\u{2019}t miss \u{e9}t\u{e9} \u{2019}24!"
        );
        assert_eq!(html_to_text("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_html_to_text_drops_comments() {
        assert_eq!(html_to_text("<!-- if (a > b) --><p>Hi</p>"), "Hi");
        assert_eq!(
            html_to_text("<!--[if mso]><table><tr><td><![endif]-->Body<!--[if mso]></td></tr></table><![endif]-->"),
            "Body"
        );
    }

    #[test]
    fn test_html_only_body_is_decoded() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![Payload::leaf(
                "text/html",
                b64("<!-- tracking --><p>Caf&eacute; at 5&nbsp;pm</p>"),
            )],
        );
        assert_eq!(extract_body(&payload), "Caf\u{e9} at 5 pm");
    }

    #[test]
    fn test_empty_plain_part_falls_through_to_html() {
        let payload = Payload::container(
            "multipart/alternative",
            vec![
                Payload::leaf("text/plain", ""),
                Payload::leaf("text/html", b64("<p>html wins</p>")),
            ],
        );
        assert_eq!(extract_body(&payload), "html wins");
    }
}
