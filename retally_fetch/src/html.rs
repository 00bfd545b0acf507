//! Markup to plain text.
//!
//! Not a DOM parser: tags are stripped with a handful of patterns, which is
//! enough to expose the visible text of a page to the extraction commands.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in markup pattern must compile")
}

static COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)<!--.*?-->"));

static HIDDEN_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>",
    )
});

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)<br\s*/?>|</(?:p|div|li|tr|td|th|h[1-6]|table|ul|ol|dl|dt|dd|section|article|header|footer|nav|blockquote|pre|caption)\s*>",
    )
});

static TAG: Lazy<Regex> = Lazy::new(|| compile(r"(?s)</?[a-zA-Z!][^>]*>"));

static ENTITY: Lazy<Regex> =
    Lazy::new(|| compile(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));"));

static BLANKS: Lazy<Regex> = Lazy::new(|| compile(r"[ \t\f\v\r\u{a0}]+"));

/// Visible text of an HTML document.
///
/// Script and style bodies are dropped, block-level closing tags become line
/// breaks, other tags vanish without adding whitespace, entities are decoded
/// and blank runs are collapsed.
#[must_use]
pub fn html_to_text(markup: &str) -> String {
    let text = COMMENT.replace_all(markup, "");
    let text = HIDDEN_ELEMENT.replace_all(&text, "");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = ENTITY.replace_all(&text, decode_entity);
    let text = BLANKS.replace_all(&text, " ");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entity(caps: &Captures<'_>) -> String {
    let decoded = if let Some(dec) = caps.get(1) {
        dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
    } else if let Some(hex) = caps.get(2) {
        u32::from_str_radix(hex.as_str(), 16)
            .ok()
            .and_then(char::from_u32)
    } else {
        caps.get(3).and_then(|name| named_entity(name.as_str()))
    };

    decoded.map_or_else(|| caps[0].to_string(), String::from)
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "copy" => '\u{a9}',
        _ => return None,
    };
    Some(c)
}
