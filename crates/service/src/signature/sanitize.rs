//! The two sanitizing stages that run after validation.
//!
//! `filter_form` neutralizes markup in every submitted field: tags on a small
//! whitelist survive with their whitelisted attributes, everything else that
//! looks like markup is entity-encoded. `normalize` then prepares values for
//! storage (trimmed and escaped name, hyphen-free national id, boolean flag).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::domain::{NewSignature, SignatureForm};

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)([^<>]*)>").expect("tag pattern compiles"));

static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+)))?"#)
        .expect("attribute pattern compiles")
});

/// Prefixes an `href` may start with; anything else is dropped.
const SAFE_HREF_PREFIXES: [&str; 8] = ["http://", "https://", "mailto:", "tel:", "#", "/", "./", "../"];

/// Whitelisted attributes for a whitelisted tag, `None` when the tag is not allowed.
fn allowed_attrs(tag: &str) -> Option<&'static [&'static str]> {
    match tag {
        "a" => Some(&["href", "title", "target"]),
        "abbr" => Some(&["title"]),
        "b" | "blockquote" | "br" | "code" | "em" | "i" | "li" | "ol" | "p" | "pre" | "small"
        | "strong" | "sub" | "sup" | "u" | "ul" => Some(&[]),
        _ => None,
    }
}

/// Neutralize executable markup. Idempotent: filtering filtered text is a no-op.
pub fn filter_xss(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&escape_angles(&input[last..whole.start()]));
        let tag = caps[2].to_ascii_lowercase();
        match allowed_attrs(&tag) {
            Some(allowed) => out.push_str(&rebuild_tag(&caps, &tag, allowed)),
            None => out.push_str(&escape_angles(whole.as_str())),
        }
        last = whole.end();
    }
    out.push_str(&escape_angles(&input[last..]));
    out
}

fn rebuild_tag(caps: &Captures<'_>, tag: &str, allowed: &[&str]) -> String {
    if !caps[1].is_empty() {
        return format!("</{tag}>");
    }
    let raw_attrs = &caps[3];
    let mut out = format!("<{tag}");
    for attr in ATTR.captures_iter(raw_attrs) {
        let name = attr[1].to_ascii_lowercase();
        if !allowed.contains(&name.as_str()) {
            continue;
        }
        let Some(value) = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4)) else {
            continue;
        };
        if name == "href" && !is_safe_href(value.as_str()) {
            continue;
        }
        out.push_str(&format!(" {name}=\"{}\"", value.as_str().replace('"', "&quot;")));
    }
    if raw_attrs.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');
    out
}

/// Entity tricks (`&Tab;`, `&#x09;`, ...) inside a scheme never match a prefix.
fn is_safe_href(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    SAFE_HREF_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

fn escape_angles(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Stage one: XSS filter over all four submitted fields.
pub fn filter_form(form: &SignatureForm) -> SignatureForm {
    SignatureForm {
        name: filter_xss(&form.name),
        national_id: filter_xss(&form.national_id),
        comment: filter_xss(&form.comment),
        anonymous: form.anonymous.as_deref().map(filter_xss),
    }
}

/// Stage two: storage format.
pub fn normalize(form: SignatureForm) -> NewSignature {
    NewSignature {
        name: escape_html(form.name.trim()),
        national_id: form.national_id.replace('-', ""),
        comment: form.comment,
        anonymous: parse_flag(form.anonymous.as_deref()),
    }
}

/// Entity-encode the characters that matter inside HTML text and attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    out
}

/// Checkbox and boolean-ish spellings that count as ticked.
pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "yes" | "1" | "t" | "y")
    )
}
