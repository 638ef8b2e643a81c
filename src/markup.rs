// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! HTML to Markdown conversion for post bodies and excerpts.
//!
//! This is a fixed, ordered set of regex substitutions rather than a DOM
//! conversion. WordPress bodies are shallow and mostly well-formed, so each
//! rule rewrites one construct across the whole buffer before the next rule
//! runs. Anything the rules do not recognize is reduced to its text when
//! leftover tags are stripped.
//!
//! Rule order matters: formatting rules run before the catch-all tag
//! removal, and entities are decoded only after tags are gone so that
//! `&lt;b&gt;` survives as literal text.
//!
//! # Example
//!
//! ```
//! use wxr2md::markup::html_to_markdown;
//!
//! let md = html_to_markdown("<p>Hello <strong>world</strong></p>");
//! assert_eq!(md, "Hello **world**");
//! ```

use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
enum Transform {
    /// Replace each match with a `regex` replacement template.
    Template(&'static str),
    /// Replace each character reference with the character it names.
    Entities,
}

#[derive(Debug)]
struct Rule {
    matcher: Regex,
    transform: Transform,
}

/// Conversion rules, applied top to bottom.
const RULE_SOURCES: &[(&str, Transform)] = &[
    // Scripts and styles, contents included.
    (r"(?is)<script\b.*?</script>", Transform::Template("")),
    (r"(?is)<style\b.*?</style>", Transform::Template("")),
    // Headings. Inner markup is left for later rules.
    (r"(?i)<h1[^>]*>(.*?)</h1>", Transform::Template("\n# ${1}\n")),
    (r"(?i)<h2[^>]*>(.*?)</h2>", Transform::Template("\n## ${1}\n")),
    (r"(?i)<h3[^>]*>(.*?)</h3>", Transform::Template("\n### ${1}\n")),
    (r"(?i)<h4[^>]*>(.*?)</h4>", Transform::Template("\n#### ${1}\n")),
    (r"(?i)<h5[^>]*>(.*?)</h5>", Transform::Template("\n##### ${1}\n")),
    (r"(?i)<h6[^>]*>(.*?)</h6>", Transform::Template("\n###### ${1}\n")),
    // Emphasis. Only bare tags; `<b class="x">` is left to tag stripping.
    (r"(?i)<(strong|b)>(.*?)</(strong|b)>", Transform::Template("**${2}**")),
    (r"(?i)<(em|i)>(.*?)</(em|i)>", Transform::Template("*${2}*")),
    // Links.
    (
        r#"(?i)<a[^>]*href=["']([^"']*)["'][^>]*>(.*?)</a>"#,
        Transform::Template("[${2}](${1})"),
    ),
    // Images: src then alt, alt then src, src alone.
    (
        r#"(?i)<img[^>]*src=["']([^"']*)["'][^>]*alt=["']([^"']*)["'][^>]*/?>"#,
        Transform::Template("![${2}](${1})"),
    ),
    (
        r#"(?i)<img[^>]*alt=["']([^"']*)["'][^>]*src=["']([^"']*)["'][^>]*/?>"#,
        Transform::Template("![${1}](${2})"),
    ),
    (
        r#"(?i)<img[^>]*src=["']([^"']*)["'][^>]*/?>"#,
        Transform::Template("![](${1})"),
    ),
    // Lists. Ordered lists are rendered as bullets too.
    (r"(?i)<ul[^>]*>", Transform::Template("\n")),
    (r"(?i)</ul>", Transform::Template("\n")),
    (r"(?i)<ol[^>]*>", Transform::Template("\n")),
    (r"(?i)</ol>", Transform::Template("\n")),
    (r"(?i)<li[^>]*>(.*?)</li>", Transform::Template("- ${1}\n")),
    // Blockquotes may span lines.
    (
        r"(?is)<blockquote[^>]*>(.*?)</blockquote>",
        Transform::Template("\n> ${1}\n"),
    ),
    // Code.
    (r"(?i)<code[^>]*>(.*?)</code>", Transform::Template("`${1}`")),
    (
        r"(?is)<pre[^>]*>(.*?)</pre>",
        Transform::Template("\n```\n${1}\n```\n"),
    ),
    // Paragraphs and breaks.
    (r"(?i)<p[^>]*>", Transform::Template("\n")),
    (r"(?i)</p>", Transform::Template("\n")),
    (r"(?i)<br\s*/?>", Transform::Template("\n")),
    (r"(?i)<hr\s*/?>", Transform::Template("\n---\n")),
    // Whatever tags are left.
    (r"<[^>]+>", Transform::Template("")),
    (
        r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*)(;)?",
        Transform::Entities,
    ),
    (r"\n{3,}", Transform::Template("\n\n")),
];

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        RULE_SOURCES
            .iter()
            .map(|&(pattern, transform)| Rule {
                matcher: Regex::new(pattern).expect("conversion rule patterns are valid"),
                transform,
            })
            .collect()
    })
}

/// Converts an HTML fragment to Markdown.
///
/// Empty input yields an empty string. The result is trimmed and never
/// contains more than one blank line in a row.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let mut md = html.to_owned();
    for rule in rules() {
        let replaced = match rule.transform {
            Transform::Template(template) => rule.matcher.replace_all(&md, template),
            Transform::Entities => rule.matcher.replace_all(&md, |caps: &Captures<'_>| {
                decode_entity(&caps[1], caps.get(2).is_some())
                    .unwrap_or_else(|| caps[0].to_owned())
            }),
        };
        md = replaced.into_owned();
    }

    md.trim().to_owned()
}

/// Named references that resolve even without the closing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Resolves the body of a character reference (`#233`, `#xE9`, `eacute`).
///
/// Numeric references and the legacy names above decode with or without
/// the trailing `;`; other names need it. Returns `None` for unknown names
/// and invalid code points, in which case the reference is kept as written.
fn decode_entity(entity: &str, terminated: bool) -> Option<String> {
    if let Some(number) = entity.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code)
            .filter(|c| *c != '\0')
            .map(String::from);
    }
    if !terminated && !LEGACY_ENTITIES.contains(&entity) {
        return None;
    }
    resolve_html5_entity(entity).map(str::to_owned)
}
