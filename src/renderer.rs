// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for parsed WordPress exports.
//!
//! This module turns a [`ParsedExport`] into one Markdown document with a
//! fixed layout. Labels are in Italian.
//!
//! # Output Format
//!
//! The rendered Markdown includes:
//! - A `#` heading with the site title, description, link, language, and
//!   export date
//! - A `## Riepilogo Contenuti` summary with item counts
//! - `## Categorie` and `## Tag` sections when the site has any
//! - `# ARTICOLI` with one numbered `##` section per post
//! - `# PAGINE` with one numbered `##` section per page
//! - A footer with the generation date
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use wxr2md::model::{ParsedExport, SiteInfo};
//! use wxr2md::renderer::{render_export, RenderOptions};
//!
//! let export = ParsedExport {
//!     site: SiteInfo { title: "My Blog".into(), ..Default::default() },
//!     ..Default::default()
//! };
//!
//! let opts = RenderOptions {
//!     generated_on: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
//! };
//! let markdown = render_export(&export, &opts);
//!
//! assert!(markdown.starts_with("# My Blog\n"));
//! assert!(markdown.contains("*Data generazione: 31/1/2025*"));
//! ```

use crate::markup::html_to_markdown;
use crate::model::{ContentItem, ParsedExport, SiteInfo, parse_timestamp};
use chrono::{Local, Locale, NaiveDate};
use std::fmt::{self, Write};

const DEFAULT_SITE_TITLE: &str = "WordPress Export";
const DEFAULT_ITEM_TITLE: &str = "Senza titolo";
const MISSING: &str = "N/A";

/// Configuration options for Markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Date printed in the footer.
    ///
    /// Defaults to today in local time. Fix it for reproducible output.
    pub generated_on: NaiveDate,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            generated_on: Local::now().date_naive(),
        }
    }
}

/// Which collection a section renders; pages omit excerpts and terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Posts,
    Pages,
}

impl Section {
    const fn heading(self) -> &'static str {
        match self {
            Self::Posts => "ARTICOLI",
            Self::Pages => "PAGINE",
        }
    }
}

/// Renders a parsed export as Markdown.
///
/// Items are rendered in the order they appear in `export`, which the
/// extractor leaves newest first.
#[must_use]
pub fn render_export(export: &ParsedExport, opts: &RenderOptions) -> String {
    let mut out = String::new();
    write_document(&mut out, export, opts).expect("writing to a String cannot fail");
    out
}

fn write_document(out: &mut String, export: &ParsedExport, opts: &RenderOptions) -> fmt::Result {
    write_header(out, &export.site)?;
    write_summary(out, export)?;
    write_terms(out, export)?;
    out.push_str("---\n\n");
    write_section(out, Section::Posts, &export.posts)?;
    write_section(out, Section::Pages, &export.pages)?;
    write_footer(out, opts)
}

fn write_header(out: &mut String, site: &SiteInfo) -> fmt::Result {
    writeln!(out, "# {}\n", or_default(&site.title, DEFAULT_SITE_TITLE))?;
    if !site.description.is_empty() {
        writeln!(out, "> {}\n", site.description)?;
    }
    writeln!(out, "**Sito:** {}", or_default(&site.link, MISSING))?;
    writeln!(out, "**Lingua:** {}", or_default(&site.language, MISSING))?;
    writeln!(out, "**Data export:** {}\n", format_date(&site.export_date))?;
    out.push_str("---\n\n");
    Ok(())
}

fn write_summary(out: &mut String, export: &ParsedExport) -> fmt::Result {
    let stats = export.statistics();
    out.push_str("## Riepilogo Contenuti\n\n");
    writeln!(out, "- **Articoli:** {}", stats.posts)?;
    writeln!(out, "- **Pagine:** {}", stats.pages)?;
    writeln!(out, "- **Categorie:** {}", stats.categories)?;
    writeln!(out, "- **Tag:** {}\n", stats.tags)
}

fn write_terms(out: &mut String, export: &ParsedExport) -> fmt::Result {
    if !export.categories.is_empty() {
        out.push_str("## Categorie\n\n");
        for category in &export.categories {
            write!(out, "- **{}**", category.name)?;
            if !category.description.is_empty() {
                write!(out, ": {}", category.description)?;
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !export.tags.is_empty() {
        out.push_str("## Tag\n\n");
        let names: Vec<String> = export.tags.iter().map(|t| format!("`{}`", t.name)).collect();
        writeln!(out, "{}\n", names.join(", "))?;
    }
    Ok(())
}

fn write_section(out: &mut String, section: Section, items: &[ContentItem]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "# {}\n", section.heading())?;
    for (index, item) in items.iter().enumerate() {
        write_item(out, section, index + 1, item)?;
    }
    Ok(())
}

fn write_item(
    out: &mut String,
    section: Section,
    number: usize,
    item: &ContentItem,
) -> fmt::Result {
    writeln!(
        out,
        "## {number}. {}\n",
        or_default(&item.title, DEFAULT_ITEM_TITLE)
    )?;

    writeln!(out, "**Autore:** {}", or_default(&item.author, MISSING))?;
    writeln!(out, "**Data:** {}", format_date(&item.created))?;
    writeln!(out, "**Stato:** {}", item.status.label())?;
    if section == Section::Posts {
        if !item.categories.is_empty() {
            writeln!(out, "**Categorie:** {}", item.categories.join(", "))?;
        }
        if !item.tags.is_empty() {
            writeln!(out, "**Tag:** {}", item.tags.join(", "))?;
        }
    }
    if !item.link.is_empty() {
        writeln!(out, "**Link:** {}", item.link)?;
    }
    out.push('\n');

    if section == Section::Posts && !item.excerpt.is_empty() {
        let excerpt = html_to_markdown(&item.excerpt);
        if !excerpt.is_empty() {
            out.push_str("### Riassunto\n\n");
            writeln!(out, "> {}\n", excerpt.replace('\n', "\n> "))?;
        }
    }

    if !item.body.is_empty() {
        out.push_str("### Contenuto\n\n");
        writeln!(out, "{}\n", html_to_markdown(&item.body))?;
    }

    out.push_str("---\n\n");
    Ok(())
}

fn write_footer(out: &mut String, opts: &RenderOptions) -> fmt::Result {
    out.push_str("\n---\n\n");
    writeln!(out, "*Documento generato da {}*", env!("CARGO_PKG_NAME"))?;
    writeln!(
        out,
        "*Data generazione: {}*",
        opts.generated_on.format("%-d/%-m/%Y")
    )
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

/// Formats an export date in Italian long form (e.g., "15 marzo 2024").
///
/// Empty dates render as `N/A`; dates that cannot be parsed are shown as
/// written.
fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return MISSING.to_owned();
    }
    parse_timestamp(raw).map_or_else(
        || raw.to_owned(),
        |dt| {
            dt.and_utc()
                .format_localized("%-d %B %Y", Locale::it_IT)
                .to_string()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, PostKind, PostStatus, Tag};

    fn opts() -> RenderOptions {
        RenderOptions {
            generated_on: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        }
    }

    fn make_item(kind: PostKind, title: &str) -> ContentItem {
        ContentItem {
            title: title.into(),
            link: String::new(),
            published: String::new(),
            created: "2024-03-15 10:30:00".into(),
            author: "admin".into(),
            body: String::new(),
            excerpt: String::new(),
            id: "1".into(),
            status: PostStatus::Publish,
            kind,
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn make_site() -> SiteInfo {
        SiteInfo {
            title: "My Blog".into(),
            link: "https://example.com".into(),
            description: "Just another blog".into(),
            language: "it-IT".into(),
            export_date: "Fri, 15 Mar 2024 10:00:00 +0000".into(),
        }
    }

    #[test]
    fn renders_site_header() {
        let export = ParsedExport {
            site: make_site(),
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.starts_with(
            "# My Blog\n\n> Just another blog\n\n**Sito:** https://example.com\n**Lingua:** it-IT\n**Data export:** 15 marzo 2024\n\n---\n\n"
        ));
    }

    #[test]
    fn renders_defaults_for_empty_site() {
        let output = render_export(&ParsedExport::default(), &opts());

        assert!(output.starts_with("# WordPress Export\n\n**Sito:** N/A\n"));
        assert!(output.contains("**Lingua:** N/A\n"));
        assert!(output.contains("**Data export:** N/A\n"));
        assert!(!output.contains("> "));
    }

    #[test]
    fn renders_summary_counts() {
        let export = ParsedExport {
            posts: vec![make_item(PostKind::Post, "A"), make_item(PostKind::Post, "B")],
            pages: vec![make_item(PostKind::Page, "C")],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.contains(
            "## Riepilogo Contenuti\n\n- **Articoli:** 2\n- **Pagine:** 1\n- **Categorie:** 0\n- **Tag:** 0\n\n"
        ));
    }

    #[test]
    fn renders_categories_and_tags() {
        let export = ParsedExport {
            categories: vec![
                Category {
                    name: "News".into(),
                    slug: "news".into(),
                    description: "Latest news".into(),
                },
                Category {
                    name: "Misc".into(),
                    slug: "misc".into(),
                    description: String::new(),
                },
            ],
            tags: vec![
                Tag {
                    name: "rust".into(),
                    slug: "rust".into(),
                },
                Tag {
                    name: "wordpress".into(),
                    slug: "wordpress".into(),
                },
            ],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.contains("## Categorie\n\n- **News**: Latest news\n- **Misc**\n\n"));
        assert!(output.contains("## Tag\n\n`rust`, `wordpress`\n\n---\n\n"));
    }

    #[test]
    fn omits_empty_sections() {
        let output = render_export(&ParsedExport::default(), &opts());

        assert!(!output.contains("## Categorie"));
        assert!(!output.contains("## Tag\n"));
        assert!(!output.contains("# ARTICOLI"));
        assert!(!output.contains("# PAGINE"));
    }

    #[test]
    fn renders_post_with_metadata() {
        let mut post = make_item(PostKind::Post, "Hello");
        post.categories = vec!["News".into(), "Tech".into()];
        post.tags = vec!["rust".into()];
        post.link = "https://example.com/hello".into();
        post.body = "<p>Body</p>".into();
        let export = ParsedExport {
            posts: vec![post],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.contains(
            "# ARTICOLI\n\n## 1. Hello\n\n**Autore:** admin\n**Data:** 15 marzo 2024\n**Stato:** Pubblicato\n**Categorie:** News, Tech\n**Tag:** rust\n**Link:** https://example.com/hello\n\n### Contenuto\n\nBody\n\n---\n\n"
        ));
    }

    #[test]
    fn numbers_posts_in_order() {
        let export = ParsedExport {
            posts: vec![
                make_item(PostKind::Post, "First"),
                make_item(PostKind::Post, ""),
                make_item(PostKind::Post, "Third"),
            ],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        let first = output.find("## 1. First").unwrap();
        let second = output.find("## 2. Senza titolo").unwrap();
        let third = output.find("## 3. Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn renders_excerpt_as_blockquote() {
        let mut post = make_item(PostKind::Post, "Hello");
        post.excerpt = "<p>Line one</p><p>Line two</p>".into();
        let export = ParsedExport {
            posts: vec![post],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.contains("### Riassunto\n\n> Line one\n> \n> Line two\n\n"));
    }

    #[test]
    fn skips_excerpt_that_converts_to_nothing() {
        let mut post = make_item(PostKind::Post, "Hello");
        post.excerpt = "<p></p>".into();
        let export = ParsedExport {
            posts: vec![post],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(!output.contains("Riassunto"));
    }

    #[test]
    fn renders_page_without_terms_or_excerpt() {
        let mut page = make_item(PostKind::Page, "About");
        page.categories = vec!["News".into()];
        page.tags = vec!["rust".into()];
        page.excerpt = "Short".into();
        page.status = PostStatus::Draft;
        let export = ParsedExport {
            pages: vec![page],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        let pages = output.split("# PAGINE").nth(1).unwrap();
        assert!(pages.contains("## 1. About"));
        assert!(pages.contains("**Stato:** Bozza"));
        assert!(!pages.contains("**Categorie:**"));
        assert!(!pages.contains("**Tag:**"));
        assert!(!pages.contains("Riassunto"));
    }

    #[test]
    fn posts_come_before_pages() {
        let export = ParsedExport {
            posts: vec![make_item(PostKind::Post, "Post")],
            pages: vec![make_item(PostKind::Page, "Page")],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.find("# ARTICOLI").unwrap() < output.find("# PAGINE").unwrap());
    }

    #[test]
    fn passes_unknown_status_through() {
        let mut post = make_item(PostKind::Post, "Hello");
        post.status = PostStatus::Other("inherit".into());
        let export = ParsedExport {
            posts: vec![post],
            ..ParsedExport::default()
        };
        let output = render_export(&export, &opts());

        assert!(output.contains("**Stato:** inherit\n"));
    }

    #[test]
    fn renders_footer_with_generation_date() {
        let output = render_export(&ParsedExport::default(), &opts());

        assert!(output.ends_with(
            "\n---\n\n*Documento generato da wxr2md*\n*Data generazione: 16/10/2026*\n"
        ));
    }

    #[test]
    fn formats_dates() {
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("2024-01-05 08:00:00"), "5 gennaio 2024");
        assert_eq!(format_date("Tue, 31 Dec 2024 23:00:00 +0000"), "31 dicembre 2024");
        assert_eq!(format_date("0000-00-00 00:00:00"), "0000-00-00 00:00:00");
    }
}
