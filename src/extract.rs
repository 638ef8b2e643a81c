// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Record extraction from a parsed WXR tree.
//!
//! Walks the `channel` element and produces a [`ParsedExport`]. Missing
//! optional fields become empty strings; extraction itself never fails.
//!
//! # Example
//!
//! ```
//! use wxr2md::{extract::extract_export, parser::parse_export};
//!
//! let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.2/"><channel>
//!     <title>Blog</title>
//!     <item>
//!         <title><![CDATA[Hello]]></title>
//!         <wp:post_type>post</wp:post_type>
//!         <wp:status>publish</wp:status>
//!     </item>
//! </channel></rss>"#;
//!
//! let export = extract_export(&parse_export(xml).unwrap());
//! assert_eq!(export.site.title, "Blog");
//! assert_eq!(export.posts[0].title, "Hello");
//! ```

use crate::model::{Category, ContentItem, ParsedExport, PostKind, PostStatus, SiteInfo, Tag};
use crate::parser::{ExportTree, has_name};
use roxmltree::Node;

/// Builds a [`ParsedExport`] from a parsed export tree.
///
/// Only `item` entries whose `wp:post_type` is `post` or `page` are kept.
/// Both collections are sorted newest first by `wp:post_date`; entries
/// without a usable date go last, in document order.
#[must_use]
pub fn extract_export(tree: &ExportTree<'_>) -> ParsedExport {
    let channel = tree.channel();

    let site = SiteInfo {
        title: field(channel, "title"),
        link: field(channel, "link"),
        description: field(channel, "description"),
        language: field(channel, "language"),
        export_date: field(channel, "pubDate"),
    };

    let categories: Vec<Category> = elements(channel, "wp:category")
        .filter_map(extract_category)
        .collect();
    let tags: Vec<Tag> = elements(channel, "wp:tag").filter_map(extract_tag).collect();

    let mut posts = Vec::new();
    let mut pages = Vec::new();
    let mut skipped_items = 0;

    for item in elements(channel, "item") {
        let entry = extract_item(item);
        match entry.kind {
            PostKind::Post => posts.push(entry),
            PostKind::Page => pages.push(entry),
            PostKind::Other(kind) => {
                log::trace!("skipping item {:?} of type {kind:?}", entry.id);
                skipped_items += 1;
            }
        }
    }

    sort_newest_first(&mut posts);
    sort_newest_first(&mut pages);

    log::debug!(
        "extracted {} posts, {} pages, {} categories, {} tags ({skipped_items} items skipped)",
        posts.len(),
        pages.len(),
        categories.len(),
        tags.len(),
    );

    ParsedExport {
        site,
        categories,
        tags,
        posts,
        pages,
        skipped_items,
    }
}

fn extract_category(node: Node<'_, '_>) -> Option<Category> {
    let slug = field(node, "wp:category_nicename");
    let name = Some(field(node, "wp:cat_name"))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| slug.clone());
    if name.is_empty() {
        return None;
    }
    Some(Category {
        name,
        slug,
        description: field(node, "wp:category_description"),
    })
}

fn extract_tag(node: Node<'_, '_>) -> Option<Tag> {
    let name = field(node, "wp:tag_name");
    if name.is_empty() {
        return None;
    }
    Some(Tag {
        name,
        slug: field(node, "wp:tag_slug"),
    })
}

fn extract_item(item: Node<'_, '_>) -> ContentItem {
    let mut categories = Vec::new();
    let mut tags = Vec::new();

    // Term references: <category domain="post_tag" nicename="x">Name</category>
    for term in elements(item, "category") {
        let name = clean_cdata(&text_content(term));
        if name.is_empty() {
            continue;
        }
        match term.attribute("domain") {
            Some("category") => categories.push(name),
            Some("post_tag") => tags.push(name),
            _ => {}
        }
    }

    ContentItem {
        title: field(item, "title"),
        link: field(item, "link"),
        published: field(item, "pubDate"),
        created: field(item, "wp:post_date"),
        author: field(item, "dc:creator"),
        body: field(item, "content:encoded"),
        excerpt: field(item, "excerpt:encoded"),
        id: field(item, "wp:post_id"),
        status: PostStatus::from(field(item, "wp:status").as_str()),
        kind: PostKind::from(field(item, "wp:post_type").as_str()),
        categories,
        tags,
    }
}

/// Stable sort by creation date, newest first.
///
/// `None` orders below every date, so undated entries end up last and keep
/// their relative order.
fn sort_newest_first(items: &mut [ContentItem]) {
    items.sort_by_cached_key(|item| std::cmp::Reverse(item.created_at()));
}

/// Iterates over the child elements of `parent` with the given name.
fn elements<'a, 'input>(
    parent: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent.children().filter(move |n| has_name(*n, name))
}

/// Returns the cleaned text of the first child element with the given name,
/// or an empty string when there is none.
fn field(parent: Node<'_, '_>, name: &str) -> String {
    parent
        .children()
        .find(|n| has_name(*n, name))
        .map(|n| clean_cdata(&text_content(n)))
        .unwrap_or_default()
}

/// Concatenates all text below `node`, CDATA sections included.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

/// Removes literal CDATA markers left in text and trims it.
///
/// The XML parser already unwraps real CDATA sections; this handles
/// markers that survive as text (e.g. double-wrapped or escaped content).
#[must_use]
pub fn clean_cdata(text: &str) -> String {
    text.replace("<![CDATA[", "")
        .replace("]]>", "")
        .trim()
        .to_owned()
}
