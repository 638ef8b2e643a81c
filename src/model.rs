// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Typed records extracted from a WordPress export.
//!
//! A [`ParsedExport`] owns everything read from one WXR document. Children
//! are plain values; nothing points back at the aggregate.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Site-level metadata read from the `channel` element.
///
/// Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteInfo {
    /// Site title.
    pub title: String,
    /// Site URL.
    pub link: String,
    /// Site tagline.
    pub description: String,
    /// Language code (e.g., "it-IT").
    pub language: String,
    /// Date the export was produced, as written in the document.
    pub export_date: String,
}

/// A category term declared at the channel level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Display name. Never empty.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Optional description; empty when absent.
    pub description: String,
}

/// A tag term declared at the channel level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Display name. Never empty.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// Publication status of a post or page (`wp:status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PostStatus {
    /// `publish`
    Publish,
    /// `draft`
    Draft,
    /// `pending`
    Pending,
    /// `private`
    Private,
    /// `future` (scheduled)
    Future,
    /// `trash`
    Trash,
    /// Any other value, kept verbatim.
    Other(String),
}

impl PostStatus {
    /// Returns the Italian label shown in the rendered document.
    ///
    /// Unrecognized values are returned unchanged.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Publish => "Pubblicato",
            Self::Draft => "Bozza",
            Self::Pending => "In attesa",
            Self::Private => "Privato",
            Self::Future => "Programmato",
            Self::Trash => "Cestinato",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for PostStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "publish" => Self::Publish,
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "private" => Self::Private,
            "future" => Self::Future,
            "trash" => Self::Trash,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// The `wp:post_type` discriminator of an export entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PostKind {
    /// A blog post.
    Post,
    /// A static page.
    Page,
    /// Attachments, menu items, custom types, and anything else.
    Other(String),
}

impl From<&str> for PostKind {
    fn from(raw: &str) -> Self {
        match raw {
            "post" => Self::Post,
            "page" => Self::Page,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A post or page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    /// Title; may be empty.
    pub title: String,
    /// Permalink.
    pub link: String,
    /// RSS `pubDate`.
    pub published: String,
    /// `wp:post_date`, used for ordering.
    pub created: String,
    /// `dc:creator` login name.
    pub author: String,
    /// HTML body (`content:encoded`).
    pub body: String,
    /// HTML excerpt (`excerpt:encoded`).
    pub excerpt: String,
    /// `wp:post_id`.
    pub id: String,
    /// Publication status.
    pub status: PostStatus,
    /// Whether this is a post or a page.
    pub kind: PostKind,
    /// Names of the categories the item is filed under.
    pub categories: Vec<String>,
    /// Names of the tags attached to the item.
    pub tags: Vec<String>,
}

impl ContentItem {
    /// Parsed creation date, or `None` when missing or unparseable.
    #[must_use]
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created)
    }
}

/// Everything extracted from one export document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedExport {
    /// Channel metadata.
    pub site: SiteInfo,
    /// Categories in document order.
    pub categories: Vec<Category>,
    /// Tags in document order.
    pub tags: Vec<Tag>,
    /// Posts, newest first.
    pub posts: Vec<ContentItem>,
    /// Pages, newest first.
    pub pages: Vec<ContentItem>,
    /// Number of `item` elements dropped because they were neither posts
    /// nor pages.
    pub skipped_items: usize,
}

impl ParsedExport {
    /// Counts shown to the user after a conversion.
    #[must_use]
    pub const fn statistics(&self) -> Statistics {
        Statistics {
            posts: self.posts.len(),
            pages: self.pages.len(),
            categories: self.categories.len(),
            tags: self.tags.len(),
        }
    }
}

/// Item counts derived from a [`ParsedExport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Number of posts.
    pub posts: usize,
    /// Number of pages.
    pub pages: usize,
    /// Number of categories.
    pub categories: usize,
    /// Number of tags.
    pub tags: usize,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} posts, {} pages, {} categories, {} tags",
            self.posts, self.pages, self.categories, self.tags
        )
    }
}

/// Parses the date formats found in WXR documents.
///
/// Tries RFC 2822 (`pubDate`), RFC 3339, `YYYY-MM-DD HH:MM:SS`
/// (`wp:post_date`), then a bare `YYYY-MM-DD`. Offsets are dropped and the
/// local wall-clock time is kept.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
}
