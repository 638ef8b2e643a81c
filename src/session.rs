// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! End-to-end conversion of export files.
//!
//! [`convert`] runs the whole pipeline on raw bytes: input checks, XML
//! parsing, record extraction, and rendering. [`Session`] keeps the most
//! recent successful [`Conversion`] so a front end can show it, copy it, or
//! save it; a failed run leaves the previous result in place.
//!
//! # Example
//!
//! ```
//! use wxr2md::renderer::RenderOptions;
//! use wxr2md::session::Session;
//!
//! let xml = br#"<rss version="2.0"><channel><title>Blog</title></channel></rss>"#;
//!
//! let mut session = Session::new(RenderOptions::default());
//! let conversion = session.convert_bytes("export.xml", xml).unwrap();
//!
//! assert_eq!(conversion.file_name(), "blog.md");
//! assert_eq!(conversion.statistics.posts, 0);
//! ```

use crate::extract::extract_export;
use crate::model::{ParsedExport, Statistics};
use crate::parser::{self, parse_export};
use crate::renderer::{RenderOptions, render_export};
use snafu::prelude::*;
use std::path::{Path, PathBuf};

const DEFAULT_FILE_STEM: &str = "wordpress-export";

/// Error type for conversion failures.
///
/// Every variant is terminal for the run; the caller shows the message and
/// lets the user try again.
#[derive(Debug, Snafu)]
pub enum ConvertError {
    /// The input is not an XML text file.
    #[snafu(display("Per favore seleziona un file XML valido."))]
    InvalidInputKind {
        /// Name of the rejected input.
        name: String,
    },

    /// The input is not a well-formed WordPress export.
    #[snafu(display("{source}"))]
    MalformedDocument {
        /// The underlying parse error.
        source: parser::ParseError,
    },

    /// The input could not be read.
    #[snafu(display("Impossibile leggere il file."))]
    ReadFailure {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// The result of one successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Name of the input the conversion came from.
    pub source_name: String,
    /// Records extracted from the export.
    pub export: ParsedExport,
    /// The rendered Markdown document.
    pub markdown: String,
    /// Item counts for display.
    pub statistics: Statistics,
}

impl Conversion {
    /// File name to save the Markdown under.
    ///
    /// See [`output_file_name`].
    #[must_use]
    pub fn file_name(&self) -> String {
        output_file_name(&self.export.site.title, &self.source_name)
    }
}

/// Runs the full pipeline on the contents of one input file.
///
/// `name` is the input's file name; it must end in `.xml`.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidInputKind`] for a non-`.xml` name or
/// non-UTF-8 bytes, and [`ConvertError::MalformedDocument`] when the XML
/// does not parse or is not an export.
pub fn convert(
    name: &str,
    bytes: &[u8],
    opts: &RenderOptions,
) -> Result<Conversion, ConvertError> {
    ensure!(has_xml_extension(name), InvalidInputKindSnafu { name });
    let text = std::str::from_utf8(bytes)
        .ok()
        .context(InvalidInputKindSnafu { name })?;

    let tree = parse_export(text).context(MalformedDocumentSnafu)?;
    let export = extract_export(&tree);
    let markdown = render_export(&export, opts);
    let statistics = export.statistics();

    log::debug!("converted {name}: {statistics}");
    Ok(Conversion {
        source_name: name.to_owned(),
        export,
        markdown,
        statistics,
    })
}

/// Holds the latest successful conversion.
///
/// Each call to [`Session::convert_bytes`] or [`Session::convert_file`]
/// supersedes the previous result on success. On failure the previous
/// result is kept.
#[derive(Debug, Default)]
pub struct Session {
    opts: RenderOptions,
    current: Option<Conversion>,
}

impl Session {
    /// Creates an empty session that renders with `opts`.
    #[must_use]
    pub const fn new(opts: RenderOptions) -> Self {
        Self {
            opts,
            current: None,
        }
    }

    /// Converts in-memory input and makes it the current result.
    ///
    /// # Errors
    ///
    /// See [`convert`].
    pub fn convert_bytes(
        &mut self,
        name: &str,
        bytes: &[u8],
    ) -> Result<&Conversion, ConvertError> {
        let conversion = convert(name, bytes, &self.opts)?;
        Ok(self.current.insert(conversion))
    }

    /// Reads and converts a file and makes it the current result.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ReadFailure`] if the file cannot be read,
    /// otherwise see [`convert`].
    pub fn convert_file(&mut self, path: &Path) -> Result<&Conversion, ConvertError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ensure!(has_xml_extension(&name), InvalidInputKindSnafu { name });

        let bytes = std::fs::read(path).context(ReadFailureSnafu { path })?;
        self.convert_bytes(&name, &bytes)
    }

    /// The latest successful conversion, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Conversion> {
        self.current.as_ref()
    }

    /// Forgets the current result.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

fn has_xml_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Derives the Markdown file name for an export.
///
/// Uses the site title lowercased, with every run of characters outside
/// `a-z0-9` collapsed to one hyphen and hyphens trimmed from both ends.
/// Falls back to the input's file stem, then to `wordpress-export`.
#[must_use]
pub fn output_file_name(site_title: &str, source_name: &str) -> String {
    let slug = slugify(site_title);
    if !slug.is_empty() {
        return format!("{slug}.md");
    }

    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        format!("{DEFAULT_FILE_STEM}.md")
    } else {
        format!("{stem}.md")
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0" xmlns:wp="http://wordpress.org/export/1.2/"
            xmlns:content="http://purl.org/rss/1.0/modules/content/">
        <channel>
            <title>Il Mio Blog</title>
            <item>
                <title><![CDATA[Hi]]></title>
                <content:encoded><![CDATA[<p>Body</p>]]></content:encoded>
                <wp:post_type>post</wp:post_type>
                <wp:status>publish</wp:status>
            </item>
        </channel>
        </rss>"#;

    fn session() -> Session {
        Session::new(RenderOptions {
            generated_on: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        })
    }

    #[test]
    fn converts_export_end_to_end() {
        let mut session = session();
        let conversion = session.convert_bytes("blog.xml", EXPORT.as_bytes()).unwrap();

        assert!(conversion.markdown.contains("## 1. Hi"));
        assert!(conversion.markdown.contains("**Stato:** Pubblicato"));
        assert!(conversion.markdown.contains("### Contenuto\n\nBody\n"));
        assert_eq!(conversion.statistics.posts, 1);
        assert_eq!(conversion.file_name(), "il-mio-blog.md");
    }

    #[test]
    fn rejects_non_xml_name() {
        let err = convert("notes.txt", EXPORT.as_bytes(), &RenderOptions::default()).unwrap_err();

        assert!(matches!(err, ConvertError::InvalidInputKind { .. }));
        assert_eq!(err.to_string(), "Per favore seleziona un file XML valido.");
    }

    #[test]
    fn accepts_uppercase_extension() {
        assert!(convert("EXPORT.XML", EXPORT.as_bytes(), &RenderOptions::default()).is_ok());
    }

    #[test]
    fn rejects_non_utf8_bytes() {
        let err = convert("blog.xml", &[0x3c, 0xff, 0xfe, 0x3e], &RenderOptions::default()).unwrap_err();

        assert!(matches!(err, ConvertError::InvalidInputKind { .. }));
    }

    #[test]
    fn reports_malformed_document() {
        let err = convert("blog.xml", b"<rss><channel>", &RenderOptions::default()).unwrap_err();

        assert!(matches!(err, ConvertError::MalformedDocument { .. }));
        assert_eq!(
            err.to_string(),
            "Il file XML non è valido. Assicurati che sia un export WordPress."
        );
    }

    #[test]
    fn failed_run_keeps_previous_result() {
        let mut session = session();
        session.convert_bytes("blog.xml", EXPORT.as_bytes()).unwrap();

        let result = session.convert_bytes("broken.xml", b"<rss><channel><item>");
        assert!(result.is_err());

        let current = session.current().unwrap();
        assert_eq!(current.source_name, "blog.xml");
        assert!(current.markdown.contains("## 1. Hi"));
    }

    #[test]
    fn new_run_supersedes_previous_result() {
        let mut session = session();
        session.convert_bytes("blog.xml", EXPORT.as_bytes()).unwrap();
        session
            .convert_bytes("other.xml", b"<rss><channel><title>Other</title></channel></rss>")
            .unwrap();

        assert_eq!(session.current().unwrap().source_name, "other.xml");
        assert_eq!(session.current().unwrap().statistics.posts, 0);
    }

    #[test]
    fn reset_clears_result() {
        let mut session = session();
        session.convert_bytes("blog.xml", EXPORT.as_bytes()).unwrap();
        session.reset();

        assert!(session.current().is_none());
    }

    #[test]
    fn derives_file_name_from_title() {
        assert_eq!(output_file_name("My Blog!", "x.xml"), "my-blog.md");
        assert_eq!(output_file_name("  --Caffè & Cornetti--  ", "x.xml"), "caff-cornetti.md");
        assert_eq!(output_file_name("2024: A Year", "x.xml"), "2024-a-year.md");
    }

    #[test]
    fn falls_back_to_input_stem() {
        assert_eq!(output_file_name("", "site.WordPress.2024-01-01.xml"), "site.WordPress.2024-01-01.md");
        assert_eq!(output_file_name("日本語", "export.xml"), "export.md");
    }

    #[test]
    fn falls_back_to_default_name() {
        assert_eq!(output_file_name("", ""), "wordpress-export.md");
    }
}
