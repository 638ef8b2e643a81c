// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! XML parsing for WordPress WXR exports.
//!
//! WXR is RSS 2.0 with WordPress-specific namespaced elements. This module
//! only turns the raw text into a navigable tree and checks that it has the
//! `channel` container every export carries; reading records out of the tree
//! is the job of [`crate::extract`].
//!
//! # Example
//!
//! ```
//! use wxr2md::parser::parse_export;
//!
//! let xml = r#"<rss version="2.0"><channel><title>Blog</title></channel></rss>"#;
//!
//! let tree = parse_export(xml).unwrap();
//! assert_eq!(tree.channel().tag_name().name(), "channel");
//! ```

use roxmltree::{Document, Node, ParsingOptions};
use snafu::prelude::*;

/// Error type for export parsing failures.
///
/// The display strings are the user-facing (Italian) messages.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// The text is not well-formed XML.
    #[snafu(display("Il file XML non è valido. Assicurati che sia un export WordPress."))]
    Xml {
        /// The underlying XML error.
        source: roxmltree::Error,
    },

    /// The document has no `channel` element.
    #[snafu(display("Formato XML non riconosciuto. Assicurati che sia un export WordPress."))]
    MissingChannel,
}

/// A parsed export document known to contain a `channel` element.
#[derive(Debug)]
pub struct ExportTree<'input> {
    doc: Document<'input>,
}

impl<'input> ExportTree<'input> {
    /// Returns the first `channel` element of the document.
    #[must_use]
    pub fn channel(&self) -> Node<'_, 'input> {
        // Presence is checked in `parse_export`.
        self.doc
            .descendants()
            .find(|n| has_name(*n, "channel"))
            .unwrap_or_else(|| self.doc.root_element())
    }

    /// Returns the underlying document.
    #[must_use]
    pub const fn document(&self) -> &Document<'input> {
        &self.doc
    }
}

/// Parses WXR text into an [`ExportTree`].
///
/// DTDs are accepted (some exporters emit one) but not expanded beyond
/// what `roxmltree` supports.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] if the text is not well-formed, and
/// [`ParseError::MissingChannel`] if there is no `channel` element.
pub fn parse_export(text: &str) -> Result<ExportTree<'_>, ParseError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    let doc = Document::parse_with_options(text, options).context(XmlSnafu)?;
    ensure!(
        doc.descendants().any(|n| has_name(n, "channel")),
        MissingChannelSnafu
    );

    log::debug!(
        "parsed export tree with {} nodes",
        doc.descendants().count()
    );
    Ok(ExportTree { doc })
}

/// Checks whether `node` is an element with the given qualified name.
///
/// `"wp:post_type"` matches a `post_type` element whose namespace is bound
/// to the `wp` prefix in scope, whatever the namespace URI (the WXR
/// version number lives there). An unprefixed name matches only elements
/// without a namespace.
pub(crate) fn has_name(node: Node<'_, '_>, qualified: &str) -> bool {
    if !node.is_element() {
        return false;
    }
    let tag = node.tag_name();
    match qualified.split_once(':') {
        Some((prefix, local)) => {
            tag.name() == local
                && tag
                    .namespace()
                    .is_some_and(|uri| node.lookup_prefix(uri) == Some(prefix))
        }
        None => tag.name() == qualified && tag.namespace().is_none(),
    }
}
