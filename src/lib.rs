// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert WordPress WXR exports to Markdown.
//!
//! This crate turns the XML file produced by WordPress's "Export" tool into
//! a single Markdown document: site details, a content summary, categories,
//! tags, and every post and page with its body converted from HTML.
//!
//! # Overview
//!
//! The conversion runs in stages:
//!
//! 1. Parse the XML into a tree and check it is an export
//! 2. Extract typed records (site, categories, tags, posts, pages)
//! 3. Render the records as Markdown, converting each body from HTML
//!
//! # Example
//!
//! ```no_run
//! use wxr2md::renderer::RenderOptions;
//! use wxr2md::session::Session;
//! use std::path::Path;
//!
//! let mut session = Session::new(RenderOptions::default());
//! let conversion = session.convert_file(Path::new("export.xml")).unwrap();
//!
//! println!("{}", conversion.statistics);
//! std::fs::write(conversion.file_name(), &conversion.markdown).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`parser`]: XML parsing and export validation
//! - [`extract`]: Record extraction from the parsed tree
//! - [`model`]: Types for the extracted records
//! - [`markup`]: HTML to Markdown conversion for bodies and excerpts
//! - [`renderer`]: Markdown document generation
//! - [`session`]: The end-to-end pipeline and its error kinds

#![deny(missing_docs)]

pub mod extract;
pub mod markup;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod session;
