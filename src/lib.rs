//! # deck2html
//!
//! A CLI utility that packs a multi-file HTML presentation into a single
//! self-contained HTML page.
//!
//! The source layout is one shell page (`main.html`) that navigates between
//! per-section pages, plus optional shared assets (`shared-styles.css`,
//! `animation-utils.js`, `title.html`, and a `sections/` tree). Bundling
//! extracts each page's body, styles, and scripts, inlines external
//! stylesheet and script references, and emits one document whose embedded
//! page map lets the shell's navigation read pages from memory instead of
//! loading iframes.
//!
//! ## Usage
//!
//! ```bash
//! deck2html talks/distributed-training -o deck.html --embed-media
//! ```

mod bundler;
mod content;
mod extract;
mod filter;
mod media;

pub use bundler::{Bundler, DEFAULT_OUTPUT};
