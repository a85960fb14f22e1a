use regex::{Captures, Regex};
use serde::Serialize;
use std::path::Path;

use crate::content::{self, FileContent};
use crate::filter;

/// Markup regions pulled out of one HTML page. Each field is a substring of
/// the (inlined) source document, possibly empty.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedPage {
    pub body: String,
    pub styles: String,
    pub scripts: String,
}

/// Regex-driven page extraction.
///
/// All matching is textual and first-match-wins: markup this tool does not
/// anticipate (multiple body tags, self-closing scripts, exotic attribute
/// quoting) keeps whatever the first match produces.
pub struct Extractor {
    stylesheet_link_re: Regex,
    script_src_re: Regex,
    body_re: Regex,
    style_re: Regex,
    script_re: Regex,
    title_re: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            stylesheet_link_re: Regex::new(
                r#"<link\s+[^>]*rel=["']stylesheet["'][^>]*href=["']([^"']+)["'][^>]*>"#,
            )
            .expect("stylesheet link pattern should be valid"),
            script_src_re: Regex::new(r#"<script\s+[^>]*src=["']([^"']+)["'][^>]*></script>"#)
                .expect("script src pattern should be valid"),
            body_re: Regex::new(r"(?s)<body[^>]*>(.*?)</body>")
                .expect("body pattern should be valid"),
            style_re: Regex::new(r"(?s)<style[^>]*>(.*?)</style>")
                .expect("style pattern should be valid"),
            script_re: Regex::new(r"(?s)<script[^>]*>(.*?)</script>")
                .expect("script pattern should be valid"),
            title_re: Regex::new(r"(?s)<title[^>]*>(.*?)</title>")
                .expect("title pattern should be valid"),
        }
    }

    /// Replace stylesheet links and external script tags with inline blocks
    /// when the referenced file exists locally and reads as text. Best
    /// effort: remote references and misses keep the original tag.
    pub fn inline_assets(&self, markup: &str, base_dir: &Path) -> String {
        let markup = self
            .stylesheet_link_re
            .replace_all(markup, |caps: &Captures| {
                inline_or_keep(&caps[0], &caps[1], base_dir, "style")
            });
        self.script_src_re
            .replace_all(&markup, |caps: &Captures| {
                inline_or_keep(&caps[0], &caps[1], base_dir, "script")
            })
            .into_owned()
    }

    /// Produce an [`ExtractedPage`] from one page's markup: inline external
    /// stylesheet/script references first, then take the first body region
    /// and every inline style/script block's content in document order.
    pub fn extract_page(&self, markup: &str, base_dir: &Path) -> ExtractedPage {
        let markup = self.inline_assets(markup, base_dir);

        let body = self
            .body_re
            .captures(&markup)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();

        let styles = self
            .style_re
            .captures_iter(&markup)
            .map(|caps| caps[1].to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let scripts = self
            .script_re
            .captures_iter(&markup)
            .map(|caps| caps[1].to_string())
            .collect::<Vec<_>>()
            .join("\n");

        ExtractedPage {
            body,
            styles,
            scripts,
        }
    }

    /// First `<title>` text, if any.
    pub fn title(&self, markup: &str) -> Option<String> {
        self.title_re
            .captures(markup)
            .map(|caps| caps[1].trim().to_string())
            .filter(|title| !title.is_empty())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

fn inline_or_keep(tag: &str, reference: &str, base_dir: &Path, element: &str) -> String {
    if filter::is_remote(reference) {
        return tag.to_string();
    }

    let path = base_dir.join(reference);
    if !path.exists() {
        return tag.to_string();
    }

    match content::read_blocking(&path) {
        Ok(FileContent::Text(text)) => format!("<{element}>\n{text}\n</{element}>"),
        _ => tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_regions_in_document_order() {
        let markup = "<html><head>\
            <style>.a{}</style>\
            <script>let a = 1;</script>\
            </head><body><p>Hi</p>\
            <style>.b{}</style>\
            <script>let b = 2;</script>\
            </body></html>";

        let page = Extractor::new().extract_page(markup, Path::new("."));

        assert_eq!(page.body, "<p>Hi</p><style>.b{}</style><script>let b = 2;</script>");
        assert_eq!(page.styles, ".a{}\n.b{}");
        assert_eq!(page.scripts, "let a = 1;\nlet b = 2;");
    }

    #[test]
    fn missing_regions_are_empty() {
        let page = Extractor::new().extract_page("<p>no body tag</p>", Path::new("."));

        assert_eq!(page.body, "");
        assert_eq!(page.styles, "");
        assert_eq!(page.scripts, "");
    }

    #[test]
    fn inlines_existing_stylesheet_and_keeps_missing_link() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), ".slide{color:blue}").unwrap();

        let markup = "<link rel='stylesheet' href='style.css'>\
            <link rel='stylesheet' href='missing.css'>";
        let result = Extractor::new().inline_assets(markup, dir.path());

        assert!(result.contains("<style>\n.slide{color:blue}\n</style>"));
        assert!(!result.contains("href='style.css'"));
        assert!(result.contains("<link rel='stylesheet' href='missing.css'>"));
    }

    #[test]
    fn inlines_existing_script_and_skips_remote() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "let ready = true;").unwrap();

        let markup = "<script defer src='app.js'></script>\
            <script src='https://example.com/lib.js'></script>";
        let result = Extractor::new().inline_assets(markup, dir.path());

        assert!(result.contains("<script>\nlet ready = true;\n</script>"));
        assert!(result.contains("<script src='https://example.com/lib.js'></script>"));
    }

    #[test]
    fn inlined_blocks_join_the_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("extra.css"), ".x{}").unwrap();

        let markup = "<head><style>.own{}</style>\
            <link rel='stylesheet' href='extra.css'>\
            </head><body></body>";
        let page = Extractor::new().extract_page(markup, dir.path());

        assert_eq!(page.styles, ".own{}\n.x{}");
    }

    #[test]
    fn extracts_title() {
        let extractor = Extractor::new();

        assert_eq!(
            extractor.title("<head><title> My Deck </title></head>"),
            Some("My Deck".to_string())
        );
        assert_eq!(extractor.title("<head></head>"), None);
        assert_eq!(extractor.title("<title></title>"), None);
    }
}
