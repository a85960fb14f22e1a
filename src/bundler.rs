use anyhow::{anyhow, Result};
use colored::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::content::{self, FileContent};
use crate::extract::{ExtractedPage, Extractor};
use crate::filter::PathFilter;
use crate::media::MediaEmbedder;

/// Default output filename; also on the discovery denylist.
pub const DEFAULT_OUTPUT: &str = "presentation-bundled.html";

const SHELL_FILE: &str = "main.html";
const SHARED_STYLESHEET: &str = "shared-styles.css";
const SHARED_SCRIPT: &str = "animation-utils.js";
const TITLE_FILE: &str = "title.html";
const SECTIONS_DIR: &str = "sections";

const FALLBACK_TITLE: &str = "Presentation";

/// Walks the fixed presentation layout and assembles the bundle in a single
/// forward pass.
pub struct Bundler {
    root: PathBuf,
    output: PathBuf,
    embed_media: bool,
    filter: PathFilter,
    extractor: Extractor,
    embedder: MediaEmbedder,
}

impl Bundler {
    pub fn new(root: PathBuf, output: PathBuf, embed_media: bool) -> Self {
        let filter = PathFilter::new(&output);
        Self {
            root,
            output,
            embed_media,
            filter,
            extractor: Extractor::new(),
            embedder: MediaEmbedder::new(),
        }
    }

    pub async fn run(&self) -> Result<()> {
        info!(
            "Bundling presentation from \"{}\"",
            self.root.display().to_string().green()
        );
        info!("Output: {}", self.output.display().to_string().blue());
        info!("Embed media: {}", self.embed_media);

        let shell_path = self.root.join(SHELL_FILE);
        if !shell_path.exists() {
            error!("{} not found!", shell_path.display().to_string().red());
            return Ok(());
        }

        let shell_markup = content::read(&shell_path)
            .await?
            .into_text()
            .ok_or_else(|| anyhow!("{} is not valid UTF-8", shell_path.display()))?;

        let shared_css = self.read_shared(SHARED_STYLESHEET).await?;
        let shared_js = self.read_shared(SHARED_SCRIPT).await?;

        let mut pages = self.discover_sections().await?;

        let title_path = self.root.join(TITLE_FILE);
        if title_path.exists() {
            if let Some(markup) = content::read(&title_path).await?.into_text() {
                pages.insert(TITLE_FILE.to_string(), self.extract(&markup, &self.root));
                info!("Processed: {}", TITLE_FILE.blue());
            }
        }

        let shell_page = self.extract(&shell_markup, &self.root);
        let document = self.assemble(&shell_markup, &shell_page, &shared_css, &shared_js, &pages)?;

        fs::write(&self.output, &document)
            .await
            .map_err(|e| anyhow!("Failed to write bundle to {}: {}", self.output.display(), e))?;

        let size_mb = document.len() as f64 / (1024.0 * 1024.0);
        info!(
            "Bundle created: {} ({:.2} MB)",
            self.output.display().to_string().green(),
            size_mb
        );

        if !self.embed_media {
            warn!("Images and videos are still referenced as external files; re-run with --embed-media to inline them");
        }

        Ok(())
    }

    /// Read an optional shared asset at the presentation root. Missing and
    /// non-text files are treated as absent.
    async fn read_shared(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(String::new());
        }

        match content::read(&path).await? {
            FileContent::Text(text) => {
                info!("Inlined {} ({} bytes)", name.blue(), text.len());
                Ok(text)
            }
            FileContent::Binary(_) => Ok(String::new()),
        }
    }

    /// Recursively collect every `.html` page under the sections directory,
    /// keyed by its path relative to the presentation root. A BTreeMap keeps
    /// the emitted page map independent of directory enumeration order.
    async fn discover_sections(&self) -> Result<BTreeMap<String, ExtractedPage>> {
        let mut pages = BTreeMap::new();

        let sections_dir = self.root.join(SECTIONS_DIR);
        if !sections_dir.exists() {
            return Ok(pages);
        }

        for entry in WalkDir::new(&sections_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            if self.filter.is_excluded(path) {
                continue;
            }

            let markup = match content::read(path).await? {
                FileContent::Text(text) => text,
                FileContent::Binary(_) => continue,
            };

            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            let base_dir = path.parent().unwrap_or(&self.root);
            pages.insert(relative.clone(), self.extract(&markup, base_dir));
            info!("Processed: {}", relative.blue());
        }

        Ok(pages)
    }

    fn extract(&self, markup: &str, base_dir: &Path) -> ExtractedPage {
        let mut page = self.extractor.extract_page(markup, base_dir);
        if self.embed_media {
            page.body = self.embedder.embed(&page.body, base_dir);
        }
        page
    }

    /// Concatenate the bundle in fixed order: preamble, shared stylesheet,
    /// shell styles, shell body, shared script, generated page map, shell
    /// scripts.
    fn assemble(
        &self,
        shell_markup: &str,
        shell: &ExtractedPage,
        shared_css: &str,
        shared_js: &str,
        pages: &BTreeMap<String, ExtractedPage>,
    ) -> Result<String> {
        let title = self
            .extractor
            .title(shell_markup)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        // "</" would terminate the surrounding script element mid-payload
        let pages_json = serde_json::to_string_pretty(pages)
            .map_err(|e| anyhow!("Failed to serialize page map: {}", e))?
            .replace("</", r"<\/");

        let mut document = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{shared_css}
    </style>
"#
        );

        if !shell.styles.is_empty() {
            document.push_str(&format!("    <style>\n{}\n    </style>\n", shell.styles));
        }

        document.push_str("</head>\n<body>\n");
        document.push_str(&shell.body);
        document.push('\n');

        if !shared_js.is_empty() {
            document.push_str(&format!("    <script>\n{shared_js}\n    </script>\n"));
        }

        document.push_str(&format!(
            "    <script>\nconst bundledPages = {pages_json};\n    </script>\n"
        ));

        if !shell.scripts.is_empty() {
            document.push_str(&format!("    <script>\n{}\n    </script>\n", shell.scripts));
        }

        document.push_str("</body>\n</html>\n");

        Ok(document)
    }
}
