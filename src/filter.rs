use regex::Regex;
use std::path::Path;
use url::Url;

/// Path patterns that are never bundled: version-control and dependency
/// directories, caches, documentation files, and the default output file.
const EXCLUDED_PATTERNS: &[&str] = &[
    r"\.git",
    r"node_modules",
    r"__pycache__",
    r"\.md$",
    r"presentation-bundled\.html",
];

/// Decides which discovered paths must be skipped.
#[derive(Debug)]
pub struct PathFilter {
    exclude_regexes: Vec<Regex>,
}

impl PathFilter {
    /// Build the filter from the fixed denylist plus the configured output
    /// filename, so a bundle is never bundled into itself.
    pub fn new(output: &Path) -> Self {
        let mut exclude_regexes: Vec<Regex> = EXCLUDED_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("Built-in exclude patterns should be valid"))
            .collect();

        if let Some(name) = output.file_name().and_then(|n| n.to_str()) {
            let escaped = regex::escape(name);
            exclude_regexes
                .push(Regex::new(&escaped).expect("Escaped filename should be a valid pattern"));
        }

        Self { exclude_regexes }
    }

    /// Whether a path must be skipped during discovery.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude_regexes.iter().any(|re| re.is_match(&path_str))
    }
}

/// Whether a reference is an absolute URL (`http:`, `https:`, `data:`, ...)
/// that must never be resolved against the local filesystem.
pub fn is_remote(reference: &str) -> bool {
    Url::parse(reference).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_fixed_patterns() {
        let filter = PathFilter::new(Path::new("presentation-bundled.html"));

        assert!(filter.is_excluded(Path::new("deck/.git/config")));
        assert!(filter.is_excluded(Path::new("deck/node_modules/pkg/index.html")));
        assert!(filter.is_excluded(Path::new("deck/sections/__pycache__/mod.html")));
        assert!(filter.is_excluded(Path::new("deck/sections/NOTES.md")));
        assert!(filter.is_excluded(Path::new("deck/presentation-bundled.html")));

        assert!(!filter.is_excluded(Path::new("deck/sections/01-intro.html")));
        assert!(!filter.is_excluded(Path::new("deck/sections/markdown-tips.html")));
    }

    #[test]
    fn excludes_configured_output_file() {
        let filter = PathFilter::new(Path::new("out/deck (final).html"));

        assert!(filter.is_excluded(Path::new("deck (final).html")));
        assert!(filter.is_excluded(Path::new("sections/deck (final).html")));
        assert!(!filter.is_excluded(Path::new("sections/deck.html")));
    }

    #[test]
    fn remote_references() {
        assert!(is_remote("https://example.com/style.css"));
        assert!(is_remote("http://example.com/app.js"));
        assert!(is_remote("data:image/png;base64,AAAA"));

        assert!(!is_remote("style.css"));
        assert!(!is_remote("../shared/app.js"));
        // Protocol-relative references have no scheme and stay untouched
        assert!(!is_remote("//cdn.example.com/lib.js"));
    }
}
