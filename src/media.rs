use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::{Captures, Regex};
use std::path::Path;
use tracing::warn;

use crate::content;
use crate::filter;

/// Media type from magic bytes, for files whose extension lies or is absent.
fn type_from_signature(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

/// Fallback extension table for the formats a presentation realistically
/// references.
fn type_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        _ => return None,
    };
    Some(media_type)
}

fn resolve_media_type(path: &Path, data: &[u8]) -> &'static str {
    type_from_signature(data)
        .or_else(|| type_from_extension(path))
        .unwrap_or("application/octet-stream")
}

/// Encode a file as a self-describing base64 data URI.
///
/// The whole file is base64-encoded in memory with no size limit, which is
/// why media embedding is opt-in.
pub fn data_uri(path: &Path) -> Result<String> {
    let data = content::read_blocking(path)?.into_bytes();
    let media_type = resolve_media_type(path, &data);
    Ok(format!("data:{};base64,{}", media_type, STANDARD.encode(&data)))
}

/// Rewrites `<img>` and `<video><source>` references to data URIs.
pub struct MediaEmbedder {
    img_re: Regex,
    video_re: Regex,
    img_src_re: Regex,
    source_src_re: Regex,
}

impl MediaEmbedder {
    pub fn new() -> Self {
        Self {
            img_re: Regex::new(r#"<img\s+[^>]*src=["']([^"']+)["'][^>]*>"#)
                .expect("img pattern should be valid"),
            video_re: Regex::new(
                r#"(?s)<video[^>]*>.*?<source[^>]*src=["']([^"']+)["'][^>]*>.*?</video>"#,
            )
            .expect("video pattern should be valid"),
            img_src_re: Regex::new(r#"(src=["'])[^"']+(["'])"#)
                .expect("src attribute pattern should be valid"),
            source_src_re: Regex::new(r#"(<source[^>]*?src=["'])[^"']+(["'])"#)
                .expect("source src pattern should be valid"),
        }
    }

    /// Replace relative local image/video sources with data URIs, leaving
    /// the rest of each tag intact. Remote and data URLs are skipped,
    /// missing files keep their tag, and per-resource encoding failures are
    /// logged and skipped.
    pub fn embed(&self, markup: &str, base_dir: &Path) -> String {
        let markup = self.img_re.replace_all(markup, |caps: &Captures| {
            rewrite_src(&self.img_src_re, &caps[0], &caps[1], base_dir)
        });
        self.video_re
            .replace_all(&markup, |caps: &Captures| {
                rewrite_src(&self.source_src_re, &caps[0], &caps[1], base_dir)
            })
            .into_owned()
    }
}

impl Default for MediaEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

fn rewrite_src(src_re: &Regex, tag: &str, reference: &str, base_dir: &Path) -> String {
    if filter::is_remote(reference) {
        return tag.to_string();
    }

    let path = base_dir.join(reference);
    if !path.exists() {
        return tag.to_string();
    }

    match data_uri(&path) {
        Ok(uri) => src_re
            .replace(tag, |caps: &Captures| {
                format!("{}{}{}", &caps[1], uri, &caps[2])
            })
            .into_owned(),
        Err(e) => {
            warn!("Could not embed {}: {}", path.display(), e);
            tag.to_string()
        }
    }
}
