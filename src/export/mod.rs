use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use fs_err as fs;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::history::{HistoryEntry, SessionHistory};
use crate::wire::{ContentKind, GenerationResult, RequestSummary};

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

const STAMP: &str = "%Y%m%d_%H%M";

/// Lower-case a name segment and collapse everything but letters and
/// digits (any script) to `_`.
pub fn slug(s: &str) -> String {
    let lower = s.to_lowercase();
    NON_ALNUM.replace_all(&lower, "_").trim_matches('_').to_string()
}

fn segment(s: &str, fallback: &str) -> String {
    let out = slug(s);
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

pub fn result_filename(req: &RequestSummary, at: DateTime<Local>) -> String {
    let stamp = at.format(STAMP);
    let platform = segment(&req.platform, "platform");
    let label = segment(&req.label, "content");
    match req.kind {
        ContentKind::SocialPost => format!("{platform}_{label}_{stamp}.txt"),
        ContentKind::VideoScript => format!("video_script_{platform}_{stamp}.txt"),
        ContentKind::SeoArticle => format!("seo_{label}_{stamp}.txt"),
    }
}

pub fn history_filename(at: DateTime<Local>) -> String {
    format!("content_history_{}.txt", at.format(STAMP))
}

fn entry_header(e: &HistoryEntry) -> String {
    format!(
        "{} - {} - {} - {} ({})",
        e.request.kind.label(),
        e.request.platform,
        e.request.label,
        e.request.topic,
        e.created_at.format("%Y-%m-%d %H:%M"),
    )
}

fn entry_body(e: &HistoryEntry) -> String {
    match &e.result {
        GenerationResult::Generated { text } => text.trim_end().to_string(),
        GenerationResult::Failed(f) => format!("ERROR [{:?}]: {}", f.kind, f.message),
    }
}

/// Whole history as one plain-text document, oldest entry first.
pub fn render_history(history: &SessionHistory) -> String {
    let mut out = String::new();
    for (i, e) in history.list_all().iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&format!("=== {}. {} ===\n\n", i + 1, entry_header(e)));
        out.push_str(&entry_body(e));
    }
    out.push('\n');
    out
}

/// Avoid clobbering an earlier export from the same minute.
fn free_path(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, "txt"));
    (2..)
        .map(|n| dir.join(format!("{stem}_{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Write the generated text of a successful entry. Failed attempts have
/// nothing to export and return `None`.
pub fn save_result(dir: &Path, entry: &HistoryEntry) -> anyhow::Result<Option<PathBuf>> {
    let Some(text) = entry.result.text() else {
        return Ok(None);
    };
    fs::create_dir_all(dir)?;
    let path = free_path(dir, &result_filename(&entry.request, entry.created_at));
    fs::write(&path, text)?;
    tracing::info!(path = %path.display(), "result exported");
    Ok(Some(path))
}

pub fn save_history(dir: &Path, history: &SessionHistory, at: DateTime<Local>) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = free_path(dir, &history_filename(at));
    fs::write(&path, render_history(history))?;
    tracing::info!(path = %path.display(), entries = history.len(), "history exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 4, 9, 7, 0).unwrap()
    }

    fn summary(kind: ContentKind, platform: &str, label: &str) -> RequestSummary {
        RequestSummary { kind, platform: platform.into(), label: label.into(), topic: "t".into() }
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("Twitter/X"), "twitter_x");
        assert_eq!(slug("Tips & Best Practices"), "tips_best_practices");
        assert_eq!(slug("  FAQ/Q&A  "), "faq_q_a");
    }

    #[test]
    fn non_ascii_names_keep_their_letters() {
        assert_eq!(slug("小红书"), "小红书");
        assert_eq!(
            result_filename(&summary(ContentKind::SocialPost, "小红书", "Вирусный"), at()),
            "小红书_вирусный_20250304_0907.txt"
        );
        assert_eq!(
            result_filename(&summary(ContentKind::SocialPost, "🚀", "✨"), at()),
            "platform_content_20250304_0907.txt"
        );
    }

    #[test]
    fn filenames_per_kind() {
        assert_eq!(
            result_filename(&summary(ContentKind::SocialPost, "LinkedIn", "Educational Post"), at()),
            "linkedin_educational_post_20250304_0907.txt"
        );
        assert_eq!(
            result_filename(&summary(ContentKind::VideoScript, "Instagram Reels", "Product Demo"), at()),
            "video_script_instagram_reels_20250304_0907.txt"
        );
        assert_eq!(
            result_filename(&summary(ContentKind::SeoArticle, "Website/Blog", "How-To Guide"), at()),
            "seo_how_to_guide_20250304_0907.txt"
        );
        assert_eq!(history_filename(at()), "content_history_20250304_0907.txt");
    }
}
