//! Export of a completed run as a text or markdown document.
//!
//! Stages are rendered in registry order; a stage with no recorded result
//! is skipped. Rendering is deterministic: the same results always produce
//! byte-identical output.

use crate::pipeline::session::SessionResults;
use crate::stage;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Output renderings for an exported run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    PlainText,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::PlainText => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            ExportFormat::PlainText => "\n\n==============================\n\n",
            ExportFormat::Markdown => "\n\n---\n\n",
        }
    }
}

/// Renders the run in the requested format.
pub fn render(title: &str, results: &SessionResults, format: ExportFormat) -> String {
    let mut document = match format {
        ExportFormat::PlainText => format!("TITLE: {title}\n\n"),
        ExportFormat::Markdown => format!("# {title}\n\n"),
    };
    for stage in stage::registry() {
        if let Some(text) = results.get(stage.slot) {
            match format {
                ExportFormat::PlainText => {
                    let _ = writeln!(document, "{}", stage.label.to_uppercase());
                }
                ExportFormat::Markdown => {
                    let _ = writeln!(document, "## {}", stage.label);
                }
            }
            document.push_str(text);
            document.push_str(format.separator());
        }
    }
    document
}

/// Download-style file name: non-alphanumeric characters replaced with
/// underscores, lower-cased.
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.{}", format.extension())
}

/// Writes the rendered document into `dir`, returning the path written.
pub async fn write_export(
    dir: &Path,
    title: &str,
    results: &SessionResults,
    format: ExportFormat,
) -> Result<PathBuf> {
    let path = dir.join(export_filename(title, format));
    tokio::fs::write(&path, render(title, results, format))
        .await
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> SessionResults {
        let mut results = SessionResults::default();
        results.insert("script", "the script".to_string());
        results.insert("storyboard", "the storyboard".to_string());
        results.insert("seo", "the seo".to_string());
        results
    }

    #[test]
    fn test_markdown_rendering() {
        let document = render("My Title", &results(), ExportFormat::Markdown);
        assert!(document.starts_with("# My Title\n\n"));
        assert!(document.contains("## Script\nthe script"));
        assert!(document.contains("## Storyboard\nthe storyboard"));
        assert!(document.contains("## SEO Assets\nthe seo"));
        assert!(document.contains("\n\n---\n\n"));
    }

    #[test]
    fn test_plain_text_rendering() {
        let document = render("My Title", &results(), ExportFormat::PlainText);
        assert!(document.starts_with("TITLE: My Title\n\n"));
        assert!(document.contains("SCRIPT\nthe script"));
        assert!(!document.contains("VOICE AI"));
        assert!(document.contains("\n\n==============================\n\n"));
    }

    #[test]
    fn test_stages_without_results_are_skipped_in_order() {
        let document = render("t", &results(), ExportFormat::Markdown);
        let script = document.find("## Script").unwrap();
        let storyboard = document.find("## Storyboard").unwrap();
        let seo = document.find("## SEO Assets").unwrap();
        assert!(script < storyboard && storyboard < seo);
        assert!(!document.contains("## Voice AI"));
        assert!(!document.contains("## Thumbnails"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let results = results();
        for format in [ExportFormat::PlainText, ExportFormat::Markdown] {
            assert_eq!(render("t", &results, format), render("t", &results, format));
        }
    }

    #[test]
    fn test_export_filename_sanitization() {
        assert_eq!(
            export_filename("Why You're Always Broke", ExportFormat::PlainText),
            "why_you_re_always_broke.txt"
        );
        assert_eq!(
            export_filename("Tiền & Đời 2024", ExportFormat::Markdown),
            "ti_n_____i_2024.md"
        );
    }

    #[tokio::test]
    async fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), "My Title", &results(), ExportFormat::Markdown)
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "my_title.md");
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, render("My Title", &results(), ExportFormat::Markdown));
    }
}
