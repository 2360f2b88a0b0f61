//! Rulebook text for a model's context window.
//!
//! Everything in the SRD directory except the three chapters served through
//! lookup tools is concatenated, each file labeled with its relative path.

use crate::config::SrdConfig;
use crate::corpus::read_source;
use crate::error::SrdError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One rulebook file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesDocument {
    /// Path relative to the SRD directory, `/`-separated.
    pub label: String,
    pub text: String,
}

/// The non-tool-backed rulebook chapters, in file-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesContext {
    documents: Vec<RulesDocument>,
}

impl RulesContext {
    /// Collect every rulebook chapter under the configured SRD directory.
    ///
    /// Unreadable directories or files are logged and skipped.
    pub async fn load(config: &SrdConfig) -> Self {
        let mut documents = Vec::new();
        for path in markdown_files(config) {
            match read_source(&path).await {
                Ok(text) => documents.push(RulesDocument {
                    label: relative_label(&config.srd_dir, &path),
                    text,
                }),
                Err(err) => tracing::warn!(error = %err, "skipping unreadable rules file"),
            }
        }

        tracing::info!(documents = documents.len(), "loaded rules context");
        Self { documents }
    }

    pub fn documents(&self) -> &[RulesDocument] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents concatenated, each introduced by a blank line, a
    /// `--- <label> ---` line and another blank line.
    pub fn render(&self) -> String {
        self.documents
            .iter()
            .map(|doc| format!("\n\n--- {} ---\n\n{}", doc.label, doc.text))
            .collect()
    }
}

fn markdown_files(config: &SrdConfig) -> Vec<PathBuf> {
    WalkDir::new(&config.srd_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %SrdError::from(err), "skipping SRD directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .filter(|path| !config.is_tool_backed(path))
        .collect()
}

fn relative_label(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
