//! Remote folder names and folder selection.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::PathBuf;

/// Separator used in remote folder names.
pub const REMOTE_SEPARATOR: char = '/';

/// Join remote folder name parts, skipping empty ones.
pub fn combine<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(&REMOTE_SEPARATOR.to_string())
}

/// Map a remote folder name such as `Archive/2021` onto a relative local path.
pub fn to_local_path(remote: &str) -> PathBuf {
    remote
        .split(REMOTE_SEPARATOR)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Include/exclude patterns applied to full remote folder names.
#[derive(Debug, Clone, Default)]
pub struct FolderFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl FolderFilter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self> {
        let compile = |pattern: Option<&str>, what: &str| -> Result<Option<Regex>> {
            pattern
                .map(|p| {
                    Regex::new(p).with_context(|| format!("invalid {what} folder pattern: {p}"))
                })
                .transpose()
        };
        Ok(Self {
            include: compile(include, "include")?,
            exclude: compile(exclude, "exclude")?,
        })
    }

    /// Whether `folder` should be backed up.
    pub fn accepts(&self, folder: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.is_match(folder) {
                tracing::info!("skipping folder '{folder}', did not match the include filter");
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(folder) {
                tracing::info!("skipping folder '{folder}', matched the exclude filter");
                return false;
            }
        }
        true
    }

    /// Keep the accepted folders, preserving order.
    pub fn select(&self, folders: Vec<String>) -> Vec<String> {
        folders.into_iter().filter(|f| self.accepts(f)).collect()
    }
}
