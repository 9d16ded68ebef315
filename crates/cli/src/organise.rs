//! Where messages end up, locally and on the server.

use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, FixedOffset};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::folders::{combine, to_local_path};

/// Layout of downloaded messages under the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LocalOrganisation {
    /// `<output>/<folder>`
    FollowFolderStructure,
    /// `<output>/<year>/<folder>`, unless the folder already starts with the
    /// message year.
    #[default]
    DatedFolderStructure,
}

impl LocalOrganisation {
    pub const ALL: [LocalOrganisation; 2] = [
        LocalOrganisation::FollowFolderStructure,
        LocalOrganisation::DatedFolderStructure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FollowFolderStructure => "FollowFolderStructure",
            Self::DatedFolderStructure => "DatedFolderStructure",
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::as_str)
    }

    /// Local directory for a message from `folder` dated `date`.
    pub fn apply(self, output: &Path, folder: &str, date: &DateTime<FixedOffset>) -> PathBuf {
        let folder_path = to_local_path(folder);
        match self {
            Self::FollowFolderStructure => output.join(folder_path),
            Self::DatedFolderStructure => {
                let year = date.year().to_string();
                if folder_path.to_string_lossy().starts_with(&year) {
                    output.join(folder_path)
                } else {
                    output.join(year).join(folder_path)
                }
            }
        }
    }
}

impl fmt::Display for LocalOrganisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocalOrganisation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::ALL.into_iter().find(|o| o.as_str() == s) {
            Some(org) => Ok(org),
            None => bail!("unknown local organisation strategy: {s}"),
        }
    }
}

/// Whether and where messages are moved on the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum RemoteOrganisation {
    /// Leave messages where they are.
    #[default]
    Preserve,
    /// Move messages under `<home>/<year>/<folder>`.
    Dated { home: String },
}

impl RemoteOrganisation {
    /// Destination folder for a message currently in `folder`, or `None` when
    /// it should stay.
    pub fn apply(&self, folder: &str, date: &DateTime<FixedOffset>) -> Option<String> {
        match self {
            Self::Preserve => None,
            Self::Dated { home } => {
                let year = date.year().to_string();
                let base = combine(&[home.as_str(), year.as_str()]);
                if folder.starts_with(&base) {
                    return None;
                }
                Some(combine(&[base.as_str(), folder]))
            }
        }
    }
}

/// File name for a downloaded message.
pub fn message_file_name(uid: u32) -> String {
    format!("{uid}.eml")
}
