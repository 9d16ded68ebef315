//! Walk the remote folders and back up every selected message.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset};
use indicatif::ProgressBar;
use std::fs;

use crate::cli::Settings;
use crate::organise::message_file_name;

/// One message fetched from the server.
#[derive(Debug, Clone)]
pub struct Message {
    pub uid: u32,
    pub date: DateTime<FixedOffset>,
    /// Full RFC 822 source.
    pub raw: Vec<u8>,
}

/// The operations the backup needs from a mail server connection.
pub trait MailClient {
    /// Full names of every personal folder.
    fn folders(&mut self) -> Result<Vec<String>>;

    fn uids(&mut self, folder: &str) -> Result<Vec<u32>>;

    fn fetch(&mut self, folder: &str, uid: u32) -> Result<Message>;

    /// Move message `uid` from `folder` into `destination`.
    fn move_to(&mut self, folder: &str, uid: u32, destination: &str) -> Result<()>;
}

/// Accepts messages dated at or before `now - days`.
#[derive(Debug, Clone, Copy)]
pub struct AgeFilter {
    before: DateTime<FixedOffset>,
}

impl AgeFilter {
    pub fn new(days: u32, now: DateTime<FixedOffset>) -> Self {
        Self {
            before: now - Duration::days(i64::from(days)),
        }
    }

    pub fn accepts(&self, date: &DateTime<FixedOffset>) -> bool {
        *date <= self.before
    }
}

/// Counts gathered over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub folders: usize,
    pub messages: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub moved: usize,
    pub skipped_by_age: usize,
}

fn create_progress_bar(show: bool, len: usize) -> ProgressBar {
    if show {
        ProgressBar::new(len as u64)
    } else {
        ProgressBar::hidden()
    }
}

/// Back up every folder selected by `settings`.
pub fn run<C>(
    client: &mut C,
    settings: &Settings,
    now: DateTime<FixedOffset>,
    show_progress: bool,
) -> Result<Summary>
where
    C: MailClient + ?Sized,
{
    if settings.download {
        fs::create_dir_all(&settings.output_dir).with_context(|| {
            format!(
                "failed to create output directory: {}",
                settings.output_dir.display()
            )
        })?;
    }

    let age_filter = settings.min_age_days.map(|days| AgeFilter::new(days, now));
    let remote = settings.remote_organisation();

    tracing::info!("discovering folders");
    let folders = client.folders().context("failed to list folders")?;
    let folders = settings.folder_filter.select(folders);

    let action = if settings.download {
        "downloading"
    } else {
        "iterating"
    };
    let mut summary = Summary {
        folders: folders.len(),
        ..Summary::default()
    };

    for (index, folder) in folders.iter().enumerate() {
        let uids = client
            .uids(folder)
            .with_context(|| format!("failed to list messages in folder '{folder}'"))?;
        tracing::info!(
            "{action} {} items from folder '{folder}' ({}/{})",
            uids.len(),
            index + 1,
            folders.len()
        );

        let progress = create_progress_bar(show_progress, uids.len());
        for uid in uids {
            progress.inc(1);
            let message = client
                .fetch(folder, uid)
                .with_context(|| format!("failed to fetch message {uid} from '{folder}'"))?;
            summary.messages += 1;

            if let Some(filter) = &age_filter {
                if !filter.accepts(&message.date) {
                    tracing::debug!("message {uid} in '{folder}' is too recent");
                    summary.skipped_by_age += 1;
                    continue;
                }
            }

            if let Some(destination) = remote.apply(folder, &message.date) {
                if destination != *folder {
                    client
                        .move_to(folder, uid, &destination)
                        .with_context(|| {
                            format!("failed to move message {uid} from '{folder}' to '{destination}'")
                        })?;
                    summary.moved += 1;
                }
            }

            if settings.download {
                if store(settings, folder, &message)? {
                    summary.downloaded += 1;
                } else {
                    summary.already_present += 1;
                }
            }
        }
        progress.finish_and_clear();
    }

    Ok(summary)
}

/// Write `message` under the output directory. Returns `false` when the file
/// was already there.
fn store(settings: &Settings, folder: &str, message: &Message) -> Result<bool> {
    let dir = settings
        .local_organisation
        .apply(&settings.output_dir, folder, &message.date);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = dir.join(message_file_name(message.uid));
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, &message.raw)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
