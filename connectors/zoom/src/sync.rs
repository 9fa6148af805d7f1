use chrono::{Local, NaiveDate, TimeZone};
use shared::sizeof_fmt;
use std::fmt::Display;
use tracing::info;

use crate::client::ZoomClient;
use crate::config::{SyncSettings, ZoomConnectorConfig};
use crate::download::{destination_name, FetchOutcome, FileFetcher};
use crate::error::Result;
use crate::models::{date_windows, Meeting};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub meetings: usize,
    pub files: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub bytes_downloaded: u64,
}

pub struct SyncManager {
    client: ZoomClient,
    fetcher: FileFetcher,
    settings: SyncSettings,
}

impl SyncManager {
    pub fn new(config: &ZoomConnectorConfig) -> Self {
        Self::with_parts(
            ZoomClient::new(&config.base_url, config.credentials.clone()),
            FileFetcher::new(config.credentials.clone(), config.output_dir.clone()),
            config.sync,
        )
    }

    pub fn with_parts(client: ZoomClient, fetcher: FileFetcher, settings: SyncSettings) -> Self {
        Self {
            client,
            fetcher,
            settings,
        }
    }

    /// Resolves the account and lists every configured window ending at
    /// `today`, most recent window first.
    pub async fn list_recordings(&self, today: NaiveDate) -> Result<Vec<Meeting>> {
        let profile = self.client.get_user_profile().await?;
        info!("Logged in as {}", profile.display_name());

        let windows = date_windows(
            today,
            self.settings.window_count,
            self.settings.window_size_days,
        );

        let meetings = self
            .client
            .list_recordings(&profile.id, &windows, self.settings.page_size)
            .await?;

        let files = meetings.iter().map(|m| m.recording_files.len()).sum::<usize>();
        let total_bytes = meetings
            .iter()
            .flat_map(|m| m.recording_files.iter())
            .map(|f| f.file_size)
            .sum::<u64>();

        info!(
            "Found {} meetings with {} recording files ({})",
            meetings.len(),
            files,
            sizeof_fmt(total_bytes.into())
        );

        Ok(meetings)
    }

    /// One full pass using the machine's local date and time zone.
    pub async fn run(&self) -> Result<SyncSummary> {
        self.run_at(Local::now().date_naive(), &Local).await
    }

    pub async fn run_at<Tz>(&self, today: NaiveDate, tz: &Tz) -> Result<SyncSummary>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let meetings = self.list_recordings(today).await?;

        let mut summary = SyncSummary {
            meetings: meetings.len(),
            ..Default::default()
        };

        for meeting in &meetings {
            info!(
                "Meeting {} ({}): {} files",
                meeting.id,
                meeting.topic.as_deref().unwrap_or("untitled"),
                meeting.recording_files.len()
            );

            for file in &meeting.recording_files {
                let name = destination_name(file, tz)?;
                summary.files += 1;

                match self.fetcher.fetch_file(file, &name).await? {
                    FetchOutcome::Downloaded { bytes } => {
                        summary.downloaded += 1;
                        summary.bytes_downloaded += bytes;
                    }
                    FetchOutcome::Skipped => summary.skipped += 1,
                }
            }
        }

        info!(
            "Sync complete: {} downloaded ({}), {} skipped, {} files in {} meetings",
            summary.downloaded,
            sizeof_fmt(summary.bytes_downloaded.into()),
            summary.skipped,
            summary.files,
            summary.meetings
        );

        Ok(summary)
    }
}
