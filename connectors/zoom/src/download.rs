use chrono::TimeZone;
use futures::StreamExt;
use reqwest::Client;
use shared::sizeof_fmt;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::auth::issue_token;
use crate::config::{Credentials, DOWNLOAD_CHUNK_SIZE, TOKEN_ALGORITHM, TOKEN_TTL_SECONDS};
use crate::error::{Result, ZoomError};
use crate::models::RecordingFile;

const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H%M%S";
const FALLBACK_EXTENSION: &str = "bin";
const PARTIAL_SUFFIX: &str = ".part";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64 },
    Skipped,
}

/// Builds `YYYY-MM-DD_HHMMSS.<ext>` from the recording's start time in `tz`.
///
/// The start time must be UTC on the wire; anything else is rejected before
/// conversion. Colons are stripped from the result.
pub fn destination_name<Tz>(file: &RecordingFile, tz: &Tz) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start = file.recording_start_utc()?.with_timezone(tz);

    let extension = match file.file_type.trim() {
        "" => FALLBACK_EXTENSION.to_string(),
        ext => ext.to_lowercase(),
    };

    let name = format!("{}.{}", start.format(FILE_NAME_FORMAT), extension);
    Ok(name.replace(':', ""))
}

pub struct FileFetcher {
    client: Client,
    credentials: Credentials,
    output_dir: PathBuf,
}

impl FileFetcher {
    pub fn new(credentials: Credentials, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            credentials,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Downloads `file` to `<output_dir>/<destination_name>` unless a file of
    /// that name is already there.
    ///
    /// Bytes go to a `.part` sibling first and are renamed into place only once
    /// the whole body has been written, so an interrupted transfer never leaves
    /// a file that a later run would skip.
    pub async fn fetch_file(
        &self,
        file: &RecordingFile,
        destination_name: &str,
    ) -> Result<FetchOutcome> {
        let destination = self.output_dir.join(destination_name);

        if fs::try_exists(&destination).await? {
            info!("Skipping {}, already downloaded", destination_name);
            return Ok(FetchOutcome::Skipped);
        }

        info!(
            "Downloading {} ({})",
            destination_name,
            sizeof_fmt(file.file_size.into())
        );

        let partial = self
            .output_dir
            .join(format!("{}{}", destination_name, PARTIAL_SUFFIX));

        match self.stream_to(file, destination_name, &partial).await {
            Ok(bytes) => {
                fs::rename(&partial, &destination).await?;
                debug!("Wrote {} bytes to {}", bytes, destination.display());
                Ok(FetchOutcome::Downloaded { bytes })
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&partial).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            "Failed to remove partial file {}: {}",
                            partial.display(),
                            cleanup
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn stream_to(
        &self,
        file: &RecordingFile,
        destination_name: &str,
        partial: &Path,
    ) -> Result<u64> {
        let download_error = |message: String| ZoomError::Download {
            file: destination_name.to_string(),
            message,
        };

        let token = issue_token(&self.credentials, TOKEN_ALGORITHM, TOKEN_TTL_SECONDS)?;

        let response = self
            .client
            .get(&file.download_url)
            .query(&[("access_token", token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {}", status)));
        }

        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, File::create(partial).await?);
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error(format!("transfer interrupted: {}", e)))?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        Ok(written)
    }
}
