use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::auth::issue_token;
use crate::config::{Credentials, TOKEN_ALGORITHM, TOKEN_TTL_SECONDS};
use crate::error::{Result, ZoomError};
use crate::models::{DateWindow, Meeting, RecordingsResponse, UserProfile, UserProfileResponse};

pub struct ZoomClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl ZoomClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn bearer(&self) -> Result<String> {
        let token = issue_token(&self.credentials, TOKEN_ALGORITHM, TOKEN_TTL_SECONDS)?;
        Ok(format!("Bearer {}", token))
    }

    /// Looks up the configured account by email and returns its profile.
    pub async fn get_user_profile(&self) -> Result<UserProfile> {
        let url = format!("{}/users/{}", self.base_url, self.credentials.account_email);
        debug!("Fetching user profile from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer()?)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZoomError::Authentication(format!(
                "Profile lookup returned HTTP {}: {}",
                status, body
            )));
        }

        let raw: UserProfileResponse = response.json().await.map_err(|e| {
            ZoomError::Authentication(format!("Unexpected profile response: {}", e))
        })?;

        UserProfile::try_from(raw)
    }

    /// Requests one page of recordings for `window`. Any non-2xx status is
    /// fatal for the run.
    pub async fn list_recordings_window(
        &self,
        user_id: &str,
        window: &DateWindow,
        page_size: u32,
    ) -> Result<RecordingsResponse> {
        let url = format!("{}/users/{}/recordings", self.base_url, user_id);
        let listing_error = |message: String| ZoomError::Listing {
            window: window.to_string(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer()?)
            .header("Accept", "application/json")
            .query(&[
                ("from", window.from_param()),
                ("to", window.to_param()),
                ("page_size", page_size.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(listing_error(format!(
                "authentication rejected ({}): {}",
                status, body
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(listing_error(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        debug!("Recordings response for {}: {}", window, body);

        serde_json::from_str(&body)
            .map_err(|e| listing_error(format!("failed to parse response: {}", e)))
    }

    /// Lists every window in order and concatenates the meetings. Only the
    /// first page of each window is read.
    pub async fn list_recordings(
        &self,
        user_id: &str,
        windows: &[DateWindow],
        page_size: u32,
    ) -> Result<Vec<Meeting>> {
        let mut meetings = Vec::new();

        for window in windows {
            let response = self
                .list_recordings_window(user_id, window, page_size)
                .await?;

            if response.has_more_pages() {
                warn!(
                    "Window {} has more than {} meetings; only the first page is downloaded",
                    window, page_size
                );
            }

            info!(
                "Found {} meetings between {} and {}",
                response.meetings.len(),
                window.from_param(),
                window.to_param()
            );
            meetings.extend(response.meetings);
        }

        Ok(meetings)
    }
}
