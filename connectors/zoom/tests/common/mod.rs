#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value as JsonValue};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};

use zoom_recordings_connector::client::ZoomClient;
use zoom_recordings_connector::config::{Credentials, SyncSettings};
use zoom_recordings_connector::download::FileFetcher;
use zoom_recordings_connector::sync::SyncManager;

pub const ACCOUNT_EMAIL: &str = "host@example.com";
pub const API_KEY: &str = "mock-api-key";
pub const API_SECRET: &str = "mock-api-secret";
pub const USER_ID: &str = "u-42";

#[derive(Debug, Clone)]
pub struct RecordedListing {
    pub user_id: String,
    pub from: String,
    pub to: String,
    pub page_size: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordedDownload {
    pub file_id: String,
    pub access_token: Option<String>,
}

#[derive(Default)]
struct MockData {
    profile_status: Option<StatusCode>,
    profile_body: Option<JsonValue>,
    profile_requests: Vec<Option<String>>,
    meetings_by_from: HashMap<String, JsonValue>,
    page_token_by_from: HashMap<String, String>,
    failing_windows: HashSet<String>,
    listings: Vec<RecordedListing>,
    files: HashMap<String, Vec<u8>>,
    failing_files: HashSet<String>,
    downloads: Vec<RecordedDownload>,
}

type SharedData = Arc<Mutex<MockData>>;

/// In-process stand-in for the Zoom REST API.
pub struct MockZoomApi {
    pub base_url: String,
    data: SharedData,
    _server_handle: tokio::task::JoinHandle<()>,
}

impl MockZoomApi {
    pub async fn start() -> anyhow::Result<Self> {
        let data: SharedData = Arc::new(Mutex::new(MockData::default()));

        let app = Router::new()
            .route("/v2/users/:id", get(handle_profile))
            .route("/v2/users/:id/recordings", get(handle_recordings))
            .route("/download/:file_id", get(handle_download))
            .with_state(data.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        sleep(Duration::from_millis(50)).await;

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            data,
            _server_handle: server_handle,
        })
    }

    pub fn api_base_url(&self) -> String {
        format!("{}/v2", self.base_url)
    }

    pub fn download_url(&self, file_id: &str) -> String {
        format!("{}/download/{}", self.base_url, file_id)
    }

    pub fn set_profile_response(&self, status: StatusCode, body: JsonValue) {
        let mut data = self.data.lock().unwrap();
        data.profile_status = Some(status);
        data.profile_body = Some(body);
    }

    /// Registers a recording file served at `/download/{file_id}` and returns
    /// its JSON entry for a listing response.
    pub fn add_file(&self, file_id: &str, file_type: &str, start: &str, body: Vec<u8>) -> JsonValue {
        let entry = json!({
            "id": file_id,
            "download_url": self.download_url(file_id),
            "file_type": file_type,
            "file_size": body.len(),
            "recording_start": start,
            "recording_type": "shared_screen_with_speaker_view"
        });
        self.data
            .lock()
            .unwrap()
            .files
            .insert(file_id.to_string(), body);
        entry
    }

    pub fn set_window_meetings(&self, from: &str, meetings: JsonValue) {
        self.data
            .lock()
            .unwrap()
            .meetings_by_from
            .insert(from.to_string(), meetings);
    }

    pub fn set_window_page_token(&self, from: &str, token: &str) {
        self.data
            .lock()
            .unwrap()
            .page_token_by_from
            .insert(from.to_string(), token.to_string());
    }

    pub fn fail_window(&self, from: &str) {
        self.data
            .lock()
            .unwrap()
            .failing_windows
            .insert(from.to_string());
    }

    pub fn fail_file(&self, file_id: &str) {
        self.data
            .lock()
            .unwrap()
            .failing_files
            .insert(file_id.to_string());
    }

    pub fn profile_requests(&self) -> Vec<Option<String>> {
        self.data.lock().unwrap().profile_requests.clone()
    }

    pub fn listings(&self) -> Vec<RecordedListing> {
        self.data.lock().unwrap().listings.clone()
    }

    pub fn downloads(&self) -> Vec<RecordedDownload> {
        self.data.lock().unwrap().downloads.clone()
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        account_email: ACCOUNT_EMAIL.to_string(),
        api_key: API_KEY.to_string(),
        api_secret: API_SECRET.to_string(),
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 3, 15).unwrap()
}

pub fn sync_manager(api: &MockZoomApi, output_dir: &std::path::Path) -> SyncManager {
    SyncManager::with_parts(
        ZoomClient::new(&api.api_base_url(), credentials()),
        FileFetcher::new(credentials(), output_dir),
        SyncSettings::default(),
    )
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn handle_profile(
    State(data): State<SharedData>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut data = data.lock().unwrap();
    data.profile_requests.push(header(&headers, "authorization"));

    if let (Some(status), Some(body)) = (data.profile_status, data.profile_body.clone()) {
        return (status, Json(body)).into_response();
    }

    if id != ACCOUNT_EMAIL {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"code": 1001, "message": "User does not exist"})),
        )
            .into_response();
    }

    Json(json!({
        "id": USER_ID,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": ACCOUNT_EMAIL
    }))
    .into_response()
}

async fn handle_recordings(
    State(data): State<SharedData>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut data = data.lock().unwrap();
    let from = params.get("from").cloned().unwrap_or_default();

    data.listings.push(RecordedListing {
        user_id: id,
        from: from.clone(),
        to: params.get("to").cloned().unwrap_or_default(),
        page_size: params.get("page_size").cloned().unwrap_or_default(),
        authorization: header(&headers, "authorization"),
        accept: header(&headers, "accept"),
    });

    if data.failing_windows.contains(&from) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": 500, "message": "Internal error"})),
        )
            .into_response();
    }

    let meetings = data
        .meetings_by_from
        .get(&from)
        .cloned()
        .unwrap_or_else(|| json!([]));
    let next_page_token = data.page_token_by_from.get(&from).cloned().unwrap_or_default();

    Json(json!({
        "from": from,
        "page_size": 300,
        "next_page_token": next_page_token,
        "meetings": meetings
    }))
    .into_response()
}

async fn handle_download(
    State(data): State<SharedData>,
    Path(file_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut data = data.lock().unwrap();
    data.downloads.push(RecordedDownload {
        file_id: file_id.clone(),
        access_token: params.get("access_token").cloned(),
    });

    if data.failing_files.contains(&file_id) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match data.files.get(&file_id) {
        Some(body) => (StatusCode::OK, body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
