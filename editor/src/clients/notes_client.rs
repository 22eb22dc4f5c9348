use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use super::client::NotesApi;
use super::config::ApiConfig;
use super::error::ApiError;
use crate::note::{NoteDetail, NoteId, NotePayload};
use crate::validation::FieldErrors;

const NOTES_PATH: &str = "/api/notes/notes/";

/// Notes backend client over HTTP + JSON
pub struct HttpNotesClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<SecretString>,
}

impl HttpNotesClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                error!("Failed to create HTTP client: {}", e);
                ApiError::Network(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
        })
    }

    fn notes_url(&self) -> String {
        format!("{}{}", self.base_url, NOTES_PATH)
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!("{}{}{}/", self.base_url, NOTES_PATH, id)
    }

    fn add_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send request and parse a single note out of the response
    async fn send_and_parse(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<NoteDetail, ApiError> {
        let response = self.add_auth(request).send().await.map_err(|e| {
            error!("API request error for {}: {}", url, e);
            ApiError::Network(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, body, url));
        }

        let note: NoteDetail = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse note from {}: {}", url, e);
            ApiError::Decode(e.to_string())
        })?;

        info!("Note {} persisted ({} characters)", note.id, note.content.len());

        Ok(note)
    }

    fn status_error(status: StatusCode, body: String, url: &str) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("API rejected credentials for {}", url);
                ApiError::Unauthorized
            }
            StatusCode::NOT_FOUND => ApiError::NotFound(url.to_string()),
            StatusCode::BAD_REQUEST => match serde_json::from_str::<FieldErrors>(&body) {
                Ok(errors) if !errors.is_empty() => {
                    warn!("API rejected note fields: {}", errors);
                    ApiError::Rejected(errors)
                }
                _ => ApiError::Status {
                    status: status.as_u16(),
                    body,
                },
            },
            _ => {
                error!("API error response ({}): {}", status, body);
                ApiError::Status {
                    status: status.as_u16(),
                    body,
                }
            }
        }
    }
}

#[async_trait]
impl NotesApi for HttpNotesClient {
    async fn create_note(&self, payload: &NotePayload) -> Result<NoteDetail, ApiError> {
        let url = self.notes_url();
        let request = self.http.post(&url).json(payload);
        self.send_and_parse(request, &url).await
    }

    async fn update_note(
        &self,
        id: &NoteId,
        payload: &NotePayload,
    ) -> Result<NoteDetail, ApiError> {
        let url = self.note_url(id);
        let request = self.http.put(&url).json(payload);
        self.send_and_parse(request, &url).await
    }

    async fn fetch_note(&self, id: &NoteId) -> Result<NoteDetail, ApiError> {
        let url = self.note_url(id);
        let request = self.http.get(&url);
        self.send_and_parse(request, &url).await
    }
}
