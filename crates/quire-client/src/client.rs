//! HTTP implementation of [`NotesApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize};

use quire_auth::Token;
use quire_core::{Note, NoteId};

use crate::{Error, NotesApi, Result};

/// The hosted notes backend.
pub const DEFAULT_BASE_URL: &str = "https://backend-notes-application-lq2e.onrender.com";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LOGIN_FAILED: &str = "Login failed";
const PLAN_LIMIT_REACHED: &str = "Free plan limit reached";
const UPGRADE_FAILED: &str = "Upgrade failed";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct CreateNoteRequest<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// Notes API client over HTTP.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NotesClient {
    /// Create a client for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client for `base_url` with a request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quire/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// The API root every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!("{raw}: expected an http(s) URL")));
    }
    Ok(url)
}

/// Pull `message` out of an error body, if the body has one.
async fn server_message(response: Response) -> Option<String> {
    let text = response.text().await.ok()?;
    serde_json::from_str::<MessageBody>(&text)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Map a non-success response to [`Error::Api`].
async fn api_error(response: Response) -> Error {
    let status = response.status();
    let message = server_message(response).await.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });
    Error::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl NotesApi for NotesClient {
    async fn login(&self, email: &str, password: &str) -> Result<Token> {
        let url = self.endpoint(&["login"])?;
        log::debug!("POST {url} for {email}");

        let response = self
            .http
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let status = response.status();
        let body: LoginResponse = response.json().await?;

        match body.token.filter(|t| !t.trim().is_empty()) {
            Some(raw) => {
                log::info!("Logged in as {email}");
                Ok(Token::new(raw)?)
            }
            None => {
                let message = body
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                log::warn!("Login for {email} rejected ({status}): {message}");
                Err(Error::LoginFailed(message))
            }
        }
    }

    async fn list_notes(&self, token: &Token) -> Result<Vec<Note>> {
        let url = self.endpoint(&["notes"])?;
        log::debug!("GET {url}");

        let response = self.http.get(url).bearer_auth(token.as_str()).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            s if s.is_success() => {
                let notes: Option<Vec<Note>> = response.json().await?;
                let notes = notes.unwrap_or_default();
                log::debug!("Fetched {} notes", notes.len());
                Ok(notes)
            }
            _ => Err(api_error(response).await),
        }
    }

    async fn create_note(&self, token: &Token, content: &str) -> Result<Note> {
        let url = self.endpoint(&["notes"])?;
        log::debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .json(&CreateNoteRequest { content })
            .send()
            .await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::FORBIDDEN => {
                let message = server_message(response)
                    .await
                    .unwrap_or_else(|| PLAN_LIMIT_REACHED.to_string());
                log::warn!("Note creation refused: {message}");
                Err(Error::Forbidden(message))
            }
            s if s.is_success() => Ok(response.json().await?),
            _ => Err(api_error(response).await),
        }
    }

    async fn delete_note(&self, token: &Token, id: &NoteId) -> Result<()> {
        let segment = id.as_path_segment();
        let url = self.endpoint(&["notes", &segment])?;
        log::debug!("DELETE {url}");

        let response = self
            .http
            .delete(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            // The note is dropped locally either way.
            log::warn!("Delete of note {id} answered {status}");
        }
        Ok(())
    }

    async fn upgrade_tenant(&self, token: &Token, tenant: &str) -> Result<()> {
        let url = self.endpoint(&["tenants", tenant, "upgrade"])?;
        log::debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        if response.status().is_success() {
            log::info!("Tenant {tenant} upgraded");
            return Ok(());
        }

        let status = response.status();
        let message = server_message(response)
            .await
            .unwrap_or_else(|| UPGRADE_FAILED.to_string());
        log::warn!("Upgrade of tenant {tenant} refused ({status}): {message}");
        Err(Error::UpgradeFailed(message))
    }
}
