//! Blocking HTTP client for a remote game host.

use crate::error::{Error, Result};
use crate::host::{CreatedGame, GameSnapshot, GuessReceipt, GuessRequest, ScoringAuthority};
use crate::{debug_log, info_log};
use reqwest::Method;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the game host's `/games` API with a bearer credential.
///
/// Obtaining the credential is the caller's business; the client only
/// forwards it.
#[derive(Debug, Clone)]
pub struct GameHostClient {
    base_url: String,
    token: String,
    http: Client,
}

impl GameHostClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("game host URL is empty"));
        }
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::config("game host token is empty"));
        }

        let http = Client::builder().timeout(timeout).build()?;
        info_log!("Game host client for {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            base_url,
            token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug_log!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json");
        // POST bodies default to `{}` like the host expects
        if let Some(body) = body {
            request = request.json(body);
        } else if method == Method::POST {
            request = request.json(&serde_json::json!({}));
        }

        let response = request.send()?;
        if !response.status().is_success() {
            return Err(error_from_response(response));
        }
        Ok(response.json()?)
    }
}

/// Pulls the host's `message` (or `error`) field out of a failed reply.
fn error_from_response(response: Response) -> Error {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string();
    let message = response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or(fallback);
    Error::api(Some(status.as_u16()), message)
}

impl ScoringAuthority for GameHostClient {
    fn create_game(&mut self) -> Result<CreatedGame> {
        self.request(Method::POST, "/games", None::<&GuessRequest>)
    }

    fn get_game(&mut self, game_id: &str) -> Result<GameSnapshot> {
        self.request(Method::GET, &format!("/games/{game_id}"), None::<&GuessRequest>)
    }

    fn submit_guess(&mut self, game_id: &str, value: i64) -> Result<GuessReceipt> {
        self.request(
            Method::POST,
            &format!("/games/{game_id}/guess"),
            Some(&GuessRequest { value }),
        )
    }
}
