// src/spotify/client.rs — HTTP client for the upstream Web API
//
// Every authenticated call goes through `request`, which owns the token
// refresh policy: first attempt with the current access token; on a 401,
// exactly one refresh-token exchange and exactly one retry of the original
// call. A failed refresh surfaces the original unauthorized response as-is.

use reqwest::{Method, Response, StatusCode};

use crate::infra::config::SpotifyConfig;
use crate::infra::errors::WavectlError;
use crate::session::{Session, SessionStore};
use crate::spotify::types::TokenGrant;

const API_BASE: &str = "https://api.spotify.com/v1";
const ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

pub struct SpotifyClient {
    http: reqwest::Client,
    spotify: SpotifyConfig,
    api_base: String,
    accounts_base: String,
}

impl SpotifyClient {
    pub fn new(spotify: SpotifyConfig) -> Self {
        Self::with_base_urls(spotify, API_BASE.into(), ACCOUNTS_BASE.into())
    }

    /// Base URLs are injectable so tests can stand up a local mock provider.
    pub fn with_base_urls(spotify: SpotifyConfig, api_base: String, accounts_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            spotify,
            api_base,
            accounts_base,
        }
    }

    pub fn accounts_base(&self) -> &str {
        &self.accounts_base
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.spotify
    }

    /// Authorization-code exchange, performed once per login callback.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, WavectlError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.spotify.redirect_uri),
        ])
        .await
    }

    /// Refresh-token exchange. Callers decide what to do with the rotated
    /// pair; this does not touch any session store.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, WavectlError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenGrant, WavectlError> {
        let res = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(&self.spotify.client_id, Some(&self.spotify.client_secret))
            .form(params)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(WavectlError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        Ok(res.json().await?)
    }

    /// One authenticated call against the Web API, with the single-shot
    /// refresh-and-retry described above. `path_and_query` is relative to the
    /// API base, e.g. `me/player/seek?position_ms=0`.
    pub async fn request(
        &self,
        sessions: &dyn SessionStore,
        sid: &str,
        method: Method,
        path_and_query: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, WavectlError> {
        let session = sessions
            .get(sid)
            .await
            .ok_or(WavectlError::NotAuthenticated)?;

        let first = self
            .send(&session.access_token, method.clone(), path_and_query, body)
            .await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let grant = match self.refresh(&session.refresh_token).await {
            Ok(grant) => grant,
            Err(e) => {
                // Refresh failed: keep the stored pair (a later attempt may
                // succeed) and hand back the original 401 untouched.
                tracing::warn!("token refresh failed: {e}");
                return Ok(first);
            }
        };

        let rotated = Session {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.unwrap_or(session.refresh_token),
        };
        sessions.set(sid, rotated.clone()).await;
        tracing::debug!(sid, "access token rotated after upstream 401");

        self.send(&rotated.access_token, method, path_and_query, body)
            .await
    }

    async fn send(
        &self,
        access_token: &str,
        method: Method,
        path_and_query: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, WavectlError> {
        let mut req = self
            .http
            .request(method, format!("{}/{path_and_query}", self.api_base))
            .bearer_auth(access_token);
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }
}
