// Dashboard HTTP client
//
// Wraps `reqwest::Client` with dashboard URL construction, bearer-token
// auth, and status-code mapping. Endpoint methods live in `cephfs.rs`
// as inherent methods so this module stays focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::AuthResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for the Ceph dashboard REST API.
///
/// Holds the bearer token issued by `POST /api/auth`; every request made
/// after [`login`](Self::login) carries it. Cheap to share behind an `Arc`.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl DashboardClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the dashboard root, e.g. `https://mgr-host:8443`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The dashboard base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Authenticate with username/password and keep the issued token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("api/auth")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let auth: AuthResponse = decode(&resp.text().await.map_err(Error::Transport)?)?;
        debug!(user = auth.username.as_deref().unwrap_or(username), "login successful");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretString::from(auth.token));
        Ok(())
    }

    /// Use a token issued out of band instead of logging in.
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the session on the dashboard side and forget the token.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("api/auth/logout")?;
        let builder = self.authorize(self.http.post(url));
        let resp = builder.send().await.map_err(Error::Transport)?;
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;

        if resp.status().is_success() {
            debug!("logged out");
            Ok(())
        } else {
            Err(Error::Api {
                message: "logout rejected".into(),
                status: resp.status().as_u16(),
            })
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a dashboard path such as `api/cephfs`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send an authorized GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let path = url.path().to_owned();
        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                return Err(Error::Authentication {
                    message: "token expired or missing".into(),
                });
            }
            StatusCode::FORBIDDEN => {
                return Err(Error::PermissionDenied {
                    message: format!("access to {path} denied"),
                });
            }
            StatusCode::NOT_FOUND => return Err(Error::NotFound { path }),
            _ => {}
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Api {
                message: dashboard_detail(&body),
                status: status.as_u16(),
            });
        }

        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

/// The dashboard reports errors as `{"detail": "...", "code": "..."}`.
fn dashboard_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(serde_json::Value::as_str).map(String::from))
        .unwrap_or_else(|| preview(body).to_owned())
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> DashboardClient {
        DashboardClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_joins_without_double_slashes() {
        let c = client("https://mgr:8443/");
        assert_eq!(
            c.api_url("/ui-api/cephfs/1/tabs").unwrap().as_str(),
            "https://mgr:8443/ui-api/cephfs/1/tabs"
        );
    }

    #[test]
    fn api_url_keeps_reverse_proxy_prefix() {
        let c = client("https://proxy.example/ceph");
        assert_eq!(
            c.api_url("api/cephfs").unwrap().as_str(),
            "https://proxy.example/ceph/api/cephfs"
        );
    }

    #[test]
    fn dashboard_detail_prefers_detail_field() {
        assert_eq!(
            dashboard_detail(r#"{"detail": "fs not found", "code": "404"}"#),
            "fs not found"
        );
        assert_eq!(dashboard_detail("plain text"), "plain text");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(preview(&body).len() <= 200);
    }
}
