//! Authenticated session cache
//!
//! [`SessionCache`] owns the HTTP client for a crawl. When the filter
//! requires elevated access it performs the site's login handshake
//! lazily on the first request, persists the resulting cookies through a
//! [`SessionStore`], and reloads them on later runs without touching the
//! network. At most one login handshake happens per process; a persisted
//! blob's presence is treated as proof of validity.

mod store;

pub use store::{FileSessionStore, PersistedCookie, PersistedSession, SessionStore};

use crate::{ConfigError, Result, WallgrabError};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// User-agent sent with every request when none is configured.
pub const DEFAULT_USER_AGENT: &str = "wallgrab/1.0";

/// The phrase the site's login page body contains when the handshake is
/// rejected.
const LOGIN_FAILURE_PHRASE: &str = "Your username/password combination was incorrect";

/// A username/password pair, retrieved from the credential vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Session-aware HTTP requester.
///
/// Holds credentials only when the crawl's filter requires them; without
/// credentials it behaves as a plain anonymous client and never logs in.
pub struct SessionCache {
    base_url: String,
    user_agent: HeaderValue,
    credentials: Option<Credentials>,
    store: Box<dyn SessionStore>,
    client: Option<Client>,
}

impl SessionCache {
    /// Creates a session cache against a site base URL.
    ///
    /// Fails with a configuration error if `user_agent` is not a valid
    /// header value.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        credentials: Option<Credentials>,
        store: Box<dyn SessionStore>,
    ) -> Result<Self> {
        let user_agent = HeaderValue::from_str(user_agent).map_err(|_| {
            ConfigError::Validation(format!("invalid user-agent value: {user_agent}"))
        })?;
        Ok(Self {
            base_url: base_url.into(),
            user_agent,
            credentials,
            store,
            client: None,
        })
    }

    fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url.trim_end_matches('/'))
    }

    /// Returns the HTTP client, building it on first use.
    ///
    /// If a persisted session exists its cookies are loaded into the
    /// jar first; no network calls are made here.
    pub fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let jar = Arc::new(Jar::default());
        if let Some(session) = self.store.load()? {
            for cookie in &session.cookies {
                let url = Url::parse(&cookie.url)?;
                jar.add_cookie_str(&cookie.set_cookie, &url);
            }
            tracing::debug!(
                "Restored persisted session with {} cookies",
                session.cookies.len()
            );
        }

        // Redirects are handled manually so login Set-Cookie headers on
        // the 302 are visible for persistence.
        let client = Client::builder()
            .redirect(Policy::none())
            .cookie_provider(jar)
            .gzip(true)
            .brotli(true)
            .build()?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Performs the login handshake unless a persisted session already
    /// exists.
    ///
    /// Fetches the login page, extracts the anti-forgery token from its
    /// markup, submits it with the credentials, and fails with an
    /// authentication error if the response body contains the site's
    /// known failure phrase. On success the captured cookies are
    /// persisted exactly once; subsequent processes reuse them.
    pub async fn ensure_authenticated(&mut self, credentials: &Credentials) -> Result<()> {
        if self.store.exists() {
            tracing::debug!("Persisted session present, skipping login");
            return Ok(());
        }

        let client = self.client()?;
        let login_url = self.login_url();
        tracing::info!("No persisted session, logging in at {login_url}");

        let response = client
            .get(&login_url)
            .headers(self.request_headers(HeaderMap::new()))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WallgrabError::HttpStatus {
                status: status.as_u16(),
                url: login_url,
            });
        }
        let mut cookies = capture_cookies(&login_url, &response);
        let body = response.text().await?;
        let token = extract_login_token(&body)?;

        let response = client
            .post(&login_url)
            .headers(self.request_headers(HeaderMap::new()))
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("_token", token.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        // A successful login answers with a redirect to the home page;
        // a rejected one re-renders the form with the failure phrase.
        if !status.is_success() && !status.is_redirection() {
            return Err(WallgrabError::HttpStatus {
                status: status.as_u16(),
                url: login_url,
            });
        }
        cookies.extend(capture_cookies(&login_url, &response));
        let body = response.text().await?;
        if body.contains(LOGIN_FAILURE_PHRASE) {
            return Err(WallgrabError::Authentication(
                "incorrect username/password".to_string(),
            ));
        }

        self.store.save(&PersistedSession { cookies })?;
        tracing::info!("Login succeeded, session persisted");
        Ok(())
    }

    /// Issues a GET through the session.
    ///
    /// When the cache holds credentials, authentication is triggered
    /// lazily here on the first request. Non-2xx responses fail with an
    /// HTTP status error; no retries are attempted at this layer.
    pub async fn get(&mut self, url: &str) -> Result<Response> {
        self.get_with_headers(url, HeaderMap::new()).await
    }

    /// Like [`get`](Self::get), with extra request headers. The header
    /// set is normalized first: any user-agent variant is replaced with
    /// the session's fixed value.
    pub async fn get_with_headers(&mut self, url: &str, extra: HeaderMap) -> Result<Response> {
        if let Some(credentials) = self.credentials.clone() {
            self.ensure_authenticated(&credentials).await?;
        }

        let client = self.client()?;
        let response = client
            .get(url)
            .headers(self.request_headers(extra))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WallgrabError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn request_headers(&self, mut headers: HeaderMap) -> HeaderMap {
        normalize_user_agent(&mut headers, &self.user_agent);
        headers
    }
}

/// Replaces any user-agent header entry with the fixed declared value.
///
/// Header names are case-insensitive, so every variant a collaborator
/// may have inserted collapses into the single fixed entry; the declared
/// identity cannot be duplicated or overridden.
pub fn normalize_user_agent(headers: &mut HeaderMap, user_agent: &HeaderValue) {
    while headers.remove(USER_AGENT).is_some() {}
    headers.insert(USER_AGENT, user_agent.clone());
}

/// Extracts the anti-forgery token from the login page markup.
fn extract_login_token(body: &str) -> Result<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(r#"input[name="_token"]"#)
        .map_err(|e| WallgrabError::Parse(e.to_string()))?;

    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|token| token.to_string())
        .ok_or_else(|| {
            WallgrabError::Parse("login page has no anti-forgery token field".to_string())
        })
}

/// Collects the `Set-Cookie` headers of a response for persistence.
fn capture_cookies(url: &str, response: &Response) -> Vec<PersistedCookie> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(|value| PersistedCookie {
            url: url.to_string(),
            set_cookie: value.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderName;

    #[test]
    fn test_normalize_replaces_existing_user_agent() {
        let fixed = HeaderValue::from_static(DEFAULT_USER_AGENT);
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("sneaky/9000"));

        normalize_user_agent(&mut headers, &fixed);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(USER_AGENT), Some(&fixed));
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        let fixed = HeaderValue::from_static(DEFAULT_USER_AGENT);
        let mut headers = HeaderMap::new();
        // Header names are normalized to lowercase on insert, so any
        // spelling a collaborator uses targets the same entry.
        let name = HeaderName::from_bytes(b"User-Agent").unwrap();
        headers.insert(name, HeaderValue::from_static("sneaky/9000"));

        normalize_user_agent(&mut headers, &fixed);

        assert_eq!(headers.get("user-agent"), Some(&fixed));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_normalize_keeps_unrelated_headers() {
        let fixed = HeaderValue::from_static(DEFAULT_USER_AGENT);
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("text/html"));

        normalize_user_agent(&mut headers, &fixed);

        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("accept"),
            Some(&HeaderValue::from_static("text/html"))
        );
    }

    #[test]
    fn test_extract_login_token() {
        let body = r#"<html><body><form method="post">
            <input type="hidden" name="_token" value="tok-123" />
            <input type="text" name="username" />
        </form></body></html>"#;
        assert_eq!(extract_login_token(body).unwrap(), "tok-123");
    }

    #[test]
    fn test_extract_login_token_missing_is_parse_error() {
        let body = "<html><body><p>maintenance</p></body></html>";
        assert!(matches!(
            extract_login_token(body),
            Err(WallgrabError::Parse(_))
        ));
    }

    #[test]
    fn test_login_url_normalizes_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        let cache = SessionCache::new(
            "https://alpha.wallhaven.cc/",
            DEFAULT_USER_AGENT,
            None,
            Box::new(store),
        )
        .unwrap();
        assert_eq!(cache.login_url(), "https://alpha.wallhaven.cc/auth/login");
    }
}
