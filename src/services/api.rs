//! HTTP access to the dealership backend

use crate::error::ApiError;
use crate::model::{FetchRequest, Payload};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::cookie::Jar;
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// The backend, as seen by this client
///
/// Implementations return the parsed JSON body whatever the HTTP status
/// was, since the backend repeats the status inside the body.
pub trait DealershipApi: Send + Sync {
    fn get(&self, path: &str) -> Payload;
    fn post(&self, path: &str, body: &Value) -> Payload;
}

/// Perform a request against an API
pub fn execute(api: &dyn DealershipApi, request: &FetchRequest) -> Payload {
    let path = request.path();
    match request {
        FetchRequest::AddReview(review) => {
            let body = serde_json::to_value(review)?;
            api.post(&path, &body)
        }
        _ => api.get(&path),
    }
}

/// `reqwest` implementation of [`DealershipApi`]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Build a client for `base_url`
    ///
    /// `add_review` only accepts requests carrying a logged-in backend
    /// session, so `session_cookie` (e.g. `sessionid=...`) seeds the cookie
    /// jar. Cookies the backend sets later are kept in the same jar.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session_cookie: Option<&str>,
    ) -> anyhow::Result<Self> {
        // Relative joins need the trailing slash to keep the last segment
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)?;
        let jar = session_jar(session_cookie, &base_url);
        let client = Client::builder()
            .timeout(timeout)
            .cookie_provider(jar)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid path '{}': {}", path, e)))
    }

    fn send(&self, request: RequestBuilder) -> Payload {
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        debug!(%status, bytes = text.len(), "response received");

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ApiError::Status(status.as_u16())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Cookie jar scoped to the backend, holding the configured session if any
fn session_jar(session_cookie: Option<&str>, base_url: &Url) -> Arc<Jar> {
    let jar = Jar::default();
    if let Some(cookie) = session_cookie.map(str::trim).filter(|c| !c.is_empty()) {
        info!("using configured backend session cookie");
        // Scope to the whole host so every backend route sees the session
        jar.add_cookie_str(&format!("{}; Path=/", cookie), base_url);
    }
    Arc::new(jar)
}

impl DealershipApi for HttpApi {
    fn get(&self, path: &str) -> Payload {
        let url = self.url(path)?;
        debug!(%url, "GET");
        self.send(self.client.get(url))
    }

    fn post(&self, path: &str, body: &Value) -> Payload {
        let url = self.url(path)?;
        debug!(%url, "POST");
        self.send(self.client.post(url).json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_keeps_base_path() {
        let api = HttpApi::new("http://localhost:8000/djangoapp", Duration::from_secs(1), None).unwrap();
        assert_eq!(
            api.url("reviews/dealer/42").unwrap().as_str(),
            "http://localhost:8000/djangoapp/reviews/dealer/42"
        );
        assert_eq!(
            api.url("get_dealers/New York").unwrap().as_str(),
            "http://localhost:8000/djangoapp/get_dealers/New%20York"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpApi::new("not a url", Duration::from_secs(1), None).is_err());
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let api = HttpApi::new("http://127.0.0.1:9/", Duration::from_secs(2), None).unwrap();
        let payload = api.get("get_cars");
        assert!(matches!(
            payload,
            Err(ApiError::Transport(_)) | Err(ApiError::Timeout)
        ));
    }

    #[test]
    fn test_session_cookie_reaches_add_review() {
        use reqwest::cookie::CookieStore;

        let base = Url::parse("http://localhost:8000/djangoapp/").unwrap();
        let add_review = base.join("add_review").unwrap();

        let jar = session_jar(Some("sessionid=abc123"), &base);
        let header = jar.cookies(&add_review).unwrap();
        assert_eq!(header.to_str().unwrap(), "sessionid=abc123");

        let other_host = Url::parse("http://example.com/djangoapp/add_review").unwrap();
        assert!(jar.cookies(&other_host).is_none());

        assert!(session_jar(None, &base).cookies(&add_review).is_none());
        assert!(session_jar(Some("  "), &base).cookies(&add_review).is_none());
    }
}
