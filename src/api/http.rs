//! reqwest transport
//!
//! The renewal token arrives as an HttpOnly cookie, so the client keeps a
//! cookie jar. With a cookie file configured, the jar is written after every
//! call that can rotate the cookie and read back on startup, which lets a
//! later process refresh silently. Ending the session expires the jar and
//! deletes the file.

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::config::ApiConfig;
use crate::session::Credential;

/// Native [`Backend`] over HTTP
pub struct HttpBackend {
    client: Client,
    base_url: String,
    jar: Arc<Jar>,
    cookie_file: Option<PathBuf>,
}

impl HttpBackend {
    /// Create a client with an in-memory cookie jar
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            jar,
            cookie_file: None,
        })
    }

    /// Persist cookies to `path`, loading whatever it already holds
    pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self.load_cookies();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    /// Cookies are scoped to the refresh endpoint, the only call that reads them
    fn cookie_url(&self) -> Option<Url> {
        Url::parse(&self.url(endpoints::TOKEN_REFRESH)).ok()
    }

    fn load_cookies(&self) {
        let (Some(path), Some(url)) = (&self.cookie_file, self.cookie_url()) else {
            return;
        };
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!("Failed to read cookies from {:?}: {}", path, e);
                return;
            }
        };
        for cookie in content.split("; ").map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &url);
        }
    }

    fn persist_cookies(&self) {
        let (Some(path), Some(url)) = (&self.cookie_file, self.cookie_url()) else {
            return;
        };
        let header = self
            .jar
            .cookies(&url)
            .and_then(|value| value.to_str().map(str::to_string).ok())
            .unwrap_or_default();

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {:?}: {}", parent, e);
                return;
            }
        }
        if let Err(e) = std::fs::write(path, header) {
            tracing::warn!("Failed to write cookies to {:?}: {}", path, e);
        }
    }

    /// Expire every cookie the refresh call would send, then delete the file
    fn clear_cookies(&self) {
        let Some(url) = self.cookie_url() else {
            return;
        };
        let names: Vec<String> = self
            .jar
            .cookies(&url)
            .and_then(|value| value.to_str().map(str::to_string).ok())
            .map(|header| {
                header
                    .split("; ")
                    .filter_map(|cookie| cookie.split_once('='))
                    .map(|(name, _)| name.to_string())
                    .collect()
            })
            .unwrap_or_default();

        // Cookies read from the file sit on the default path, server-set ones on "/"
        for name in names {
            self.jar.add_cookie_str(&format!("{}=; Max-Age=0", name), &url);
            self.jar.add_cookie_str(&format!("{}=; Max-Age=0; Path=/", name), &url);
        }

        if let Some(path) = &self.cookie_file {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove {:?}: {}", path, e),
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Backend returned an error");
            return Err(ApiError::from_status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, credential: &Credential) -> ApiResult<T> {
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(credential.as_str());
        self.send(request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> ApiResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.as_str());
        }
        self.send(request).await
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network("Request timeout".to_string())
    } else if e.is_connect() {
        ApiError::Network(format!("Connection failed: {}", e))
    } else {
        ApiError::Network(e.to_string())
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let response = self.post(endpoints::LOGIN, request, None).await;
        self.persist_cookies();
        response
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisteredUser> {
        self.post(endpoints::REGISTER, request, None).await
    }

    async fn current_user(&self, credential: &Credential) -> ApiResult<UserProfile> {
        self.get(endpoints::CURRENT_USER, credential).await
    }

    async fn refresh(&self) -> ApiResult<RefreshResponse> {
        let response = self
            .post(endpoints::TOKEN_REFRESH, &serde_json::json!({}), None)
            .await;
        self.persist_cookies();
        response
    }

    async fn chat_history(&self, credential: &Credential) -> ApiResult<Vec<HistoryEntry>> {
        self.get(endpoints::CHAT_HISTORY, credential).await
    }

    async fn chat_pollinations(
        &self,
        credential: &Credential,
        request: &PollinationsChatRequest,
    ) -> ApiResult<ChatReply> {
        self.post(endpoints::CHAT_POLLINATIONS, request, Some(credential))
            .await
    }

    async fn chat(
        &self,
        credential: &Credential,
        request: &ProviderChatRequest,
    ) -> ApiResult<ProviderChatResponse> {
        self.post(endpoints::CHAT, request, Some(credential)).await
    }

    async fn generate_image(
        &self,
        credential: &Credential,
        request: &VisionRequest,
    ) -> ApiResult<VisionResponse> {
        self.post(endpoints::VISION, request, Some(credential)).await
    }

    fn forget_session(&self) {
        self.clear_cookies();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthPhase, FileStore, Session};
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 2,
        }
    }

    #[test]
    fn test_urls() {
        let backend = HttpBackend::new(&config("http://localhost:8000/api/")).unwrap();
        assert_eq!(
            backend.url(endpoints::LOGIN),
            "http://localhost:8000/api/auth/login/"
        );
        assert_eq!(
            backend.cookie_url().unwrap().path(),
            "/api/auth/token/refresh/"
        );
    }

    #[test]
    fn test_cookie_file_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cookies");

        let first = HttpBackend::new(&config("http://localhost:8000/api"))
            .unwrap()
            .with_cookie_file(&path);
        let url = first.cookie_url().unwrap();
        first.jar.add_cookie_str("refreshToken=abc123", &url);
        first.persist_cookies();

        let second = HttpBackend::new(&config("http://localhost:8000/api"))
            .unwrap()
            .with_cookie_file(&path);
        let header = second.jar.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "refreshToken=abc123");
    }

    #[test]
    fn test_missing_cookie_file_is_fine() {
        let dir = TempDir::new().unwrap();
        let backend = HttpBackend::new(&config("http://localhost:8000/api"))
            .unwrap()
            .with_cookie_file(dir.path().join("cookies"));
        assert!(backend.jar.cookies(&backend.cookie_url().unwrap()).is_none());
    }

    #[test]
    fn test_forget_session_clears_jar_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies");

        let backend = HttpBackend::new(&config("http://localhost:8000/api"))
            .unwrap()
            .with_cookie_file(&path);
        let url = backend.cookie_url().unwrap();
        backend.jar.add_cookie_str("refreshToken=abc123", &url);
        backend.jar.add_cookie_str("sessionid=xyz; Path=/", &url);
        backend.persist_cookies();
        assert!(path.exists());

        backend.forget_session();
        assert!(backend.jar.cookies(&url).is_none());
        assert!(!path.exists());

        let restarted = HttpBackend::new(&config("http://localhost:8000/api"))
            .unwrap()
            .with_cookie_file(&path);
        assert!(restarted.jar.cookies(&url).is_none());
    }

    /// Minimal backend: login sets the renewal cookie, refresh accepts only that cookie
    async fn serve(listener: TcpListener) {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break None;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break Some(pos + 4);
                }
            };
            let Some(head_end) = head_end else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < head_end + length {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let (status, extra, body) = if head.starts_with("post /api/auth/login/") {
                (
                    "200 OK",
                    "Set-Cookie: refreshToken=abc; Path=/; HttpOnly\r\n",
                    r#"{"access":"first","user":{"username":"ada"}}"#,
                )
            } else if head.starts_with("post /api/auth/token/refresh/") {
                if head.contains("refreshtoken=abc") {
                    ("200 OK", "", r#"{"access":"fresh"}"#)
                } else {
                    ("401 Unauthorized", "", r#"{"error":"No refresh token provided"}"#)
                }
            } else if head.starts_with("get /api/auth/user/") {
                ("200 OK", "", r#"{"username":"ada","email":"ada@example.com"}"#)
            } else {
                ("404 Not Found", "", "{}")
            };

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
                status,
                body.len(),
                extra,
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_logout_ends_session_for_later_processes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        tokio::spawn(serve(listener));

        let dir = TempDir::new().unwrap();
        let open = || {
            let backend = HttpBackend::new(&config(&base_url))
                .unwrap()
                .with_cookie_file(dir.path().join("cookies"));
            Session::new(backend, FileStore::in_dir(dir.path()))
        };

        let first = open();
        let request = LoginRequest {
            username: "ada".into(),
            password: "secret".into(),
        };
        first.login(&request).await.unwrap();

        // The persisted cookie signs the next process in silently
        let second = open();
        assert_eq!(second.bootstrap().await, AuthPhase::Authenticated);
        second.logout();

        let third = open();
        assert_eq!(third.bootstrap().await, AuthPhase::Unauthenticated);
        assert!(!dir.path().join("cookies").exists());
        assert!(!dir.path().join(FileStore::FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let backend = HttpBackend::new(&config("http://127.0.0.1:1/api")).unwrap();
        let result = backend.refresh().await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
