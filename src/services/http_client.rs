use crate::config::ClientConfig;
use crate::constants::auth::{DEFAULT_SCHEME, DEFAULT_TENANT_ID, PASSWORD_GRANT};
use crate::constants::env;
use crate::constants::limits::LOG_BODY_PREVIEW_BYTES;
use crate::constants::protocols::USER_AGENT;
use crate::errors::GatewayError;
use crate::services::logger::Logger;
use crate::utils::redact::redact_text;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use url::Url;

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)://").expect("scheme prefix regex"));

/// Prepends `https://` when the operator supplied a bare host.
pub fn normalize_api_url(raw: &str) -> String {
    if SCHEME_PREFIX.is_match(raw) {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, raw)
    }
}

/// Resolves the realm's token endpoint against the identity provider base.
/// The path is absolute, so any path on `auth_url` is replaced, not extended.
pub fn token_endpoint(auth_url: &str, tenant_id: &str) -> Result<Url, GatewayError> {
    let invalid = || GatewayError::InvalidUrl {
        key: env::AUTH_URL.to_string(),
        value: auth_url.to_string(),
    };
    let base = Url::parse(auth_url).map_err(|_| invalid())?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid());
    }
    base.join(&format!(
        "/realms/{}/protocol/openid-connect/token",
        tenant_id
    ))
    .map_err(|_| invalid())
}

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    tenant_id: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        tenant_id: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            tenant_id: tenant_id.unwrap_or_else(|| DEFAULT_TENANT_ID.to_string()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn grant_type(&self) -> &'static str {
        PASSWORD_GRANT
    }

    fn form_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("grant_type", PASSWORD_GRANT),
            ("client_id", self.tenant_id.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

fn extract_access_token(raw: &str) -> Option<BearerToken> {
    let document: Value = serde_json::from_str(raw).ok()?;
    document
        .get("access_token")?
        .as_str()
        .map(|token| BearerToken(token.to_string()))
}

/// Client that holds credentials but no token yet. The only way forward is
/// [`HttpClient::authenticate`], which yields an [`AuthenticatedClient`].
///
/// Requests cannot be issued before that step:
///
/// ```compile_fail
/// use oicm_mcp::services::http_client::{Credentials, HttpClient};
/// use oicm_mcp::services::logger::{LogLevel, Logger};
///
/// async fn list_workspaces() {
///     let credentials = Credentials::new("bob", "secret", None);
///     let client = HttpClient::new(
///         Logger::new("doc", LogLevel::Error),
///         "api.example.com",
///         "https://auth.example.com",
///         credentials,
///         true,
///     )
///     .unwrap();
///     let _ = client.get::<serde_json::Value>("/workspaces").await;
/// }
/// ```
pub struct HttpClient {
    logger: Logger,
    http: Client,
    api_url: String,
    auth_url: String,
    credentials: Credentials,
    verify_ssl: bool,
}

impl HttpClient {
    pub fn new(
        logger: Logger,
        api_url: &str,
        auth_url: &str,
        credentials: Credentials,
        verify_ssl: bool,
    ) -> Result<Self, GatewayError> {
        let logger = logger.child("http");
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if !verify_ssl {
            logger.warn("TLS certificate verification disabled", None);
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(GatewayError::ClientBuild)?;
        Ok(Self {
            logger,
            http,
            api_url: normalize_api_url(api_url),
            auth_url: auth_url.to_string(),
            credentials,
            verify_ssl,
        })
    }

    pub fn from_config(logger: Logger, config: &ClientConfig) -> Result<Self, GatewayError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.clone(),
            Some(config.tenant_id.clone()),
        );
        Self::new(
            logger,
            &config.api_url,
            &config.auth_url,
            credentials,
            config.verify_ssl,
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether the underlying client rejects invalid TLS certificates.
    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    pub fn token_endpoint(&self) -> Result<Url, GatewayError> {
        token_endpoint(&self.auth_url, self.credentials.tenant_id())
    }

    /// Runs the password grant once. There is no retry: the first transport
    /// or document failure is returned as is.
    pub async fn authenticate(self) -> Result<AuthenticatedClient, GatewayError> {
        let endpoint = self.token_endpoint()?;
        self.logger.debug(
            "requesting access token",
            Some(&serde_json::json!({
                "endpoint": endpoint.as_str(),
                "realm": self.credentials.tenant_id(),
                "username": self.credentials.username(),
            })),
        );

        let response = self
            .http
            .post(endpoint)
            .form(&self.credentials.form_fields())
            .send()
            .await
            .map_err(GatewayError::TokenExchange)?;
        let status = response.status();
        let raw = response.text().await.map_err(GatewayError::TokenExchange)?;

        let Some(token) = extract_access_token(&raw) else {
            self.logger.warn(
                "token response has no access_token",
                Some(&serde_json::json!({
                    "status": status.as_u16(),
                    "body": redact_text(&raw, LOG_BODY_PREVIEW_BYTES),
                })),
            );
            return Err(GatewayError::InvalidTokenResponse {
                raw: raw.trim().to_string(),
            });
        };

        self.logger.info(
            "authenticated",
            Some(&serde_json::json!({
                "status": status.as_u16(),
                "username": self.credentials.username(),
            })),
        );
        Ok(AuthenticatedClient {
            inner: self,
            token,
        })
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("credentials", &self.credentials)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

/// Client holding a bearer token for the lifetime of the value. Tokens are
/// never refreshed; build a new client when one expires.
pub struct AuthenticatedClient {
    inner: HttpClient,
    token: BearerToken,
}

impl AuthenticatedClient {
    pub fn api_url(&self) -> &str {
        self.inner.api_url()
    }

    pub fn bearer_token(&self) -> &str {
        self.token.expose()
    }

    pub fn http(&self) -> &Client {
        &self.inner.http
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.inner.api_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, self.url_for(path))
            .header(AUTHORIZATION, self.token.header_value())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(GatewayError::Network)?;
        self.decode(&Method::GET, path, response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(GatewayError::Network)?;
        self.decode(&Method::POST, path, response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let text = response.text().await.map_err(GatewayError::Network)?;
        if status != StatusCode::OK {
            self.inner.logger.warn(
                "request failed",
                Some(&serde_json::json!({
                    "method": method.as_str(),
                    "path": path,
                    "status": status.as_u16(),
                    "body": redact_text(&text, LOG_BODY_PREVIEW_BYTES),
                })),
            );
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(GatewayError::DecodeFailed)
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("inner", &self.inner)
            .field("token", &self.token)
            .finish()
    }
}
