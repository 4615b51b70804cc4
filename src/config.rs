use crate::constants::env;
use crate::errors::GatewayError;
use crate::utils::feature_flags::resolve_flag;
use std::collections::HashMap;
use std::fmt;

/// Where gateway parameters come from. Process environment in production,
/// a plain map in tests and embedders.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Everything needed to construct an authenticated client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub tenant_id: String,
    pub verify_ssl: bool,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub client: ClientConfig,
    /// Request-path parameter, not part of client construction.
    pub workspace_id: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::resolve(&ProcessEnv)
    }

    pub fn resolve(source: &dyn EnvSource) -> Result<Self, GatewayError> {
        let mut values = HashMap::new();
        let mut missing = Vec::new();
        for key in env::REQUIRED {
            match source.var(key).filter(|value| !value.is_empty()) {
                Some(value) => {
                    values.insert(*key, value);
                }
                None => missing.push(key.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(GatewayError::MissingConfig(missing));
        }

        let verify_ssl = resolve_flag(source.var(env::VERIFY_SSL).as_deref(), true).map_err(
            |reason| GatewayError::InvalidSetting {
                key: env::VERIFY_SSL.to_string(),
                reason,
            },
        )?;

        let mut take = |key: &str| values.remove(key).unwrap_or_default();
        Ok(Self {
            client: ClientConfig {
                api_url: take(env::API_URL),
                auth_url: take(env::AUTH_URL),
                username: take(env::API_USERNAME),
                password: take(env::API_PASSWORD),
                tenant_id: take(env::TENANT_ID),
                verify_ssl,
            },
            workspace_id: take(env::WORKSPACE_ID),
        })
    }
}
