#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokio::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TENANT: &str = "acme";
pub const WORKSPACE: &str = "ws-42";
pub const TOKEN_PATH: &str = "/realms/acme/protocol/openid-connect/token";
pub const DEPLOYMENTS_PATH: &str = "/workspaces/ws-42/deployments";

/// Complete parameter set pointing both the identity provider and the API
/// at the same mock server.
pub fn gateway_env(server: &MockServer) -> HashMap<String, String> {
    [
        ("API_URL", server.uri()),
        ("AUTH_URL", server.uri()),
        ("API_USERNAME", "bob".to_string()),
        ("API_PASSWORD", "hunter2".to_string()),
        ("TENANT_ID", TENANT.to_string()),
        ("WORKSPACE_ID", WORKSPACE.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": token,
                "token_type": "Bearer",
                "expires_in": 300,
            })),
        )
        .mount(server)
        .await;
}
