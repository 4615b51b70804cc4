use crate::config::{EnvSource, GatewayConfig};
use crate::constants::limits::LOG_BODY_PREVIEW_BYTES;
use crate::errors::{GatewayError, ToolError};
use crate::services::http_client::HttpClient;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::utils::redact::redact_text;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

pub fn deployments_path(workspace_id: &str) -> String {
    format!("/workspaces/{}/deployments", workspace_id)
}

/// Text handed back to the tool caller for a failed listing.
pub fn render_failure(err: &GatewayError) -> String {
    match err {
        GatewayError::RequestFailed { status, body } => format!(
            "Error: Failed to get deployments. Status: {}, Response: {}",
            status, body
        ),
        GatewayError::MissingConfig(_)
        | GatewayError::InvalidSetting { .. }
        | GatewayError::InvalidUrl { .. }
        | GatewayError::ClientBuild(_)
        | GatewayError::TokenExchange(_)
        | GatewayError::InvalidTokenResponse { .. }
        | GatewayError::Network(_)
        | GatewayError::DecodeFailed(_) => format!("Error: {}", err),
    }
}

/// The `get_deployments` tool. Every invocation resolves configuration and
/// authenticates from scratch; nothing is shared between calls.
pub struct DeploymentsManager {
    logger: Logger,
    env: Arc<dyn EnvSource>,
}

impl DeploymentsManager {
    pub fn new(logger: Logger, env: Arc<dyn EnvSource>) -> Self {
        Self {
            logger: logger.child("deployments"),
            env,
        }
    }

    pub async fn get_deployments(&self) -> String {
        match self.fetch().await {
            Ok(body) => body,
            Err(err) => {
                self.logger.warn(
                    "get_deployments failed",
                    Some(&serde_json::json!({
                        "category": format!("{:?}", err.category()),
                        "error": redact_text(&err.to_string(), LOG_BODY_PREVIEW_BYTES),
                    })),
                );
                render_failure(&err)
            }
        }
    }

    async fn fetch(&self) -> Result<String, GatewayError> {
        let config = GatewayConfig::resolve(self.env.as_ref())?;
        let client = HttpClient::from_config(self.logger.clone(), &config.client)?
            .authenticate()
            .await?;

        let path = deployments_path(&config.workspace_id);
        self.logger.debug(
            "listing deployments",
            Some(&serde_json::json!({ "workspace_id": config.workspace_id })),
        );
        let response = client
            .http()
            .get(client.url_for(&path))
            .bearer_auth(client.bearer_token())
            .send()
            .await
            .map_err(GatewayError::Network)?;
        let status = response.status();
        let body = response.text().await.map_err(GatewayError::Network)?;
        if status != StatusCode::OK {
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ToolHandler for DeploymentsManager {
    async fn handle(&self, _args: Value) -> Result<Value, ToolError> {
        Ok(Value::String(self.get_deployments().await))
    }
}
