use crate::config::{EnvSource, ProcessEnv};
use crate::constants::env;
use crate::errors::ToolError;
use crate::managers;
use crate::mcp::catalog::tool_catalog;
use crate::services::logger::{LogLevel, Logger};
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(
            ToolError::internal(format!("Tool wiring is incomplete: {}", missing.join(", ")))
                .with_hint("Every tool in tool_catalog.json must have a registered handler."),
        )
    }

    pub fn initialize() -> Result<Self, ToolError> {
        Self::with_env(Arc::new(ProcessEnv))
    }

    /// Wires the server against an explicit parameter source. Gateway
    /// parameters are read from `source` on every tool call, never cached.
    pub fn with_env(source: Arc<dyn EnvSource>) -> Result<Self, ToolError> {
        let level = LogLevel::parse(source.var(env::LOG_LEVEL).as_deref());
        let logger = Logger::new("oicm", level);

        let deployments_manager = Arc::new(managers::deployments::DeploymentsManager::new(
            logger.clone(),
            source.clone(),
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("get_deployments".to_string(), deployments_manager);

        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        logger.debug(
            "tools registered",
            Some(&serde_json::json!({ "tools": tool_executor.tool_names() })),
        );

        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
