use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ToolError;
use crate::services::logger::Logger;

use serde_json::Value;

/// Argument keys the executor owns; handlers never see them.
pub const TRACE_FIELDS: &[&str] = &["trace_id", "span_id", "parent_span_id"];

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

fn string_arg(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Drops executor-owned keys and turns a missing argument object into `{}`.
pub fn strip_trace_fields(args: &Value) -> Value {
    match args {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !TRACE_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    }
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn has_handler(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let started_at = chrono::Utc::now().timestamp_millis();
        let Some(handler) = self.handlers.get(tool) else {
            return Err(
                ToolError::not_found(format!("Unknown tool: {}", tool)).with_hint(format!(
                    "Available tools: {}",
                    self.tool_names().join(", ")
                )),
            );
        };

        let trace_id =
            string_arg(&args, "trace_id").unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let span_id =
            string_arg(&args, "span_id").unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let parent_span_id = string_arg(&args, "parent_span_id");

        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({ "tool": tool, "trace_id": trace_id })),
        );

        let result = handler.handle(strip_trace_fields(&args)).await?;
        let duration_ms = chrono::Utc::now().timestamp_millis() - started_at;

        self.logger.debug(
            "tool call finished",
            Some(&serde_json::json!({
                "tool": tool,
                "trace_id": trace_id,
                "duration_ms": duration_ms,
            })),
        );

        Ok(serde_json::json!({
            "ok": true,
            "result": result,
            "meta": {
                "tool": tool,
                "trace_id": trace_id,
                "span_id": span_id,
                "parent_span_id": parent_span_id,
                "duration_ms": duration_ms,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolErrorKind;
    use crate::services::logger::LogLevel;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, args: Value) -> Result<Value, ToolError> {
            Ok(args)
        }
    }

    fn executor() -> ToolExecutor {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("echo".to_string(), Arc::new(Echo));
        ToolExecutor::new(Logger::new("test", LogLevel::Error), handlers)
    }

    #[tokio::test]
    async fn execute_wraps_result_with_meta() {
        let payload = executor()
            .execute(
                "echo",
                serde_json::json!({"value": 1, "trace_id": "t-1", "span_id": "s-1"}),
            )
            .await
            .expect("payload");
        assert_eq!(payload["ok"], Value::Bool(true));
        assert_eq!(payload["result"], serde_json::json!({"value": 1}));
        assert_eq!(payload["meta"]["trace_id"], "t-1");
        assert_eq!(payload["meta"]["span_id"], "s-1");
        assert!(payload["meta"]["duration_ms"].is_i64());
    }

    #[tokio::test]
    async fn execute_generates_trace_ids() {
        let payload = executor()
            .execute("echo", Value::Null)
            .await
            .expect("payload");
        assert_eq!(payload["result"], serde_json::json!({}));
        let trace_id = payload["meta"]["trace_id"].as_str().expect("trace id");
        assert!(uuid::Uuid::parse_str(trace_id).is_ok());
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let err = executor()
            .execute("nope", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::NotFound);
        assert_eq!(err.hint.as_deref(), Some("Available tools: echo"));
    }
}
