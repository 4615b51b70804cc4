use crate::errors::McpError;
use crate::services::tool_executor::strip_trace_fields;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_CATALOG.iter().find(|tool| tool.name == name)
}

/// Checks call arguments against the tool's input schema. Trace fields are
/// accepted on every tool and are not part of any schema.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), McpError> {
    let Some(schema) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    let args = strip_trace_fields(args);
    if let Err(errors) = schema.validate(&args) {
        let rendered: Vec<String> = errors
            .take(10)
            .map(|err| {
                let location = err.instance_path.to_string();
                if location.is_empty() {
                    format!("(root): {}", err)
                } else {
                    format!("{}: {}", location, err)
                }
            })
            .collect();
        return Err(McpError::invalid_params(format!(
            "Invalid arguments for {}: {}",
            tool_name,
            rendered.join("; ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn catalog_exposes_get_deployments() {
        let tool = tool_by_name("get_deployments").expect("tool");
        assert_eq!(tool.input_schema["type"], "object");
        assert_eq!(tool_catalog().len(), 1);
    }

    #[test]
    fn parameterless_tool_accepts_empty_and_trace_args() {
        assert!(validate_tool_args("get_deployments", &Value::Null).is_ok());
        assert!(validate_tool_args("get_deployments", &serde_json::json!({})).is_ok());
        assert!(
            validate_tool_args("get_deployments", &serde_json::json!({"trace_id": "t"})).is_ok()
        );
    }

    #[test]
    fn unexpected_arguments_are_rejected() {
        let err = validate_tool_args("get_deployments", &serde_json::json!({"workspace": "x"}))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert!(err.message.starts_with("Invalid arguments for get_deployments"));
    }
}
