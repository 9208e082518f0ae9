//! MCP Tool definitions

use serde::{Deserialize, Serialize};

/// A tool exposed to the MCP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (e.g., "send_email")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Input parameters
    pub parameters: Vec<ToolParameter>,
}

impl Tool {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Convert to the `tools/list` entry with a JSON-schema input contract
    pub fn to_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = serde_json::json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(default) = &param.default {
                property["default"] = default.clone();
            }
            properties.insert(param.name.clone(), property);
            if param.required {
                required.push(param.name.clone());
            }
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

/// Tool parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: String, // "string", "number", "boolean", "object"
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    pub fn new(name: &str, description: &str, param_type: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type: param_type.to_string(),
            required,
            default: None,
        }
    }

    pub fn string(name: &str, description: &str, required: bool) -> Self {
        Self::new(name, description, "string", required)
    }

    pub fn number(name: &str, description: &str, required: bool) -> Self {
        Self::new(name, description, "number", required)
    }

    pub fn boolean(name: &str, description: &str, required: bool) -> Self {
        Self::new(name, description, "boolean", required)
    }

    pub fn object(name: &str, description: &str, required: bool) -> Self {
        Self::new(name, description, "object", required)
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_required_parameters() {
        let tool = Tool::new("send_email", "Send an email")
            .with_parameter(ToolParameter::string("to", "Recipient", true))
            .with_parameter(
                ToolParameter::boolean("isHtml", "Send as HTML", false)
                    .with_default(serde_json::json!(false)),
            );

        let schema = tool.to_schema();
        assert_eq!(schema["name"], "send_email");
        assert_eq!(schema["inputSchema"]["type"], "object");
        assert_eq!(schema["inputSchema"]["required"], serde_json::json!(["to"]));
        assert_eq!(schema["inputSchema"]["properties"]["to"]["type"], "string");
        assert_eq!(
            schema["inputSchema"]["properties"]["isHtml"]["default"],
            serde_json::json!(false)
        );
        assert!(schema["inputSchema"]["properties"]["to"].get("default").is_none());
    }

    #[test]
    fn test_schema_without_parameters() {
        let schema = Tool::new("list_labels", "List labels").to_schema();
        assert_eq!(schema["inputSchema"]["properties"], serde_json::json!({}));
        assert_eq!(schema["inputSchema"]["required"], serde_json::json!([]));
    }
}
