//! Tool system for the agent layer
//!
//! Provides the abstraction through which an external agent calls into the
//! garden. Calls carry the tool-call id so streamed arguments and the final
//! call land on the same review.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

pub mod generate_haiku;

pub use generate_haiku::GenerateHaikuTool;

/// Definition of a tool that can be sent to the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,
    /// Description for the LLM
    pub description: String,
    /// JSON Schema for parameters
    pub parameters: serde_json::Value,
    /// TypeScript interface definition (for system prompts)
    pub parameters_ts: Option<String>,
}

/// Trait for implementing tools that AI agents can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of this tool
    fn name(&self) -> String;

    /// Get the tool definition for the LLM
    async fn definition(&self) -> ToolDefinition;

    /// Observe arguments while the call is still streaming
    async fn preview(&self, _call_id: &str, _partial_arguments: &str) -> anyhow::Result<()> {
        Ok(())
    }

    /// Execute the tool with the given arguments (JSON string)
    async fn call(&self, call_id: &str, arguments: &str) -> anyhow::Result<String>;
}

/// A set of tools keyed by name
#[derive(Clone)]
pub struct ToolSet {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Cached definitions to avoid async calls during prompt generation
    cached_definitions: Arc<parking_lot::RwLock<HashMap<String, ToolDefinition>>>,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolSet {
    /// Create an empty toolset
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            cached_definitions: Arc::new(parking_lot::RwLock::new(HashMap::new())),
        }
    }

    /// Add a tool to the set
    pub fn add<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.add_shared(Arc::new(tool))
    }

    /// Add a shared tool to the set
    pub fn add_shared(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        let name = tool.name();
        self.cached_definitions.write().remove(&name);
        self.tools.insert(name, tool);
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool definitions, sorted by name
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();

        let mut defs = Vec::with_capacity(names.len());
        for name in names {
            // Check cache in a small block to ensure guard is dropped
            let cached = { self.cached_definitions.read().get(name).cloned() };

            if let Some(def) = cached {
                defs.push(def);
            } else if let Some(tool) = self.tools.get(name) {
                let def = tool.definition().await;
                self.cached_definitions
                    .write()
                    .insert(name.clone(), def.clone());
                defs.push(def);
            }
        }
        defs
    }

    fn lookup(&self, name: &str) -> Result<&Arc<dyn Tool>> {
        self.tools
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))
    }

    /// Forward streaming arguments to a tool
    pub async fn preview(&self, name: &str, call_id: &str, partial_arguments: &str) -> Result<()> {
        self.lookup(name)?
            .preview(call_id, partial_arguments)
            .await
            .map_err(|e| Error::tool_execution(name, e.to_string()))
    }

    /// Call a tool by name
    pub async fn call(&self, name: &str, call_id: &str, arguments: &str) -> Result<String> {
        self.lookup(name)?
            .call(call_id, arguments)
            .await
            .map_err(|e| Error::tool_execution(name, e.to_string()))
    }

    /// Get the number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterate over tools
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arc<dyn Tool>)> {
        self.tools.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> String {
            "echo".to_string()
        }

        async fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "echo".to_string(),
                description: "Echo back the input".to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "message": {
                            "type": "string",
                            "description": "Message to echo"
                        }
                    },
                    "required": ["message"]
                }),
                parameters_ts: None,
            }
        }

        async fn call(&self, _call_id: &str, arguments: &str) -> anyhow::Result<String> {
            #[derive(Deserialize)]
            struct Args {
                message: String,
            }
            let args: Args = serde_json::from_str(arguments)?;
            Ok(args.message)
        }
    }

    #[tokio::test]
    async fn test_toolset() {
        let mut toolset = ToolSet::new();
        toolset.add(EchoTool);

        assert!(toolset.contains("echo"));
        assert_eq!(toolset.len(), 1);

        let result = toolset
            .call("echo", "call-1", r#"{"message": "hello"}"#)
            .await
            .expect("call should succeed");
        assert_eq!(result, "hello");

        // default preview is a no-op
        toolset.preview("echo", "call-1", "{").await.unwrap();

        let defs = toolset.definitions().await;
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn test_tool_errors() {
        let mut toolset = ToolSet::new();
        toolset.add(EchoTool);

        assert!(matches!(
            toolset.call("missing", "call-1", "{}").await,
            Err(Error::ToolNotFound(name)) if name == "missing"
        ));
        assert!(matches!(
            toolset.call("echo", "call-1", "{}").await,
            Err(Error::ToolExecution { tool_name, .. }) if tool_name == "echo"
        ));
    }
}
