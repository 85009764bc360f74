//! Tool trait and schema types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A named string parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Schema of a tool as advertised to the model. Every parameter is a required string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.push(ToolParameter::new(name, description));
        self
    }
}

/// Trait for tool implementations
///
/// A handler receives the JSON object of arguments chosen by the model and
/// returns a single text blob that can be placed into the next prompt.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Schema advertised to the model
    fn spec(&self) -> ToolSpec;

    /// Execute the tool
    async fn call(&self, arguments: &serde_json::Value) -> Result<String>;
}

/// Fetch a required string argument from a tool call
pub fn string_argument<'a>(arguments: &'a serde_json::Value, name: &str) -> Result<&'a str> {
    arguments
        .get(name)
        .ok_or_else(|| Error::InvalidInput(format!("missing argument '{}'", name)))?
        .as_str()
        .ok_or_else(|| Error::InvalidInput(format!("argument '{}' must be a string", name)))
}
