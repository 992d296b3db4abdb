use serde::Serialize;
use crate::error::Error;
use crate::llm::ToolParam as InputParam;

/// Tool parameter data types.
#[derive(Debug, Clone, Copy)]
pub enum ParamType {
    /// String.
    String,
    /// Integer.
    Integer,
    /// Number.
    Number,
    /// Boolean.
    Boolean,
}

impl Serialize for ParamType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: serde::Serializer {
        match &self {
            ParamType::String => serializer.serialize_str("string"),
            ParamType::Integer => serializer.serialize_str("integer"),
            ParamType::Number => serializer.serialize_str("number"),
            ParamType::Boolean => serializer.serialize_str("boolean"),
        }
    }
}

/// Tool parameter specification.
#[derive(Debug, Clone)]
pub struct ToolParam {
    /// Parameter name.
    pub name: String,
    /// Parameter description.
    pub description: String,
    /// Parameter data type.
    pub data_type: ParamType,
    /// Value is required.
    pub required: bool,
    /// Allowed values (JSON schema `enum`), empty when unrestricted.
    pub allowed: Vec<String>,
}

/// Tool specification.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool/function name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// Tool parameters.
    pub params: Vec<ToolParam>,
}

/// Tool choice settings.
#[derive(Debug, Clone)]
pub enum ToolChoice {
    /// Do not send tools.
    None,
    /// LLM decide whether to call any of provided tools or not.
    Auto,
}

/// Tool the agent can execute on behalf of the model.
pub trait Tool {
    /// Return tool specification.
    fn get_tool_spec(&self) -> ToolSpec;

    /// Check params and execute the tool.
    /// Invalid input is reported back to the model as the result text.
    fn call_tool(&self, params: &[InputParam]) -> Result<String, Error>;
}
