use std::fmt::Display;
use serde_json::Value;
use crate::error::Error;


/// Logical roles (provider-independent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// System.
    System = 0,
    /// Model.
    Model = 1,
    /// User.
    User = 2,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            Role::System => "system",
            Role::Model => "assistant",
            Role::User => "user",
        };
        f.write_str(role)
    }
}

/// Chat message.
#[derive(Debug, Clone)]
pub enum Message {
    /// Text message.
    Text(Text),
    /// Tool call.
    ToolCall(ToolCall),
    /// Tool call result.
    ToolResult(ToolResult),
}

impl Message {
    /// Create text message.
    pub fn text(role: Role, message: String) -> Self {
        Message::Text(Text {role, message})
    }

    /// Create tool result message.
    pub fn tool_result(call_id: String, name: String, result: String) -> Self {
        Message::ToolResult(ToolResult { call_id, name, result })
    }
}

/// Chat message.
#[derive(Debug, Clone)]
pub struct Text {
    /// Role.
    pub role: Role,
    /// Message content.
    pub message: String,
}

/// Tool call result.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Call id.
    pub call_id: String,
    /// Tool name.
    pub name: String,
    /// Call result.
    pub result: String
}

/// Tool call request.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Call id.
    pub call_id: String,
    /// Tool name.
    pub name: String,
    /// Raw JSON arguments as returned by the model.
    pub arguments: String,
}

impl ToolCall {
    /// Parse arguments into named values.
    pub fn params(&self) -> Result<Vec<ToolParam>, Error> {
        if self.arguments.trim().is_empty() {
            return Ok(vec![]);
        }

        let args_obj = serde_json::from_str::<Value>(&self.arguments)?;

        let params = args_obj
            .as_object()
            .ok_or(Error::LLMResponseError("can't enumerate arguments."))?
            .iter()
            .map(|(k, v)| ToolParam { name: k.clone(), value: v.clone() })
            .collect();

        Ok(params)
    }
}

/// Tool parameters.
#[derive(Debug, Clone)]
pub struct ToolParam {
    /// Parameter name.
    pub name: String,
    /// Value.
    pub value: Value,
}

/// Result of one inference call.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Messages and tool call requests of the first choice.
    pub messages: Vec<Message>,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
    /// Model that actually served the request.
    pub model: Option<String>,
}

impl Completion {
    /// Tool call requests.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.messages.iter().filter_map(|m| match m {
            Message::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    /// Concatenated text content, `None` if the model returned no text.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self.messages.iter().filter_map(|m| match m {
            Message::Text(txt) if !txt.message.is_empty() => Some(txt.message.as_str()),
            _ => None,
        }).collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_params() {
        let call = ToolCall {
            call_id: "id".into(),
            name: "get_weather".into(),
            arguments: "{\"location\": \"Berlin\", \"unit\": \"celsius\"}".into(),
        };
        let params = call.params().expect("parse arguments");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "location");
        assert_eq!(params[0].value, Value::String("Berlin".into()));

        let call = ToolCall { arguments: "  ".into(), ..call };
        assert!(call.params().expect("empty arguments").is_empty());

        let call = ToolCall { arguments: "[1, 2]".into(), ..call };
        assert!(matches!(call.params(), Err(Error::LLMResponseError(_))));

        let call = ToolCall { arguments: "{location".into(), ..call };
        assert!(matches!(call.params(), Err(Error::LLMJsonError(_))));
    }

    #[test]
    fn test_completion_text() {
        let completion = Completion {
            messages: vec![
                Message::text(Role::Model, "".into()),
                Message::ToolCall(ToolCall { call_id: "1".into(), name: "t".into(), arguments: "{}".into() }),
            ],
            ..Default::default()
        };
        assert_eq!(completion.text(), None);
        assert_eq!(completion.tool_calls().count(), 1);

        let completion = Completion {
            messages: vec![Message::text(Role::Model, "hello".into())],
            ..Default::default()
        };
        assert_eq!(completion.text(), Some("hello".into()));
        assert_eq!(completion.tool_calls().count(), 0);
    }
}
