//! Probe requests and classification of their outcomes.
//!
//! Two probes are sent to every (model, provider) pair:
//! a tool probe asking for the weather with the `get_weather` tool declared,
//! and a structured output probe requesting a JSON schema answer.
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::config::ChatConfig;
use crate::error::Error;
use crate::llm::Completion;
use crate::tools::{Tool, ToolSpec, WeatherTool};

/// Prompt of the tool probe.
pub const TOOL_PROMPT: &str = "What's the weather like in San Francisco?";

/// Prompt of the structured output probe.
pub const STRUCTURED_PROMPT: &str = "What's the weather like in London?";

/// Token limit of every probe request.
pub const PROBE_MAX_TOKENS: i64 = 1000;

/// Keys a structured answer must contain.
pub const STRUCTURED_KEYS: [&str; 3] = ["location", "temperature", "conditions"];

/// Outcome of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    /// The model did what was asked.
    Success,
    /// The model answered with text instead of calling the tool.
    NoToolCall,
    /// Empty answer.
    Unclear,
    /// The request failed.
    Error,
    /// Structured answer is not JSON.
    InvalidJson,
    /// Structured answer lacks required keys.
    InvalidSchema,
}

/// Classification of a trial: status plus the support verdict (`None` when unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Trial status.
    pub status: TrialStatus,
    /// Whether the feature looks supported.
    pub supported: Option<bool>,
}

impl Verdict {
    fn new(status: TrialStatus, supported: Option<bool>) -> Self {
        Verdict { status, supported }
    }
}

/// Tool declared by the tool probe.
pub fn weather_tool_spec() -> ToolSpec {
    WeatherTool::new().get_tool_spec()
}

/// JSON schema of the structured answer.
pub fn weather_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "location": {
                "type": "string",
                "description": "City or location name"
            },
            "temperature": {
                "type": "number",
                "description": "Temperature in Celsius"
            },
            "conditions": {
                "type": "string",
                "description": "Weather conditions description"
            }
        },
        "required": STRUCTURED_KEYS,
        "additionalProperties": false
    })
}

/// `response_format` of the structured output probe.
pub fn structured_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "weather",
            "strict": true,
            "schema": weather_schema()
        }
    })
}

/// Chat config of the tool probe.
pub fn tool_probe_config(model: String, api_key: String, api_url: String) -> ChatConfig {
    let mut config = ChatConfig::new(model, api_key, api_url);
    config.max_tokens = Some(PROBE_MAX_TOKENS);
    config
}

/// Chat config of the structured output probe.
pub fn structured_probe_config(model: String, api_key: String, api_url: String) -> ChatConfig {
    let mut config = tool_probe_config(model, api_key, api_url);
    config.response_format = Some(structured_response_format());
    config
}

/// Tool calls of a completion in the OpenAI wire layout, `None` when there are none.
pub fn tool_calls_value(completion: &Completion) -> Option<Value> {
    let calls: Vec<Value> = completion.tool_calls().map(|call| json!({
        "id": call.call_id,
        "type": "function",
        "function": {
            "name": call.name,
            "arguments": call.arguments,
        }
    })).collect();

    if calls.is_empty() {
        None
    } else {
        Some(Value::Array(calls))
    }
}

/// Classify the answer to the tool probe.
pub fn classify_tool_completion(completion: &Completion) -> Verdict {
    if completion.tool_calls().next().is_some() {
        Verdict::new(TrialStatus::Success, Some(true))
    } else if completion.text().is_some() {
        Verdict::new(TrialStatus::NoToolCall, Some(false))
    } else {
        Verdict::new(TrialStatus::Unclear, None)
    }
}

/// Classify the text answer to the structured output probe.
pub fn classify_structured_content(content: Option<&str>) -> Verdict {
    let content = match content {
        Some(c) if !c.is_empty() => c,
        _ => return Verdict::new(TrialStatus::Unclear, None),
    };

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(obj)) if STRUCTURED_KEYS.iter().all(|k| obj.contains_key(*k)) => {
            Verdict::new(TrialStatus::Success, Some(true))
        },
        Ok(_) => Verdict::new(TrialStatus::InvalidSchema, Some(false)),
        Err(_) => Verdict::new(TrialStatus::InvalidJson, Some(false)),
    }
}

/// Text of an error as recorded in the trial.
pub fn error_text(err: &Error) -> String {
    match err {
        Error::HttpStatus { status, body } => format!("Error code: {status} - {body}"),
        _ => err.to_string(),
    }
}

/// Classify a failed tool probe.
///
/// `no_endpoints_rule` enables the OpenRouter rule: a 404 mentioning
/// "No endpoints found" means the provider does not serve tool calls.
pub fn classify_tool_error(err: &Error, no_endpoints_rule: bool) -> Verdict {
    let text = error_text(err);
    let lower = text.to_lowercase();

    let supported = if lower.contains("tool") || lower.contains("function") {
        Some(false)
    } else if no_endpoints_rule {
        if text.contains("404") && text.contains("No endpoints found") {
            Some(false)
        } else {
            None
        }
    } else if text.contains("404") {
        Some(false)
    } else {
        None
    };

    Verdict::new(TrialStatus::Error, supported)
}

/// Classify a failed structured output probe.
pub fn classify_structured_error(err: &Error) -> Verdict {
    let lower = error_text(err).to_lowercase();

    let supported = if ["response_format", "json_schema", "not supported", "invalid"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(false)
    } else {
        None
    };

    Verdict::new(TrialStatus::Error, supported)
}
