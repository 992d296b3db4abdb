use std::rc::Rc;
use serde_json::{json, Value};
use crate::agent::{Agent, AgentRun, DEFAULT_MAX_STEPS};
use crate::config::{ChatConfig, Platform, PlatformConfig};
use crate::error::Error;
use crate::llm::get_llm_chat;
use crate::probe::{self, TrialStatus};
use crate::request::Client;
use crate::results::TrialRecord;
use crate::tools::{Tool, WeatherTool};
use super::{Checker, ProviderInfo, IONET_PROVIDER};

const TOOL_INSTRUCTIONS: &str = "You are a helpful assistant that can use tools when appropriate. Use the get_weather tool to check weather.";

const STRUCTURED_INSTRUCTIONS: &str = "You are a weather information assistant. Provide weather information in the requested format.";

// Tool the agent framework uses internally to return the final answer.
const FINAL_RESULT_TOOL: &str = "final_result";

const AGENT_TEMPERATURE: f64 = 0.1;

/// io.net accessed the way an agent framework does: an instructed agent with
/// registered tools runs a tool-executing loop, and success is judged on what
/// the agent actually did rather than on the raw response.
pub struct LibraryChecker {
    client: Rc<dyn Client>,
    config: PlatformConfig,
}

/// Strip a markdown code fence around a JSON answer.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim()
}

impl LibraryChecker {

    /// Create checker.
    pub fn new(client: Rc<dyn Client>, config: PlatformConfig) -> Self {
        LibraryChecker { client, config }
    }

    fn agent_config(&self, model_id: &str) -> ChatConfig {
        let mut config = ChatConfig::new(model_id.to_owned(), self.config.api_key.clone(), self.config.chat_url());
        config.temperature = Some(AGENT_TEMPERATURE);
        config.max_tokens = Some(probe::PROBE_MAX_TOKENS);
        config
    }

    fn tool_agent(&self, model_id: &str) -> Agent {
        let weather = WeatherTool::new();
        let chat = get_llm_chat(self.agent_config(model_id), self.client.clone(), vec![weather.get_tool_spec()]);
        Agent::new(chat, TOOL_INSTRUCTIONS, vec![Box::new(weather)])
    }

    fn structured_agent(&self, model_id: &str) -> Agent {
        let instructions = format!(
            "{STRUCTURED_INSTRUCTIONS} Respond only with a JSON object matching this JSON schema, without any other text:\n{}",
            probe::weather_schema()
        );
        let chat = get_llm_chat(self.agent_config(model_id), self.client.clone(), vec![]);
        Agent::new(chat, &instructions, vec![])
    }

    fn error_record(model_id: &str, err: &Error, structured: bool) -> TrialRecord {
        let verdict = if structured {
            probe::classify_structured_error(err)
        } else {
            probe::classify_tool_error(err, false)
        };
        let mut record = TrialRecord::new(model_id, IONET_PROVIDER, verdict.status, verdict.supported);
        record.error = Some(probe::error_text(err));
        record
    }

    fn tool_record(model_id: &str, run: AgentRun) -> TrialRecord {
        let used: Vec<Value> = run.tool_usage.iter()
            .filter(|usage| usage.name != FINAL_RESULT_TOOL)
            .map(|usage| json!({
                "name": usage.name,
                "arguments": usage.arguments,
                "result": usage.result,
            }))
            .collect();

        let mut record = if used.is_empty() {
            TrialRecord::new(model_id, IONET_PROVIDER, TrialStatus::NoToolCall, Some(false))
        } else {
            let mut record = TrialRecord::new(model_id, IONET_PROVIDER, TrialStatus::Success, Some(true));
            record.tool_calls = Some(Value::Array(used));
            record
        };
        record.response_content = run.text;
        record.finish_reason = run.finish_reason;
        record.model_used = run.model;
        record
    }

    fn structured_record(model_id: &str, run: AgentRun) -> TrialRecord {
        if !run.completed {
            let mut record = TrialRecord::new(model_id, IONET_PROVIDER, TrialStatus::Error, None);
            record.error = Some(format!("agent did not finish within {DEFAULT_MAX_STEPS} steps"));
            record.finish_reason = run.finish_reason;
            record.model_used = run.model;
            return record;
        }

        let content = run.text.as_deref().map(strip_code_fence);
        let verdict = probe::classify_structured_content(content);
        let mut record = TrialRecord::new(model_id, IONET_PROVIDER, verdict.status, verdict.supported);
        record.response_content = content.map(str::to_owned);
        record.finish_reason = run.finish_reason;
        record.model_used = run.model;
        record
    }
}

impl Checker for LibraryChecker {

    fn platform(&self) -> Platform {
        Platform::IoNetLibrary
    }

    fn list_providers(&self, _model_id: &str) -> Result<Vec<ProviderInfo>, Error> {
        Ok(vec![ProviderInfo::named(IONET_PROVIDER)])
    }

    fn tool_trial(&self, model_id: &str, _provider: &ProviderInfo) -> TrialRecord {
        match self.tool_agent(model_id).run(probe::TOOL_PROMPT) {
            Ok(run) => Self::tool_record(model_id, run),
            Err(err) => Self::error_record(model_id, &err, false),
        }
    }

    fn structured_trial(&self, model_id: &str, _provider: &ProviderInfo) -> TrialRecord {
        match self.structured_agent(model_id).run(probe::STRUCTURED_PROMPT) {
            Ok(run) => Self::structured_record(model_id, run),
            Err(err) => Self::error_record(model_id, &err, true),
        }
    }
}
