use std::rc::Rc;
use crate::llm::util::{role_to_llm, tool_params_to_value};
use crate::llm::LLMChat;
use crate::config::ChatConfig;
use crate::error::Error;
use crate::tools::{ToolChoice, ToolSpec};
use crate::val_as_str;
use serde_json::{json, Value};
use crate::request::Client;
use super::messages::Text;
use super::{Completion, Message, ToolCall};
use super::util::{self, llm_to_role};

/// Chat over an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIChat {
    system_prompt: String,
    history: Vec<Value>,
    config: ChatConfig,
    client: Rc<dyn Client>,
    tools: Vec<ToolSpec>,
}

impl OpenAIChat {
    pub(super) fn new(config: ChatConfig, client: Rc<dyn Client>, tools: Vec<ToolSpec>) -> Self {
        OpenAIChat {
            system_prompt: String::new(),
            history: vec![],
            config,
            client,
            tools,
        }
    }

    fn prep_payload(&mut self, messages: &[Message], tools: ToolChoice) -> Value {

        let mut payload = json!({
            "model": self.config.name
        });

        for message in messages {
            match message {
                Message::Text(txt) => {
                    self.history.push(json!({
                        "role": role_to_llm(txt.role),
                        "content": txt.message
                    }));
                },
                Message::ToolResult(res) => {
                    self.history.push(json!({
                        "role": "tool",
                        "content": res.result,
                        "tool_call_id": res.call_id
                    }));
                },
                Message::ToolCall(_) => {},
            }
        }

        payload["messages"] = Value::Array(self.history.clone());

        util::set_f64_param(&mut payload, "temperature", &self.config.temperature);
        util::set_i64_param(&mut payload, "max_tokens", &self.config.max_tokens);

        if let Some(format) = &self.config.response_format {
            payload["response_format"] = format.clone();
        }

        self.prep_tool_use(&mut payload, tools);

        if let Some(extra) = &self.config.extra_body {
            util::merge_object(&mut payload, extra);
        }

        payload
    }

    fn prep_tool_use(&self, payload: &mut Value, tools: ToolChoice) {
        match tools {
            ToolChoice::None => {},
            ToolChoice::Auto => {
                self.add_tools(payload);
            },
        };
    }

    fn add_tools(&self, payload: &mut Value) {
        if self.tools.is_empty() {
            return;
        }

        let mut arr = Vec::with_capacity(self.tools.len());
        for spec in self.tools.iter() {
            arr.push(json!({
                "type": "function",
                "function": {
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": tool_params_to_value(&spec.params),
                }
            }));
        }
        payload["tools"] = Value::Array(arr);
    }

    fn check_for_error(&self, response: &Value) -> Result<(), Error> {
        if let Some(error) = response.get("error") {
            let errmes = match error {
                Value::String(s) => s.clone(),
                _ => error["message"].as_str().map(str::to_owned).unwrap_or_else(|| error.to_string()),
            };
            return Err(Error::LLMErrorMessage(errmes));
        }
        Ok(())
    }

    fn process_response(&mut self, response: Value) -> Result<Completion, Error> {

        self.check_for_error(&response)?;

        let choice = response["choices"].as_array()
            .ok_or(Error::LLMResponseError("unexpected answer format, can't enumerate response messages."))?
            .first()
            .ok_or(Error::LLMResponseError("response contains no choices."))?;

        let msg = &choice["message"];

        self.history.push(msg.clone());

        let role = match msg["role"].as_str() {
            Some(role) => llm_to_role(role)?,
            None => super::Role::Model,
        };

        let mut result = Vec::new();

        if !msg["content"].is_null() {
            let content = val_as_str!(msg["content"], "message content").to_owned();
            result.push(Message::Text(Text{role, message: content}));
        }

        if !msg["refusal"].is_null() {
            let content = val_as_str!(msg["refusal"], "refusal content").to_owned();
            result.push(Message::Text(Text{role, message: content}));
        }

        if !msg["tool_calls"].is_null() {
            for call in msg["tool_calls"].as_array()
                .ok_or(Error::LLMResponseError("unexpected answer format, can't enumerate tool call requests."))?
            {
                let call_id = call["id"].as_str().unwrap_or_default().to_owned();
                let name = val_as_str!(call["function"]["name"], "tool name").to_owned();

                // Some providers send arguments as an object instead of a JSON string.
                let arguments = match &call["function"]["arguments"] {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };

                result.push(Message::ToolCall(ToolCall{call_id, name, arguments}));
            }
        }

        Ok(Completion {
            messages: result,
            finish_reason: choice["finish_reason"].as_str().map(str::to_owned),
            model: response["model"].as_str().map(str::to_owned),
        })
    }
}

impl LLMChat for OpenAIChat {

    fn get_inference(&mut self, messages: &[Message], tools: ToolChoice) -> Result<Completion, Error> {
        let payload = self.prep_payload(messages, tools);

        let token = format!("Bearer {}", self.config.api_key);
        let headers = &[("Authorization", token.as_ref())];

        let response = self.client.make_json_request(&self.config.api_url, payload, headers, &[])?;

        self.process_response(response)
    }

    fn clear_history(&mut self) {
        self.history.clear();
        if !self.system_prompt.is_empty() {
            let prompt = self.system_prompt.clone();
            self.set_system_prompt(prompt);
        }
    }

    fn set_system_prompt(&mut self, prompt: String) {
        self.system_prompt = prompt;
        let val = json!({
            "role": "system",
            "content": self.system_prompt.clone(),
        });

        if self.history.is_empty() {
            self.history.push(val);
        } else {
            self.history[0] = val;
        }
    }
}
