use std::rc::Rc;
use crate::llm::openai::OpenAIChat;
use crate::config::ChatConfig;
use crate::error::Error;
use crate::request::Client;
use crate::tools::{ToolChoice, ToolSpec};
use super::{Completion, Message};

/// Chat with LLM with storing history.
pub trait LLMChat {

    /// Add input messages to the message history.
    /// Input messages contains user message(s), and tool call results.
    /// Returns the model messages and/or tool call requests.
    fn get_inference(&mut self, messages: &[Message], tools: ToolChoice) -> Result<Completion, Error>;

    /// Clear chat history.
    fn clear_history(&mut self);

    /// Update system prompt.
    fn set_system_prompt(&mut self, prompt: String);
}

/// Create LLMChat instance for an OpenAI-compatible endpoint.
pub fn get_llm_chat(config: ChatConfig, client: Rc<dyn Client>, tools: Vec<ToolSpec>) -> Box<dyn LLMChat> {
    Box::new(OpenAIChat::new(config, client, tools))
}
