//! LLM interface
mod llmchat;
mod openai;
mod util;
mod messages;

pub use llmchat::LLMChat;
pub use llmchat::get_llm_chat;
pub use messages::Completion;
pub use messages::Message;
pub use messages::Role;
pub use messages::Text;
pub use messages::ToolCall;
pub use messages::ToolParam;
pub use messages::ToolResult;
