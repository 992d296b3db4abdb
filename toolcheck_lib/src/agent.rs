//! Tool-executing chat loop.
//!
//! The agent sends the user message, executes every tool the model asks for,
//! feeds the results back, and stops when the model answers without tool calls
//! or when the step limit is reached.
use tracing::{debug, warn};
use crate::error::Error;
use crate::llm::{LLMChat, Message, Role, ToolCall};
use crate::tools::{Tool, ToolChoice};

/// Default limit of model turns.
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Executed tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUsage {
    /// Tool name.
    pub name: String,
    /// Raw JSON arguments.
    pub arguments: String,
    /// Result reported back to the model.
    pub result: String,
}

/// Outcome of an agent run.
#[derive(Debug, Clone, Default)]
pub struct AgentRun {
    /// Final text answer.
    pub text: Option<String>,
    /// Tools executed during the run.
    pub tool_usage: Vec<ToolUsage>,
    /// Finish reason of the last completion.
    pub finish_reason: Option<String>,
    /// Model that served the last completion.
    pub model: Option<String>,
    /// The model gave a final answer within the step limit.
    pub completed: bool,
}

/// Agent.
pub struct Agent {
    chat: Box<dyn LLMChat>,
    tools: Vec<Box<dyn Tool>>,
    max_steps: usize,
}

impl Agent {

    /// Create new agent.
    /// `chat` must have been created with the specs of `tools`.
    pub fn new(mut chat: Box<dyn LLMChat>, instructions: &str, tools: Vec<Box<dyn Tool>>) -> Self {
        chat.set_system_prompt(instructions.to_owned());
        Agent {
            chat,
            tools,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Set the limit of model turns.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Run agent on a user message.
    ///
    /// Reaching the step limit is not an error: the run is returned with
    /// `completed` unset and the tools executed so far.
    pub fn run(&mut self, prompt: &str) -> Result<AgentRun, Error> {
        let choice = if self.tools.is_empty() { ToolChoice::None } else { ToolChoice::Auto };

        let mut run = AgentRun::default();
        let mut next_messages = vec![Message::text(Role::User, prompt.to_owned())];

        for step in 0..self.max_steps {
            let completion = self.chat.get_inference(&next_messages, choice.clone())?;

            run.finish_reason = completion.finish_reason.clone();
            run.model = completion.model.clone();

            let calls: Vec<&ToolCall> = completion.tool_calls().collect();
            if calls.is_empty() {
                run.text = completion.text();
                run.completed = true;
                return Ok(run);
            }

            debug!("agent step {step}: {} tool call(s)", calls.len());

            next_messages = calls.into_iter()
                .map(|call| {
                    let result = self.process_tool_call(call);
                    run.tool_usage.push(ToolUsage {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                        result: result.clone(),
                    });
                    Message::tool_result(call.call_id.clone(), call.name.clone(), result)
                })
                .collect();
        }

        warn!("agent did not finish within {} steps", self.max_steps);
        Ok(run)
    }

    fn process_tool_call(&self, tool_call: &ToolCall) -> String {
        let tool = self.tools.iter().find(|t| t.get_tool_spec().name == tool_call.name);

        let Some(tool) = tool else {
            return format!("Unknown tool \"{}\" was requested.", tool_call.name);
        };

        match tool_call.params().and_then(|params| tool.call_tool(&params)) {
            Ok(result) => result,
            Err(err) => format!("Tool call failed: {err}"),
        }
    }
}
