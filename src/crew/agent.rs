use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::backend::client::{CallOptions, CompletionCallback, LlmClient};
use crate::backend::message::{Message, MessageInput};
use crate::crew::task::Task;
use crate::error::Result;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// A persona-bound reasoning unit.
#[derive(Clone)]
pub struct Agent {
    role: String,
    goal: String,
    backstory: String,
    verbose: bool,
    llm: Arc<dyn LlmClient>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("backstory", &self.backstory)
            .field("verbose", &self.verbose)
            .field("model", &self.llm.model_name())
            .finish()
    }
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            llm,
        }
    }

    /// Log prompts and answers at info level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn llm(&self) -> &Arc<dyn LlmClient> {
        &self.llm
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}\n\nWhen you are done, respond with your complete answer after the line \"{}\".",
            self.role, self.backstory, self.goal, FINAL_ANSWER_MARKER
        )
    }

    /// Run `task` through this agent's client and return the final answer.
    #[instrument(name = "agent_execute_task", skip_all, fields(role = %self.role))]
    pub async fn execute_task(
        &self,
        task: &Task,
        context: Option<&str>,
        usage: Arc<dyn CompletionCallback>,
    ) -> Result<String> {
        let messages = vec![
            Message::system(self.system_prompt()),
            Message::user(task.prompt(context)),
        ];
        if self.verbose {
            info!(task = task.description(), "Agent working on task");
        }

        let options = CallOptions::default().with_callback(usage);
        let answer = self
            .llm
            .call(MessageInput::Messages(messages), options)
            .await?;

        let answer = extract_final_answer(&answer);
        if self.verbose {
            info!(answer = %answer, "Agent final answer");
        } else {
            debug!(answer_len = answer.len(), "Agent final answer");
        }
        Ok(answer)
    }
}

/// Strip the reasoning preamble up to the last `Final Answer:` marker.
///
/// ```
/// use image_insights::extract_final_answer;
///
/// assert_eq!(extract_final_answer("Thought: easy\nFinal Answer: A bridge"), "A bridge");
/// assert_eq!(extract_final_answer("  A bridge \n"), "A bridge");
/// ```
pub fn extract_final_answer(text: &str) -> String {
    match text.rfind(FINAL_ANSWER_MARKER) {
        Some(index) => text[index + FINAL_ANSWER_MARKER.len()..].trim().to_string(),
        None => text.trim().to_string(),
    }
}
