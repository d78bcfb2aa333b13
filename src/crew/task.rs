use crate::crew::agent::Agent;

/// A unit of work bound to the agent that performs it.
#[derive(Debug, Clone)]
pub struct Task {
    description: String,
    expected_output: String,
    agent: Agent,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Agent,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// User prompt for this task, with earlier answers as optional context.
    pub fn prompt(&self, context: Option<&str>) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\nYou MUST return the actual complete content as the final answer, not a summary.",
            self.description, self.expected_output
        );
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(context);
        }
        prompt.push_str("\n\nBegin! Give your best Final Answer.");
        prompt
    }
}
