use std::fmt;
use std::sync::Mutex;

use crate::backend::client::CompletionCallback;
use crate::backend::usage::TokenUsage;

/// Answer of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutput {
    pub description: String,
    pub agent_role: String,
    pub raw: String,
}

/// Result of [`Crew::kickoff`](crate::Crew::kickoff).
///
/// Displays as the final task's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewOutput {
    /// Answer of the last task
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
    /// Usage summed over every completion of the run
    pub token_usage: TokenUsage,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Callback summing the usage of every completion it sees.
#[derive(Debug, Default)]
pub struct UsageRecorder {
    total: Mutex<TokenUsage>,
}

impl UsageRecorder {
    pub fn total(&self) -> TokenUsage {
        self.total
            .lock()
            .map(|total| total.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl CompletionCallback for UsageRecorder {
    fn on_success(&self, usage: &TokenUsage) {
        let mut total = self
            .total
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *total += usage;
    }
}
