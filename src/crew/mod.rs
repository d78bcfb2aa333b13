//! Minimal agent / task / crew orchestration.
//!
//! An [`Agent`] is a persona (role, goal, backstory) bound to an
//! [`LlmClient`](crate::LlmClient). A [`Task`] describes one unit of work and the
//! shape of the expected answer, and is bound to the agent that performs it. A
//! [`Crew`] runs its tasks in order, feeding earlier outputs to later tasks as
//! context, and returns a [`CrewOutput`].

mod agent;
mod output;
mod task;

pub use agent::{Agent, extract_final_answer};
pub use output::{CrewOutput, TaskOutput, UsageRecorder};
pub use task::Task;

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::backend::usage::TokenUsage;
use crate::error::{InsightError, Result};

/// A group of agents executing their bound tasks sequentially.
#[derive(Debug, Clone)]
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    verbose: bool,
}

impl Crew {
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Self {
        Self {
            agents,
            tasks,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run every task in order and return the last task's answer.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::ValidationError`] for a crew without tasks, and
    /// propagates the first error raised while executing a task.
    #[instrument(name = "crew_kickoff", skip(self), fields(tasks = self.tasks.len()))]
    pub async fn kickoff(&self) -> Result<CrewOutput> {
        if self.tasks.is_empty() {
            return Err(InsightError::ValidationError(
                "a crew needs at least one task".to_string(),
            ));
        }

        let recorder = Arc::new(UsageRecorder::default());
        let mut tasks_output: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for (index, task) in self.tasks.iter().enumerate() {
            let agent = task.agent();
            if self.verbose {
                info!(task = index + 1, agent = agent.role(), "Starting task");
            } else {
                debug!(task = index + 1, agent = agent.role(), "Starting task");
            }

            let context = (!tasks_output.is_empty()).then(|| {
                tasks_output
                    .iter()
                    .map(|output| output.raw.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            });

            let raw = agent
                .execute_task(task, context.as_deref(), recorder.clone())
                .await?;

            if self.verbose {
                info!(task = index + 1, answer = %raw, "Task finished");
            }
            tasks_output.push(TaskOutput {
                description: task.description().to_string(),
                agent_role: agent.role().to_string(),
                raw,
            });
        }

        let raw = tasks_output
            .last()
            .map(|output| output.raw.clone())
            .unwrap_or_default();
        let token_usage: TokenUsage = recorder.total();

        Ok(CrewOutput {
            raw,
            tasks_output,
            token_usage,
        })
    }
}
