//! Image analysis: one expert agent, one task, one crew.
//!
//! Both front ends go through [`ImageAnalyst`], so the persona, the task
//! wording and the client wiring live in one place.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::backend::client::ChatClient;
use crate::backend::completion::CompletionBackend;
use crate::backend::media::ImageReference;
use crate::backend::multimodal::MultimodalClient;
use crate::config::{Config, missing_api_key};
use crate::crew::{Agent, Crew, CrewOutput, Task};
use crate::error::Result;

/// Image analysed by the CLI when none is given.
pub const DEFAULT_IMAGE_URL: &str =
    "https://storage.googleapis.com/github-repo/img/gemini/intro/landmark3.jpg";

pub const AGENT_ROLE: &str = "Image Analysis Expert";
pub const AGENT_GOAL: &str = "Provide detailed analysis of images";
pub const AGENT_BACKSTORY: &str =
    "I am an AI with expertise in visual analysis and image recognition.";
pub const EXPECTED_OUTPUT: &str = "what is the prominent object in the image or what the image is about along with a few bullet points about the most striking features of the image.";

/// Task description for `image`.
pub fn task_description(image: &ImageReference) -> String {
    format!(
        "Analyze the image at {} and describe all visible objects, landmarks, people, and the overall context of the image.",
        image
    )
}

/// Anything that can turn an image into a description.
///
/// The web front end depends on this seam rather than on [`ImageAnalyst`].
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &ImageReference) -> Result<CrewOutput>;
}

/// Builds and runs the image-analysis crew.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> image_insights::Result<()> {
/// use image_insights::{Config, ImageAnalyst, ImageAnalyzer, ImageReference};
///
/// let analyst = ImageAnalyst::new(Config::load()?)?;
/// let output = analyst
///     .analyze(&ImageReference::parse("https://example.com/bridge.jpg"))
///     .await?;
/// println!("{}", output);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ImageAnalyst {
    config: Config,
    verbose: bool,
    backend: Option<Arc<dyn CompletionBackend>>,
}

impl std::fmt::Debug for ImageAnalyst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAnalyst")
            .field("config", &self.config)
            .field("verbose", &self.verbose)
            .field(
                "backend",
                &self.backend.as_ref().map(|backend| backend.provider_name()),
            )
            .finish()
    }
}

impl ImageAnalyst {
    /// # Errors
    ///
    /// Returns [`InsightError::ConfigurationError`](crate::InsightError::ConfigurationError)
    /// when the credential is empty; nothing is sent in that case.
    pub fn new(config: Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(missing_api_key());
        }
        Ok(Self {
            config,
            verbose: false,
            backend: None,
        })
    }

    /// Log the agent's work at info level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Send completions through `backend` instead of the configured HTTP endpoint.
    pub fn with_backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn client(&self, image: &ImageReference) -> Result<MultimodalClient> {
        let chat = match &self.backend {
            Some(backend) => ChatClient::from_config_with_backend(&self.config, backend.clone())?,
            None => ChatClient::from_config(&self.config)?,
        };
        Ok(MultimodalClient::new(chat).with_default_image(image.clone()))
    }

    /// The one-agent, one-task crew for `image`.
    pub fn build_crew(&self, image: &ImageReference) -> Result<Crew> {
        let llm = Arc::new(self.client(image)?);
        let agent =
            Agent::new(AGENT_ROLE, AGENT_GOAL, AGENT_BACKSTORY, llm).verbose(self.verbose);
        let task = Task::new(task_description(image), EXPECTED_OUTPUT, agent.clone());
        Ok(Crew::new(vec![agent], vec![task]).verbose(self.verbose))
    }
}

#[async_trait]
impl ImageAnalyzer for ImageAnalyst {
    #[instrument(name = "analyze_image", skip(self), fields(image = %image, model = %self.config.model))]
    async fn analyze(&self, image: &ImageReference) -> Result<CrewOutput> {
        let crew = self.build_crew(image)?;
        let output = crew.kickoff().await?;
        info!(
            answer_len = output.raw.len(),
            total_tokens = output.token_usage.total_tokens(),
            "Image analysis complete"
        );
        Ok(output)
    }
}
