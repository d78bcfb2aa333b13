//! Tests for the agent / task / crew orchestration and the image-analysis crew.

mod common;

#[cfg(test)]
mod crew_tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use image_insights::{
        Agent, CallOptions, ChatClient, Config, Crew, DEFAULT_IMAGE_URL, ImageAnalyst,
        ImageAnalyzer, ImageReference, InsightError, LlmClient, Message, MessageInput,
        MultimodalClient, Result, Role, Task,
    };

    use crate::common::{LANDMARK_URL, MockBackend, last_message_parts};

    /// Client answering from a script and remembering the prompts it got.
    struct ScriptedClient {
        answers: Mutex<Vec<String>>,
        prompts: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedClient {
        fn new(answers: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.iter().rev().map(|a| a.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<Vec<Message>> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn call(&self, messages: MessageInput, _options: CallOptions) -> Result<String> {
            self.prompts.lock().unwrap().push(messages.into_messages());
            self.answers
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| InsightError::ValidationError("script exhausted".to_string()))
        }
    }

    fn text_of(message: &Message) -> String {
        message.content.text()
    }

    #[tokio::test]
    async fn test_single_task_returns_final_answer() {
        let client = ScriptedClient::new(&["Thought: I see a tower.\nFinal Answer: The Eiffel Tower"]);
        let agent = Agent::new("Guide", "Name landmarks", "A seasoned guide.", client.clone());
        let task = Task::new("Name the landmark", "One line", agent.clone());

        let output = Crew::new(vec![agent], vec![task]).kickoff().await.unwrap();

        assert_eq!(output.raw, "The Eiffel Tower");
        assert_eq!(output.to_string(), "The Eiffel Tower");
        assert_eq!(output.tasks_output.len(), 1);
        assert_eq!(output.tasks_output[0].agent_role, "Guide");

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0][0].role, Role::System);
        assert!(text_of(&prompts[0][0]).contains("You are Guide. A seasoned guide."));
        assert!(text_of(&prompts[0][0]).contains("Name landmarks"));
        assert_eq!(prompts[0][1].role, Role::User);
        assert!(text_of(&prompts[0][1]).contains("Name the landmark"));
        assert!(text_of(&prompts[0][1]).contains("One line"));
    }

    #[tokio::test]
    async fn test_earlier_answers_become_context() {
        let client = ScriptedClient::new(&["Final Answer: a red bridge", "Final Answer: Golden Gate"]);
        let spotter = Agent::new("Spotter", "Spot objects", "Sharp eyes.", client.clone());
        let namer = Agent::new("Namer", "Name things", "Knows names.", client.clone());
        let tasks = vec![
            Task::new("List the objects", "A list", spotter.clone()),
            Task::new("Name the landmark", "A name", namer.clone()),
        ];

        let output = Crew::new(vec![spotter, namer], tasks)
            .verbose(true)
            .kickoff()
            .await
            .unwrap();

        assert_eq!(output.raw, "Golden Gate");
        assert_eq!(output.tasks_output[0].raw, "a red bridge");
        assert_eq!(output.tasks_output[1].agent_role, "Namer");

        let prompts = client.prompts();
        assert!(!text_of(&prompts[0][1]).contains("context you're working with"));
        assert!(text_of(&prompts[1][1]).contains("context you're working with:\na red bridge"));
    }

    #[tokio::test]
    async fn test_crew_without_tasks_is_rejected() {
        let err = Crew::new(vec![], vec![]).kickoff().await.unwrap_err();
        assert!(matches!(err, InsightError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_first_task_error_stops_the_crew() {
        let client = ScriptedClient::new(&[]);
        let agent = Agent::new("Guide", "Goal", "Story", client.clone());
        let tasks = vec![
            Task::new("First", "x", agent.clone()),
            Task::new("Second", "y", agent.clone()),
        ];

        let err = Crew::new(vec![agent], tasks).kickoff().await.unwrap_err();
        assert_eq!(err, InsightError::ValidationError("script exhausted".to_string()));
        assert_eq!(client.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_usage_summed_across_tasks() {
        let backend = MockBackend::answering("Final Answer: done");
        let llm = Arc::new(MultimodalClient::new(
            ChatClient::with_backend("test-key", backend.clone()).unwrap(),
        ));
        let agent = Agent::new("Worker", "Work", "Works.", llm);
        let tasks = vec![
            Task::new("One", "x", agent.clone()),
            Task::new("Two", "y", agent.clone()),
        ];

        let output = Crew::new(vec![agent], tasks).kickoff().await.unwrap();
        assert_eq!(output.token_usage.input_tokens, 20);
        assert_eq!(output.token_usage.output_tokens, 10);
        assert_eq!(output.token_usage.total_tokens(), 30);
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_image_analyst_sends_image_with_task() {
        let backend = MockBackend::answering(
            "Thought: looking\nFinal Answer: 1. Objects: a tower\n2. Landmarks: Eiffel Tower",
        );
        let mut config = Config::new("test-key").unwrap();
        config.temperature = Some(0.5);
        config.max_tokens = Some(512);
        let analyst = ImageAnalyst::new(config)
            .unwrap()
            .with_backend(backend.clone());

        let output = analyst
            .analyze(&ImageReference::parse(LANDMARK_URL))
            .await
            .unwrap();
        assert_eq!(output.raw, "1. Objects: a tower\n2. Landmarks: Eiffel Tower");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].api_key, "test-key");
        assert_eq!(calls[0].body["model"], "gemini-2.0-flash-exp");
        assert_eq!(calls[0].body["temperature"], 0.5);
        assert_eq!(calls[0].body["max_tokens"], 512);

        let system = calls[0].body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("Image Analysis Expert"));

        let parts = last_message_parts(&calls[0].body);
        assert_eq!(parts.len(), 2);
        assert!(
            parts[0]["text"]
                .as_str()
                .unwrap()
                .contains(&format!("Analyze the image at {}", LANDMARK_URL))
        );
        assert_eq!(parts[1]["image_url"]["url"], LANDMARK_URL);
    }

    #[tokio::test]
    async fn test_image_analyst_inlines_local_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let backend = MockBackend::answering("Final Answer: a photo");
        let analyst = ImageAnalyst::new(Config::new("test-key").unwrap())
            .unwrap()
            .with_backend(backend.clone());

        analyst
            .analyze(&ImageReference::from_path(&path))
            .await
            .unwrap();

        let parts = last_message_parts(&backend.last_body());
        assert_eq!(parts[1]["type"], "image");
        assert_eq!(parts[1]["image"], "/9j/");
    }

    #[test]
    fn test_default_image_url() {
        assert_eq!(DEFAULT_IMAGE_URL, LANDMARK_URL);
    }
}
