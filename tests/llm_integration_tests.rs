//! Live tests against the Gemini API.
//!
//! Skipped unless a key is available:
//!
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! cargo test --test llm_integration_tests
//! ```

mod common;

#[cfg(test)]
mod llm_integration_tests {
    use std::time::Duration;

    use image_insights::{
        CallOptions, ChatClient, Config, ImageAnalyst, ImageAnalyzer, ImageReference, LlmClient,
        MultimodalClient,
    };

    use crate::common::LANDMARK_URL;

    fn live_config() -> Option<Config> {
        match Config::from_env() {
            Ok(config) => Some(config.with_timeout(Duration::from_secs(60))),
            Err(_) => {
                println!("Skipping test: GEMINI_API_KEY not set");
                None
            }
        }
    }

    #[tokio::test]
    async fn test_live_image_analysis() {
        let Some(config) = live_config() else {
            return;
        };

        let analyst = ImageAnalyst::new(config).expect("Failed to create analyst");
        let output = analyst
            .analyze(&ImageReference::parse(LANDMARK_URL))
            .await
            .expect("Image analysis failed");

        println!("{}", output);
        assert!(!output.raw.is_empty());
        assert!(output.token_usage.total_tokens() > 0);
    }

    #[tokio::test]
    async fn test_live_multimodal_call() {
        let Some(config) = live_config() else {
            return;
        };

        let client = MultimodalClient::from_config(&config)
            .expect("Failed to create client")
            .temperature(0.0);
        let options =
            CallOptions::default().with_images(vec![ImageReference::parse(LANDMARK_URL)]);
        let answer = client
            .call("Name the landmark in one short sentence.".into(), options)
            .await
            .expect("Multimodal call failed");

        assert!(!answer.trim().is_empty());
    }

    #[tokio::test]
    async fn test_live_text_only_call() {
        let Some(config) = live_config() else {
            return;
        };

        let client = ChatClient::from_config(&config).expect("Failed to create client");
        let answer = client
            .call("Reply with the single word: pong".into(), CallOptions::default())
            .await
            .expect("Chat call failed");

        assert!(answer.to_lowercase().contains("pong"));
    }
}
