//! Tests for the web form routes.

#![cfg(feature = "web")]

#[cfg(test)]
mod web_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use image_insights::web::{AppState, create_router};
    use image_insights::{
        ApiErrorKind, Config, CrewOutput, ImageAnalyst, ImageAnalyzer, ImageReference,
        InsightError, Result, TokenUsage,
    };
    use tower::ServiceExt;

    /// Analyzer counting its calls and answering with a fixed result.
    struct CountingAnalyzer {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingAnalyzer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageAnalyzer for CountingAnalyzer {
        async fn analyze(&self, image: &ImageReference) -> Result<CrewOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(InsightError::api_error(
                    "Gemini",
                    ApiErrorKind::ServerError {
                        status: 503,
                        details: "overloaded".to_string(),
                    },
                ));
            }
            Ok(CrewOutput {
                raw: format!("Landmark seen at {}", image),
                tasks_output: vec![],
                token_usage: TokenUsage::default(),
            })
        }
    }

    async fn submit(state: AppState, image_url: &str) -> (StatusCode, String) {
        let body = format!("image_url={}", image_url.replace(':', "%3A").replace('/', "%2F"));
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = create_router(AppState::unavailable("disabled"))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Image Analysis with Gemini Vision"));
        assert!(html.contains("name=\"image_url\""));
        assert!(html.contains("Analyze Image"));
        assert!(!html.contains("Analysis Complete!"));
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = create_router(AppState::unavailable("disabled"))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_empty_url_shows_validation_banner() {
        let analyzer = CountingAnalyzer::new(false);
        let (status, html) = submit(AppState::new(analyzer.clone()), "   ").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Please enter a valid image URL."));
        assert_eq!(analyzer.calls(), 0);
    }

    #[tokio::test]
    async fn test_local_path_is_not_accepted() {
        let analyzer = CountingAnalyzer::new(false);
        let (status, html) = submit(AppState::new(analyzer.clone()), "/etc/hostname").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Please enter a valid image URL."));
        assert_eq!(analyzer.calls(), 0);
    }

    fn startup(pairs: &[(&str, &str)]) -> AppState {
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        };
        AppState::from_startup(
            Config::from_lookup(lookup)
                .and_then(ImageAnalyst::new)
                .map(|analyst| Arc::new(analyst) as Arc<dyn ImageAnalyzer>),
        )
    }

    #[tokio::test]
    async fn test_missing_credential_shows_configuration_banner() {
        let (status, html) = submit(startup(&[]), "https://example.com/a.jpg").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(html.contains("GEMINI_API_KEY is missing. Please set it in your environment."));
        assert!(!html.contains("Configuration error:"));
        assert!(!html.contains("Analysis Complete!"));
    }

    #[tokio::test]
    async fn test_bad_timeout_shows_its_own_banner() {
        let state = startup(&[
            ("GEMINI_API_KEY", "real-key"),
            ("IMAGE_INSIGHTS_TIMEOUT_SECS", "soon"),
        ]);
        let (status, html) = submit(state, "https://example.com/a.jpg").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(html.contains("IMAGE_INSIGHTS_TIMEOUT_SECS must be a whole number of seconds"));
        assert!(!html.contains("GEMINI_API_KEY is missing"));
    }

    #[test]
    fn test_valid_startup_enables_analysis() {
        let state = startup(&[("GEMINI_API_KEY", "real-key")]);
        assert!(state.analyzer.is_ok());
    }

    #[tokio::test]
    async fn test_non_configuration_startup_error_is_displayed() {
        let state = AppState::from_startup(Err(InsightError::Timeout));
        let (status, html) = submit(state, "https://example.com/a.jpg").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(html.contains("Timeout error"));
    }

    #[tokio::test]
    async fn test_success_renders_result_and_image() {
        let analyzer = CountingAnalyzer::new(false);
        let (status, html) =
            submit(AppState::new(analyzer.clone()), "https://example.com/a.jpg").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(analyzer.calls(), 1);
        assert!(html.contains("Analysis Complete!"));
        assert!(html.contains("Image Insights:"));
        assert!(html.contains("Landmark seen at"));
        assert!(html.contains("<img src=\""));
        assert!(html.contains("Analyzed Image"));
    }

    #[tokio::test]
    async fn test_provider_failure_renders_error_banner() {
        let analyzer = CountingAnalyzer::new(true);
        let (status, html) =
            submit(AppState::new(analyzer.clone()), "https://example.com/a.jpg").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(analyzer.calls(), 1);
        assert!(html.contains("overloaded"));
        assert!(!html.contains("Analysis Complete!"));
    }
}
