/*!
 * Tests for provider implementations and the batch wire protocol
 */

use doctran::app_config::{TranslationConfig, TranslationProvider};
use doctran::errors::ProviderError;
use doctran::providers::mock::{MockBackend, MockFailure};
use doctran::providers::protocol::{join_segments, render_system_prompt, split_segments};
use doctran::providers::{TranslationBackend, create_backend};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_protocol_roundTrip_withMultilineTexts_shouldRecoverEachSegment() {
    let input = texts(&["first line\nsecond line", "standalone"]);
    let joined = join_segments(&input);
    let recovered = split_segments(&joined, 2).unwrap();
    assert_eq!(recovered, input);
}

#[test]
fn test_split_segments_withWrongSegmentCount_shouldFail() {
    let joined = join_segments(&texts(&["only one"]));
    assert!(matches!(
        split_segments(&joined, 2),
        Err(ProviderError::InvalidResponse(_))
    ));
}

#[test]
fn test_render_system_prompt_shouldFillBothPlaceholders() {
    let template = "Translate from {source_language} to {target_language}.";
    assert_eq!(
        render_system_prompt(template, "zh", "en"),
        "Translate from Chinese to English."
    );
}

#[test]
fn test_create_backend_withEachProvider_shouldBuild() {
    let mut config = TranslationConfig::default();
    config.available_providers[0].api_key = "key".to_string();
    assert!(create_backend(&config).is_ok());

    config.provider = TranslationProvider::Azure;
    config.available_providers[1].api_key = "key".to_string();
    config.available_providers[1].endpoint = "https://res.openai.azure.com".to_string();
    assert!(create_backend(&config).is_ok());
}

#[tokio::test]
async fn test_mock_backend_throughTraitObject_shouldTranslate() {
    let backend: Box<dyn TranslationBackend> = Box::new(MockBackend::uppercase());
    let result = backend.translate(&texts(&["hello"]), "en", "fr").await.unwrap();
    assert_eq!(result, texts(&["HELLO"]));
}

#[tokio::test]
async fn test_mock_failures_shouldMapToProviderTaxonomy() {
    let rate_limited = MockBackend::failing(MockFailure::RateLimited);
    let err = rate_limited.translate(&texts(&["x"]), "en", "fr").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(!err.is_fatal());

    let auth = MockBackend::failing(MockFailure::Auth);
    let err = auth.translate(&texts(&["x"]), "en", "fr").await.unwrap_err();
    assert!(err.is_fatal());

    let invalid = MockBackend::failing(MockFailure::Invalid);
    let err = invalid.translate(&texts(&["x"]), "en", "fr").await.unwrap_err();
    assert!(!err.is_retryable());
}
