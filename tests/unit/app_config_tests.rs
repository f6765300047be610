/*!
 * Tests for application configuration handling
 */

use doctran::app_config::{Config, ProviderConfig, TranslationConfig, TranslationProvider};

fn config_with_openai_key() -> Config {
    let mut config = Config::default();
    config.translation.available_providers[0].api_key = "test-api-key".to_string();
    config
}

#[test]
fn test_default_config_shouldSelectOpenAiProvider() {
    let config = Config::default();
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.source_language, "zh");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.available_providers.len(), 2);
}

#[test]
fn test_get_model_withEmptyProviderModel_shouldFallBackToDefault() {
    let mut config = Config::default();
    config.translation.available_providers[0].model = String::new();
    assert_eq!(config.translation.get_model(), "gpt-4");

    config.translation.provider = TranslationProvider::Azure;
    config.translation.available_providers[1].model = String::new();
    assert_eq!(config.translation.get_model(), "gpt-4o");
}

#[test]
fn test_get_endpoint_withAzureProvider_shouldNotInventDefault() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Azure;
    assert!(config.translation.get_endpoint().is_empty());
}

#[test]
fn test_validate_withMissingApiKey_shouldFail() {
    let config = Config::default();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("API key"));
}

#[test]
fn test_validate_withApiKey_shouldSucceed() {
    let config = config_with_openai_key();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = config_with_openai_key();
    config.source_language = "not-a-language".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withAzureMissingEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Azure;
    config.translation.available_providers[1].api_key = "test-api-key".to_string();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Endpoint"));
}

#[test]
fn test_serde_roundTrip_shouldPreserveConfig() {
    let mut config = config_with_openai_key();
    config.translation.common.retry_count = 5;
    config.translation.common.retry_backoff_ms = 250;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.translation.provider, config.translation.provider);
    assert_eq!(parsed.translation.common.retry_count, 5);
    assert_eq!(parsed.translation.common.retry_backoff_ms, 250);
    assert_eq!(parsed.translation.get_api_key(), "test-api-key");
}

#[test]
fn test_config_deserialize_withPartialJson_shouldApplyDefaults() {
    let json = r#"{
        "source_language": "fr",
        "target_language": "de",
        "translation": {
            "provider": "azure",
            "available_providers": [
                {"type": "azure", "api_key": "k", "endpoint": "https://res.openai.azure.com"}
            ]
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.translation.provider, TranslationProvider::Azure);
    assert_eq!(config.translation.get_api_version(), "2024-02-01");
    assert_eq!(config.translation.get_max_chars_per_request(), 1000);
    assert_eq!(config.translation.get_timeout_secs(), 30);
    assert_eq!(config.translation.common.retry_count, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_provider_fromStr_shouldAcceptAliases() {
    assert_eq!(
        "openai".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::OpenAI
    );
    assert_eq!(
        "azure".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::Azure
    );
    assert_eq!(
        "azure-openai".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::Azure
    );
    assert!("aws".parse::<TranslationProvider>().is_err());
}

#[test]
fn test_optimal_concurrent_requests_withCustomValue_shouldUseIt() {
    let mut translation = TranslationConfig::default();
    let mut provider = ProviderConfig::new(TranslationProvider::OpenAI);
    provider.concurrent_requests = 9;
    translation.available_providers = vec![provider];
    assert_eq!(translation.optimal_concurrent_requests(), 9);
}
