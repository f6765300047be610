/*!
 * Provider implementations for different translation backends.
 *
 * This module contains client implementations for the supported
 * chat-completion backends:
 * - OpenAI: the public OpenAI API (or any compatible endpoint)
 * - Azure: an Azure-hosted OpenAI deployment
 *
 * The pipeline depends on providers only through the `TranslationBackend`
 * trait: one call translates an ordered list of texts and returns an
 * ordered list of the same length. The concrete backend is chosen once
 * at configuration time and injected; nothing downstream branches on
 * backend identity. Providers make exactly one attempt per call and
 * classify failures — retry policy belongs to the orchestrator.
 */

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{AppError, ProviderError};

pub mod azure;
pub mod mock;
pub mod openai;
pub mod protocol;

/// Capability interface over the actual translation backend
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate an ordered list of texts.
    ///
    /// # Arguments
    /// * `texts` - Source strings, in document order
    /// * `source_language` - ISO code of the source language
    /// * `target_language` - ISO code of the target language
    ///
    /// # Returns
    /// * Translated strings of identical length and order, or a classified
    ///   `ProviderError`
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Build the configured backend once, for injection into the orchestrator
pub fn create_backend(config: &TranslationConfig) -> Result<Arc<dyn TranslationBackend>, AppError> {
    let api_key = config.get_api_key();
    if api_key.is_empty() {
        return Err(AppError::Config(format!(
            "API key is required for the {} provider",
            config.provider.display_name()
        )));
    }

    let backend: Arc<dyn TranslationBackend> = match config.provider {
        TranslationProvider::OpenAI => Arc::new(openai::OpenAI::new_with_config(
            api_key,
            config.get_endpoint(),
            config.get_model(),
            config.get_timeout_secs(),
            config.common.temperature,
            config.common.system_prompt.clone(),
        )),
        TranslationProvider::Azure => {
            let endpoint = config.get_endpoint();
            if endpoint.is_empty() {
                return Err(AppError::Config(
                    "Endpoint is required for the Azure OpenAI provider".to_string(),
                ));
            }
            Arc::new(azure::AzureOpenAI::new_with_config(
                api_key,
                endpoint,
                config.get_model(),
                config.get_api_version(),
                config.get_timeout_secs(),
                config.common.temperature,
                config.common.system_prompt.clone(),
            ))
        }
    };

    Ok(backend)
}

/// Map a transport-level reqwest failure to a provider error
pub(crate) fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else if error.is_decode() {
        ProviderError::InvalidResponse(error.to_string())
    } else {
        ProviderError::ConnectionError(error.to_string())
    }
}

/// Map an error status answered by the API to a provider error
pub(crate) fn classify_status(status_code: u16, message: String) -> ProviderError {
    match status_code {
        401 | 403 => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        _ => ProviderError::ApiError {
            status_code,
            message,
        },
    }
}

/// Get the maximum number of completion tokens for a given model
pub(crate) fn max_tokens_for_model(model: &str) -> u32 {
    match model {
        "gpt-4" | "gpt-4-0613" => 8192,
        "gpt-4-32k" | "gpt-4-32k-0613" => 32768,
        "gpt-4-turbo" | "gpt-4-turbo-preview" | "gpt-4-0125-preview" => 4096,
        "gpt-4o" | "gpt-4o-mini" => 16384,
        "gpt-3.5-turbo" | "gpt-3.5-turbo-0613" => 4096,
        "gpt-3.5-turbo-16k" | "gpt-3.5-turbo-16k-0613" => 16384,

        // Default for unknown models and deployments
        _ => 4096,
    }
}
