use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;

use crate::errors::ProviderError;
use crate::providers::openai::{ChatRequest, ChatResponse};
use crate::providers::{
    TranslationBackend, classify_status, classify_transport_error, max_tokens_for_model, protocol,
};

/// Client for an Azure-hosted OpenAI deployment.
///
/// Speaks the same chat-completions dialect as the OpenAI client but
/// addresses a named deployment under the resource endpoint and
/// authenticates with the `api-key` header instead of a bearer token.
#[derive(Debug)]
pub struct AzureOpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Resource endpoint, e.g. `https://myresource.openai.azure.com`
    endpoint: String,
    /// Deployment name of the model
    deployment: String,
    /// API version query parameter
    api_version: String,
    /// Temperature for generation
    temperature: f32,
    /// System prompt template with language placeholders
    system_prompt: String,
}

impl AzureOpenAI {
    /// Create a new Azure OpenAI client
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        timeout_secs: u64,
        temperature: f32,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
            temperature,
            system_prompt: system_prompt.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    /// Send one chat completion request to the deployment
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Azure OpenAI API error ({}): {}", status, error_text);
            return Err(classify_status(status.as_u16(), error_text));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("malformed completion payload: {}", e)))
    }
}

#[async_trait]
impl TranslationBackend for AzureOpenAI {
    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let system =
            protocol::render_system_prompt(&self.system_prompt, source_language, target_language);
        let payload = format!(
            "{}\n\n{}",
            protocol::batch_instruction(),
            protocol::join_segments(texts)
        );

        // the deployment name stands in for the model field
        let request = ChatRequest::new(&self.deployment)
            .add_message("system", system)
            .add_message("user", payload)
            .temperature(self.temperature)
            .max_tokens(max_tokens_for_model(&self.deployment));

        let response = self.complete(request).await?;
        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".to_string()))?;

        debug!(
            "Azure OpenAI returned {} chars for {} segments",
            content.len(),
            texts.len()
        );
        protocol::split_segments(&content, texts.len())
    }
}
