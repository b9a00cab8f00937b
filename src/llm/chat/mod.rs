pub mod chat_completions;
pub mod text_generation;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;

use super::{ GenerationParams, InferenceError, LlmConfig, TransportType };
use crate::models::chat::ChatMessage;
use self::chat_completions::ChatCompletionsClient;
use self::text_generation::TextGenerationClient;

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

/// One synchronous completion against the hosted inference service. Each
/// implementation owns its prompt formatting, so callers hand over the raw
/// pieces (system prompt, prior turns, new input) and get text back.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        input: &str,
        params: &GenerationParams
    ) -> Result<CompletionResponse, InferenceError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.transport {
        TransportType::Chat => {
            let specific_client = ChatCompletionsClient::from_config(config)?;
            Arc::new(specific_client)
        }
        TransportType::Generate => {
            let specific_client = TextGenerationClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-Coder-32B-Instruct";
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_selects_the_configured_transport() {
        let config = LlmConfig {
            transport: TransportType::Generate,
            api_key: Some("test-key".to_string()),
            model: None,
            base_url: None,
        };
        let client = new_client(&config).unwrap();
        assert_eq!(client.get_model(), DEFAULT_MODEL);
        assert_eq!(client.get_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn factory_requires_an_api_key() {
        let config = LlmConfig::default();
        assert!(new_client(&config).is_err());
    }
}
