use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;

use super::{ ChatClient, CompletionResponse, DEFAULT_BASE_URL, DEFAULT_MODEL };
use crate::config::prompt;
use crate::llm::{ GenerationParams, InferenceError, LlmConfig };
use crate::models::chat::ChatMessage;

/// Chat-completions transport: structured role/content messages on the wire,
/// `choices[0].message.content` in the success envelope.
pub struct ChatCompletionsClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionEnvelope {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ChatCompletionsClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| "Inference API key is required".to_string())?;

        Self::new(api_key, config.model.clone(), config.base_url.clone())
    }
}

/// Extracts the generated text from a chat-completions success body.
/// Anything that does not carry a first choice is a formatting error.
pub fn parse_chat_completion(body: &str) -> Result<String, InferenceError> {
    let envelope: ChatCompletionEnvelope = serde_json
        ::from_str(body)
        .map_err(|_| InferenceError::Malformed(body.to_string()))?;
    envelope.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| InferenceError::Malformed(body.to_string()))
}

#[async_trait]
impl ChatClient for ChatCompletionsClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        input: &str,
        params: &GenerationParams
    ) -> Result<CompletionResponse, InferenceError> {
        let url = format!(
            "{}/models/{}/v1/chat/completions",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let req = ChatCompletionRequest {
            model: &self.model,
            messages: prompt::chat_messages(system_prompt, history, input),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            stream: false,
        };

        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(InferenceError::Api { status, body });
        }

        let content = parse_chat_completion(&body)?;
        Ok(CompletionResponse { response: content })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}
