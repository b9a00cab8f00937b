use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;

use super::{ ChatClient, CompletionResponse, DEFAULT_BASE_URL, DEFAULT_MODEL };
use crate::config::prompt;
use crate::llm::{ GenerationParams, InferenceError, LlmConfig };
use crate::models::chat::ChatMessage;

/// Raw text-generation transport: one flat instruction-tagged prompt on the
/// wire, `[0].generated_text` in the success envelope.
pub struct TextGenerationClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    inputs: String,
    parameters: GenerateParameters,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Serialize)]
struct GenerateOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

impl TextGenerationClient {
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

/// Extracts the generated text from a text-generation success body.
/// The expected shape is an array whose first element carries the text.
pub fn parse_generated_text(body: &str) -> Result<String, InferenceError> {
    let outputs: Vec<GeneratedText> = serde_json
        ::from_str(body)
        .map_err(|_| InferenceError::Malformed(body.to_string()))?;
    outputs
        .into_iter()
        .next()
        .map(|output| output.generated_text)
        .ok_or_else(|| InferenceError::Malformed(body.to_string()))
}

#[async_trait]
impl ChatClient for TextGenerationClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        input: &str,
        params: &GenerationParams
    ) -> Result<CompletionResponse, InferenceError> {
        let url = format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model);

        // The instruction block closes before the new turn; the input follows
        // as the completion target.
        let inputs = format!("{}\n{}", prompt::instruction_block(system_prompt, history), input);

        let req = GenerateRequest {
            inputs,
            parameters: GenerateParameters {
                max_new_tokens: params.max_tokens,
                temperature: params.temperature,
                do_sample: params.do_sample,
                return_full_text: params.return_full_text,
            },
            options: GenerateOptions {
                wait_for_model: params.wait_for_model,
            },
        };

        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(InferenceError::Api { status, body });
        }

        let text = parse_generated_text(&body)?;
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_first_generated_text() {
        let body = r#"[{"generated_text": "Solução: X"}]"#;
        assert_eq!(parse_generated_text(body).unwrap(), "Solução: X");
    }

    #[test]
    fn empty_array_is_a_formatting_error() {
        assert!(matches!(
            parse_generated_text("[]"),
            Err(InferenceError::Malformed(_))
        ));
    }

    #[test]
    fn unrecognized_shape_is_a_formatting_error() {
        let body = r#"{"choices":[{"message":{"content":"Solução: Y"}}]}"#;
        assert!(matches!(
            parse_generated_text(body),
            Err(InferenceError::Malformed(_))
        ));
    }
}
