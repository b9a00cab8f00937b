pub mod chat;

use reqwest::StatusCode;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which wire shape the inference endpoint speaks. Both are served by the
/// same hosted inference service; the payload and the success envelope differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// OpenAI-style chat completions: structured messages in,
    /// `choices[0].message.content` out.
    Chat,
    /// Raw text generation: a single flat prompt in,
    /// `[0].generated_text` out.
    Generate,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseTransportTypeError {
    message: String,
}

impl fmt::Display for ParseTransportTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseTransportTypeError {}

impl FromStr for TransportType {
    type Err = ParseTransportTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" | "chat-completions" => Ok(TransportType::Chat),
            "generate" | "text-generation" => Ok(TransportType::Generate),
            _ =>
                Err(ParseTransportTypeError {
                    message: format!("Invalid inference transport: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportType::Chat => write!(f, "chat"),
            TransportType::Generate => write!(f, "generate"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub transport: TransportType,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            transport: TransportType::Chat,
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

/// Generation parameters sent with every completion. Built fresh per call,
/// never retained by the transport.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub do_sample: bool,
    /// When false the generate transport asks for only the newly generated
    /// text, not the echoed prompt.
    pub return_full_text: bool,
    /// Wait for the remote model to load instead of failing while it is cold.
    pub wait_for_model: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            do_sample: true,
            return_full_text: false,
            wait_for_model: true,
        }
    }
}

/// Failure taxonomy for one completion call. No retries, no caching; the
/// transport surfaces exactly what happened.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference API returned {status}: {body}")]
    Api {
        status: StatusCode,
        body: String,
    },
    #[error("unexpected response shape from inference API: {0}")]
    Malformed(String),
    #[error("inference request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_parses_both_spellings() {
        assert_eq!("chat".parse::<TransportType>().unwrap(), TransportType::Chat);
        assert_eq!(
            "chat-completions".parse::<TransportType>().unwrap(),
            TransportType::Chat
        );
        assert_eq!(
            "Generate".parse::<TransportType>().unwrap(),
            TransportType::Generate
        );
        assert_eq!(
            "text-generation".parse::<TransportType>().unwrap(),
            TransportType::Generate
        );
    }

    #[test]
    fn unknown_transport_is_rejected() {
        assert!("grpc".parse::<TransportType>().is_err());
    }
}
