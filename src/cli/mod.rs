use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Inference transport style (chat, generate).
    #[arg(long, env = "INFERENCE_TRANSPORT", default_value = "chat")]
    pub transport: String,

    /// API key for the hosted inference service. Required; startup fails
    /// without it.
    #[arg(long, env = "HF_API_KEY", default_value = "")]
    pub api_key: String,

    /// Model identifier for completion (e.g., Qwen/Qwen2.5-Coder-32B-Instruct).
    #[arg(long, env = "CHAT_MODEL", default_value = "Qwen/Qwen2.5-Coder-32B-Instruct")]
    pub model: String,

    /// Base URL for the inference API. Defaults to the hosted service.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Optional path to a file overriding the built-in system prompt.
    #[arg(long, env = "SYSTEM_PROMPT_PATH")]
    pub system_prompt_path: Option<String>,

    /// Maximum number of conversation entries retained in console mode.
    #[arg(long, env = "HISTORY_LIMIT", default_value = "10")]
    pub history_limit: usize,

    /// Maximum number of tokens to generate per completion.
    #[arg(long, env = "MAX_TOKENS", default_value = "500")]
    pub max_tokens: u32,

    /// Sampling temperature for generation.
    #[arg(long, env = "TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    /// Enable sampling (as opposed to greedy decoding) on the generate transport.
    #[arg(long, env = "DO_SAMPLE", default_value = "true")]
    pub do_sample: bool,

    /// Wait for the remote model to load instead of failing while it is cold.
    #[arg(long, env = "WAIT_FOR_MODEL", default_value = "true")]
    pub wait_for_model: bool,

    /// Run the interactive console loop instead of the HTTP server.
    #[arg(long, default_value = "false")]
    pub interactive: bool,
}
