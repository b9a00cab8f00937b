pub mod agent;
pub mod cli;
pub mod config;
pub mod console;
pub mod llm;
pub mod models;
pub mod sanitize;
pub mod server;

use agent::SupportAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    if args.api_key.trim().is_empty() {
        return Err("HF_API_KEY is not set; refusing to start without an inference credential".into());
    }

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Inference Transport: {}", args.transport);
    info!("Model: {}", args.model);
    info!("Base URL: {}", args.base_url.as_deref().unwrap_or("transport default"));
    info!("System Prompt Path: {}", args.system_prompt_path.as_deref().unwrap_or("built-in"));
    info!("History Limit: {}", args.history_limit);
    info!("Max Tokens: {}", args.max_tokens);
    info!("Temperature: {}", args.temperature);
    info!("Interactive Mode: {}", args.interactive);
    info!("-------------------------");

    let agent = Arc::new(SupportAgent::new(&args)?);

    if args.interactive {
        return console::run_console(agent, args.history_limit).await;
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent);
    server.run().await
}
