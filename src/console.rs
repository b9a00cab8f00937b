use crate::agent::SupportAgent;
use crate::models::chat::{ ChatMessage, Conversation };

use log::info;
use std::error::Error;
use std::io::{ self, BufRead, Write };
use std::sync::Arc;

/// Blocking read-eval loop over stdin. The conversation is a local value
/// threaded through each call; it trims itself to the configured cap after
/// every appended turn.
pub async fn run_console(
    agent: Arc<SupportAgent>,
    history_limit: usize
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conversation = Conversation::new(history_limit);

    println!("--- Agente de Suporte (digite 'sair' para encerrar) ---");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Usuário: ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("sair") || message.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = agent.respond(message, conversation.messages()).await;
        println!("Assistente: {}", reply);

        conversation.push(ChatMessage::user(message));
        conversation.push(ChatMessage::assistant(reply));
    }

    info!("Console session ended after {} retained turns", conversation.len());
    Ok(())
}
