use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::{Chat, ChatBuilder};
use crate::ai::tools::FunctionRegistry;
use crate::core::AppConfig;
use crate::openai::{Message, Role};

/// Builds the chat session for the terminal: the system message
/// seeds the transcript and intermediate messages are printed as they
/// happen.
pub fn session(config: &AppConfig) -> Chat {
    ChatBuilder::new(
        &config.openai_api_hostname,
        config.openai_api_key.as_deref(),
        &config.openai_model,
    )
    .transcript(vec![Message::new(Role::System, &config.system_message)])
    .functions(FunctionRegistry::with_defaults())
    .max_function_calls(config.max_function_calls)
    .observer(Box::new(|m: &Message| println!("{}", m.display_line())))
    .build()
}

/// Sends one line of user input and returns the reply. Blank input is
/// skipped without calling the API.
pub async fn respond(chat: &mut Chat, line: &str) -> Result<Option<Message>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let reply = chat.next_msg(Message::new(Role::User, line)).await?;
    Ok(Some(reply))
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut chat = session(config);

    tracing::debug!("Starting chat with model {}", chat.model());

    loop {
        let readline = rl.readline(&format!("{}: ", Role::User));
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if let Some(reply) = respond(&mut chat, &line).await? {
                    println!("{}", reply.display_line());
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_seeds_the_system_message() {
        let config = AppConfig::default();
        let chat = session(&config);
        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[0].content.as_deref(),
            Some(config.system_message.as_str())
        );
    }

    #[tokio::test]
    async fn it_skips_blank_input() {
        let config = AppConfig {
            openai_api_hostname: String::from("http://127.0.0.1:9"),
            ..AppConfig::default()
        };
        let mut chat = session(&config);
        let reply = respond(&mut chat, "   ").await.unwrap();
        assert!(reply.is_none());
        assert_eq!(chat.transcript().len(), 1);
    }
}
