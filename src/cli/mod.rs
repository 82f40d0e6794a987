use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;

use crate::core::{AppConfig, logging};

#[derive(Subcommand)]
enum Command {
    /// Start a chat bot session (the default)
    Chat {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Override the model used for completions
    #[arg(long, global = true)]
    model: Option<String>,

    /// Override the base URL of the OpenAI compatible API
    #[arg(long, global = true)]
    host: Option<String>,
}

impl Cli {
    /// Applies command line overrides on top of the environment
    /// configuration.
    fn config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env()?;
        if let Some(model) = &self.model {
            config.openai_model = model.clone();
        }
        if let Some(host) = &self.host {
            config.openai_api_hostname = host.clone();
        }
        Ok(config)
    }
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    logging::init();

    let config = args.config()?;

    match args.command {
        Some(Command::Chat {}) | None => {
            chat::run(&config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_chat() {
        let args = Cli::try_parse_from(["funchat"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.model.is_none());
    }

    #[test]
    fn it_parses_overrides() {
        let args =
            Cli::try_parse_from(["funchat", "chat", "--model", "gpt-4o", "--host", "http://x"])
                .unwrap();
        assert!(matches!(args.command, Some(Command::Chat {})));
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
        assert_eq!(args.host.as_deref(), Some("http://x"));
    }
}
