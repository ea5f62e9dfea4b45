pub mod bootstrap;
pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "supportbot",
    about = "Customer support chat bot",
    long_about = "Answer FAQs, look up order status, and hand off to a human agent when the bot cannot help.",
    after_help = "Examples:\n  supportbot\n  supportbot ask check order A100\n  supportbot ask --json tell me a joke\n  supportbot config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive chat session (default)")]
    Chat,
    #[command(about = "Route a single message and print the reply")]
    Ask {
        #[arg(required = true, help = "Message text")]
        text: Vec<String>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat::run(),
        Command::Ask { text, json } => commands::ask::run(&text.join(" "), json),
        Command::Config => commands::config::run(),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
