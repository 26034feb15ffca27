use clap::{Parser, Subcommand};

pub mod commands;

use commands::{serve::ServeArgs, token::TokenArgs};

#[derive(Parser)]
#[command(name = "market-analytics-api")]
#[command(about = "Read-only analytics API over customers, companies and stock prices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API (default)")]
    Serve(ServeArgs),

    #[command(about = "Mint a signed access token using JWT_SECRET")]
    Token(TokenArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
            Commands::Serve(args) => commands::serve::handle(args).await,
            Commands::Token(args) => commands::token::handle(args),
        }
    }
}
