use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "filetailor")]
#[command(author, version, about = "Telegram bot that re-sends documents with a custom thumbnail, caption and name", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run,

    /// Print user and session counts from the database and exit
    Stats,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
