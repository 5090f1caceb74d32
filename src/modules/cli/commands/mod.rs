//! CLI commands

mod completion;
mod dev;
mod init;
mod load;
mod run;
mod search;

pub use completion::CompletionCommand;
pub use dev::DevCommand;
pub use init::InitCommand;
pub use load::LoadCommand;
pub use run::RunCommand;
pub use search::SearchCommand;

use clap::{Parser, Subcommand};

/// Magic Chat - chat-style search over a vector database
#[derive(Parser, Debug)]
#[command(name = "magicchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (`.magic`)
    ///
    /// This is a *global* option so it can be specified after subcommands,
    /// e.g. `magicchat run -f config.magic`.
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        default_value = "config.magic"
    )]
    pub config: String,

    /// Backwards/compat alias for `-f/--file`
    #[arg(short = 'c', long = "config", global = true, hide = true)]
    pub config_compat: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Magic Chat server
    Run(RunCommand),

    /// Start in development mode with hot reload
    Dev(DevCommand),

    /// Run a one-shot search from the terminal
    Search(SearchCommand),

    /// Seed a collection from a JSON file
    Load(LoadCommand),

    /// Initialize a new Magic Chat project
    Init(InitCommand),

    /// Generate shell completions (hidden)
    Completion(CompletionCommand),
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Effective configuration path, accounting for compat flags.
    pub fn config_path(&self) -> &str {
        self.config_compat.as_deref().unwrap_or(&self.config)
    }
}
