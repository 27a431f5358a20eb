use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ofamm-site", version, about = "O'FAMM website and content admin")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the web server (default).
    Serve,
    /// Print an argon2 hash for ADMIN_PASSWORD_HASH.
    HashPassword {
        password: String,
    },
}
