use clap::{Parser, Subcommand};

/// CLI arguments for routeview
#[derive(Debug, Parser)]
#[command(
    name = "routeview",
    version,
    about = "Replay map-session scenarios against the in-memory engine"
)]
pub struct CliArgs {
    /// Path to a JSON view configuration (default: built-in configuration)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Log session transitions to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a session, draw a route, switch to the light style and back
    Demo,

    /// Run a scenario script
    Run {
        /// JSON array of steps, e.g. [{"op":"create"},{"op":"style_ready"}]
        script: String,
    },

    /// Print the effective configuration as JSON
    Config,
}
