use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docseek")]
#[command(about = "Run and query the docseek search service")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start the service and keep it running until SIGINT/SIGTERM
    Serve,

    /// Probe the configured service once and print its status
    Status,

    /// Start the service, forward one request, print the response, stop
    Request {
        /// Request path, e.g. /search?q=rust
        path: String,

        /// HTTP method
        #[arg(long, short = 'X', default_value = "GET")]
        method: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}
