use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// xai-proxy: CORS-enabled forwarding proxy for the xAI API
#[derive(Parser)]
#[command(name = "xai-proxy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Serve {
        /// Port to bind (defaults to XAI_PROXY_PORT or 8787)
        #[arg(short, long)]
        port: Option<u16>,
        /// Upstream base URL (defaults to XAI_PROXY_UPSTREAM_URL or https://api.x.ai)
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Print the body an image generation request would be forwarded with
    Filter {
        /// JSON file to read; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
}
