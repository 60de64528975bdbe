//! Roomly CLI
//!
//! Command-line client for the Roomly chat server.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use roomly_chat::RoomId;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "roomly")]
#[command(version, about = "Roomly chat from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Chat server WebSocket URL
    #[arg(
        long,
        global = true,
        env = "ROOMLY_CHAT_URL",
        default_value = "wss://chat.roomly.app/ws"
    )]
    server: String,

    /// Bearer token
    #[arg(long, global = true, env = "ROOMLY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Seconds to wait for a send confirmation
    #[arg(long, global = true, default_value = "10")]
    send_timeout: u64,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Send a message to a room
    Send {
        /// Room ID
        #[arg(allow_negative_numbers = true)]
        room: RoomId,

        /// Message text
        text: String,
    },

    /// Print messages for a room until interrupted
    Listen {
        /// Room ID
        #[arg(allow_negative_numbers = true)]
        room: RoomId,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = CliConfig {
        server_url: cli.server,
        token: cli.token,
        send_timeout: Duration::from_secs(cli.send_timeout),
    };

    match cli.command {
        Commands::Send { room, text } => commands::send::run(&config, room, &text).await?,
        Commands::Listen { room } => commands::listen::run(&config, room).await?,
    }

    Ok(())
}
