//! Peerster GUI CLI
//!
//! Terminal front end for a Peerster gossiper:
//! - Watch peers, routing table, messages and search matches live
//! - Send messages, add peers, share, search and fetch files
//! - Print a single snapshot of any polled resource

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peerster_gui::config::generate_default_config;
use peerster_gui::console::USAGE;
use peerster_gui::{
    commands::outcome_notice, ApiClient, Command, CommandDispatcher, Config, Console,
    ConsoleAction, LoggingConfig, Messages, Notice, Peers, Renderer, Resource, RoutablePeers,
    SearchMatches, Session, TerminalRenderer, View,
};

#[derive(Parser)]
#[command(name = "peerster-gui")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal GUI client for a Peerster gossiper")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Gossiper GUI URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Config file (default: ~/.config/peerster-gui/config.toml, ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the gossiper and render changes; read commands from stdin
    Watch,

    /// Show the gossiper's node id
    Id,

    /// List known peers
    Peers,

    /// List routable peers
    Routing,

    /// List messages
    Messages,

    /// List search matches
    Matches,

    /// Send a single command
    Send {
        #[command(subcommand)]
        command: SendCommand,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SendCommand {
    /// Broadcast a message
    Message { text: String },
    /// Add a peer (IPv4, optional :port)
    Peer { addr: String },
    /// Send a private message
    Private { dest: String, text: String },
    /// Share a local file
    Share { name: String },
    /// Request a file from a peer
    Request {
        dest: String,
        file_name: String,
        meta_hash: String,
    },
    /// Search for files (comma-separated keywords)
    Search { keywords: String },
    /// Download a search match
    Download { name: String },
}

impl From<SendCommand> for Command {
    fn from(command: SendCommand) -> Self {
        match command {
            SendCommand::Message { text } => Command::PostMessage { text },
            SendCommand::Peer { addr } => Command::AddPeer { addr },
            SendCommand::Private { dest, text } => Command::PrivateMessage { dest, text },
            SendCommand::Share { name } => Command::ShareFile { name },
            SendCommand::Request {
                dest,
                file_name,
                meta_hash,
            } => Command::RequestFile {
                dest,
                file_name,
                meta_hash,
            },
            SendCommand::Search { keywords } => Command::Search { keywords },
            SendCommand::Download { name } => Command::Download { name },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.url {
        config.server.base_url = url;
    }

    init_tracing(&config.logging);

    let renderer = Arc::new(TerminalRenderer::stdout());

    match cli.command {
        Commands::Watch => watch(&config, renderer).await?,

        Commands::Id => {
            let client = ApiClient::new(config.client_config())?;
            let id = client.node_id().await?;
            renderer.identity(&id);
        }

        Commands::Peers => snapshot::<Peers>(&config, renderer.as_ref()).await?,
        Commands::Routing => snapshot::<RoutablePeers>(&config, renderer.as_ref()).await?,
        Commands::Messages => snapshot::<Messages>(&config, renderer.as_ref()).await?,
        Commands::Matches => snapshot::<SearchMatches>(&config, renderer.as_ref()).await?,

        Commands::Send { command } => {
            let dispatcher = CommandDispatcher::new(ApiClient::new(config.client_config())?);
            let result = dispatcher.submit(command.into()).await;
            renderer.notify(&outcome_notice(&result));
            if result.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Config { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Initialize logging on stderr so rendered views keep stdout
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("peerster_gui={}", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Fetch one resource and render it once
async fn snapshot<R: Resource>(config: &Config, renderer: &dyn Renderer) -> anyhow::Result<()> {
    let client = ApiClient::new(config.client_config())?;
    let items = client
        .collection::<R>()
        .await
        .with_context(|| format!("Failed to fetch {}", R::KIND))?;

    renderer.render(R::KIND, &View::build::<R>(&items, &config.view_options()));
    Ok(())
}

/// Poll until Ctrl+C or `quit`, dispatching console lines as commands
async fn watch(
    config: &Config,
    renderer: Arc<TerminalRenderer<std::io::Stdout>>,
) -> anyhow::Result<()> {
    let session = Session::start(config, renderer.clone())?;
    let mut console = Console::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<JoinHandle<_>> = Vec::new();

    println!("Watching {} (type `help` for commands)", config.server.base_url);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: keep rendering until interrupted
                    tokio::signal::ctrl_c().await?;
                    break;
                };

                match console.interpret(&line) {
                    ConsoleAction::Submit(command) => {
                        // Outcome is rendered by the session
                        pending.retain(|task| !task.is_finished());
                        pending.push(session.spawn_submit(command));
                    }
                    ConsoleAction::Help => println!("{}", USAGE),
                    ConsoleAction::Quit => break,
                    ConsoleAction::Nothing => {}
                    ConsoleAction::Unknown(verb) => {
                        renderer.notify(&Notice::failure(format!(
                            "Unknown command `{}` (try `help`)",
                            verb
                        )));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    for task in pending {
        if let Err(e) = task.await {
            tracing::warn!("Command task ended abnormally: {}", e);
        }
    }

    session.shutdown().await;
    Ok(())
}
