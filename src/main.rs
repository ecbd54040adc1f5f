use clap::{Parser, Subcommand};
use std::sync::{Arc, Mutex};

use lanchat_bot::application::dispatch::CommandDispatcher;
use lanchat_bot::application::errors::{BotError, StorageError};
use lanchat_bot::application::services::ChatService;
use lanchat_bot::domain::entities::CommandRegistry;
use lanchat_bot::extensions;
use lanchat_bot::infrastructure::adapters::console::ConsoleAdapter;
use lanchat_bot::infrastructure::config::Config;
use lanchat_bot::infrastructure::database::MessageStore;
use lanchat_bot::infrastructure::upload::HttpUploader;

#[derive(Parser)]
#[command(name = "lanchat-bot")]
#[command(about = "Command bot for a LAN chat server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot with a console frontend
    Run {
        /// Name to chat under
        #[arg(short, long, default_value = "Anonymous")]
        user: String,

        /// Channel to join
        #[arg(long, default_value = "general")]
        channel: String,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { user, channel } => {
            if let Err(e) = run_bot(&cli.config, &user, &channel) {
                tracing::error!("Fatal: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("lanchat-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: &str, user: &str, channel: &str) -> Result<(), BotError> {
    // Load config
    let config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting {}", config.bot.name);

    let store = MessageStore::new(&config.storage.path).map_err(StorageError::Sqlite)?;
    tracing::info!("Message store ready at {}", config.storage.path.display());

    // Register extensions
    let mut registry = CommandRegistry::new();
    let extension_set = extensions::builtin(&config);
    let report = extensions::load_extensions(&extension_set, &mut registry);
    for failure in &report.failed {
        tracing::warn!("Extension {} unavailable: {}", failure.name, failure.reason);
    }

    let uploader =
        HttpUploader::from_config(&config.upload).map_err(|e| BotError::Internal(e.to_string()))?;

    let dispatcher = Arc::new(
        CommandDispatcher::new(registry, Arc::new(uploader)).with_sigil(config.bot.sigil),
    );

    let service = Arc::new(ChatService::new(
        dispatcher,
        Arc::new(Mutex::new(store)),
        Arc::new(ConsoleAdapter::new()),
    ));

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(run_console(service, config.bot.sigil, user, channel));

    Ok(())
}

async fn run_console(service: Arc<ChatService>, sigil: char, user: &str, channel: &str) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    tracing::info!("Joined #{} as {}", channel, user);
    println!(
        "Type to chat, {}command to run a command, 'quit' to exit.",
        sigil
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" || line == "exit" {
                    break;
                }
                if let Err(e) = service.handle_line(channel, user, line).await {
                    tracing::error!("Failed to handle line: {}", e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    println!("Bye!");
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            tracing::error!("Failed to render default config: {}", e);
        }
    }
}
