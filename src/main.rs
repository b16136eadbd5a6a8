// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::path::PathBuf;

use clipkeep::app_config::{self, Config, StorageBackend};
use clipkeep::database::ContentType;
use clipkeep::gateway::Response;
use clipkeep::{Controller, doctor};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ContentType to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliContentType {
    Text,
    Image,
    File,
}

impl From<CliContentType> for ContentType {
    fn from(cli_type: CliContentType) -> Self {
        match cli_type {
            CliContentType::Text => ContentType::Text,
            CliContentType::Image => ContentType::Image,
            CliContentType::File => ContentType::File,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture a clipboard entry (reads stdin when CONTENT is omitted)
    Add {
        /// Content to store
        content: Option<String>,

        /// Kind of content
        #[arg(short = 't', long = "type", value_enum, default_value = "text")]
        content_type: CliContentType,

        /// Application the content came from
        #[arg(short, long)]
        source: Option<String>,

        /// Category label
        #[arg(long)]
        category: Option<String>,

        /// Pin the entry as a favorite
        #[arg(short, long)]
        favorite: bool,
    },

    /// List stored entries, newest first
    History {
        /// Maximum number of entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Number of entries to skip
        #[arg(short, long)]
        offset: Option<usize>,
    },

    /// Search stored entries (case-insensitive substring)
    Search {
        /// Text to look for
        query: String,

        /// Maximum number of entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show history statistics
    Stats,

    /// Toggle the favorite flag of an entry
    Favorite {
        /// Entry id
        id: i64,
    },

    /// Delete one entry
    Delete {
        /// Entry id
        id: i64,
    },

    /// Delete every entry
    Clear,

    /// Check content for sensitive data
    Scan {
        /// Content to check
        content: String,
    },

    /// Mask sensitive content
    Mask {
        /// Content to mask
        content: String,
    },

    /// Call a gateway channel directly
    Invoke {
        /// Channel name, e.g. clipboard:getHistory
        channel: String,

        /// JSON payload
        payload: Option<String>,
    },

    /// Diagnose the local environment
    Doctor,

    /// Generate shell completions for clipkeep
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Clipkeep - clipboard history with sensitive data detection
#[derive(Parser, Debug)]
#[command(name = "clipkeep")]
#[command(version)]
#[command(about = "Clipboard history backend")]
#[command(long_about = "Clipkeep stores clipboard history, flags sensitive content and exposes everything through a command gateway.

EXAMPLES:
    clipkeep add \"hello world\"                   # Capture an entry
    echo secret | clipkeep add --source shell     # Capture from stdin
    clipkeep history -n 10                        # Show the 10 newest entries
    clipkeep search hello                         # Search entries
    clipkeep scan 4111111111111111                # Check for sensitive data
    clipkeep invoke clipboard:getStats            # Call a gateway channel
    clipkeep --memory doctor                      # Diagnose with the memory backend
    clipkeep completions bash > clipkeep.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in clipkeep.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "clipkeep.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Use the in-memory store instead of the configured backend
    #[arg(long, global = true)]
    memory: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The max level is the live filter, so the logger itself accepts everything
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Warnings only until the config decides the real level
    CustomLogger::init(LevelFilter::Warn)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "clipkeep", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;

    if let Commands::Doctor = cli.command {
        let report = doctor::run(&config);
        for result in &report.results {
            println!("{}", result);
        }
        if !report.passed() {
            eprintln!("{} check(s) failed", report.failed_count());
        }
        std::process::exit(report.exit_code());
    }

    let controller = Controller::with_config(config)?;
    controller.start().await;

    let outcome = run_command(&controller, cli.command).await;

    controller.shutdown().await;
    outcome
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        // Just update the max level without reinitializing the logger
        log::set_max_level(config.log_level.to_level_filter());
    }

    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    debug!("Loaded configuration from {:?}", cli.config);
    Ok(config)
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    let (channel, payload) = match command {
        Commands::Add {
            content,
            content_type,
            source,
            category,
            favorite,
        } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };
            let content_type: ContentType = content_type.into();
            (
                "clipboard:addItem".to_string(),
                json!({
                    "content": content,
                    "type": content_type,
                    "source": source,
                    "category": category,
                    "isFavorite": favorite,
                }),
            )
        }
        Commands::History { limit, offset } => (
            "clipboard:getHistory".to_string(),
            json!({ "limit": limit, "offset": offset }),
        ),
        Commands::Search { query, limit } => (
            "clipboard:search".to_string(),
            json!({ "query": query, "limit": limit }),
        ),
        Commands::Stats => ("clipboard:getStats".to_string(), Value::Null),
        Commands::Favorite { id } => ("clipboard:toggleFavorite".to_string(), json!({ "id": id })),
        Commands::Delete { id } => ("clipboard:delete".to_string(), json!({ "id": id })),
        Commands::Clear => ("clipboard:clearAll".to_string(), Value::Null),
        Commands::Scan { content } => ("security:scan".to_string(), json!({ "content": content })),
        Commands::Mask { content } => ("security:mask".to_string(), json!({ "content": content })),
        Commands::Invoke { channel, payload } => {
            let payload = match payload {
                Some(raw) => serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid JSON payload for {}", channel))?,
                None => Value::Null,
            };
            (channel, payload)
        }
        Commands::Doctor | Commands::Completions { .. } => {
            return Err(anyhow!("Command is handled before the backend starts"));
        }
    };

    let response = controller.invoke(&channel, payload).await;
    print_response(response)
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read content from stdin")?;
    Ok(content)
}

fn print_response(response: Response) -> Result<()> {
    if !response.success {
        return Err(anyhow!(
            response
                .error
                .unwrap_or_else(|| "Unknown gateway error".to_string())
        ));
    }

    match response.data {
        Some(Value::String(text)) => println!("{}", text),
        Some(data) => println!("{}", serde_json::to_string_pretty(&data)?),
        None => println!("ok"),
    }

    Ok(())
}
