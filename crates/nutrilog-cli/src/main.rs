use clap::{CommandFactory, Parser, Subcommand};
use nutrilog_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nutrilog", version, about = "NutriLog CLI")]
struct Cli {
    /// Log at debug level (overrides config, not RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile, goals and weight projection
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Food and exercise diary
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Suggest food or exercise names for a partial query
    Suggest {
        /// Partial name, at least two characters
        query: String,
    },
    /// Fasting timer
    Fast {
        #[command(subcommand)]
        action: commands::fast::FastAction,
    },
    /// Community feed
    Community {
        #[command(subcommand)]
        action: commands::community::CommunityAction,
    },
    /// Ask the nutrition coach (interactive without a message)
    Chat {
        /// Single message to send
        message: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`, which wins
/// over `logging.level` from the config file.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose {
            "debug".to_string()
        } else {
            Config::load_or_default().logging.level
        };
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action).await,
        Commands::Log { action } => commands::log::run(action).await,
        Commands::Suggest { query } => commands::suggest::run(&query).await,
        Commands::Fast { action } => commands::fast::run(action).await,
        Commands::Community { action } => commands::community::run(action),
        Commands::Chat { message } => commands::chat::run(message).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "nutrilog", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
