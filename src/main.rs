use anyhow::Result;
use clap::{Parser, Subcommand};
use menuwise_shared::MealPeriod;

/// menuwise - Dining hall menu classification and recommendations
#[derive(Parser)]
#[command(name = "menuwise")]
#[command(about = "Dietary tagging and personalized dining hall recommendations", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Print recommendations for an eater as JSON
    Recommend {
        /// Eater whose saved preferences are used
        #[arg(long)]
        eater: String,

        /// Menu date as YYYY-MM-DD (defaults to today in the menu timezone)
        #[arg(long)]
        date: Option<String>,

        /// breakfast, lunch or dinner (defaults to the current meal period)
        #[arg(long)]
        meal: Option<MealPeriod>,

        /// Maximum number of recommendations
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=50))]
        limit: Option<u16>,
    },
    /// Print the dietary classification of a day's menu as JSON
    Classify {
        /// Menu date as YYYY-MM-DD (defaults to today in the menu timezone)
        #[arg(long)]
        date: Option<String>,

        /// Restrict to one meal period
        #[arg(long)]
        meal: Option<MealPeriod>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = menuwise::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    menuwise::observability::init_observability(
        "menuwise",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => menuwise::cli::serve(config, host, port).await,
        Commands::Migrate => menuwise::cli::migrate(config).await,
        Commands::Recommend {
            eater,
            date,
            meal,
            limit,
        } => {
            menuwise::cli::recommend(config, eater, date, meal, limit.map(usize::from)).await
        }
        Commands::Classify { date, meal } => menuwise::cli::classify(config, date, meal).await,
    }
}
