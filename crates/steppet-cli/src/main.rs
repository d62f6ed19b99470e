use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "steppet", version, about = "StepPet progression CLI")]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today instead of the system date
    #[arg(long, global = true)]
    day: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's step count
    Steps {
        /// Step count reported by the step source
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
    /// Close finished days and open today
    Rollover,
    /// Spend credits on a minigame or pet activity
    Spend {
        /// Activity name (e.g. "bubble-pop", "feed")
        activity: String,
    },
    /// Credit a confirmed store purchase
    Purchase {
        /// Store product id (e.g. "virtupet_credits_10")
        product_id: String,
    },
    /// Step goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Subscription tier management
    Tier {
        #[command(subcommand)]
        action: commands::credits::TierAction,
    },
    /// Print pet, streak and credit state as JSON
    Status,
    /// List achievements
    Achievements {
        /// Only this category (e.g. "streak", "play")
        #[arg(long)]
        category: Option<String>,
        /// Only unlocked achievements
        #[arg(long)]
        unlocked: bool,
    },
    /// Step history summaries
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("steppet=warn,steppet_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let day = cli.day;
    let result = match cli.command {
        Commands::Steps { count } => commands::steps::run(day, count),
        Commands::Rollover => commands::status::rollover(day),
        Commands::Spend { activity } => commands::credits::spend(day, &activity),
        Commands::Purchase { product_id } => commands::credits::purchase(day, &product_id),
        Commands::Goal { action } => commands::goal::run(day, action),
        Commands::Tier { action } => commands::credits::tier(day, action),
        Commands::Status => commands::status::run(day),
        Commands::Achievements { category, unlocked } => {
            commands::achievements::run(day, category.as_deref(), unlocked)
        }
        Commands::History { action } => commands::history::run(day, action),
        Commands::Config { action } => commands::config::run(day, action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "steppet", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
