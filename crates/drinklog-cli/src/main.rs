use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "drinklog", version, about = "DrinkLog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log or delete drinks
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Per-day views
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Summary of the most recent days, as shown by the widget
    Widget {
        /// Number of days (defaults to widget.days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Day { action } => commands::day::run(action),
        Commands::Widget { days } => commands::widget::run(days),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
