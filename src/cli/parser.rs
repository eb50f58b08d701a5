use clap::{Parser, Subcommand};

/// Command-line interface definition for rosterwatch
/// CLI application to monitor workforce leave rosters with SQLite
#[derive(Parser)]
#[command(
    name = "rosterwatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Monitor workforce leave rosters: ingest uploads, track due leave and send reminders",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or check)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Run configuration file migrations if needed")]
        migrate: bool,
    },

    /// Ingest a roster upload (CSV worksheet export)
    Ingest {
        /// Path to the CSV file
        file: String,

        /// Reporting period as YYYY-MM (defaults to the current month)
        #[arg(long = "period")]
        period: Option<String>,
    },

    /// List monitoring records
    List {
        /// Filter by status: unscheduled | active | due | overdue | on_leave
        #[arg(long = "status")]
        status: Option<String>,

        /// Filter by reporting period (YYYY-MM)
        #[arg(long = "period")]
        period: Option<String>,
    },

    /// Approve or reject a due monitoring record
    Resolve {
        /// Monitoring record id
        id: i64,

        #[arg(long, conflicts_with = "reject", help = "Approve the leave")]
        approve: bool,

        #[arg(long, help = "Reject and return to active tracking")]
        reject: bool,

        /// Override leave start date (YYYY-MM-DD)
        #[arg(long = "start")]
        start: Option<String>,

        /// Override leave end date (YYYY-MM-DD)
        #[arg(long = "end")]
        end: Option<String>,

        /// Leave type (default: annual)
        #[arg(long = "type")]
        leave_type: Option<String>,

        /// Attachment path forwarded to the leave request
        #[arg(long = "attachment")]
        attachment: Option<String>,
    },

    /// Recompute derived status for every record
    Recompute,

    /// Send due leave reminders now
    Remind {
        #[arg(long = "dry-run", help = "Evaluate without dispatching anything")]
        dry_run: bool,
    },

    /// Show the reminder dispatch history
    History,

    /// Show the operation log
    Log,

    /// Export monitoring records or reminder history
    Export {
        /// What to export: monitoring | history
        what: String,

        /// Output format: csv | json
        #[arg(long = "format", default_value = "csv")]
        format: String,

        /// Output file path
        #[arg(long = "output", short = 'o')]
        output: String,

        /// Optional reporting period filter for monitoring exports
        #[arg(long = "period")]
        period: Option<String>,
    },

    /// Delete all monitoring records for a reporting period
    Clear {
        /// Reporting period (YYYY-MM)
        #[arg(long = "period")]
        period: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Run recompute + reminders on a fixed interval
    Watch {
        /// Seconds between runs (default from config)
        #[arg(long = "interval-secs")]
        interval_secs: Option<u64>,

        /// Stop after N cycles (default: run until terminated)
        #[arg(long = "cycles")]
        cycles: Option<u64>,
    },
}
