mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::analytics::AnalyticsArgs;
use commands::ledger::{ApplyPaymentArgs, BalanceArgs, BorrowerArgs, LoansArgs};
use commands::schedule::ScheduleArgs;

/// Loan schedules, balances and lending analytics
#[derive(Parser)]
#[command(
    name = "lendbook",
    version,
    about = "Loan schedules, balances and lending analytics",
    long_about = "A CLI over the lendbook engine: flat-rate amortization schedules, \
                  balances and statuses derived from payment history, payment previews, \
                  and dashboard analytics for a lender's portfolio. Inputs are JSON or \
                  YAML documents passed with --input or piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a flat-rate amortization schedule
    Schedule(ScheduleArgs),
    /// Derive balance, status and contract figures for one loan
    Balance(BalanceArgs),
    /// Preview the effect of recording a payment
    ApplyPayment(ApplyPaymentArgs),
    /// List loans with derived balances, optionally filtered by status
    Loans(LoansArgs),
    /// Roll up one borrower's loans
    Borrower(BorrowerArgs),
    /// Dashboard analytics for a portfolio
    Analytics(AnalyticsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lendbook_core=debug,lendbook=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the computed output; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Balance(args) => commands::ledger::run_balance(args),
        Commands::ApplyPayment(args) => commands::ledger::run_apply_payment(args),
        Commands::Loans(args) => commands::ledger::run_loans(args),
        Commands::Borrower(args) => commands::ledger::run_borrower(args),
        Commands::Analytics(args) => commands::analytics::run_analytics(args),
        Commands::Version => {
            println!("lendbook {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
