use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use lendbook_core::analytics::{self, AnalyticsFilter, AnalyticsInput};
use lendbook_core::ledger::Portfolio;

use crate::input;

/// Arguments for portfolio dashboard analytics
#[derive(Args)]
pub struct AnalyticsArgs {
    /// Path to JSON/YAML portfolio file: {"borrowers": [...], "loans": [...], "payments": [...]}
    #[arg(long)]
    pub input: Option<String>,

    /// Window: this_month, this_year or last_year
    #[arg(long, default_value = "this_year")]
    pub filter: AnalyticsFilter,

    /// Reference date for the window (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_analytics(args: AnalyticsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio: Portfolio = input::load(args.input.as_deref(), "portfolio")?;
    let analytics_input = AnalyticsInput {
        portfolio,
        filter: args.filter,
        as_of: args.as_of.unwrap_or_else(|| chrono::Local::now().date_naive()),
    };
    let result = analytics::analyze_portfolio(&analytics_input)?;
    Ok(serde_json::to_value(result)?)
}
