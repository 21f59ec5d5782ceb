use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lendbook_core::schedule::{self, ScheduleInput};
use lendbook_core::TermUnit;

use crate::input;

/// Arguments for a flat-rate amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal lent
    #[arg(long, alias = "principal")]
    pub amount: Option<Decimal>,

    /// Interest rate in percent per month (e.g. 5 for 5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of periods
    #[arg(long, allow_hyphen_values = true)]
    pub term_length: Option<i32>,

    /// Period unit: months or weeks
    #[arg(long, default_value = "months")]
    pub term_unit: TermUnit,

    /// Date the loan was issued (YYYY-MM-DD)
    #[arg(long, alias = "date-borrowed")]
    pub start: Option<NaiveDate>,

    /// Emit only the schedule lines (handy with --output csv)
    #[arg(long)]
    pub lines_only: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = if args.input.is_some() || args.amount.is_none() {
        input::load(args.input.as_deref(), "schedule input")?
    } else {
        ScheduleInput {
            principal: args.amount.ok_or("--amount is required (or provide --input)")?,
            interest_rate: args.rate.unwrap_or(Decimal::ZERO),
            term_length: args
                .term_length
                .ok_or("--term-length is required (or provide --input)")?,
            term_unit: args.term_unit,
            start_date: args.start.ok_or("--start is required (or provide --input)")?,
        }
    };

    let result = schedule::build_schedule(&schedule_input)?;
    if args.lines_only {
        return Ok(serde_json::to_value(&result.result.lines)?);
    }
    Ok(serde_json::to_value(result)?)
}
