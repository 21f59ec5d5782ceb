use clap::Args;
use serde_json::Value;

use lendbook_core::ledger::{self, LoanLedgerInput, LoansQuery, PaymentPreviewInput, Portfolio};
use lendbook_core::LoanStatus;

use crate::input;

/// Arguments for a single loan's balance and status
#[derive(Args)]
pub struct BalanceArgs {
    /// Path to JSON/YAML input file: {"loan": {...}, "payments": [...]}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for previewing a payment
#[derive(Args)]
pub struct ApplyPaymentArgs {
    /// Path to JSON/YAML input file: {"loan": {...}, "payments": [...], "payment": {...}}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for listing loans
#[derive(Args)]
pub struct LoansArgs {
    /// Path to JSON/YAML portfolio file: {"borrowers": [...], "loans": [...], "payments": [...]}
    #[arg(long)]
    pub input: Option<String>,

    /// Only loans with this derived status (active or paid)
    #[arg(long)]
    pub status: Option<LoanStatus>,

    /// Only loans of this borrower id
    #[arg(long)]
    pub borrower: Option<String>,
}

/// Arguments for a borrower roll-up
#[derive(Args)]
pub struct BorrowerArgs {
    /// Path to JSON/YAML portfolio file
    #[arg(long)]
    pub input: Option<String>,

    /// Borrower id
    #[arg(long)]
    pub id: String,
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger_input: LoanLedgerInput = input::load(args.input.as_deref(), "loan input")?;
    let result = ledger::loan_summary(&ledger_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_apply_payment(args: ApplyPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let preview_input: PaymentPreviewInput = input::load(args.input.as_deref(), "payment input")?;
    let result = ledger::preview_payment(&preview_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_loans(args: LoansArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio: Portfolio = input::load(args.input.as_deref(), "portfolio")?;
    let query = LoansQuery {
        portfolio,
        status: args.status,
        borrower_id: args.borrower,
    };
    let result = ledger::list_loans(&query)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_borrower(args: BorrowerArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio: Portfolio = input::load(args.input.as_deref(), "portfolio")?;
    let result = ledger::borrower_report(&portfolio, &args.id)?;
    Ok(serde_json::to_value(result)?)
}
