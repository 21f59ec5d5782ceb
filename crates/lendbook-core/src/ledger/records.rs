//! Persisted lending records as the caller hands them to the engine.
//!
//! Balances and statuses are not stored; they are derived on every
//! read from the live payment set (see [`super::balance`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Free-text postal address. No referential integrity to geo data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barangay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

impl Address {
    /// Non-empty components joined street-first, e.g. for contract headers.
    pub fn one_line(&self) -> String {
        [&self.street, &self.barangay, &self.city, &self.province]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub borrower_id: String,
    /// Principal lent.
    pub amount: Money,
    pub date_borrowed: NaiveDate,
    /// Percent per month (per four weeks for weekly terms).
    pub interest_rate: Percent,
    #[serde(default)]
    pub interest_type: InterestType,
    pub term_length: i32,
    #[serde(default)]
    pub term_unit: TermUnit,
    /// Stored due date, if the persistence layer captured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Loan {
    /// Due date derived from the loan terms, ignoring any stored value.
    pub fn derived_due_date(&self) -> Option<NaiveDate> {
        super::balance::due_date(self.date_borrowed, self.term_length, self.term_unit)
    }

    /// Stored due date, falling back to the derived one.
    pub fn effective_due_date(&self) -> Option<NaiveDate> {
        self.due_date.or_else(|| self.derived_due_date())
    }

    /// Recompute and store the due date, as done on create and update.
    pub fn with_derived_due_date(mut self) -> Self {
        self.due_date = self.derived_due_date();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub loan_id: String,
    pub amount: Money,
    pub payment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_address_one_line_skips_blanks() {
        let address = Address {
            street: Some("12 Mabini St".into()),
            barangay: Some("  ".into()),
            city: Some("Quezon City".into()),
            province: None,
        };
        assert_eq!(address.one_line(), "12 Mabini St, Quezon City");
    }

    #[test]
    fn test_borrower_address_is_flattened() {
        let json = r#"{"id":"B1","name":"Ana","city":"Cebu","province":"Cebu"}"#;
        let borrower: Borrower = serde_json::from_str(json).unwrap();
        assert_eq!(borrower.address.city.as_deref(), Some("Cebu"));
        assert!(borrower.email.is_none());
    }

    #[test]
    fn test_loan_defaults_and_due_date() {
        let json = r#"{
            "id": "L1",
            "borrower_id": "B1",
            "amount": "5000",
            "date_borrowed": "2024-01-31",
            "interest_rate": "3",
            "term_length": 1
        }"#;
        let loan: Loan = serde_json::from_str(json).unwrap();
        assert_eq!(loan.amount, dec!(5000));
        assert_eq!(loan.term_unit, TermUnit::Months);
        assert_eq!(loan.interest_type, InterestType::Monthly);
        assert_eq!(loan.due_date, None);

        let loan = loan.with_derived_due_date();
        assert_eq!(loan.due_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_stored_due_date_wins() {
        let stored = NaiveDate::from_ymd_opt(2030, 1, 1);
        let loan = Loan {
            id: "L1".into(),
            borrower_id: "B1".into(),
            amount: dec!(100),
            date_borrowed: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            interest_rate: dec!(1),
            interest_type: InterestType::Daily,
            term_length: 2,
            term_unit: TermUnit::Weeks,
            due_date: stored,
            description: None,
        };
        assert_eq!(loan.effective_due_date(), stored);
        assert_eq!(loan.derived_due_date(), NaiveDate::from_ymd_opt(2024, 1, 15));
    }
}
