pub mod analytics;
pub mod ledger;
pub mod schedule;
