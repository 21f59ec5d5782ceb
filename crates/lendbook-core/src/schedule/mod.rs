//! Repayment schedules.
//!
//! Only the flat-rate (add-on) method is offered: interest is charged on the
//! original principal for every period, never on the reducing balance.

pub mod flat_rate;

pub use flat_rate::{
    build_schedule, flat_rate_schedule, rate_per_period, AmortizationLine, ScheduleInput,
    ScheduleOutput,
};
