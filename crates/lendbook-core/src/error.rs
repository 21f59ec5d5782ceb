use thiserror::Error;

/// Failures of the lending engine.
///
/// Bad loan parameters (a zero term, a zero principal) are not errors; they
/// yield empty or zero figures plus a warning in the output envelope.
#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown {kind} '{id}'")]
    UnknownRecord { kind: &'static str, id: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LendingError {
    fn from(e: serde_json::Error) -> Self {
        LendingError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = LendingError::InvalidInput {
            field: "filter".into(),
            reason: "expected this_month, this_year or last_year".into(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid input: filter: expected this_month, this_year or last_year"
        );
        let e = LendingError::UnknownRecord { kind: "borrower", id: "B9".into() };
        assert_eq!(e.to_string(), "Unknown borrower 'B9'");
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(LendingError::from(err), LendingError::SerializationError(_)));
    }
}
