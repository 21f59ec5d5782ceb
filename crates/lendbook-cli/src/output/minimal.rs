use serde_json::Value;

/// Headline figure of each command, in priority order.
const HEADLINE_KEYS: [&str; 7] = [
    "payment_per_period",
    "balance_after",
    "balance",
    "outstanding",
    "total_outstanding",
    "total_balance",
    "total_payment",
];

/// Print just the headline value of a result.
///
/// Loan summaries also print their status, e.g. `-50.00 paid`.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result {
        for key in HEADLINE_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                let status = map.get("status_after").or_else(|| map.get("status"));
                match status.and_then(Value::as_str) {
                    Some(status) => println!("{} {}", format_minimal(val), status),
                    None => println!("{}", format_minimal(val)),
                }
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
