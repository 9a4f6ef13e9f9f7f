use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", minimal_answer(result_obj));
}

fn minimal_answer(result_obj: &Value) -> String {
    let priority_keys = [
        "prompt",
        "summary",
        "initial_treasury",
        "net_result",
        "caf",
        "closing_balance",
        "totals",
        "surplus",
    ];

    match result_obj {
        Value::Object(map) => {
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if val.is_object() {
                        return minimal_answer(val);
                    }
                    if !val.is_null() {
                        return format_minimal(val);
                    }
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
                None => String::new(),
            }
        }
        // Yearly lists: one line per year with its headline figure
        Value::Array(items) if items.first().is_some_and(Value::is_object) => items
            .iter()
            .map(|item| {
                let year = item.get("year").map(format_minimal).unwrap_or_default();
                format!("{}\t{}", year, minimal_answer(item))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => format_minimal(other),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object() && !v.is_array()) => arr
            .iter()
            .map(format_minimal)
            .collect::<Vec<_>>()
            .join(" "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
