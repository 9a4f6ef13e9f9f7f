use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    // Report sections have differing column counts
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows),
            Some(Value::Object(result)) => {
                // Section tables are flattened with a leading section column
                let sectioned = result.values().any(|v| {
                    matches!(v, Value::Array(rows) if rows.first().is_some_and(Value::is_object))
                });
                if sectioned {
                    write_sections_csv(&mut wtr, result);
                } else {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                    }
                }
            }
            _ => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_sections_csv<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &serde_json::Map<String, Value>,
) {
    for (section, val) in result {
        match val {
            Value::Array(rows) => {
                for row in rows {
                    if let Value::Object(map) = row {
                        let mut record = vec![section.clone()];
                        record.extend(map.values().map(format_csv_value));
                        let _ = wtr.write_record(&record);
                    }
                }
            }
            other => {
                let _ = wtr.write_record([section.as_str(), &format_csv_value(other)]);
            }
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        let _ = wtr.write_record(["index", "value"]);
        for (i, item) in arr.iter().enumerate() {
            let _ = wtr.write_record([(i + 1).to_string(), format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
