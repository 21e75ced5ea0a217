use serde_json::{Value, json};

pub use crate::core::SCHEMA_VERSION;

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

/// Upgrades a stored blob to the current schema in place. Runs once per
/// load and is a no-op for blobs already at the current version.
pub fn upgrade(blob: &mut Value) {
    let Some(record) = blob.as_object_mut() else {
        return;
    };

    // A null or otherwise non-object income counts as missing, like the
    // original's truthiness check on the field.
    let has_income = record.get("income").is_some_and(Value::is_object);
    if !has_income {
        let has_legacy_fields = record.contains_key("monthlyIncome")
            || record.contains_key("additionalIncome")
            || record.contains_key("variableIncome");

        if has_legacy_fields {
            let monthly = number(record.get("monthlyIncome"));
            let additional = number(record.get("additionalIncome"));
            let variable = number(record.get("variableIncome"));

            let side_incomes = if additional > 0.0 {
                json!([{ "label": "Additional Income", "amount": additional }])
            } else {
                json!([])
            };
            let is_variable = variable > 0.0;
            let average_monthly = if is_variable {
                monthly + additional + variable
            } else {
                0.0
            };

            record.insert(
                "income".to_string(),
                json!({
                    "primaryIncome": monthly,
                    "sideIncomes": side_incomes,
                    "isVariable": is_variable,
                    "averageMonthly": average_monthly,
                }),
            );
            record.remove("monthlyIncome");
            record.remove("additionalIncome");
            record.remove("variableIncome");
        } else {
            record.insert(
                "income".to_string(),
                json!({
                    "primaryIncome": 0.0,
                    "sideIncomes": [],
                    "isVariable": false,
                    "averageMonthly": 0.0,
                }),
            );
        }
    }

    record.insert("schemaVersion".to_string(), json!(SCHEMA_VERSION));
}
