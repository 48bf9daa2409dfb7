use super::config::RecordFields;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("collection '{0}' not found in input document")]
    MissingCollection(String),
    #[error("input document holds several record arrays ({0}), pick one with a collection key")]
    AmbiguousCollection(String),
    #[error("input document has no record array")]
    NotAnArray,
    #[error("record {index} is not an object")]
    NotAnObject { index: usize },
    #[error("record {index} is missing field '{field}'")]
    MissingField { index: usize, field: String },
    #[error("record {index} has a non-text value in '{field}'")]
    InvalidText { index: usize, field: String },
    #[error("record {index} has an invalid amount in '{field}': {value}")]
    InvalidAmount {
        index: usize,
        field: String,
        value: String,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// One line item of the financial report for a single fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialRecord {
    /// Line item name, unique within the report
    pub name: String,
    /// Signed amount: positive is revenue, negative is an outflow
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Classification tag, e.g. "Operating Revenue"
    pub category: String,
}

impl FinancialRecord {
    pub fn new(name: impl Into<String>, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            category: category.into(),
        }
    }
}

/// Read records from a JSON document.
///
/// The root may be the record array itself, or an object holding it under
/// `fields.collection`. Without a collection key the object must contain
/// exactly one array.
pub fn read_records_json<R: Read>(
    reader: R,
    fields: &RecordFields,
) -> Result<Vec<FinancialRecord>, RecordError> {
    let value: Value = serde_json::from_reader(reader)?;
    let records = records_from_value(value, fields)?;
    log::info!("Read {} json records", records.len());
    Ok(records)
}

/// Read records from CSV with a header row. Columns are looked up by the
/// same keys as JSON fields; other columns are ignored.
pub fn read_records_csv<R: Read>(
    reader: R,
    fields: &RecordFields,
) -> Result<Vec<FinancialRecord>, RecordError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let row = row?;
        let entry: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(record_from_entry(index, &Value::Object(entry), fields)?);
    }
    log::info!("Read {} csv records", records.len());
    Ok(records)
}

pub fn records_from_value(
    value: Value,
    fields: &RecordFields,
) -> Result<Vec<FinancialRecord>, RecordError> {
    let entries = select_collection(value, fields.collection.as_deref())?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| record_from_entry(index, entry, fields))
        .collect()
}

fn select_collection(value: Value, collection: Option<&str>) -> Result<Vec<Value>, RecordError> {
    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => match collection {
            Some(key) => match map.remove(key) {
                Some(Value::Array(entries)) => Ok(entries),
                Some(_) => Err(RecordError::NotAnArray),
                None => Err(RecordError::MissingCollection(key.to_string())),
            },
            None => {
                let keys: Vec<String> = map
                    .iter()
                    .filter(|(_, v)| v.is_array())
                    .map(|(k, _)| k.clone())
                    .collect();
                match keys.as_slice() {
                    [] => Err(RecordError::NotAnArray),
                    [key] => match map.remove(key.as_str()) {
                        Some(Value::Array(entries)) => Ok(entries),
                        _ => Err(RecordError::NotAnArray),
                    },
                    _ => Err(RecordError::AmbiguousCollection(keys.join(", "))),
                }
            }
        },
        _ => Err(RecordError::NotAnArray),
    }
}

fn record_from_entry(
    index: usize,
    entry: &Value,
    fields: &RecordFields,
) -> Result<FinancialRecord, RecordError> {
    let object = entry
        .as_object()
        .ok_or(RecordError::NotAnObject { index })?;

    let lookup = |field: &str| {
        object.get(field).ok_or_else(|| RecordError::MissingField {
            index,
            field: field.to_string(),
        })
    };
    let text = |field: &str| -> Result<String, RecordError> {
        lookup(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RecordError::InvalidText {
                index,
                field: field.to_string(),
            })
    };

    let name = text(&fields.name)?;
    let category = text(&fields.category)?;
    let raw_amount = lookup(&fields.amount)?;
    let amount = parse_amount(raw_amount).ok_or_else(|| RecordError::InvalidAmount {
        index,
        field: fields.amount.clone(),
        value: raw_amount.to_string(),
    })?;

    Ok(FinancialRecord {
        name,
        amount,
        category,
    })
}

fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal_str(&n.to_string())
            }
        }
        Value::String(s) => parse_decimal_str(s),
        // line item not reported for this year
        Value::Null => Some(Decimal::ZERO),
        _ => None,
    }
}

/// Accepts "1234.5", "1,234.50", "$1,234", "1.2e6" and accounting negatives "(500)".
fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '$').collect();
    if cleaned.is_empty() {
        return None;
    }
    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -amount } else { amount })
}
