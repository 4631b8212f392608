use crate::domain::phone::coerce_to_string;
use crate::error::CoreError;
use serde_json::Value;

/// Reads the upstream transaction identifier.
///
/// Non-empty strings pass through untouched. Non-zero numbers are accepted
/// and rendered in decimal. Everything else, including `0`, booleans and
/// containers, counts as missing.
pub fn extract_transaction_id(value: Option<&Value>) -> Result<String, CoreError> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        Some(value) if value.is_number() && value.as_f64() != Some(0.0) => {
            Ok(coerce_to_string(value))
        }
        _ => Err(CoreError::MissingTransactionId),
    }
}
