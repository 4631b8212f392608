use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_COUNTRY_PREFIX: &str = "55";
pub const DEFAULT_MIN_PHONE_DIGITS: usize = 10;

const OBJECT_STRING: &str = "[object Object]";
const EXPONENT_UPPER: f64 = 1e21;
const EXPONENT_LOWER: f64 = 1e-6;

/// Dialing prefix prepended to every normalized phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryPrefix(String);

impl CountryPrefix {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() || !raw.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(CoreError::InvalidCountryPrefix(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryPrefix {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY_PREFIX.to_string())
    }
}

impl fmt::Display for CountryPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryPrefix {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryPrefix> for String {
    fn from(value: CountryPrefix) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRules {
    pub country_prefix: CountryPrefix,
    pub min_digits: usize,
}

impl Default for PhoneRules {
    fn default() -> Self {
        Self {
            country_prefix: CountryPrefix::default(),
            min_digits: DEFAULT_MIN_PHONE_DIGITS,
        }
    }
}

impl PhoneRules {
    /// Builds the outbound `customerPhone` value from a raw webhook phone field.
    pub fn customer_phone(&self, raw: Option<&Value>) -> Result<String, CoreError> {
        let digits = normalize_phone(raw);
        if digits.len() < self.min_digits {
            return Err(CoreError::InvalidPhone {
                digits: digits.len(),
                min: self.min_digits,
            });
        }

        let mut out = String::with_capacity(self.country_prefix.as_str().len() + digits.len());
        out.push_str(self.country_prefix.as_str());
        out.push_str(&digits);
        Ok(out)
    }
}

pub fn normalize_phone(raw: Option<&Value>) -> String {
    match raw {
        Some(value) => strip_non_digits(&coerce_to_string(value)),
        None => String::new(),
    }
}

pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Loose string conversion for upstream values of unknown type.
///
/// Mirrors what a dynamically typed workflow engine produces when it
/// stringifies a field: `null` is empty, arrays join with commas and
/// objects collapse to a placeholder without digits.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return int.to_string();
            }
            if let Some(int) = number.as_u64() {
                return int.to_string();
            }
            match number.as_f64() {
                Some(float) => format_float(float),
                None => number.to_string(),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(coerce_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => OBJECT_STRING.to_string(),
    }
}

fn format_float(float: f64) -> String {
    if !float.is_finite() {
        return float.to_string();
    }
    let magnitude = float.abs();
    if magnitude >= EXPONENT_UPPER || (magnitude != 0.0 && magnitude < EXPONENT_LOWER) {
        return format!("{:e}", float);
    }
    if float.fract() == 0.0 {
        // integral and below 1e21, so it fits in i128 without loss
        return (float as i128).to_string();
    }
    float.to_string()
}
