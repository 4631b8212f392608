use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Output of the upstream "create transaction" step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionContext {
    #[serde(rename = "transactionID", default)]
    pub transaction_id: Option<Value>,
}

impl TransactionContext {
    pub fn new(transaction_id: impl Into<Value>) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
        }
    }
}

/// Inbound webhook event. Only `body` is read; headers and query are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookContext {
    #[serde(default, deserialize_with = "object_or_none")]
    pub body: Option<WebhookBody>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(rename = "inAPP", default)]
    pub in_app: Option<Value>,
}

impl WebhookContext {
    pub fn with_body(body: WebhookBody) -> Self {
        Self { body: Some(body) }
    }

    pub fn phone(&self) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.phone.as_ref())
    }

    /// True only for a literal boolean `true`; `"true"`, `1` and `false` all read as unset.
    pub fn in_app(&self) -> bool {
        matches!(
            self.body.as_ref().and_then(|body| body.in_app.as_ref()),
            Some(Value::Bool(true))
        )
    }
}

impl WebhookBody {
    pub fn new(phone: impl Into<Value>) -> Self {
        Self {
            phone: Some(phone.into()),
            in_app: None,
        }
    }

    pub fn with_in_app(mut self, in_app: impl Into<Value>) -> Self {
        self.in_app = Some(in_app.into());
        self
    }
}

const ITEM_KEY: &str = "json";

/// Strips a single-item engine envelope (`{"json": record}`) if present.
/// Objects carrying `json` next to other keys are records, not items.
pub fn unwrap_item(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(ITEM_KEY) => {
            map.remove(ITEM_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decodes an upstream record, refusing anything that is not a JSON object.
pub fn record_from_value<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    if !value.is_object() {
        return Err(serde_json::Error::custom(format!(
            "expected a JSON object, found {}",
            value_kind(&value)
        )));
    }
    serde_json::from_value(value)
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn object_or_none<'de, D>(deserializer: D) -> Result<Option<WebhookBody>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}
