//! Resolution of named upstream step outputs into transform inputs.
//!
//! The workflow engine exposes earlier steps by node name. A node's output is
//! accepted as a single item (`{"json": {...}}`), as a list of items (the first
//! one is used), or as the bare record itself.

use crate::domain::context::{
    record_from_value, unwrap_item, value_kind, TransactionContext, WebhookContext,
};
use serde::de::Error as _;
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_TRANSACTION_NODE: &str = "SPG - Create Payment";
pub const DEFAULT_WEBHOOK_NODE: &str = "Webhook - IA";

pub type NodeOutputs = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeNames {
    pub transaction: String,
    pub webhook: String,
}

impl Default for NodeNames {
    fn default() -> Self {
        Self {
            transaction: DEFAULT_TRANSACTION_NODE.to_string(),
            webhook: DEFAULT_WEBHOOK_NODE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("node not found: {0}")]
    MissingNode(String),
    #[error("node has no output items: {0}")]
    EmptyOutput(String),
    #[error("invalid record from node {node}: {source}")]
    InvalidRecord {
        node: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn resolve_contexts(
    outputs: &NodeOutputs,
    names: &NodeNames,
) -> Result<(TransactionContext, WebhookContext), ResolveError> {
    let transaction = resolve_node(outputs, &names.transaction)?;
    let webhook = resolve_node(outputs, &names.webhook)?;
    Ok((transaction, webhook))
}

fn resolve_node<T>(outputs: &NodeOutputs, name: &str) -> Result<T, ResolveError>
where
    T: serde::de::DeserializeOwned,
{
    let output = outputs
        .get(name)
        .ok_or_else(|| ResolveError::MissingNode(name.to_string()))?;
    let record = first_record(output, name)?;
    record_from_value(record).map_err(|source| ResolveError::InvalidRecord {
        node: name.to_string(),
        source,
    })
}

fn first_record(output: &Value, name: &str) -> Result<Value, ResolveError> {
    let item = match output {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| ResolveError::EmptyOutput(name.to_string()))?,
        other => other,
    };

    match item {
        Value::Object(_) => Ok(unwrap_item(item.clone())),
        other => Err(ResolveError::InvalidRecord {
            node: name.to_string(),
            source: serde_json::Error::custom(format!(
                "expected an item or object, found {}",
                value_kind(other)
            )),
        }),
    }
}
