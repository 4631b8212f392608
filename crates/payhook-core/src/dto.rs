use serde::{Deserialize, Serialize};

/// Request payload handed to the downstream API call step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    pub body: OutputBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBody {
    #[serde(rename = "customerPhone")]
    pub customer_phone: String,
    #[serde(
        rename = "inAPP",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub in_app: bool,
}

/// Item envelope used by the workflow engine between steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowItem<T> {
    pub json: T,
}

impl<T> WorkflowItem<T> {
    pub fn new(json: T) -> Self {
        Self { json }
    }
}

impl OutputRecord {
    pub fn into_items(self) -> Vec<WorkflowItem<OutputRecord>> {
        vec![WorkflowItem::new(self)]
    }
}
