use crate::domain::context::{TransactionContext, WebhookContext};
use crate::domain::phone::PhoneRules;
use crate::dto::{OutputBody, OutputRecord};
use crate::error::CoreError;
use crate::rules::validation::extract_transaction_id;

/// Builds the downstream request from the transaction and webhook records
/// using the default phone rules (`55` prefix, 10 digits minimum).
pub fn transform(
    transaction: &TransactionContext,
    webhook: &WebhookContext,
) -> Result<OutputRecord, CoreError> {
    transform_with(transaction, webhook, &PhoneRules::default())
}

pub fn transform_with(
    transaction: &TransactionContext,
    webhook: &WebhookContext,
    rules: &PhoneRules,
) -> Result<OutputRecord, CoreError> {
    let transaction_id = extract_transaction_id(transaction.transaction_id.as_ref())?;
    let customer_phone = rules.customer_phone(webhook.phone())?;

    Ok(OutputRecord {
        transaction_id,
        body: OutputBody {
            customer_phone,
            in_app: webhook.in_app(),
        },
    })
}
