use crate::commands::{emit_transform, Context};
use crate::error::invalid_input;
use crate::util::{read_json, InputSource};
use anyhow::Result;
use clap::Args;
use payhook_core::{record_from_value, unwrap_item, TransactionContext, WebhookContext};
use tracing::debug;

/// Both inputs may be bare records or single `{"json": ...}` engine items.
#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Output of the create-transaction step (JSON file, or `-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub transaction: InputSource,
    /// Webhook event carrying `body.phone` and `body.inAPP` (JSON file, or `-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub webhook: InputSource,
}

pub fn transform(ctx: &Context<'_>, args: TransformArgs) -> Result<()> {
    if args.transaction.is_stdin() && args.webhook.is_stdin() {
        return Err(invalid_input(
            "only one of --transaction and --webhook can read from stdin",
        ));
    }

    debug!(transaction = %args.transaction, webhook = %args.webhook, "reading records");
    let transaction: TransactionContext =
        record_from_value(unwrap_item(read_json(&args.transaction)?)).map_err(|err| {
            invalid_input(format!("transaction record {}: {err}", args.transaction))
        })?;
    let webhook: WebhookContext = record_from_value(unwrap_item(read_json(&args.webhook)?))
        .map_err(|err| invalid_input(format!("webhook record {}: {err}", args.webhook)))?;

    emit_transform(ctx, &transaction, &webhook)
}
