use crate::commands::{emit_transform, Context};
use crate::error::invalid_input;
use crate::util::{read_json, InputSource};
use anyhow::Result;
use clap::Args;
use payhook_core::nodes::{resolve_contexts, NodeNames};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON object mapping node names to their outputs (file, or `-` for stdin)
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub input: InputSource,
    /// Node that produced the transaction record
    #[arg(long, value_name = "NAME")]
    pub transaction_node: Option<String>,
    /// Node that received the webhook event
    #[arg(long, value_name = "NAME")]
    pub webhook_node: Option<String>,
}

pub fn run(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    let names = node_names(&ctx.config.nodes, args.transaction_node, args.webhook_node)?;
    debug!(
        input = %args.input,
        transaction_node = %names.transaction,
        webhook_node = %names.webhook,
        "resolving node outputs"
    );

    let outputs = match read_json(&args.input)? {
        Value::Object(map) => map,
        _ => {
            return Err(invalid_input(format!(
                "{} must be a JSON object keyed by node name",
                args.input
            )))
        }
    };

    let (transaction, webhook) = resolve_contexts(&outputs, &names)?;
    emit_transform(ctx, &transaction, &webhook)
}

fn node_names(
    configured: &NodeNames,
    transaction: Option<String>,
    webhook: Option<String>,
) -> Result<NodeNames> {
    let mut names = configured.clone();
    if let Some(name) = transaction {
        if name.trim().is_empty() {
            return Err(invalid_input("--transaction-node cannot be empty"));
        }
        names.transaction = name;
    }
    if let Some(name) = webhook {
        if name.trim().is_empty() {
            return Err(invalid_input("--webhook-node cannot be empty"));
        }
        names.webhook = name;
    }
    Ok(names)
}
