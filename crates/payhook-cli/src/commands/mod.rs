use anyhow::Result;
use payhook_config::{AppConfig, OutputConfig};
use payhook_core::rules::transform_with;
use payhook_core::{OutputRecord, TransactionContext, WebhookContext};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

pub mod completions;
pub mod run;
pub mod transform;

pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub output: OutputConfig,
}

/// Runs the transform and writes its single result in the engine's item format.
pub fn emit_transform(
    ctx: &Context<'_>,
    transaction: &TransactionContext,
    webhook: &WebhookContext,
) -> Result<()> {
    let record = transform_with(transaction, webhook, &ctx.config.phone)?;
    debug!(
        transaction_id = %record.transaction_id,
        in_app = record.body.in_app,
        "transform succeeded"
    );
    emit_record(ctx.output, record)
}

fn emit_record(output: OutputConfig, record: OutputRecord) -> Result<()> {
    if output.envelope {
        print_json(&record.into_items(), output.pretty)
    } else {
        print_json(&record, output.pretty)
    }
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}
