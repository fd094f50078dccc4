//! Record operation commands.

use super::open_ledger;
use crate::output;
use certledger_core::{Operation, RecordService};
use std::path::Path;
use tracing::info;

pub fn run(
    ledger: &Path,
    sync: bool,
    operation: Operation,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let writes = matches!(operation, Operation::Create(_));
    let mut service = RecordService::new(open_ledger(ledger, sync, writes)?);

    let verb = operation.verb();
    let payload = service.execute(operation).map_err(|e| e.message())?;
    service.into_inner().finish()?;
    info!(verb, bytes = payload.len(), "operation completed");

    output::print_payload(&payload, pretty)
}

pub fn run_raw(
    ledger: &Path,
    sync: bool,
    verb: &str,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let operation = Operation::parse(verb, args).map_err(|e| e.message())?;
    run(ledger, sync, operation, false)
}
