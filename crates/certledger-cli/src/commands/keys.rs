//! Keys command implementation.

use super::open_ledger;
use crate::output;
use certledger_store::{is_composite_key, split_composite_key, KeyValueStore};
use serde_json::json;
use std::path::Path;

pub fn run(ledger: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_ledger(ledger, false, false)?;

    if !json {
        output::print_keys_header();
    }

    for key in store.state().keys() {
        let size = store.get(key)?.map(|v| v.len()).unwrap_or(0);
        let decoded = if is_composite_key(key) {
            Some(split_composite_key(key)?)
        } else {
            None
        };

        if json {
            let line = match &decoded {
                Some((index, attributes)) => json!({
                    "key": key,
                    "index": index,
                    "attributes": attributes,
                    "bytes": size,
                }),
                None => json!({ "key": key, "bytes": size }),
            };
            println!("{}", line);
        } else {
            println!("{}", output::format_key_row(key, decoded.as_ref(), size));
        }
    }

    Ok(())
}
