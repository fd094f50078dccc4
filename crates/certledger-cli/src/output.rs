//! Output formatting utilities.

use serde_json::Value;
use std::io::{self, Write};

/// Writes a response payload to stdout.
///
/// Payloads are printed byte for byte unless `pretty` is set and the payload
/// parses as JSON. Empty payloads print nothing.
pub fn print_payload(payload: &[u8], pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    if payload.is_empty() {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    match serde_json::from_slice::<Value>(payload) {
        Ok(value) if pretty => writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?,
        _ => {
            stdout.write_all(payload)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Formats a ledger key as a table row.
pub fn format_key_row(key: &str, decoded: Option<&(String, Vec<String>)>, size: usize) -> String {
    match decoded {
        Some((index, attributes)) => format!(
            "{:<8} {:<32} {}",
            "index",
            truncate(&format!("{}[{}]", index, attributes.join(", ")), 32),
            size
        ),
        None => format!("{:<8} {:<32} {}", "record", truncate(key, 32), size),
    }
}

/// Prints the keys table header.
#[allow(clippy::print_literal)]
pub fn print_keys_header() {
    println!("{:<8} {:<32} {}", "KIND", "KEY", "BYTES");
    println!("{}", "-".repeat(48));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
