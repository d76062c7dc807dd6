//! Show what is stored for a lead.

use anyhow::Result;
use leadsync_types::ScanStatus;

use super::{parse_code, Engine};

/// Run the show command.
pub async fn run(engine: &Engine, access_code: &str) -> Result<()> {
    let code = parse_code(access_code)?;
    let status = engine.scan_status(&code).await?;

    println!("=== {} ===", code);
    println!();
    println!("Scan:   {}", status_label(status));

    if let Some(record) = engine.fetch_scan(&code).await? {
        println!("  Scanned:  {}", record.scanned_at.to_rfc3339());
        println!("  Has note: {}", if record.has_note { "yes" } else { "no" });
    }

    match engine.get_note(&code).await? {
        Some(note) => println!("Note:   {}", note.note),
        None => println!("Note:   (none)"),
    }

    Ok(())
}

fn status_label(status: ScanStatus) -> &'static str {
    match status {
        ScanStatus::NotCaptured => "not captured",
        ScanStatus::Pending => "pending",
        ScanStatus::Synced => "synced",
    }
}
