//! Capture a badge.

use anyhow::{Context, Result};
use leadsync_client::ScanOutcome;
use leadsync_types::ScanData;

use super::{parse_code, Engine};

/// Run the scan command.
///
/// The access code defaults to the first segment of the badge payload.
pub async fn run(engine: &Engine, raw: &str, access_code: Option<&str>) -> Result<()> {
    let scan_data = ScanData::parse(raw).context("Invalid badge payload")?;
    let code = parse_code(access_code.unwrap_or_else(|| scan_data.embedded_code()))?;

    match engine.submit_scan(&code, scan_data).await {
        Ok(ScanOutcome::Captured(record)) => {
            println!("Captured {}", code);
            println!("  Scanned: {}", record.scanned_at.to_rfc3339());
        }
        Ok(ScanOutcome::AlreadyCaptured) => {
            println!("Already captured {}", code);
        }
        Err(e) if e.is_retryable() => {
            println!("Queued {} ({})", code, e);
            println!("Run 'leadsync retry {}' when back online.", code);
        }
        Err(e) => return Err(e).context("Scan failed"),
    }

    Ok(())
}
