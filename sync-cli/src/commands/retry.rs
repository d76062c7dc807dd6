//! Retry queued work for a lead.

use anyhow::{Context, Result};
use leadsync_client::SyncError;

use super::{parse_code, Engine};

/// Run the retry command.
///
/// Resolves the pending capture and the pending note, if any. Nothing
/// pending is not an error.
pub async fn run(engine: &Engine, access_code: &str) -> Result<()> {
    let code = parse_code(access_code)?;
    let mut failed = false;

    match engine.resolve_pending_scan(&code).await {
        Ok(_) => println!("Captured {}", code),
        Err(SyncError::AlreadySynced(_)) => println!("Scan: already captured"),
        Err(SyncError::MissingPendingRecord(_)) => println!("Scan: nothing pending"),
        Err(e) if e.is_retryable() => {
            println!("Scan: still queued ({})", e);
            failed = true;
        }
        Err(e) => return Err(e).context("Scan retry failed"),
    }

    match engine.resolve_pending_note(&code).await {
        Ok(()) => println!("Note synced for {}", code),
        Err(SyncError::MissingPendingRecord(_)) => println!("Note: nothing pending"),
        Err(e) if e.is_retryable() => {
            println!("Note: still queued ({})", e);
            failed = true;
        }
        Err(e) => return Err(e).context("Note retry failed"),
    }

    if failed {
        anyhow::bail!("Some work for {} is still queued", code);
    }
    Ok(())
}
