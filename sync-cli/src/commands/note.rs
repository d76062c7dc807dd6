//! Attach a note to a lead.

use anyhow::{Context, Result};

use super::{parse_code, Engine};

/// Run the note command.
pub async fn run(engine: &Engine, access_code: &str, text: &str) -> Result<()> {
    let code = parse_code(access_code)?;

    match engine.submit_note(&code, text).await {
        Ok(()) => println!("Note saved for {}", code),
        Err(e) if e.is_retryable() => {
            println!("Note queued for {} ({})", code, e);
            println!("Run 'leadsync retry {}' when back online.", code);
        }
        Err(e) => return Err(e).context("Note failed"),
    }

    Ok(())
}
