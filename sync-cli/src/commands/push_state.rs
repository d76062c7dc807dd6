//! Push device UI state to the remote.

use anyhow::{Context, Result};
use serde_json::Value;

use super::Engine;

/// Run the push-state command.
///
/// The push is best effort: a remote failure is logged, not returned.
pub async fn run(engine: &Engine, json: &str) -> Result<()> {
    let payload: Value = serde_json::from_str(json).context("State must be valid JSON")?;

    // wait so the outcome is logged before the process exits
    engine
        .patch_channel()
        .push_state(&payload)
        .await
        .context("State push task failed")?;

    println!("State pushed (best effort).");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::open_engine;
    use crate::config::Config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let dir = tempdir().unwrap();
        let engine = open_engine(dir.path(), &Config::default(), true).await.unwrap();

        assert!(run(&engine, "{not json").await.is_err());
    }

    #[tokio::test]
    async fn push_without_credentials_still_succeeds() {
        let dir = tempdir().unwrap();
        let engine = open_engine(dir.path(), &Config::default(), true).await.unwrap();

        run(&engine, r#"{"screen":"scan"}"#).await.unwrap();
    }
}
