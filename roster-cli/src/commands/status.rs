//! Show session and configuration status.

use anyhow::Result;
use roster_client::{Session, TokenStore};
use std::io::Write;
use std::path::Path;

use crate::config::Config;

/// Run the status command.
pub fn run<S: TokenStore>(
    out: &mut impl Write,
    session: &Session<S>,
    config: &Config,
    data_dir: &Path,
    mock: bool,
) -> Result<()> {
    writeln!(out, "=== roster status ===")?;
    writeln!(out)?;

    writeln!(out, "Session:")?;
    if session.is_authenticated() {
        writeln!(out, "  Status: LOGGED IN")?;
    } else {
        writeln!(out, "  Status: NOT LOGGED IN")?;
    }
    writeln!(out, "  Route:  {}", session.route())?;
    writeln!(out, "  Data:   {}", data_dir.display())?;

    writeln!(out)?;

    writeln!(out, "API:")?;
    if mock {
        writeln!(out, "  Backend:  built-in sample directory (--mock)")?;
    } else {
        writeln!(out, "  Base URL: {}", config.api.base_url)?;
        let key = if config.api.api_key.is_some() {
            "configured"
        } else {
            "none"
        };
        writeln!(out, "  API key:  {}", key)?;
        writeln!(out, "  Timeout:  {}s", config.api.timeout_secs)?;
    }
    writeln!(out, "  Backfill: {}", backfill_label(config.list.backfill_threshold))?;

    if !session.is_authenticated() {
        writeln!(out)?;
        writeln!(out, "Run 'roster login' to sign in.")?;
    }

    Ok(())
}

fn backfill_label(threshold: usize) -> String {
    if threshold == 0 {
        "disabled".to_string()
    } else {
        format!("below {} users on page 1", threshold)
    }
}
