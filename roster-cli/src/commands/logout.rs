//! Log out and forget the session token.

use anyhow::{Context, Result};
use roster_client::{Session, TokenStore};

/// Run the logout command.
pub async fn run<S: TokenStore>(session: &mut Session<S>) -> Result<()> {
    let was_authenticated = session.is_authenticated();
    session
        .logout()
        .await
        .context("Failed to clear session")?;

    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
