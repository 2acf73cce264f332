//! CLI command implementations.

pub mod browse;
pub mod delete;
pub mod edit;
pub mod list;
pub mod login;
pub mod logout;
pub mod status;

use anyhow::Result;
use roster_client::{Session, TokenStore, UserApi, UserListClient};
use roster_core::Route;
use roster_types::{RosterError, User, UserId};
use std::io::{BufRead, Write};

/// Pass the route guard for the listing, or fail with "not logged in".
pub fn require_login<S: TokenStore>(session: &mut Session<S>) -> Result<()> {
    if session.navigate(Route::Users) != Route::Users {
        anyhow::bail!("{} (run 'roster login' first)", RosterError::NotAuthenticated);
    }
    Ok(())
}

/// Load pages until `id` is displayed.
pub async fn locate<A: UserApi>(client: &UserListClient<A>, id: UserId) -> Result<User> {
    client.mount().await?;
    loop {
        if let Some(user) = client.users().await.into_iter().find(|u| u.id == id) {
            return Ok(user);
        }
        if client.load_more().await?.is_none() {
            return Err(RosterError::UnknownUser(id).into());
        }
    }
}

/// Ask a yes/no question on `out`, reading the answer from `input`.
///
/// Anything but `y`/`yes` (including end of input) is a no.
pub fn confirm(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
