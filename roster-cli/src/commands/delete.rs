//! Delete a user.

use anyhow::Result;
use roster_client::{UserApi, UserListClient};
use roster_types::UserId;
use std::io::{BufRead, Write};

use super::{confirm, locate};

/// Run the delete command.
///
/// Asks for confirmation on `input` unless `assume_yes` is set.
pub async fn run<A: UserApi>(
    input: &mut impl BufRead,
    out: &mut impl Write,
    client: &UserListClient<A>,
    id: UserId,
    assume_yes: bool,
) -> Result<()> {
    let user = locate(client, id).await?;

    let question = format!(
        "Are you sure you want to delete {} ({})?",
        user.full_name(),
        user.email
    );
    if !assume_yes && !confirm(input, out, &question)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    client.delete(id).await?;
    writeln!(out, "Deleted user {}.", id)?;
    Ok(())
}
