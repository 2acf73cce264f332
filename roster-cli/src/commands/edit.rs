//! Edit a user's name or email.

use anyhow::Result;
use roster_client::{DraftField, UserApi, UserListClient};
use roster_types::UserId;
use std::io::Write;

use super::locate;
use crate::output;

/// Field changes requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct Changes {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<String>,
}

impl Changes {
    fn into_fields(self) -> Vec<(DraftField, String)> {
        [
            (DraftField::FirstName, self.first_name),
            (DraftField::LastName, self.last_name),
            (DraftField::Email, self.email),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

/// Run the edit command.
pub async fn run<A: UserApi>(
    out: &mut impl Write,
    client: &UserListClient<A>,
    id: UserId,
    changes: Changes,
) -> Result<()> {
    let fields = changes.into_fields();
    if fields.is_empty() {
        anyhow::bail!("Nothing to change. Pass --first-name, --last-name or --email.");
    }

    locate(client, id).await?;
    client.begin_edit(id).await?;
    for (field, value) in fields {
        client.set_draft_field(field, value).await?;
    }
    let saved = client.save_edit().await?;

    writeln!(out, "Saved user {}.", saved.id)?;
    output::write_users(out, std::slice::from_ref(&saved))?;
    Ok(())
}
