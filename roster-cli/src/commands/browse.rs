//! Interactive listing session.
//!
//! One engine stays alive for the whole session, so edits made here keep
//! overriding the server's copy as more pages load.

use anyhow::Result;
use roster_client::{DraftField, UserApi, UserListClient};
use roster_core::SearchQuery;
use roster_types::{RosterError, UserId};
use std::io::{BufRead, Write};
use std::str::FromStr;

use super::confirm;
use crate::output;

const HELP: &str = "\
Commands:
  more                      load the next page
  search <text>             filter by name or email
  clear                     remove the filter
  show                      redisplay the list
  edit <id> [field=value..] edit a user (fields: first_name, last_name, email)
  set <field=value..>       change the record being edited
  save                      save the record being edited
  cancel                    stop editing without saving
  delete <id>               delete a user
  help                      show this help
  quit                      leave";

/// A parsed browse command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Load the next page.
    More,
    /// Filter the view.
    Search(String),
    /// Remove the filter.
    Clear,
    /// Redisplay.
    Show,
    /// Enter edit mode, optionally applying and saving changes at once.
    Edit {
        /// The record to edit.
        id: UserId,
        /// Changes to apply.
        changes: Vec<(DraftField, String)>,
    },
    /// Change the draft.
    Set(Vec<(DraftField, String)>),
    /// Save the draft.
    Save,
    /// Discard the draft.
    Cancel,
    /// Delete a record.
    Delete(UserId),
    /// Show help.
    Help,
    /// Leave.
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = RosterError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "more" | "m" => Ok(Self::More),
            "search" | "s" | "/" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "show" | "ls" | "" => Ok(Self::Show),
            "edit" | "e" => {
                let (id, fields) = match rest.split_once(char::is_whitespace) {
                    Some((id, fields)) => (id, fields),
                    None => (rest, ""),
                };
                Ok(Self::Edit {
                    id: parse_id(id)?,
                    changes: parse_changes(fields)?,
                })
            }
            "set" => {
                let changes = parse_changes(rest)?;
                if changes.is_empty() {
                    return Err(invalid("usage: set <field=value>..."));
                }
                Ok(Self::Set(changes))
            }
            "save" => Ok(Self::Save),
            "cancel" => Ok(Self::Cancel),
            "delete" | "rm" => Ok(Self::Delete(parse_id(rest)?)),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(invalid(&format!(
                "unknown command '{}' (type 'help')",
                other
            ))),
        }
    }
}

fn invalid(message: &str) -> RosterError {
    RosterError::InvalidInput(message.to_string())
}

fn parse_id(text: &str) -> Result<UserId, RosterError> {
    text.parse()
        .map_err(|_| invalid(&format!("'{}' is not a user id", text)))
}

/// Parse `field=value` changes. A value runs until the next `<field>=` word,
/// so names with spaces need no quoting; one pair of surrounding quotes is
/// stripped.
fn parse_changes(text: &str) -> Result<Vec<(DraftField, String)>, RosterError> {
    let mut changes: Vec<(DraftField, String)> = Vec::new();
    for word in text.split_whitespace() {
        match field_assignment(word) {
            Some((field, value)) => changes.push((field.parse()?, value.to_string())),
            None => match changes.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => {
                    return Err(invalid(&format!("expected field=value, got '{}'", word)));
                }
            },
        }
    }
    for (_, value) in &mut changes {
        *value = unquote(value).to_string();
    }
    Ok(changes)
}

/// Split `word` at `=` when the part before it looks like a field name.
fn field_assignment(word: &str) -> Option<(&str, &str)> {
    let (field, value) = word.split_once('=')?;
    let is_name = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '_' || c == '-');
    is_name.then_some((field, value))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Run the browse command.
pub async fn run<A: UserApi>(
    input: &mut impl BufRead,
    out: &mut impl Write,
    client: &UserListClient<A>,
) -> Result<()> {
    let mut query = SearchQuery::default();

    writeln!(out, "Loading...")?;
    if let Err(e) = client.mount().await {
        writeln!(out, "Error: {}", e)?;
    }
    show(out, client, &query).await?;

    loop {
        write!(out, "roster> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => writeln!(out, "{}", HELP)?,
            BrowseCommand::Show => show(out, client, &query).await?,
            BrowseCommand::More => {
                if !client.has_more().await {
                    writeln!(out, "No more users.")?;
                    continue;
                }
                writeln!(out, "Loading...")?;
                match client.load_more().await {
                    Ok(Some(report)) => writeln!(
                        out,
                        "Loaded {} users from page {}.",
                        report.added, report.page
                    )?,
                    Ok(None) => writeln!(out, "Already loading.")?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
                show(out, client, &query).await?;
            }
            BrowseCommand::Search(text) => {
                query = SearchQuery::new(&text);
                show(out, client, &query).await?;
            }
            BrowseCommand::Clear => {
                query = SearchQuery::default();
                show(out, client, &query).await?;
            }
            BrowseCommand::Edit { id, changes } => {
                if let Err(e) = client.begin_edit(id).await {
                    writeln!(out, "Error: {}", e)?;
                    continue;
                }
                if changes.is_empty() {
                    write_draft(out, client).await?;
                    writeln!(out, "Use 'set field=value' then 'save', or 'cancel'.")?;
                    continue;
                }
                if apply_changes(out, client, changes).await? {
                    save(out, client, &query).await?;
                }
            }
            BrowseCommand::Set(changes) => {
                if apply_changes(out, client, changes).await? {
                    write_draft(out, client).await?;
                }
            }
            BrowseCommand::Save => save(out, client, &query).await?,
            BrowseCommand::Cancel => match client.cancel_edit().await {
                Some(draft) => writeln!(out, "Stopped editing user {}.", draft.id)?,
                None => writeln!(out, "Not editing.")?,
            },
            BrowseCommand::Delete(id) => {
                let Some(user) = client.users().await.into_iter().find(|u| u.id == id) else {
                    writeln!(out, "Error: {}", RosterError::UnknownUser(id))?;
                    continue;
                };
                let question = format!(
                    "Are you sure you want to delete {} ({})?",
                    user.full_name(),
                    user.email
                );
                if !confirm(input, out, &question)? {
                    writeln!(out, "Cancelled.")?;
                    continue;
                }
                match client.delete(id).await {
                    Ok(_) => {
                        writeln!(out, "Deleted user {}.", id)?;
                        show(out, client, &query).await?;
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
        }
    }

    Ok(())
}

async fn show<A: UserApi>(
    out: &mut impl Write,
    client: &UserListClient<A>,
    query: &SearchQuery,
) -> Result<()> {
    let users = client.filtered(query).await;
    let loaded = client.users().await.len();

    writeln!(out)?;
    if !query.is_empty() {
        writeln!(out, "Filter: {}", query.as_str())?;
    }
    output::write_users(out, &users)?;
    output::write_summary(
        out,
        users.len(),
        loaded,
        client.current_page().await.value(),
        client.total_pages().await,
        client.has_more().await,
    )?;
    if let Some(error) = client.error().await {
        writeln!(out, "Error: {}", error)?;
    }
    Ok(())
}

async fn write_draft<A: UserApi>(out: &mut impl Write, client: &UserListClient<A>) -> Result<()> {
    if let Some(draft) = client.draft().await {
        writeln!(out, "Editing user {}:", draft.id)?;
        writeln!(out, "  first_name = {}", draft.first_name)?;
        writeln!(out, "  last_name  = {}", draft.last_name)?;
        writeln!(out, "  email      = {}", draft.email)?;
    }
    Ok(())
}

/// Apply `changes` to the draft. Returns `false` if any failed.
async fn apply_changes<A: UserApi>(
    out: &mut impl Write,
    client: &UserListClient<A>,
    changes: Vec<(DraftField, String)>,
) -> Result<bool> {
    for (field, value) in changes {
        if let Err(e) = client.set_draft_field(field, value).await {
            writeln!(out, "Error: {}", e)?;
            return Ok(false);
        }
    }
    Ok(true)
}

async fn save<A: UserApi>(
    out: &mut impl Write,
    client: &UserListClient<A>,
    query: &SearchQuery,
) -> Result<()> {
    match client.save_edit().await {
        Ok(user) => {
            writeln!(out, "Saved user {}.", user.id)?;
            show(out, client, query).await?;
        }
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            if client.draft().await.is_some() {
                writeln!(out, "Still editing. 'save' to retry or 'cancel'.")?;
            }
        }
    }
    Ok(())
}
