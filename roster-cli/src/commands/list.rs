//! List users, optionally filtered.

use anyhow::Result;
use roster_client::{UserApi, UserListClient};
use roster_core::SearchQuery;
use std::io::Write;

use crate::output;

/// How many pages to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// At most this many pages.
    Pages(usize),
    /// Every page.
    All,
}

impl PageLimit {
    fn as_option(&self) -> Option<usize> {
        match self {
            Self::Pages(n) => Some((*n).max(1)),
            Self::All => None,
        }
    }
}

/// Run the list command.
pub async fn run<A: UserApi>(
    out: &mut impl Write,
    client: &UserListClient<A>,
    limit: PageLimit,
    search: Option<&str>,
) -> Result<()> {
    client.load_pages(limit.as_option()).await?;

    let query = SearchQuery::new(search.unwrap_or_default());
    let users = client.filtered(&query).await;
    let loaded = client.users().await.len();

    output::write_users(out, &users)?;
    writeln!(out)?;
    output::write_summary(
        out,
        users.len(),
        loaded,
        client.current_page().await.value(),
        client.total_pages().await,
        client.has_more().await,
    )?;
    Ok(())
}
