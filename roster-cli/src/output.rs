//! Terminal rendering of the listing.

use std::io::{self, Write};

use roster_types::User;

/// Write `users` as an aligned table.
pub fn write_users(out: &mut impl Write, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        writeln!(out, "  (no users)")?;
        return Ok(());
    }

    let name_width = users
        .iter()
        .map(|user| user.full_name().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    writeln!(out, "  {:>4}  {:<name_width$}  EMAIL", "ID", "NAME")?;
    for user in users {
        writeln!(
            out,
            "  {:>4}  {:<name_width$}  {}",
            user.id.value(),
            user.full_name(),
            user.email
        )?;
    }
    Ok(())
}

/// Write the "showing N of M, page c of t" footer.
pub fn write_summary(
    out: &mut impl Write,
    shown: usize,
    loaded: usize,
    page: u32,
    total_pages: Option<u32>,
    has_more: bool,
) -> io::Result<()> {
    let total = total_pages
        .map(|t| t.to_string())
        .unwrap_or_else(|| "?".to_string());
    write!(out, "Showing {} of {} loaded (page {} of {})", shown, loaded, page, total)?;
    if has_more {
        writeln!(out, ", more available")
    } else {
        writeln!(out)
    }
}
