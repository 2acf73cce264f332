//! Log in and store the session token.

use anyhow::{Context, Result};
use roster_client::{Session, TokenStore, UserApi};
use roster_core::Credentials;
use std::io::Write;

/// Run the login command.
///
/// Missing email or password are prompted for; the password prompt does not
/// echo.
pub async fn run<S: TokenStore, A: UserApi>(
    session: &mut Session<S>,
    api: &A,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    session
        .login(api, Credentials::new(email, password))
        .await
        .context("Login failed")?;

    println!("Logged in.");
    Ok(())
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    std::io::stdout().flush()?;
    let mut email = String::new();
    std::io::stdin()
        .read_line(&mut email)
        .context("Failed to read email")?;
    Ok(email.trim().to_string())
}
