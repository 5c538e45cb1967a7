//! Password entry.
//!
//! On a terminal the password is read without echo. Piped input is read as a
//! plain line so scripts can still log in.

use std::io::{self, IsTerminal, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::Result;

/// Whether stdin is attached to a terminal.
pub fn stdin_is_terminal() -> bool {
    io::stdin().is_terminal()
}

/// Prompt on the terminal and read a password without echoing it.
pub async fn prompt_masked(prompt: &str) -> Result<String> {
    let prompt = prompt.to_string();
    let password = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
        .await
        .map_err(io::Error::other)??;
    Ok(password)
}

/// Read a password for `quire login` from stdin.
pub async fn read_password(status: &mut impl Write) -> Result<String> {
    if stdin_is_terminal() {
        return prompt_masked("password: ").await;
    }

    write!(status, "password: ")?;
    status.flush()?;
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(trim_line_ending(&line).to_string())
}

/// Strip the trailing newline (and carriage return) from a line.
pub fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
