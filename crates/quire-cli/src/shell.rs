//! Interactive shell.
//!
//! Reads commands line by line and keeps one [`Session`] alive for the whole
//! run. While logged out it asks for credentials instead of commands. Notes,
//! prompts and help go to `out`; notices and complaints go to `status`.

use std::io::Write;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use quire_auth::TokenStore;
use quire_client::{NotesApi, Session};
use quire_core::{NoteId, Notice};

use crate::Result;
use crate::commands::{render_identity, render_note, render_notes, resolve_id};
use crate::prompt::prompt_masked;

const BANNER: &str = "\
Sign in to Quire.
Demo accounts (password: password):
  admin@acme.test    admin  acme
  user@acme.test     member acme
  admin@globex.test  admin  globex
  user@globex.test   member globex";

const HELP: &str = "\
Commands:
  list | ls          show your tenant's notes
  add <text>         add a note
  delete | rm <id>   delete a note
  upgrade            upgrade your tenant to Pro (admins)
  whoami             show the signed-in identity
  logout             sign out
  help | ?           this text
  quit | exit        leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,
    /// `list`, `ls`
    List,
    /// `add <text>`
    Add(String),
    /// `delete <id>`, `rm <id>`
    Delete(NoteId),
    /// `upgrade`
    Upgrade,
    /// `whoami`
    Whoami,
    /// `logout`
    Logout,
    /// `help`, `?`
    Help,
    /// `quit`, `exit`
    Quit,
    /// A known command used wrongly.
    Usage(&'static str),
    /// Anything else.
    Unknown(String),
}

/// Parse one line of shell input.
pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "list" | "ls" => ShellCommand::List,
        "add" if rest.is_empty() => ShellCommand::Usage("usage: add <text>"),
        "add" => ShellCommand::Add(rest.to_string()),
        "delete" | "rm" if rest.is_empty() => ShellCommand::Usage("usage: delete <id>"),
        "delete" | "rm" => ShellCommand::Delete(NoteId::from(rest)),
        "upgrade" => ShellCommand::Upgrade,
        "whoami" => ShellCommand::Whoami,
        "logout" => ShellCommand::Logout,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(word.to_string()),
    }
}

/// Interactive session over any line source and pair of writers.
pub struct Shell<A, S, R, W, E> {
    session: Session<A, S>,
    input: Lines<R>,
    out: W,
    status: E,
    mask_password: bool,
}

impl<A, S, R, W, E> Shell<A, S, R, W, E>
where
    A: NotesApi,
    S: TokenStore,
    R: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    /// Build a shell around a session.
    pub fn new(session: Session<A, S>, input: R, out: W, status: E) -> Self {
        Self {
            session,
            input: input.lines(),
            out,
            status,
            mask_password: false,
        }
    }

    /// Read passwords from the terminal without echo instead of from `input`.
    pub fn mask_password(mut self, mask: bool) -> Self {
        self.mask_password = mask;
        self
    }

    /// The session, for inspection after [`Shell::run`].
    pub fn session(&self) -> &Session<A, S> {
        &self.session
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let notice = self.session.restore().await;
        self.show(notice)?;
        if self.session.is_authenticated() {
            self.greet()?;
        }

        loop {
            let keep_going = if self.session.is_authenticated() {
                self.command_step().await?
            } else {
                self.login_step().await?
            };
            if !keep_going {
                break;
            }
        }

        writeln!(self.out, "Bye")?;
        Ok(())
    }

    async fn login_step(&mut self) -> Result<bool> {
        writeln!(self.out, "{BANNER}")?;

        let Some(email) = self.prompt("email: ").await? else {
            return Ok(false);
        };
        let email = email.trim().to_string();
        if matches!(parse_line(&email), ShellCommand::Quit) {
            return Ok(false);
        }
        if email.is_empty() {
            return Ok(true);
        }

        let password = if self.mask_password {
            self.out.flush()?;
            prompt_masked("password: ").await?
        } else {
            let Some(password) = self.prompt("password: ").await? else {
                return Ok(false);
            };
            password
        };

        let notice = self.session.login(&email, &password).await;
        self.show(notice)?;
        if self.session.is_authenticated() {
            tracing::info!("signed in as {email}");
            self.greet()?;
        }
        Ok(true)
    }

    async fn command_step(&mut self) -> Result<bool> {
        let prompt = format!("{}> ", self.session.tenant().unwrap_or("quire"));
        let Some(line) = self.prompt(&prompt).await? else {
            return Ok(false);
        };

        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::List => {
                let notice = self.session.refresh().await;
                self.show(notice)?;
                if self.session.is_authenticated() {
                    self.list()?;
                }
            }
            ShellCommand::Add(text) => {
                let before = self.session.notes().len();
                let notice = self.session.add(text).await;
                self.show(notice)?;
                if let Some(note) = self.session.notes().get(before) {
                    render_note(note, &mut self.out)?;
                }
            }
            ShellCommand::Delete(id) => {
                let id = resolve_id(self.session.notes(), id);
                let notice = self.session.delete_note(&id).await;
                self.show(notice)?;
            }
            ShellCommand::Upgrade => {
                let notice = self.session.upgrade().await;
                self.show(notice)?;
            }
            ShellCommand::Whoami => {
                if let Some(claims) = self.session.claims() {
                    render_identity(claims, Utc::now(), &mut self.out)?;
                }
            }
            ShellCommand::Logout => {
                self.session.logout();
                writeln!(self.status, "Logged out")?;
            }
            ShellCommand::Help => writeln!(self.out, "{HELP}")?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Usage(usage) => writeln!(self.status, "{usage}")?,
            ShellCommand::Unknown(word) => {
                writeln!(self.status, "unknown command: {word} (try `help`)")?;
            }
        }
        Ok(true)
    }

    fn greet(&mut self) -> Result<()> {
        let role = self.session.role().unwrap_or_default();
        let tenant = self.session.tenant().unwrap_or("-").to_string();
        writeln!(self.out, "Signed in as {role} of {tenant}")?;
        if self.session.can_upgrade() {
            writeln!(self.out, "Type `upgrade` to move {tenant} to the Pro plan.")?;
        }
        self.list()
    }

    fn list(&mut self) -> Result<()> {
        if self.session.notes().is_empty() {
            writeln!(self.out, "(no notes)")?;
            return Ok(());
        }
        render_notes(self.session.notes(), &mut self.out)
    }

    fn show(&mut self, notice: Option<Notice>) -> Result<()> {
        match notice {
            Some(n) if n.is_error() => writeln!(self.status, "error: {n}")?,
            Some(n) => writeln!(self.status, "{n}")?,
            None => {}
        }
        Ok(())
    }

    async fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        Ok(self.input.next_line().await?)
    }
}
