//! One-shot command handlers.
//!
//! Each handler drives a [`Session`] through a single action. Data goes to
//! `out`; informational notices go to `status`; failures come back as
//! [`Error::Failed`] carrying the user-facing message.

use std::io::Write;

use chrono::{DateTime, Utc};

use quire_auth::{Claims, TokenStore};
use quire_client::{NotesApi, Session};
use quire_core::{Note, NoteId, Notice};

use crate::{Error, Result};

const NOT_LOGGED_IN: &str = "Not logged in. Run `quire login` first.";

/// Turn a session notice into output or an error.
pub fn check(notice: Option<Notice>, status: &mut impl Write) -> Result<()> {
    match notice {
        None => Ok(()),
        Some(n) if n.is_error() => Err(Error::Failed(n.message)),
        Some(n) => {
            writeln!(status, "{n}")?;
            Ok(())
        }
    }
}

/// The id of the listed note matching a typed id, or the typed id itself.
pub fn resolve_id(notes: &[Note], typed: NoteId) -> NoteId {
    notes
        .iter()
        .find(|n| n.id == typed)
        .map(|n| n.id.clone())
        .unwrap_or(typed)
}

/// Restore the stored session, failing when there is none.
pub async fn restored<A: NotesApi, S: TokenStore>(session: &mut Session<A, S>) -> Result<()> {
    if let Some(notice) = session.restore().await {
        if notice.is_error() {
            return Err(Error::Failed(notice.message));
        }
    }
    if !session.is_authenticated() {
        return Err(Error::failed(NOT_LOGGED_IN));
    }
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

/// One note per line: `<id>\t<content>`.
pub fn render_notes(notes: &[Note], out: &mut impl Write) -> Result<()> {
    for note in notes {
        render_note(note, out)?;
    }
    Ok(())
}

/// A single note line.
pub fn render_note(note: &Note, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}\t{}", note.id, note.content)?;
    Ok(())
}

/// The identity carried by a token.
pub fn render_identity(claims: &Claims, now: DateTime<Utc>, out: &mut impl Write) -> Result<()> {
    if let Some(email) = &claims.email {
        writeln!(out, "email:   {email}")?;
    }
    writeln!(out, "role:    {}", claims.role())?;
    writeln!(out, "tenant:  {}", claims.tenant.as_deref().unwrap_or("-"))?;
    if let Some(exp) = claims.expires_at() {
        let suffix = if claims.is_expired(now) { " (expired)" } else { "" };
        writeln!(out, "expires: {}{suffix}", exp.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// `quire login`
pub async fn login<A: NotesApi, S: TokenStore>(
    session: &mut Session<A, S>,
    email: &str,
    password: &str,
    status: &mut impl Write,
) -> Result<()> {
    let notice = session.login(email, password).await;
    if !session.is_authenticated() {
        let message = notice.map_or_else(|| "Login failed".to_string(), |n| n.message);
        return Err(Error::Failed(message));
    }

    tracing::debug!("login succeeded for {email}");
    writeln!(
        status,
        "Logged in as {email} ({} @ {}), {} notes",
        session.role().unwrap_or_default(),
        session.tenant().unwrap_or("-"),
        session.notes().len()
    )?;
    match notice {
        Some(n) if n.is_error() => writeln!(status, "warning: {n}")?,
        Some(n) => writeln!(status, "{n}")?,
        None => {}
    }
    Ok(())
}

/// `quire logout`
pub fn logout(store: &impl TokenStore, status: &mut impl Write) -> Result<()> {
    store.clear()?;
    writeln!(status, "Logged out")?;
    Ok(())
}

/// `quire whoami`. Reads the stored token only; no request is made.
pub fn whoami(store: &impl TokenStore, out: &mut impl Write) -> Result<()> {
    let token = store.load()?.ok_or_else(|| Error::failed(NOT_LOGGED_IN))?;
    let claims = token.claims()?;
    render_identity(&claims, Utc::now(), out)
}

/// `quire notes list`
pub async fn list_notes<A: NotesApi, S: TokenStore>(
    session: &mut Session<A, S>,
    out: &mut impl Write,
) -> Result<()> {
    restored(session).await?;
    render_notes(session.notes(), out)
}

/// `quire notes add`
pub async fn add_note<A: NotesApi, S: TokenStore>(
    session: &mut Session<A, S>,
    content: &str,
    out: &mut impl Write,
) -> Result<()> {
    restored(session).await?;
    let before = session.notes().len();
    if let Some(notice) = session.add(content).await {
        return Err(Error::Failed(notice.message));
    }
    if let Some(note) = session.notes().get(before) {
        render_note(note, out)?;
    }
    Ok(())
}

/// `quire notes delete`
pub async fn delete_note<A: NotesApi, S: TokenStore>(
    session: &mut Session<A, S>,
    id: &str,
    status: &mut impl Write,
) -> Result<()> {
    restored(session).await?;
    let id = resolve_id(session.notes(), NoteId::from(id));
    let known = session.notes().iter().any(|n| n.id == id);
    check(session.delete_note(&id).await, status)?;
    if known {
        writeln!(status, "Deleted note {id}")?;
    } else {
        writeln!(status, "No note {id} in your list; delete request sent anyway")?;
    }
    Ok(())
}

/// `quire upgrade`
pub async fn upgrade<A: NotesApi, S: TokenStore>(
    session: &mut Session<A, S>,
    status: &mut impl Write,
) -> Result<()> {
    restored(session).await?;
    check(session.upgrade().await, status)
}
