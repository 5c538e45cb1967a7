//! Client-side session state.
//!
//! A [`Session`] holds what a signed-in user is looking at: the bearer
//! token, the claims decoded from it, the list of notes, and the draft of
//! the next note. Every operation is one API call followed by a state
//! update, and reports anything the user should see as a [`Notice`].

use quire_auth::{Claims, Token, TokenStore};
use quire_core::{Note, NoteId, Notice, Role};

use crate::{Error, NotesApi};

const NETWORK_ERROR: &str = "Network error";
const NOT_LOGGED_IN: &str = "Not logged in";
const SESSION_EXPIRED: &str = "Session expired, please log in again";
const UPGRADED: &str = "Upgraded to Pro!";

/// Signed-in state over a [`NotesApi`] and a [`TokenStore`].
pub struct Session<A, S> {
    api: A,
    store: S,
    auth: Option<(Token, Claims)>,
    notes: Vec<Note>,
    draft: String,
}

impl<A: NotesApi, S: TokenStore> Session<A, S> {
    /// A logged-out session. Call [`Session::restore`] to pick up a stored token.
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            auth: None,
            notes: Vec::new(),
            draft: String::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The API this session talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Where the token is persisted.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// The current token, if signed in.
    pub fn token(&self) -> Option<&Token> {
        self.auth.as_ref().map(|(t, _)| t)
    }

    /// Claims of the current token, if signed in.
    pub fn claims(&self) -> Option<&Claims> {
        self.auth.as_ref().map(|(_, c)| c)
    }

    /// Role of the signed-in user.
    pub fn role(&self) -> Option<Role> {
        self.claims().map(Claims::role)
    }

    /// Tenant slug of the signed-in user.
    pub fn tenant(&self) -> Option<&str> {
        self.claims().and_then(|c| c.tenant().ok())
    }

    /// Whether the upgrade action should be offered.
    pub fn can_upgrade(&self) -> bool {
        self.role().is_some_and(|r| r.can_upgrade())
    }

    /// Notes as last fetched or modified.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Text of the note being composed.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft text.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Pick up a token left by a previous run and load its notes.
    pub async fn restore(&mut self) -> Option<Notice> {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Could not read stored token: {e}");
                return Some(Notice::error(format!("Could not read stored token: {e}")));
            }
        };

        match token.claims() {
            Ok(claims) => {
                log::debug!("Restored session for role {}", claims.role());
                self.auth = Some((token, claims));
                self.refresh().await
            }
            Err(e) => {
                log::warn!("Discarding unreadable stored token: {e}");
                self.clear_auth();
                Some(Notice::error(SESSION_EXPIRED))
            }
        }
    }

    /// Sign in, persist the token, and load notes.
    pub async fn login(&mut self, email: &str, password: &str) -> Option<Notice> {
        let token = match self.api.login(email, password).await {
            Ok(token) => token,
            Err(Error::LoginFailed(message)) => return Some(Notice::error(message)),
            Err(e) if e.is_network() => {
                log::error!("Login request failed: {e}");
                return Some(Notice::error(NETWORK_ERROR));
            }
            Err(e) => return Some(Notice::error(e.to_string())),
        };

        let claims = match token.claims() {
            Ok(claims) => claims,
            Err(e) => {
                log::error!("Server issued an unreadable token: {e}");
                return Some(Notice::error(format!("Login failed: {e}")));
            }
        };

        if let Err(e) = self.store.save(&token) {
            log::warn!("Could not persist token: {e}");
        }
        self.auth = Some((token, claims));
        self.refresh().await
    }

    /// Reload notes from the server.
    ///
    /// A rejected token logs the session out.
    pub async fn refresh(&mut self) -> Option<Notice> {
        let Some(token) = self.token().cloned() else {
            return Some(Notice::error(NOT_LOGGED_IN));
        };

        match self.api.list_notes(&token).await {
            Ok(notes) => {
                self.notes = notes;
                None
            }
            Err(e) => self.report(e, "Could not load notes"),
        }
    }

    /// Create a note from the current draft.
    ///
    /// On success the note is appended and the draft cleared. When the plan
    /// limit refuses it, the notes are reloaded so the list matches the server.
    pub async fn add_note(&mut self) -> Option<Notice> {
        let Some(token) = self.token().cloned() else {
            return Some(Notice::error(NOT_LOGGED_IN));
        };

        match self.api.create_note(&token, &self.draft).await {
            Ok(note) => {
                log::debug!("Created note {}", note.id);
                self.notes.push(note);
                self.draft.clear();
                None
            }
            Err(Error::Forbidden(message)) => {
                if let Some(notice) = self.refresh().await {
                    log::warn!("Reload after refused note failed: {notice}");
                }
                Some(Notice::error(message))
            }
            Err(e) => self.report(e, "Could not add note"),
        }
    }

    /// Set the draft to `content` and create the note.
    pub async fn add(&mut self, content: impl Into<String>) -> Option<Notice> {
        self.set_draft(content);
        self.add_note().await
    }

    /// Delete a note and drop it from the local list.
    pub async fn delete_note(&mut self, id: &NoteId) -> Option<Notice> {
        let Some(token) = self.token().cloned() else {
            return Some(Notice::error(NOT_LOGGED_IN));
        };

        match self.api.delete_note(&token, id).await {
            Ok(()) => {
                self.notes.retain(|n| &n.id != id);
                None
            }
            Err(e) => self.report(e, "Could not delete note"),
        }
    }

    /// Upgrade the signed-in user's tenant to the Pro plan.
    ///
    /// Only admins are offered this; members are refused without a request.
    /// If the reload that follows finds the token rejected, the notice says
    /// both that the upgrade went through and that the session ended.
    pub async fn upgrade(&mut self) -> Option<Notice> {
        let Some((token, claims)) = self.auth.clone() else {
            return Some(Notice::error(NOT_LOGGED_IN));
        };
        if !claims.role().can_upgrade() {
            return Some(Notice::error("Only tenant admins can upgrade the plan"));
        }
        let tenant = match claims.tenant() {
            Ok(tenant) => tenant.to_string(),
            Err(e) => return Some(Notice::error(format!("Upgrade failed: {e}"))),
        };

        match self.api.upgrade_tenant(&token, &tenant).await {
            Ok(()) => match self.refresh().await {
                Some(notice) if !self.is_authenticated() => {
                    Some(Notice::error(format!("{UPGRADED} {notice}")))
                }
                Some(notice) => {
                    log::warn!("Reload after upgrade failed: {notice}");
                    Some(Notice::info(UPGRADED))
                }
                None => Some(Notice::info(UPGRADED)),
            },
            Err(Error::UpgradeFailed(message)) => Some(Notice::error(message)),
            Err(e) if e.is_network() => {
                log::error!("Upgrade request failed: {e}");
                Some(Notice::error(NETWORK_ERROR))
            }
            Err(e) => Some(Notice::error(e.to_string())),
        }
    }

    /// Forget the token, here and in the store.
    pub fn logout(&mut self) {
        self.clear_auth();
        log::info!("Logged out");
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn clear_auth(&mut self) {
        if let Err(e) = self.store.clear() {
            log::warn!("Could not clear stored token: {e}");
        }
        self.auth = None;
        self.notes.clear();
        self.draft.clear();
    }

    /// Log a failed call; a rejected token also ends the session.
    fn report(&mut self, error: Error, context: &str) -> Option<Notice> {
        if error.is_unauthorized() {
            log::info!("{context}: token rejected, logging out");
            self.clear_auth();
            return Some(Notice::error(SESSION_EXPIRED));
        }
        log::error!("{context}: {error}");
        Some(Notice::error(format!("{context}: {error}")))
    }
}
