//! The notes API as a trait.
//!
//! [`NotesClient`](crate::NotesClient) talks HTTP; tests and embedders can
//! substitute any other implementation behind a [`Session`](crate::Session).

use std::sync::Arc;

use async_trait::async_trait;

use quire_auth::Token;
use quire_core::{Note, NoteId};

use crate::Result;

/// The five calls a notes client makes.
///
/// Each is a single request; none retries.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<Token>;

    /// All notes visible to the token's user.
    async fn list_notes(&self, token: &Token) -> Result<Vec<Note>>;

    /// Create a note and return it as stored.
    async fn create_note(&self, token: &Token, content: &str) -> Result<Note>;

    /// Delete a note by id.
    async fn delete_note(&self, token: &Token, id: &NoteId) -> Result<()>;

    /// Upgrade the tenant identified by `tenant` (its slug) to the Pro plan.
    async fn upgrade_tenant(&self, token: &Token, tenant: &str) -> Result<()>;
}

#[async_trait]
impl<T: NotesApi + ?Sized> NotesApi for Arc<T> {
    async fn login(&self, email: &str, password: &str) -> Result<Token> {
        (**self).login(email, password).await
    }

    async fn list_notes(&self, token: &Token) -> Result<Vec<Note>> {
        (**self).list_notes(token).await
    }

    async fn create_note(&self, token: &Token, content: &str) -> Result<Note> {
        (**self).create_note(token, content).await
    }

    async fn delete_note(&self, token: &Token, id: &NoteId) -> Result<()> {
        (**self).delete_note(token, id).await
    }

    async fn upgrade_tenant(&self, token: &Token, tenant: &str) -> Result<()> {
        (**self).upgrade_tenant(token, tenant).await
    }
}
