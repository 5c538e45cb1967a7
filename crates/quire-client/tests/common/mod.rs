//! Common test utilities for quire-client integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use quire_auth::Token;
use quire_auth::testing::unsigned_token;
use quire_client::{Error, NotesApi, Result};
use quire_core::{Note, NoteId};

/// Notes a free tenant may hold.
pub const FREE_PLAN_LIMIT: usize = 3;

/// Password shared by every demo account.
pub const PASSWORD: &str = "password";

struct Account {
    role: &'static str,
    tenant: &'static str,
}

#[derive(Default)]
struct TenantState {
    pro: bool,
    notes: Vec<Note>,
}

/// In-process stand-in for the notes backend.
///
/// Seeded with the demo accounts of two tenants (acme, globex). Tokens are
/// unsigned and carry the account's role and tenant.
pub struct FakeNotesServer {
    accounts: HashMap<&'static str, Account>,
    tenants: Mutex<HashMap<String, TenantState>>,
    next_id: AtomicUsize,
    offline: AtomicBool,
    reject_tokens: AtomicBool,
    calls: AtomicUsize,
}

impl FakeNotesServer {
    pub fn new() -> Self {
        let accounts = HashMap::from([
            ("admin@acme.test", Account { role: "admin", tenant: "acme" }),
            ("user@acme.test", Account { role: "member", tenant: "acme" }),
            ("admin@globex.test", Account { role: "admin", tenant: "globex" }),
            ("user@globex.test", Account { role: "member", tenant: "globex" }),
        ]);
        Self {
            accounts,
            tenants: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            offline: AtomicBool::new(false),
            reject_tokens: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every call fail at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every authenticated call answer 401.
    pub fn set_reject_tokens(&self, reject: bool) {
        self.reject_tokens.store(reject, Ordering::SeqCst);
    }

    /// Total calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Notes currently stored for a tenant.
    pub fn tenant_notes(&self, tenant: &str) -> Vec<Note> {
        self.tenants
            .lock()
            .unwrap()
            .get(tenant)
            .map(|t| t.notes.clone())
            .unwrap_or_default()
    }

    /// Whether a tenant is on the Pro plan.
    pub fn is_pro(&self, tenant: &str) -> bool {
        self.tenants
            .lock()
            .unwrap()
            .get(tenant)
            .is_some_and(|t| t.pro)
    }

    /// Issue a token directly, bypassing login.
    pub fn token_for(&self, email: &str) -> Token {
        let account = &self.accounts[email];
        unsigned_token(&json!({
            "email": email,
            "role": account.role,
            "tenant": account.tenant,
        }))
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            // A URL reqwest refuses to build gives a genuine transport error
            let err = reqwest::get("quire-offline").await.unwrap_err();
            return Err(Error::Http(err));
        }
        Ok(())
    }

    fn tenant_of(&self, token: &Token) -> Result<(String, String)> {
        if self.reject_tokens.load(Ordering::SeqCst) {
            return Err(Error::Unauthorized);
        }
        let claims = token.claims().map_err(|_| Error::Unauthorized)?;
        let tenant = claims.tenant().map_err(|_| Error::Unauthorized)?.to_string();
        Ok((tenant, claims.role().to_string()))
    }
}

impl Default for FakeNotesServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotesApi for FakeNotesServer {
    async fn login(&self, email: &str, password: &str) -> Result<Token> {
        self.enter().await?;
        if password != PASSWORD || !self.accounts.contains_key(email) {
            return Err(Error::LoginFailed("Invalid credentials".to_string()));
        }
        Ok(self.token_for(email))
    }

    async fn list_notes(&self, token: &Token) -> Result<Vec<Note>> {
        self.enter().await?;
        let (tenant, _) = self.tenant_of(token)?;
        Ok(self.tenant_notes(&tenant))
    }

    async fn create_note(&self, token: &Token, content: &str) -> Result<Note> {
        self.enter().await?;
        let (tenant, _) = self.tenant_of(token)?;
        let mut tenants = self.tenants.lock().unwrap();
        let state = tenants.entry(tenant).or_default();
        if !state.pro && state.notes.len() >= FREE_PLAN_LIMIT {
            return Err(Error::Forbidden(
                "Free plan limit reached. Upgrade to Pro.".to_string(),
            ));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let note = Note::new(id, content);
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn delete_note(&self, token: &Token, id: &NoteId) -> Result<()> {
        self.enter().await?;
        let (tenant, _) = self.tenant_of(token)?;
        let mut tenants = self.tenants.lock().unwrap();
        if let Some(state) = tenants.get_mut(&tenant) {
            state.notes.retain(|n| &n.id != id);
        }
        Ok(())
    }

    async fn upgrade_tenant(&self, token: &Token, tenant: &str) -> Result<()> {
        self.enter().await?;
        let (own_tenant, role) = self.tenant_of(token)?;
        if role != "admin" {
            return Err(Error::UpgradeFailed("Only admins can upgrade".to_string()));
        }
        if own_tenant != tenant {
            return Err(Error::UpgradeFailed("Forbidden".to_string()));
        }
        self.tenants
            .lock()
            .unwrap()
            .entry(own_tenant)
            .or_default()
            .pro = true;
        Ok(())
    }
}
