//! Session state machine tests against the in-process fake backend.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quire_auth::testing::unsigned_token;
use quire_auth::{MemoryTokenStore, Token, TokenStore};
use quire_client::{NotesClient, Session};
use quire_core::{Note, NoteId, Role};

use crate::common::{FREE_PLAN_LIMIT, FakeNotesServer, PASSWORD};

type TestSession = Session<Arc<FakeNotesServer>, MemoryTokenStore>;

fn session(server: &Arc<FakeNotesServer>) -> TestSession {
    Session::new(server.clone(), MemoryTokenStore::new())
}

async fn logged_in(server: &Arc<FakeNotesServer>, email: &str) -> TestSession {
    let mut s = session(server);
    let notice = s.login(email, PASSWORD).await;
    assert!(notice.is_none(), "login should be silent: {notice:?}");
    s
}

// ----------------------------------------------------------------------------
// login / restore / logout
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_login_sets_role_tenant_and_persists_token() {
    let server = Arc::new(FakeNotesServer::new());
    let s = logged_in(&server, "admin@acme.test").await;

    assert!(s.is_authenticated());
    assert_eq!(s.role(), Some(Role::Admin));
    assert_eq!(s.tenant(), Some("acme"));
    assert!(s.can_upgrade());
    assert_eq!(s.store().load().unwrap().as_ref(), s.token());
}

#[tokio::test]
async fn test_login_bad_password_reports_server_message() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = session(&server);

    let notice = s.login("admin@acme.test", "wrong").await.unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.message, "Invalid credentials");
    assert!(!s.is_authenticated());
    assert!(s.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_login_offline_reports_network_error() {
    let server = Arc::new(FakeNotesServer::new());
    server.set_offline(true);
    let mut s = session(&server);

    let notice = s.login("admin@acme.test", PASSWORD).await.unwrap();
    assert_eq!(notice.message, "Network error");
    assert!(!s.is_authenticated());
}

#[tokio::test]
async fn test_login_loads_existing_notes() {
    let server = Arc::new(FakeNotesServer::new());
    let mut admin = logged_in(&server, "admin@acme.test").await;
    assert!(admin.add("shared note").await.is_none());

    let member = logged_in(&server, "user@acme.test").await;
    assert_eq!(member.notes().len(), 1);
    assert_eq!(member.notes()[0].content, "shared note");
    assert_eq!(member.role(), Some(Role::Member));
}

#[tokio::test]
async fn test_restore_without_stored_token_stays_logged_out() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = session(&server);

    assert!(s.restore().await.is_none());
    assert!(!s.is_authenticated());
    assert_eq!(server.calls(), 0);
}

#[tokio::test]
async fn test_restore_with_stored_token_fetches_notes() {
    let server = Arc::new(FakeNotesServer::new());
    let token = server.token_for("user@globex.test");
    let mut s = Session::new(server.clone(), MemoryTokenStore::with_token(token));

    assert!(s.restore().await.is_none());
    assert!(s.is_authenticated());
    assert_eq!(s.tenant(), Some("globex"));
    assert_eq!(server.calls(), 1);
}

#[tokio::test]
async fn test_restore_with_unreadable_token_clears_it() {
    let server = Arc::new(FakeNotesServer::new());
    let store = MemoryTokenStore::with_token(Token::new("not-a-jwt").unwrap());
    let mut s = Session::new(server.clone(), store);

    let notice = s.restore().await.unwrap();
    assert!(notice.is_error());
    assert!(!s.is_authenticated());
    assert!(s.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "admin@acme.test").await;
    s.add("x").await;
    s.set_draft("half typed");

    s.logout();
    assert!(!s.is_authenticated());
    assert!(s.notes().is_empty());
    assert_eq!(s.draft(), "");
    assert!(s.store().load().unwrap().is_none());
}

// ----------------------------------------------------------------------------
// refresh
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_when_logged_out() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = session(&server);

    let notice = s.refresh().await.unwrap();
    assert_eq!(notice.message, "Not logged in");
    assert_eq!(server.calls(), 0);
}

#[tokio::test]
async fn test_refresh_rejected_token_logs_out() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "admin@acme.test").await;

    server.set_reject_tokens(true);
    let notice = s.refresh().await.unwrap();
    assert!(notice.is_error());
    assert!(!s.is_authenticated());
    assert!(s.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_network_failure_keeps_state() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "admin@acme.test").await;
    s.add("keep me").await;

    server.set_offline(true);
    let notice = s.refresh().await.unwrap();
    assert!(notice.message.starts_with("Could not load notes"));
    assert!(s.is_authenticated());
    assert_eq!(s.notes().len(), 1);
}

// ----------------------------------------------------------------------------
// add_note
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_add_note_appends_and_clears_draft() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@acme.test").await;

    s.set_draft("buy milk");
    assert!(s.add_note().await.is_none());
    assert_eq!(s.draft(), "");
    assert_eq!(s.notes().len(), 1);
    assert_eq!(s.notes()[0].content, "buy milk");
    assert_eq!(server.tenant_notes("acme").len(), 1);
}

#[tokio::test]
async fn test_add_note_plan_limit_reports_and_resyncs() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@acme.test").await;
    for i in 0..FREE_PLAN_LIMIT {
        assert!(s.add(format!("note {i}")).await.is_none());
    }

    // Another member of the tenant deletes one behind our back
    let mut other = logged_in(&server, "admin@acme.test").await;
    let first = other.notes()[0].id.clone();
    other.delete_note(&first).await;

    // Local list is stale (3 notes) but the server has room again
    assert!(s.add("fits").await.is_none());
    let notice = s.add("one too many").await.unwrap();
    assert!(notice.is_error());
    assert!(notice.message.starts_with("Free plan limit reached"));
    assert_eq!(s.draft(), "one too many");
    assert_eq!(s.notes().len(), FREE_PLAN_LIMIT);
    assert_eq!(s.notes(), server.tenant_notes("acme").as_slice());
}

#[tokio::test]
async fn test_add_note_when_logged_out() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = session(&server);

    let notice = s.add("x").await.unwrap();
    assert_eq!(notice.message, "Not logged in");
}

#[tokio::test]
async fn test_add_note_rejected_token_logs_out() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@acme.test").await;

    server.set_reject_tokens(true);
    s.add("x").await.unwrap();
    assert!(!s.is_authenticated());
}

// ----------------------------------------------------------------------------
// delete_note
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_note_removes_locally() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@globex.test").await;
    s.add("a").await;
    s.add("b").await;
    let id = s.notes()[0].id.clone();

    assert!(s.delete_note(&id).await.is_none());
    assert_eq!(s.notes().len(), 1);
    assert_eq!(s.notes()[0].content, "b");
    assert_eq!(server.tenant_notes("globex").len(), 1);
}

#[tokio::test]
async fn test_delete_unknown_note_is_quiet() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@globex.test").await;
    s.add("a").await;

    assert!(s.delete_note(&NoteId::Number(999)).await.is_none());
    assert_eq!(s.notes().len(), 1);
}

#[tokio::test]
async fn test_delete_note_offline_keeps_note() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@globex.test").await;
    s.add("a").await;
    let id = s.notes()[0].id.clone();

    server.set_offline(true);
    let notice = s.delete_note(&id).await.unwrap();
    assert!(notice.message.starts_with("Could not delete note"));
    assert_eq!(s.notes().len(), 1);
}

// ----------------------------------------------------------------------------
// upgrade
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_upgrade_as_admin_lifts_limit() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "admin@acme.test").await;
    for i in 0..FREE_PLAN_LIMIT {
        s.add(format!("note {i}")).await;
    }
    assert!(s.add("blocked").await.is_some());

    let notice = s.upgrade().await.unwrap();
    assert!(!notice.is_error());
    assert_eq!(notice.message, "Upgraded to Pro!");
    assert!(server.is_pro("acme"));
    assert!(!server.is_pro("globex"));

    assert!(s.add_note().await.is_none());
    assert_eq!(s.notes().len(), FREE_PLAN_LIMIT + 1);
}

#[tokio::test]
async fn test_upgrade_as_member_is_refused_locally() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "user@acme.test").await;
    let calls = server.calls();

    assert!(!s.can_upgrade());
    let notice = s.upgrade().await.unwrap();
    assert!(notice.is_error());
    assert_eq!(server.calls(), calls);
    assert!(!server.is_pro("acme"));
}

#[tokio::test]
async fn test_upgrade_offline_reports_network_error() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = logged_in(&server, "admin@globex.test").await;

    server.set_offline(true);
    let notice = s.upgrade().await.unwrap();
    assert_eq!(notice.message, "Network error");
}

#[tokio::test]
async fn test_upgrade_when_logged_out() {
    let server = Arc::new(FakeNotesServer::new());
    let mut s = session(&server);

    let notice = s.upgrade().await.unwrap();
    assert_eq!(notice.message, "Not logged in");
}

// ----------------------------------------------------------------------------
// over HTTP
// ----------------------------------------------------------------------------

fn http_session(
    server: &MockServer,
    claims: serde_json::Value,
) -> Session<NotesClient, MemoryTokenStore> {
    let client = NotesClient::new(&server.uri()).unwrap();
    Session::new(client, MemoryTokenStore::with_token(unsigned_token(&claims)))
}

#[tokio::test]
async fn test_upgrade_then_rejected_reload_reports_both() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tenants/acme/upgrade"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "plan": "pro" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut s = http_session(&server, json!({ "role": "admin", "tenant": "acme" }));
    assert!(s.restore().await.is_none());

    let notice = s.upgrade().await.unwrap();
    assert!(notice.is_error());
    assert_eq!(
        notice.message,
        "Upgraded to Pro! Session expired, please log in again"
    );
    assert!(!s.is_authenticated());
    assert!(s.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_delete_numeric_id_removes_string_id_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "17", "content": "old" },
            { "id": "18", "content": "keep" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/notes/17"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut s = http_session(&server, json!({ "role": "member", "tenant": "acme" }));
    assert!(s.restore().await.is_none());

    assert!(s.delete_note(&NoteId::Number(17)).await.is_none());
    assert_eq!(s.notes(), &[Note::new(NoteId::from("18"), "keep")]);
}
