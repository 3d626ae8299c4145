use super::*;
use crate::store::MemoryStore;
use crate::test_support::{self, StubTransport, json as respond, profile, profile_json};
use crate::types::Role;

type Manager = SessionManager<StubTransport, MemoryStore>;

fn manager() -> (Manager, StubTransport, MemoryStore) {
    let (api, transport, store) = test_support::client();
    (SessionManager::new(api), transport, store)
}

/// Persist a previous session for `role` as a prior sign-in would have.
fn seed(session: &Manager, role: Role) {
    session.api().tokens().set_tokens("acc", "ref");
    session.api().tokens().set_user(&profile(role));
}

fn login_body(role: Role) -> serde_json::Value {
    serde_json::json!({
        "user": profile_json(role),
        "tokens": { "access": format!("{role}-access"), "refresh": format!("{role}-refresh") },
    })
}

// =============================================================
// Rehydration
// =============================================================

#[tokio::test]
async fn starts_uninitialized() {
    let (session, _, _) = manager();
    assert_eq!(session.session(), Session::uninitialized());
    assert!(session.session().loading);
}

#[tokio::test]
async fn fresh_start_is_anonymous_without_network() {
    let (session, transport, _) = manager();
    let resolved = session.rehydrate().await;
    assert_eq!(resolved, Session::anonymous());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn cached_user_without_access_token_is_discarded_offline() {
    let (session, transport, store) = manager();
    session.api().tokens().set_user(&profile(Role::Staff));

    assert_eq!(session.rehydrate().await, Session::anonymous());
    assert_eq!(transport.request_count(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn accepted_profile_authenticates_with_server_identity() {
    let (session, transport, _) = manager();
    seed(&session, Role::Staff);
    let mut fresh = profile_json(Role::Staff);
    fresh["first_name"] = serde_json::json!("Renamed");
    transport.push(respond(200, fresh));

    let resolved = session.rehydrate().await;
    assert!(resolved.is_authenticated);
    assert!(!resolved.loading);
    assert_eq!(resolved.role(), Some(Role::Staff));
    assert_eq!(transport.paths(), ["/api/auth/profile/"]);
    assert_eq!(session.api().tokens().get_user().unwrap().first_name, "Renamed");
}

#[tokio::test]
async fn rejected_profile_and_failed_refresh_clear_storage() {
    let (session, transport, store) = manager();
    seed(&session, Role::Admin);
    transport.push(respond(401, serde_json::json!({ "detail": "Token is invalid or expired" })));
    transport.push(respond(401, serde_json::json!({ "detail": "Token is blacklisted" })));

    assert_eq!(session.rehydrate().await, Session::anonymous());
    assert_eq!(transport.paths(), ["/api/auth/profile/", "/api/auth/token/refresh/"]);
    assert!(store.is_empty());
}

#[tokio::test]
async fn refresh_then_profile_retry_authenticates() {
    let (session, transport, _) = manager();
    seed(&session, Role::Student);
    transport.push(respond(401, serde_json::json!({})));
    transport.push(respond(200, serde_json::json!({ "access": "rotated" })));
    transport.push(respond(200, profile_json(Role::Student)));

    let resolved = session.rehydrate().await;
    assert_eq!(resolved.role(), Some(Role::Student));
    assert_eq!(session.api().tokens().access_token().as_deref(), Some("rotated"));
    assert_eq!(transport.paths(), ["/api/auth/profile/", "/api/auth/token/refresh/", "/api/auth/profile/"]);
}

#[tokio::test]
async fn profile_failing_after_refresh_clears_storage() {
    let (session, transport, store) = manager();
    seed(&session, Role::Student);
    transport.push(respond(401, serde_json::json!({})));
    transport.push(respond(200, serde_json::json!({ "access": "rotated" })));
    transport.push(test_support::unreachable());

    assert_eq!(session.rehydrate().await, Session::anonymous());
    assert_eq!(transport.request_count(), 3);
    assert!(store.is_empty());
}

#[tokio::test]
async fn rehydrate_runs_only_once() {
    let (session, transport, _) = manager();
    seed(&session, Role::Admin);
    transport.push(respond(200, profile_json(Role::Admin)));

    let first = session.rehydrate().await;
    let second = session.rehydrate().await;
    assert_eq!(first, second);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn expired_deadline_resolves_anonymous_and_clears_tokens() {
    let (session, transport, store) = manager();
    seed(&session, Role::Staff);
    transport.slow().push(respond(200, profile_json(Role::Staff)));

    let resolved = session.rehydrate_within(std::future::ready(())).await;
    assert_eq!(resolved, Session::anonymous());
    assert!(store.is_empty());
}

#[tokio::test]
async fn login_before_rehydrate_makes_it_a_no_op() {
    let (session, transport, _) = manager();
    session.login(profile(Role::Admin));
    let resolved = session.rehydrate().await;
    assert_eq!(resolved.role(), Some(Role::Admin));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn login_during_rehydration_wins() {
    let (session, transport, _) = manager();
    seed(&session, Role::Staff);
    transport.slow().push(respond(200, profile_json(Role::Staff)));

    let (resolved, ()) = futures::join!(session.rehydrate(), async { session.login(profile(Role::Admin)) });
    assert_eq!(resolved.role(), Some(Role::Admin));
    assert_eq!(session.session().role(), Some(Role::Admin));
}

#[tokio::test]
async fn sign_in_during_refresh_keeps_the_new_users_tokens() {
    let (session, transport, _) = manager();
    seed(&session, Role::Admin);
    transport
        .slow()
        .push(respond(401, serde_json::json!({ "detail": "expired" })))
        .push(respond(200, login_body(Role::Student)))
        .push(respond(200, serde_json::json!({ "access": "stale-admin-access" })))
        .push(respond(200, profile_json(Role::Admin)));

    let (resolved, signed_in) = futures::join!(session.rehydrate(), session.sign_in("s@college.edu", "pw"));
    assert_eq!(signed_in.unwrap().role, Role::Student);
    assert_eq!(resolved.role(), Some(Role::Student));

    let tokens = session.api().tokens();
    assert_eq!(tokens.access_token().as_deref(), Some("student-access"));
    assert_eq!(tokens.refresh_token().as_deref(), Some("student-refresh"));
    assert_eq!(tokens.get_user().map(|u| u.role), Some(Role::Student));
    assert_eq!(transport.paths(), ["/api/auth/profile/", "/api/auth/login/", "/api/auth/token/refresh/"]);
}

#[tokio::test]
async fn logout_during_refresh_leaves_storage_empty() {
    let (session, transport, store) = manager();
    seed(&session, Role::Admin);
    transport
        .slow()
        .push(respond(401, serde_json::json!({ "detail": "expired" })))
        .push(respond(200, serde_json::json!({ "access": "stale-admin-access" })))
        .push(respond(200, profile_json(Role::Admin)));

    let (resolved, ()) = futures::join!(session.rehydrate(), async {
        tokio::task::yield_now().await;
        session.logout();
    });
    assert_eq!(resolved, Session::anonymous());
    assert!(store.is_empty());
    assert_eq!(transport.paths(), ["/api/auth/profile/", "/api/auth/token/refresh/"]);
}

// =============================================================
// Logout
// =============================================================

#[tokio::test]
async fn logout_clears_everything_and_is_idempotent() {
    let (session, _, store) = manager();
    seed(&session, Role::Staff);
    session.login(profile(Role::Staff));

    session.logout();
    assert_eq!(session.session(), Session::anonymous());
    assert!(store.is_empty());

    session.logout();
    assert_eq!(session.session(), Session::anonymous());
    assert!(store.is_empty());
}

#[tokio::test]
async fn logout_while_uninitialized_settles_anonymous() {
    let (session, transport, _) = manager();
    seed(&session, Role::Admin);
    session.logout();
    assert_eq!(session.rehydrate().await, Session::anonymous());
    assert_eq!(transport.request_count(), 0);
}

// =============================================================
// Sign-in
// =============================================================

#[tokio::test]
async fn sign_in_persists_tokens_and_user() {
    let (session, transport, _) = manager();
    session.rehydrate().await;
    transport.push(respond(200, login_body(Role::Staff)));

    let user = session.sign_in("  staff@college.edu ", "pw").await.unwrap();
    assert_eq!(user.role, Role::Staff);
    assert_eq!(session.session().role(), Some(Role::Staff));

    let tokens = session.api().tokens().get_tokens();
    assert_eq!(tokens.access_token.as_deref(), Some("staff-access"));
    assert_eq!(tokens.refresh_token.as_deref(), Some("staff-refresh"));
    assert_eq!(session.api().tokens().get_user(), Some(user));

    let body: serde_json::Value =
        serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], "staff@college.edu");
}

#[tokio::test]
async fn sign_out_then_sign_in_as_another_user() {
    let (session, transport, _) = manager();
    session.rehydrate().await;
    transport.push(respond(200, login_body(Role::Staff)));
    transport.push(respond(200, login_body(Role::Student)));

    session.sign_in("a@college.edu", "pw").await.unwrap();
    session.logout();
    assert_eq!(session.session(), Session::anonymous());

    session.sign_in("b@college.edu", "pw").await.unwrap();
    assert_eq!(session.session().role(), Some(Role::Student));
    assert_eq!(session.api().tokens().get_user().unwrap().role, Role::Student);
    assert_eq!(session.api().tokens().access_token().as_deref(), Some("student-access"));
}

#[tokio::test]
async fn rejected_credentials_surface_server_message() {
    let (session, transport, store) = manager();
    session.rehydrate().await;
    transport.push(respond(401, serde_json::json!({ "error": "Invalid credentials" })));

    let err = session.sign_in("x@college.edu", "bad").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(session.session(), Session::anonymous());
    assert!(store.is_empty());
    assert!(!session.is_sign_in_pending());
}

#[tokio::test]
async fn login_response_without_tokens_is_rejected() {
    let (session, transport, store) = manager();
    session.rehydrate().await;
    transport.push(respond(200, serde_json::json!({ "user": profile_json(Role::Admin) })));

    let err = session.sign_in("a@college.edu", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::MissingTokens));
    assert_eq!(session.session(), Session::anonymous());
    assert!(store.is_empty());
}

#[tokio::test]
async fn concurrent_sign_in_is_refused_as_busy() {
    let (session, transport, _) = manager();
    session.rehydrate().await;
    transport.slow().push(respond(200, login_body(Role::Admin)));

    let (first, second) =
        futures::join!(session.sign_in("a@college.edu", "pw"), session.sign_in("b@college.edu", "pw"));
    assert_eq!(first.unwrap().role, Role::Admin);
    assert!(matches!(second, Err(SessionError::Busy)));
    assert_eq!(transport.request_count(), 1);
    assert!(!session.is_sign_in_pending());
}

#[tokio::test]
async fn logout_during_sign_in_supersedes_it() {
    let (session, transport, store) = manager();
    session.rehydrate().await;
    transport.slow().push(respond(200, login_body(Role::Staff)));

    let (result, ()) = futures::join!(session.sign_in("a@college.edu", "pw"), async { session.logout() });
    assert!(matches!(result, Err(SessionError::Superseded)));
    assert_eq!(session.session(), Session::anonymous());
    assert!(store.is_empty());
}
