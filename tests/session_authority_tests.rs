//! Session authority behaviour over injected stores: token/profile reads,
//! the role → capability matrix, header construction and logout.

mod common;

use std::sync::Arc;

use stockdash::identity::{
    DetachedStore, FileStore, PendingNavigator, ProfileRead, SessionAuthority, SessionState, SessionStore, StorageKey,
    UserProfile,
};

use common::{authority_with, memory_store, user_json, ALICE};

#[test]
fn role_matrix_for_known_roles() {
    // (role, add/edit, delete, manage users)
    let matrix = [
        ("superadmin", true, true, true),
        ("admin", true, true, false),
        ("editor", true, false, false),
        ("viewer", false, false, false),
    ];
    for (role, add_edit, del, manage) in matrix {
        let (auth, _) = authority_with(memory_store(Some("t"), Some(&user_json(role))));
        assert_eq!(auth.can_add_edit(), add_edit, "canAddEdit for {}", role);
        assert_eq!(auth.can_delete(), del, "canDelete for {}", role);
        assert_eq!(auth.can_manage_users(), manage, "canManageUsers for {}", role);
    }
}

#[test]
fn alice_the_editor() {
    let (auth, _) = authority_with(memory_store(Some("tok-1"), Some(ALICE)));
    assert!(auth.is_authenticated());
    assert_eq!(auth.state(), SessionState::Authenticated);
    let user = auth.get_user().expect("alice");
    assert_eq!(user.id, 1);
    assert_eq!(user.username, "alice");
    assert_eq!(user.created_timestamp().map(|t| t.to_rfc3339()).as_deref(), Some("2024-01-01T00:00:00+00:00"));
    assert!(auth.can_add_edit());
    assert!(!auth.can_delete());
    assert!(!auth.can_manage_users());
}

#[test]
fn unusual_created_at_keeps_capabilities() {
    for created_at in ["2024-01-01 00:00:00", "2024-01-01T00:00:00+0000", "2024-01-01", "2024-01-01 00:00:00.123456", "last tuesday"] {
        let user = format!(r#"{{"id":9,"username":"root","role":"superadmin","created_at":"{}"}}"#, created_at);
        let (auth, _) = authority_with(memory_store(Some("t"), Some(&user)));
        let profile = auth.get_user().expect("profile survives its timestamp");
        assert_eq!(profile.created_at, created_at);
        assert!(auth.can_manage_users(), "created_at {}", created_at);
        assert!(auth.can_delete());
    }
}

#[test]
fn empty_token_counts_as_signed_in() {
    let (auth, _) = authority_with(memory_store(Some(""), Some(ALICE)));
    assert_eq!(auth.get_token().as_deref(), Some(""));
    assert!(auth.is_authenticated());
    assert!(!auth.build_auth_headers().contains_key("Authorization"));
}

#[test]
fn stale_profile_without_token_is_unauthenticated() {
    let (auth, _) = authority_with(memory_store(None, Some(ALICE)));
    assert_eq!(auth.get_token(), None);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.state(), SessionState::Unauthenticated);
    // capability checks only look at the profile
    assert!(auth.can_add_edit());
}

#[test]
fn malformed_profile_reads_as_absent() {
    let (auth, _) = authority_with(memory_store(Some("t"), Some("not-json")));
    assert!(matches!(auth.read_profile(), ProfileRead::Malformed(_)));
    assert_eq!(auth.get_user(), None);
    assert!(!auth.has_role(&["editor", "viewer"]));
    assert!(!auth.can_add_edit());
    assert!(auth.is_authenticated());
}

#[test]
fn no_user_means_no_role() {
    let (auth, _) = authority_with(memory_store(Some("t"), None));
    assert_eq!(auth.read_profile(), ProfileRead::Absent);
    assert!(!auth.has_role(&["superadmin", "admin", "editor", "viewer"]));
}

#[test]
fn open_role_set_is_checked_by_inclusion_only() {
    let (auth, _) = authority_with(memory_store(Some("t"), Some(&user_json("warehouse"))));
    assert!(auth.has_role(&["warehouse"]));
    assert!(!auth.can_add_edit());
}

#[test]
fn auth_headers_with_and_without_token() {
    let (anon, _) = authority_with(memory_store(None, None));
    let h = anon.build_auth_headers();
    assert_eq!(h.get("Content-Type").map(String::as_str), Some("application/json"));
    assert!(!h.contains_key("Authorization"));
    assert_eq!(h.len(), 1);

    let (auth, _) = authority_with(memory_store(Some("abc123"), None));
    let h = auth.build_auth_headers();
    assert_eq!(h.get("Authorization").map(String::as_str), Some("Bearer abc123"));
    assert_eq!(h.len(), 2);
}

#[test]
fn logout_clears_and_redirects_and_is_idempotent() {
    let store = memory_store(Some("tok-1"), Some(ALICE));
    let (auth, nav) = authority_with(store.clone());
    auth.logout();
    assert!(store.is_empty());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.get_user(), None);
    auth.logout();
    assert!(store.is_empty());
    assert_eq!(nav.take_pending(), vec!["/login".to_string(), "/login".to_string()]);
}

#[test]
fn detached_context_degrades_to_absent() {
    let nav = Arc::new(PendingNavigator::new());
    let auth = SessionAuthority::new(Arc::new(DetachedStore), nav.clone());
    assert_eq!(auth.get_token(), None);
    assert_eq!(auth.get_user(), None);
    assert!(!auth.is_authenticated());
    assert!(!auth.can_add_edit());
    assert!(!auth.build_auth_headers().contains_key("Authorization"));
    // clearing fails underneath but logout still navigates
    auth.logout();
    assert_eq!(nav.redirect_count(), 1);
}

#[test]
fn file_backed_session_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let nav = Arc::new(PendingNavigator::new());
    let auth = SessionAuthority::new(Arc::new(FileStore::open(&path)), nav.clone());
    let profile: UserProfile = serde_json::from_str(ALICE).unwrap();
    auth.store_session("tok-1", &profile).unwrap();

    // a second authority over the same file sees the session
    let other = SessionAuthority::new(Arc::new(FileStore::open(&path)), Arc::new(PendingNavigator::new()));
    assert_eq!(other.get_token().as_deref(), Some("tok-1"));
    assert_eq!(other.get_user(), Some(profile));

    other.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(auth.get_user(), None);
    assert_eq!(nav.redirect_count(), 0);
}

#[test]
fn corrupt_session_file_reads_as_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "garbage").unwrap();
    let store = Arc::new(FileStore::open(&path));
    assert!(store.read(StorageKey::Token).is_err());
    let auth = SessionAuthority::new(store, Arc::new(PendingNavigator::new()));
    assert!(!auth.is_authenticated());
    assert_eq!(auth.get_user(), None);
}
