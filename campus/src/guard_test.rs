use super::*;
use crate::test_support::profile;
use crate::types::Role;

fn signed_in(role: Role) -> Session {
    Session::authenticated(profile(role))
}

// =============================================================
// Pending / login redirects
// =============================================================

#[test]
fn loading_is_pending_regardless_of_auth_flag() {
    let mut session = signed_in(Role::Admin);
    session.loading = true;
    assert_eq!(RouteGuard::any().check(&session), Access::Pending);
    assert_eq!(RouteGuard::only(RoleSet::STUDENT).check(&session), Access::Pending);
    assert_eq!(RouteGuard::any().check(&Session::uninitialized()), Access::Pending);
}

#[test]
fn anonymous_is_sent_to_login_for_any_allow_list() {
    let session = Session::anonymous();
    for guard in [RouteGuard::any(), RouteGuard::only(RoleSet::ADMIN), RouteGuard::only(RoleSet::EMPTY)] {
        assert_eq!(guard.check(&session), Access::RedirectToLogin);
    }
}

#[test]
fn authenticated_flag_without_user_is_sent_to_login() {
    let session = Session { user: None, is_authenticated: true, loading: false };
    assert_eq!(RouteGuard::any().check(&session), Access::RedirectToLogin);
}

// =============================================================
// Role checks
// =============================================================

#[test]
fn student_on_admin_view_goes_to_landing() {
    let access = RouteGuard::only(RoleSet::ADMIN).check(&signed_in(Role::Student));
    assert_eq!(access, Access::RedirectToLanding);
    assert_eq!(access.redirect_path(), Some(LANDING_PATH));
}

#[test]
fn faculty_views_admit_admin_and_staff_only() {
    let guard = RouteGuard::only(RoleSet::FACULTY);
    assert_eq!(guard.check(&signed_in(Role::Admin)), Access::Granted);
    assert_eq!(guard.check(&signed_in(Role::Staff)), Access::Granted);
    assert_eq!(guard.check(&signed_in(Role::Student)), Access::RedirectToLanding);
}

#[test]
fn no_allow_list_admits_every_role() {
    for role in Role::ALL {
        assert_eq!(RouteGuard::any().check(&signed_in(role)), Access::Granted);
    }
}

#[test]
fn only_redirects_carry_a_path() {
    assert_eq!(Access::RedirectToLogin.redirect_path(), Some("/login"));
    assert_eq!(Access::Pending.redirect_path(), None);
    assert_eq!(Access::Granted.redirect_path(), None);
}
