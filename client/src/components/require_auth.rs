//! Route guard wrapper for protected pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route renders through this component so the pending,
//! login-redirect and wrong-role behaviors are identical across pages.

use campus::{Access, LOGIN_PATH, RoleSet, RouteGuard};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;

use crate::state::auth::Auth;

/// Render `children` only when the session admits them. Omitting `roles`
/// admits any signed-in user.
#[component]
pub fn RequireAuth(#[prop(optional)] roles: Option<RoleSet>, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let guard = roles.map_or_else(RouteGuard::any, RouteGuard::only);
    let access = Memo::new(move |_| guard.check(&auth.session()));

    move || match access.get() {
        Access::Pending => view! {
            <div class="auth-pending" role="status">
                <span class="auth-pending__spinner" aria-hidden="true"></span>
                <p>"Loading..."</p>
            </div>
        }
        .into_any(),
        Access::Granted => children().into_any(),
        denied => {
            let path = denied.redirect_path().unwrap_or(LOGIN_PATH);
            let options = NavigateOptions { replace: true, ..NavigateOptions::default() };
            view! { <Redirect path=path options=options /> }.into_any()
        }
    }
}
