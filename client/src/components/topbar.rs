//! Dashboard top bar with identity, role navigation and logout.

#[cfg(test)]
#[path = "topbar_test.rs"]
mod topbar_test;

use campus::{LOGIN_PATH, Role};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::Auth;

/// Navigation entries for `role`, in display order.
pub fn nav_links(role: Role) -> &'static [(&'static str, &'static str)] {
    match role {
        Role::Admin => &[
            ("/admin", "Dashboard"),
            ("/admin/students", "Students"),
            ("/admin/staff", "Staff"),
            ("/admin/hods", "HODs"),
            ("/syllabus", "Syllabus"),
            ("/profile", "Profile"),
        ],
        Role::Staff => &[("/staff", "Dashboard"), ("/syllabus", "Syllabus"), ("/profile", "Profile")],
        Role::Student => &[("/student", "Dashboard"), ("/student/syllabus", "Syllabus"), ("/profile", "Profile")],
    }
}

#[component]
pub fn Topbar(title: &'static str) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let navigate = use_navigate();

    let user = move || auth.session().user;
    let links = move || {
        auth.session()
            .role()
            .map(nav_links)
            .unwrap_or_default()
            .iter()
            .map(|(href, label)| view! { <a class="topbar__link" href=*href>{*label}</a> })
            .collect::<Vec<_>>()
    };

    let on_logout = move |_| {
        auth.logout();
        navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <header class="topbar">
            <span class="topbar__title">{title}</span>
            <nav class="topbar__nav">{links}</nav>
            <span class="topbar__spacer"></span>
            <span class="topbar__self">
                {move || user().map(|u| u.display_name()).unwrap_or_default()}
                " ("
                <span class="topbar__role">{move || user().map(|u| u.role.as_str()).unwrap_or_default()}</span>
                ")"
            </span>
            <button class="btn topbar__logout" on:click=on_logout title="Logout">
                "Logout"
            </button>
        </header>
    }
}
