//! Role dashboards and the shared landing page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each dashboard is the top bar, a role-specific welcome strip and the
//! shared notice board. Access control happens in the route table.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use campus::{Role, UserProfile};
use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::notice_board::NoticeBoard;
use crate::components::topbar::Topbar;
use crate::state::auth::Auth;

/// Greeting line under the top bar.
fn welcome_line(user: Option<&UserProfile>) -> String {
    match user {
        Some(user) => match user.role {
            Role::Student => match user.student_department() {
                Some(dept) => format!("Welcome, {} ({dept})", user.display_name()),
                None => format!("Welcome, {}", user.display_name()),
            },
            Role::Admin | Role::Staff => format!("Welcome, {}", user.display_name()),
        },
        None => "Welcome".to_owned(),
    }
}

#[component]
fn Dashboard(title: &'static str) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let welcome = move || welcome_line(auth.session().user.as_ref());

    view! {
        <Title text=title />
        <div class="dashboard-page">
            <Topbar title=title />
            <p class="dashboard-page__welcome">{welcome}</p>
            <NoticeBoard />
        </div>
    }
}

/// `/` for any signed-in role.
#[component]
pub fn HomePage() -> impl IntoView {
    view! { <Dashboard title="Campus Portal" /> }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! { <Dashboard title="Admin Dashboard" /> }
}

#[component]
pub fn StaffDashboard() -> impl IntoView {
    view! { <Dashboard title="Staff Dashboard" /> }
}

#[component]
pub fn StudentDashboard() -> impl IntoView {
    view! { <Dashboard title="Student Dashboard" /> }
}
