//! App root: session wiring and the route table.
//!
//! ARCHITECTURE
//! ============
//! One `Auth` handle is created here and provided by context; rehydration
//! starts on mount and every protected route renders through `RequireAuth`
//! with its role allow-list.

use campus::{ApiConfig, LOGIN_PATH, RoleSet};
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::components::require_auth::RequireAuth;
use crate::pages::dashboard::{AdminDashboard, HomePage, StaffDashboard, StudentDashboard};
use crate::pages::login::LoginPage;
use crate::pages::members::{HodsPage, StaffPage, StudentsPage};
use crate::pages::profile::ProfilePage;
use crate::pages::syllabus::{StudentSyllabusPage, SyllabusPage};
use crate::state::auth::Auth;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = Auth::new(&ApiConfig::from_build_env());
    provide_context(auth);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(auth.rehydrate());

    view! {
        <Title text="Campus Portal" />
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <Redirect path=LOGIN_PATH /> }>
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/") view=|| view! { <RequireAuth><HomePage /></RequireAuth> } />
                    <Route
                        path=path!("/admin")
                        view=|| view! { <RequireAuth roles=RoleSet::ADMIN><AdminDashboard /></RequireAuth> }
                    />
                    <Route
                        path=path!("/admin/students")
                        view=|| view! { <RequireAuth roles=RoleSet::ADMIN><StudentsPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/admin/staff")
                        view=|| view! { <RequireAuth roles=RoleSet::ADMIN><StaffPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/admin/hods")
                        view=|| view! { <RequireAuth roles=RoleSet::ADMIN><HodsPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/staff")
                        view=|| view! { <RequireAuth roles=RoleSet::STAFF><StaffDashboard /></RequireAuth> }
                    />
                    <Route
                        path=path!("/student")
                        view=|| view! { <RequireAuth roles=RoleSet::STUDENT><StudentDashboard /></RequireAuth> }
                    />
                    <Route
                        path=path!("/student/syllabus")
                        view=|| view! { <RequireAuth roles=RoleSet::STUDENT><StudentSyllabusPage /></RequireAuth> }
                    />
                    <Route
                        path=path!("/syllabus")
                        view=|| view! { <RequireAuth roles=RoleSet::FACULTY><SyllabusPage /></RequireAuth> }
                    />
                    <Route path=path!("/profile") view=|| view! { <RequireAuth><ProfilePage /></RequireAuth> } />
                </Routes>
            </main>
        </Router>
    }
}
