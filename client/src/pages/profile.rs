//! Profile page for any signed-in role.
//!
//! Shows the session user immediately, then swaps in a fresh copy from the
//! profile endpoint once it arrives.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use campus::UserProfile;
use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::topbar::Topbar;
use crate::state::auth::Auth;

/// Profile sub-object keys shown when present, with their labels.
const PROFILE_FIELDS: [(&str, &str); 6] = [
    ("student_id", "Student ID"),
    ("staff_id", "Staff ID"),
    ("department", "Department"),
    ("designation", "Designation"),
    ("phone", "Phone"),
    ("date_of_birth", "Date of birth"),
];

/// Label/value rows for `user`, skipping absent or blank profile fields.
fn profile_rows(user: &UserProfile) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Name", user.display_name()),
        ("Email", user.email.clone()),
        ("Role", user.role.as_str().to_owned()),
    ];
    let extra = user.student_profile.as_ref().or(user.staff_profile.as_ref());
    if let Some(extra) = extra {
        for (key, label) in PROFILE_FIELDS {
            let value = match extra.get(key) {
                Some(serde_json::Value::String(s)) => s.trim().to_owned(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => continue,
            };
            if !value.is_empty() {
                rows.push((label, value));
            }
        }
    }
    rows
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<Auth>();
    let fresh = RwSignal::new(None::<UserProfile>);
    let error = RwSignal::new(None::<String>);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        match auth.with_api(|s| async move { s.api().get_profile().await }).await {
            Ok(user) => fresh.set(Some(user)),
            Err(e) => error.set(Some(e.to_string())),
        }
    });

    let user = move || fresh.get().or_else(|| auth.session().user);

    view! {
        <Title text="Profile" />
        <div class="profile-page">
            <Topbar title="Profile" />
            <Show when=move || error.with(Option::is_some)>
                <p class="profile-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <dl class="profile-page__fields">
                {move || {
                    user()
                        .map(|u| profile_rows(&u))
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(label, value)| view! {
                            <dt>{label}</dt>
                            <dd>{value}</dd>
                        })
                        .collect::<Vec<_>>()
                }}
            </dl>
        </div>
    }
}
