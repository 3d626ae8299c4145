//! Admin student/staff directories: filters, registration, edits, deletes
//! and HOD assignment, plus the HOD list.

use campus::records::{self, Hod, Member, MemberStatus};
use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::topbar::Topbar;
use crate::state::auth::Auth;
use crate::state::members::{DirectoryState, HodDirectoryState, MemberForm, MemberKind, distinct_values};
use crate::util::dialog;

/// `/admin/students`.
#[component]
pub fn StudentsPage() -> impl IntoView {
    view! { <MembersPage kind=MemberKind::Student /> }
}

/// `/admin/staff`.
#[component]
pub fn StaffPage() -> impl IntoView {
    view! { <MembersPage kind=MemberKind::Staff /> }
}

type Getter = fn(&MemberForm) -> String;
type Setter = fn(&mut MemberForm, String);

fn form_field(
    form: RwSignal<MemberForm>,
    label: &'static str,
    input_type: &'static str,
    get: Getter,
    set: Setter,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span>{label}</span>
            <input
                type=input_type
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </label>
    }
}

fn some_unless_all(raw: String) -> Option<String> {
    (!raw.is_empty() && raw != "all").then_some(raw)
}

fn options(values: Vec<String>) -> Vec<impl IntoView> {
    values.into_iter().map(|v| { let value = v.clone(); view! { <option value=value>{v}</option> } }).collect()
}

#[component]
fn MembersPage(kind: MemberKind) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let directory = RwSignal::new(DirectoryState { loading: true, ..DirectoryState::default() });
    let edit_form = RwSignal::new(MemberForm::default());
    let hod_target = RwSignal::new(None::<Member>);
    let flash = RwSignal::new(None::<String>);

    let reload = move || {
        directory.update(|d| d.loading = true);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth
                .with_api(|s| async move {
                    match kind {
                        MemberKind::Student => s.api().students().await,
                        MemberKind::Staff => s.api().staff().await,
                    }
                })
                .await;
            directory.update(|d| {
                d.loading = false;
                match result {
                    Ok(items) => {
                        d.items = items;
                        d.error = None;
                    }
                    Err(e) => d.error = Some(e.to_string()),
                }
            });
        });
        #[cfg(not(feature = "csr"))]
        let _ = auth;
    };
    reload();

    let start_edit = move |member: &Member| {
        hod_target.set(None);
        edit_form.set(MemberForm::from_member(member));
        directory.update(|d| d.editing = Some(member.member_id.clone()));
    };

    let remove = move |member_id: String| {
        if !dialog::confirm(kind.delete_prompt()) {
            return;
        }
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth
                .with_api(|s| async move {
                    match kind {
                        MemberKind::Student => s.api().delete_student(&member_id).await,
                        MemberKind::Staff => s.api().delete_staff(&member_id).await,
                    }
                })
                .await;
            match result {
                Ok(_) => reload(),
                Err(e) => directory.update(|d| d.error = Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = member_id;
    };

    let on_edit_done = Callback::new(move |saved: bool| {
        directory.update(|d| d.editing = None);
        if saved {
            flash.set(Some(kind.updated_message().to_owned()));
            reload();
        }
    });
    let on_hod_done = Callback::new(move |message: Option<String>| {
        hod_target.set(None);
        if message.is_some() {
            flash.set(message);
            reload();
        }
    });

    let departments = move || directory.with(|d| distinct_values(&d.items, |m| Some(m.department.as_str())));
    let designations = move || directory.with(|d| distinct_values(&d.items, |m| m.designation.as_deref()));
    let rows = move || {
        directory.with(|d| records::filter_members(&d.items, &d.filter).into_iter().cloned().collect::<Vec<Member>>())
    };

    view! {
        <Title text=kind.title() />
        <div class="directory-page">
            <Topbar title=kind.title() />
            <div class="directory-page__filters">
                <input
                    type="search"
                    placeholder="Search name, ID or email"
                    on:input=move |ev| directory.update(|d| d.filter.search = event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    let department = some_unless_all(event_target_value(&ev));
                    directory.update(|d| d.filter.department = department);
                }>
                    <option value="all">"All departments"</option>
                    {move || options(departments())}
                </select>
                <Show when=move || kind == MemberKind::Staff>
                    <select on:change=move |ev| {
                        let designation = some_unless_all(event_target_value(&ev));
                        directory.update(|d| d.filter.designation = designation);
                    }>
                        <option value="all">"All designations"</option>
                        {move || options(designations())}
                    </select>
                </Show>
                <select on:change=move |ev| {
                    let status = MemberStatus::parse(&event_target_value(&ev)).unwrap_or_default();
                    directory.update(|d| d.filter.status = status);
                }>
                    <option value="all">"All"</option>
                    <option value="active">"Active"</option>
                    <option value="inactive">"Inactive"</option>
                </select>
            </div>

            <Show when=move || flash.with(Option::is_some)>
                <div class="alert alert-success">{move || flash.get().unwrap_or_default()}</div>
            </Show>
            <Show when=move || directory.with(|d| d.error.is_some())>
                <p class="directory-page__error">{move || directory.with(|d| d.error.clone()).unwrap_or_default()}</p>
            </Show>
            <Show when=move || !directory.with(|d| d.loading) fallback=|| view! { <p>"Loading..."</p> }>
                <table class="directory-page__table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Name"</th>
                            <th>"Email"</th>
                            <th>"Department"</th>
                            <th>"Status"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            rows()
                                .into_iter()
                                .map(|m| {
                                    let status = match m.user.is_active {
                                        Some(true) => "Active",
                                        Some(false) => "Inactive",
                                        None => "",
                                    };
                                    let edit_target = m.clone();
                                    let delete_id = m.member_id.clone();
                                    let hod_member = m.clone();
                                    view! {
                                        <tr>
                                            <td>{m.member_id.clone()}</td>
                                            <td>{m.full_name()}</td>
                                            <td>{m.user.email.clone()}</td>
                                            <td>{m.department.clone()}</td>
                                            <td>{status}</td>
                                            <td class="directory-page__actions">
                                                <button class="btn" on:click=move |_| start_edit(&edit_target)>
                                                    "Edit"
                                                </button>
                                                <button
                                                    class="btn btn-danger"
                                                    on:click=move |_| remove(delete_id.clone())
                                                >
                                                    "Delete"
                                                </button>
                                                {(kind == MemberKind::Staff)
                                                    .then(move || {
                                                        view! {
                                                            <button
                                                                class="btn"
                                                                on:click=move |_| {
                                                                    directory.update(|d| d.editing = None);
                                                                    hod_target.set(Some(hod_member.clone()));
                                                                }
                                                            >
                                                                "Assign HOD"
                                                            </button>
                                                        }
                                                    })}
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </Show>

            {move || {
                directory
                    .with(|d| d.editing.clone())
                    .map(|target| view! { <EditMemberForm kind target form=edit_form on_done=on_edit_done /> })
            }}
            {move || hod_target.get().map(|member| view! { <AssignHodForm member on_done=on_hod_done /> })}

            <AddMemberForm kind=kind on_created=Callback::new(move |()| reload()) />
        </div>
    }
}

#[component]
fn AddMemberForm(kind: MemberKind, on_created: Callback<()>) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let form = RwSignal::new(MemberForm::default());
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        error.set(None);
        success.set(None);
        let payload = match form.with_untracked(|f| f.payload(kind)) {
            Ok(payload) => payload,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth
                .with_api(|s| async move {
                    match kind {
                        MemberKind::Student => s.api().add_student(&payload).await,
                        MemberKind::Staff => s.api().add_staff(&payload).await,
                    }
                })
                .await;
            match result {
                Ok(body) => {
                    let message = body.get("message").and_then(|m| m.as_str()).unwrap_or(kind.created_message());
                    success.set(Some(message.to_owned()));
                    form.set(MemberForm::default());
                    on_created.run(());
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "csr"))]
        let _ = (payload, auth, on_created);
    };

    view! {
        <form class="form-container" on:submit=on_submit>
            <h2 class="form-title">{format!("Add {}", kind.noun())}</h2>
            {form_field(form, "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
            {form_field(form, "First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
            {form_field(form, "Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
            {form_field(form, "Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
            {form_field(form, "Confirm password", "password", |f| f.password2.clone(), |f, v| f.password2 = v)}
            {form_field(form, kind.id_label(), "text", |f| f.member_id.clone(), |f, v| f.member_id = v)}
            {form_field(form, "Department", "text", |f| f.department.clone(), |f, v| f.department = v)}
            {form_field(form, "Phone", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
            <Show when=move || kind == MemberKind::Staff>
                {form_field(form, "Designation", "text", |f| f.designation.clone(), |f, v| f.designation = v)}
                {form_field(form, "Salary", "text", |f| f.salary.clone(), |f, v| f.salary = v)}
            </Show>
            <Show when=move || error.with(Option::is_some)>
                <div class="alert alert-error">{move || error.get().unwrap_or_default()}</div>
            </Show>
            <Show when=move || success.with(Option::is_some)>
                <div class="alert alert-success">{move || success.get().unwrap_or_default()}</div>
            </Show>
            <button class="btn" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Saving..." } else { "Create" }}
            </button>
        </form>
    }
}

/// Edit form for the row `target` (a `student_id` / `staff_id`).
/// `on_done(true)` after a successful save, `on_done(false)` on cancel.
#[component]
fn EditMemberForm(
    kind: MemberKind,
    target: String,
    form: RwSignal<MemberForm>,
    on_done: Callback<bool>,
) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let heading = format!("Edit {} {target}", kind.noun());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        error.set(None);
        let payload = match form.with_untracked(|f| f.update_payload(kind)) {
            Ok(payload) => payload,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let target = target.clone();
            leptos::task::spawn_local(async move {
                let result = auth
                    .with_api(|s| async move {
                        match kind {
                            MemberKind::Student => s.api().update_student(&target, &payload).await,
                            MemberKind::Staff => s.api().update_staff(&target, &payload).await,
                        }
                    })
                    .await;
                busy.set(false);
                match result {
                    Ok(_) => on_done.run(true),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (payload, auth, &target);
    };

    view! {
        <form class="form-container" on:submit=on_submit>
            <h2 class="form-title">{heading}</h2>
            {form_field(form, "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
            {form_field(form, "First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
            {form_field(form, "Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
            {form_field(form, "Department", "text", |f| f.department.clone(), |f, v| f.department = v)}
            {form_field(form, "Phone", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
            <Show when=move || kind == MemberKind::Staff>
                {form_field(form, "Designation", "text", |f| f.designation.clone(), |f, v| f.designation = v)}
                {form_field(form, "Salary", "text", |f| f.salary.clone(), |f, v| f.salary = v)}
            </Show>
            <Show when=move || error.with(Option::is_some)>
                <div class="alert alert-error">{move || error.get().unwrap_or_default()}</div>
            </Show>
            <button class="btn" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Saving..." } else { "Save" }}
            </button>
            <button class="btn btn-secondary" type="button" on:click=move |_| on_done.run(false)>
                "Cancel"
            </button>
        </form>
    }
}

/// Make a staff member head of their department. `on_done` receives the
/// success message, or `None` on cancel.
#[component]
fn AssignHodForm(member: Member, on_done: Callback<Option<String>>) -> impl IntoView {
    let auth = expect_context::<Auth>();
    let responsibilities = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let heading = format!("Assign {} as HOD of {}", member.full_name(), member.department);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let Some(user_id) = member.user.id.clone() else {
            error.set(Some("This staff member has no user account.".to_owned()));
            return;
        };
        error.set(None);
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let department = member.department.clone();
            let message = format!("{} assigned as HOD of {department}", member.full_name());
            let extra = responsibilities.get_untracked();
            leptos::task::spawn_local(async move {
                let result = auth
                    .with_api(|s| async move { s.api().assign_hod(&user_id, &department, &extra).await })
                    .await;
                busy.set(false);
                match result {
                    Ok(_) => on_done.run(Some(message)),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (user_id, auth);
    };

    view! {
        <form class="form-container" on:submit=on_submit>
            <h2 class="form-title">{heading}</h2>
            <label class="form-field">
                <span>"Additional responsibilities"</span>
                <textarea
                    prop:value=move || responsibilities.get()
                    on:input=move |ev| responsibilities.set(event_target_value(&ev))
                ></textarea>
            </label>
            <Show when=move || error.with(Option::is_some)>
                <div class="alert alert-error">{move || error.get().unwrap_or_default()}</div>
            </Show>
            <button class="btn" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Assigning..." } else { "Assign HOD" }}
            </button>
            <button class="btn btn-secondary" type="button" on:click=move |_| on_done.run(None)>
                "Cancel"
            </button>
        </form>
    }
}

/// `/admin/hods`.
#[component]
pub fn HodsPage() -> impl IntoView {
    let auth = expect_context::<Auth>();
    let hods = RwSignal::new(HodDirectoryState { loading: true, ..HodDirectoryState::default() });

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let result = auth.with_api(|s| async move { s.api().hods().await }).await;
        hods.update(|h| {
            h.loading = false;
            match result {
                Ok(items) => h.items = items,
                Err(e) => h.error = Some(e.to_string()),
            }
        });
    });
    #[cfg(not(feature = "csr"))]
    let _ = auth;

    let rows =
        move || hods.with(|h| records::filter_hods(&h.items, &h.filter).into_iter().cloned().collect::<Vec<Hod>>());

    view! {
        <Title text="Heads of Department" />
        <div class="directory-page">
            <Topbar title="Heads of Department" />
            <div class="directory-page__filters">
                <input
                    type="search"
                    placeholder="Search name, staff ID or department"
                    on:input=move |ev| hods.update(|h| h.filter.search = event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    let department = some_unless_all(event_target_value(&ev));
                    hods.update(|h| h.filter.department = department);
                }>
                    <option value="all">"All departments"</option>
                    {move || options(hods.with(HodDirectoryState::departments))}
                </select>
                <select on:change=move |ev| {
                    let status = MemberStatus::parse(&event_target_value(&ev)).unwrap_or_default();
                    hods.update(|h| h.filter.status = status);
                }>
                    <option value="all">"All"</option>
                    <option value="active">"Active"</option>
                    <option value="inactive">"Inactive"</option>
                </select>
            </div>
            <Show when=move || hods.with(|h| h.error.is_some())>
                <p class="directory-page__error">{move || hods.with(|h| h.error.clone()).unwrap_or_default()}</p>
            </Show>
            <Show when=move || !hods.with(|h| h.loading) fallback=|| view! { <p>"Loading..."</p> }>
                <table class="directory-page__table">
                    <thead>
                        <tr>
                            <th>"Staff ID"</th>
                            <th>"Name"</th>
                            <th>"Department"</th>
                            <th>"Responsibilities"</th>
                            <th>"Status"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            rows()
                                .into_iter()
                                .map(|h| {
                                    let status = match h.is_active {
                                        Some(true) => "Active",
                                        Some(false) => "Inactive",
                                        None => "",
                                    };
                                    view! {
                                        <tr>
                                            <td>{h.staff_id}</td>
                                            <td>{h.staff_name}</td>
                                            <td>{h.department_name}</td>
                                            <td>{h.additional_responsibilities.unwrap_or_default()}</td>
                                            <td>{status}</td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}
