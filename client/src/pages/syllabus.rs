//! Syllabus pages: faculty management view and the student's department view.

use campus::records::{SYLLABUS_EDITORS, Subject};
use campus::types::RecordId;
use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::topbar::Topbar;
use crate::state::auth::Auth;
use crate::state::syllabus::{DEPARTMENTS, SEMESTERS, SubjectForm, SyllabusState, validate_pdf_url};

#[cfg_attr(not(feature = "csr"), allow(dead_code))]
fn apply_subjects(state: RwSignal<SyllabusState>, result: Result<Vec<Subject>, campus::ApiError>) {
    state.update(|s| {
        s.loading = false;
        match result {
            Ok(items) => {
                s.items = items;
                s.error = None;
            }
            Err(e) => s.error = Some(e.to_string()),
        }
    });
}

fn subject_link(subject: &Subject) -> AnyView {
    match subject.pdf_url.clone() {
        Some(url) => view! { <a class="syllabus__pdf" href=url target="_blank" rel="noopener">"View PDF"</a> }.into_any(),
        None => view! { <span class="syllabus__pdf syllabus__pdf--missing">"No syllabus"</span> }.into_any(),
    }
}

/// `/syllabus` for admin and staff.
#[component]
pub fn SyllabusPage() -> impl IntoView {
    let auth = expect_context::<Auth>();
    let state = RwSignal::new(SyllabusState { loading: true, ..SyllabusState::default() });
    let subject_form = RwSignal::new(SubjectForm::default());
    let message = RwSignal::new(None::<String>);
    let can_edit = move || auth.session().role().is_some_and(|r| SYLLABUS_EDITORS.contains(r));

    let reload = move || {
        state.update(|s| s.loading = true);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth.with_api(|s| async move { s.api().subjects().await }).await;
            apply_subjects(state, result);
        });
    };
    reload();

    let on_add_subject = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let draft = match subject_form.with_untracked(SubjectForm::to_draft) {
            Ok(draft) => draft,
            Err(msg) => {
                message.set(Some(msg.to_owned()));
                return;
            }
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match auth.with_api(|s| async move { s.api().create_subject(&draft).await }).await {
                Ok(_) => {
                    subject_form.set(SubjectForm::default());
                    message.set(Some("Subject added.".to_owned()));
                    reload();
                }
                Err(e) => message.set(Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = draft;
    };

    let on_save_pdf = move |subject_id: RecordId, raw_url: String| {
        let url = match validate_pdf_url(&raw_url) {
            Ok(url) => url,
            Err(msg) => {
                message.set(Some(msg.to_owned()));
                return;
            }
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match auth.with_api(|s| async move { s.api().save_syllabus(&subject_id, &url).await }).await {
                Ok(_) => {
                    message.set(Some("Syllabus saved.".to_owned()));
                    reload();
                }
                Err(e) => message.set(Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = (subject_id, url);
    };

    let on_remove_pdf = move |subject_id: RecordId| {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match auth.with_api(|s| async move { s.api().delete_syllabus(&subject_id).await }).await {
                Ok(_) => reload(),
                Err(e) => message.set(Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = subject_id;
    };

    let department_options = move || {
        state
            .with(SyllabusState::departments)
            .into_iter()
            .map(|d| { let value = d.clone(); view! { <option value=value>{d}</option> } })
            .collect::<Vec<_>>()
    };
    let semester_options =
        || SEMESTERS.map(|n| view! { <option value=n.to_string()>{format!("Semester {n}")}</option> }).collect::<Vec<_>>();

    let rows = move || {
        let editable = can_edit();
        state
            .with(SyllabusState::visible)
            .into_iter()
            .map(|subject| {
                let link = subject_link(&subject);
                let pdf_input = RwSignal::new(subject.pdf_url.clone().unwrap_or_default());
                let save_id = subject.id.clone();
                let remove_id = subject.id.clone();
                let has_pdf = subject.pdf_url.is_some();
                view! {
                    <tr>
                        <td>{subject.code.clone()}</td>
                        <td>{subject.name.clone()}</td>
                        <td>{subject.department.clone()}</td>
                        <td>{subject.semester.clone()}</td>
                        <td>{link}</td>
                        <Show when=move || editable>
                            <td class="syllabus__actions">
                                <input
                                    type="url"
                                    placeholder="https://.../syllabus.pdf"
                                    prop:value=move || pdf_input.get()
                                    on:input=move |ev| pdf_input.set(event_target_value(&ev))
                                />
                                <button class="btn" on:click={
                                    let save_id = save_id.clone();
                                    move |_| on_save_pdf(save_id.clone(), pdf_input.get_untracked())
                                }>"Save PDF"</button>
                                <Show when=move || has_pdf clone:remove_id>
                                    <button class="btn btn--danger" on:click={
                                        let remove_id = remove_id.clone();
                                        move |_| on_remove_pdf(remove_id.clone())
                                    }>"Remove"</button>
                                </Show>
                            </td>
                        </Show>
                    </tr>
                }
            })
            .collect::<Vec<_>>()
    };

    let set_filter_department = move |raw: String| {
        state.update(|s| s.filter.department = (raw != "all").then_some(raw));
    };
    let set_filter_semester = move |raw: String| {
        state.update(|s| s.filter.semester = (raw != "all").then_some(raw));
    };

    view! {
        <Title text="Syllabus" />
        <div class="syllabus-page">
            <Topbar title="Syllabus" />
            <div class="syllabus-page__filters">
                <input
                    type="search"
                    placeholder="Search subjects"
                    on:input=move |ev| state.update(|s| s.filter.search = event_target_value(&ev))
                />
                <select on:change=move |ev| set_filter_department(event_target_value(&ev))>
                    <option value="all">"All departments"</option>
                    {department_options}
                </select>
                <select on:change=move |ev| set_filter_semester(event_target_value(&ev))>
                    <option value="all">"All semesters"</option>
                    {semester_options}
                </select>
            </div>

            <Show when=can_edit>
                <form class="syllabus-page__add" on:submit=on_add_subject>
                    <input
                        type="text"
                        placeholder="Subject name"
                        prop:value=move || subject_form.with(|f| f.name.clone())
                        on:input=move |ev| subject_form.update(|f| f.name = event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Code"
                        prop:value=move || subject_form.with(|f| f.code.clone())
                        on:input=move |ev| subject_form.update(|f| f.code = event_target_value(&ev))
                    />
                    <select on:change=move |ev| subject_form.update(|f| f.department = event_target_value(&ev))>
                        <option value="">"Department"</option>
                        {DEPARTMENTS.into_iter().map(|d| view! { <option value=d>{d}</option> }).collect::<Vec<_>>()}
                    </select>
                    <select on:change=move |ev| subject_form.update(|f| f.semester = event_target_value(&ev))>
                        <option value="">"Semester"</option>
                        {semester_options}
                    </select>
                    <button class="btn" type="submit">"Add Subject"</button>
                </form>
            </Show>

            <Show when=move || message.with(Option::is_some)>
                <p class="syllabus-page__message">{move || message.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="syllabus-page__error">{move || state.with(|s| s.error.clone()).unwrap_or_default()}</p>
            </Show>
            <Show when=move || !state.with(|s| s.loading) fallback=|| view! { <p>"Loading subjects..."</p> }>
                <table class="syllabus-page__table">
                    <thead>
                        <tr>
                            <th>"Code"</th>
                            <th>"Subject"</th>
                            <th>"Department"</th>
                            <th>"Semester"</th>
                            <th>"Syllabus"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </Show>
        </div>
    }
}

/// `/student/syllabus`: subjects for the signed-in student's department.
#[component]
pub fn StudentSyllabusPage() -> impl IntoView {
    let auth = expect_context::<Auth>();
    let state = RwSignal::new(SyllabusState { loading: true, ..SyllabusState::default() });
    let department = move || auth.session().user.and_then(|u| u.student_department().map(str::to_owned));

    Effect::new(move || {
        let Some(dept) = department() else {
            state.update(|s| {
                s.loading = false;
                s.error = Some("No department on your student profile.".to_owned());
            });
            return;
        };
        state.update(|s| s.loading = true);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth.with_api(|s| async move { s.api().department_subjects(&dept).await }).await;
            apply_subjects(state, result);
        });
        #[cfg(not(feature = "csr"))]
        let _ = dept;
    });

    let semester_options =
        || SEMESTERS.map(|n| view! { <option value=n.to_string()>{format!("Semester {n}")}</option> }).collect::<Vec<_>>();

    view! {
        <Title text="My Syllabus" />
        <div class="syllabus-page">
            <Topbar title="My Syllabus" />
            <div class="syllabus-page__filters">
                <span class="syllabus-page__department">{move || department().unwrap_or_default()}</span>
                <select on:change=move |ev| {
                    let raw = event_target_value(&ev);
                    state.update(|s| s.filter.semester = (raw != "all").then_some(raw));
                }>
                    <option value="all">"All semesters"</option>
                    {semester_options}
                </select>
            </div>
            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="syllabus-page__error">{move || state.with(|s| s.error.clone()).unwrap_or_default()}</p>
            </Show>
            <Show when=move || !state.with(|s| s.loading) fallback=|| view! { <p>"Loading subjects..."</p> }>
                <ul class="syllabus-page__list">
                    {move || {
                        state
                            .with(SyllabusState::visible)
                            .into_iter()
                            .map(|subject| {
                                let link = subject_link(&subject);
                                view! {
                                    <li class="syllabus">
                                        <span class="syllabus__code">{subject.code.clone()}</span>
                                        <span class="syllabus__name">{subject.name.clone()}</span>
                                        <span class="syllabus__semester">{format!("Semester {}", subject.semester)}</span>
                                        {link}
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </Show>
        </div>
    }
}
