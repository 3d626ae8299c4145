//! Notice board rendered on every dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Loads notices once on mount, filters them for the viewer's role, and
//! shows the editor plus edit/delete actions to notice editors only.

use campus::records::{AudienceFilter, NOTICE_EDITORS, Notice};
use campus::types::RecordId;
use leptos::prelude::*;

use crate::state::auth::Auth;
use crate::state::notices::{NoticeBoardState, NoticeForm, audience_filter_value, shows_audience_selector};

#[component]
pub fn NoticeBoard() -> impl IntoView {
    let auth = expect_context::<Auth>();
    let board = RwSignal::new(NoticeBoardState { loading: true, ..NoticeBoardState::default() });
    let form = RwSignal::new(NoticeForm::default());
    let message = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let viewer = move || auth.session().role();
    let can_edit = move || viewer().is_some_and(|role| NOTICE_EDITORS.contains(role));

    let reload = move || {
        board.update(|b| b.loading = true);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth.with_api(|s| async move { s.api().notices().await }).await;
            board.update(|b| b.apply_load(result));
        });
    };
    reload();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let current = form.get_untracked();
        let draft = match current.to_draft() {
            Ok(draft) => draft,
            Err(msg) => {
                message.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);
        message.set(None);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = auth
                .with_api(|s| async move {
                    match current.editing {
                        Some(id) => s.api().update_notice(&id, &draft).await,
                        None => s.api().create_notice(&draft).await,
                    }
                })
                .await;
            match result {
                Ok(_) => {
                    form.set(NoticeForm::default());
                    message.set(Some("Notice saved.".to_owned()));
                    reload();
                }
                Err(e) => message.set(Some(e.to_string())),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "csr"))]
        let _ = draft;
    };

    let on_delete = move |id: RecordId| {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let target = id.clone();
            let result = auth.with_api(|s| async move { s.api().delete_notice(&target).await }).await;
            match result {
                Ok(_) => board.update(|b| b.remove(&id)),
                Err(e) => message.set(Some(e.to_string())),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = id;
    };

    let on_edit = move |notice: &Notice| {
        form.set(NoticeForm::from_notice(notice));
        message.set(None);
    };

    let category_options = move || {
        board
            .with(NoticeBoardState::categories)
            .into_iter()
            .map(|c| { let value = c.clone(); view! { <option value=value>{c}</option> } })
            .collect::<Vec<_>>()
    };

    let notice_items = move || {
        let editable = can_edit();
        board
            .with(|b| b.visible(viewer()))
            .into_iter()
            .map(|notice| {
                let edit_target = notice.clone();
                let delete_id = notice.id.clone();
                view! {
                    <li class="notice">
                        <div class="notice__meta">
                            <span class="notice__category">{notice.category.clone().unwrap_or_default()}</span>
                            <span class="notice__audience">
                                {notice.audience.as_ref().map(|a| a.as_str().to_owned()).unwrap_or_default()}
                            </span>
                            <time class="notice__time">{notice.timestamp().unwrap_or_default().to_owned()}</time>
                        </div>
                        <h3 class="notice__title">{notice.title.clone()}</h3>
                        <p class="notice__content">{notice.content.clone()}</p>
                        <Show when=move || editable>
                            <div class="notice__actions">
                                <button class="btn" on:click={
                                    let edit_target = edit_target.clone();
                                    move |_| on_edit(&edit_target)
                                }>"Edit"</button>
                                <button class="btn btn--danger" on:click={
                                    let delete_id = delete_id.clone();
                                    move |_| on_delete(delete_id.clone())
                                }>"Delete"</button>
                            </div>
                        </Show>
                    </li>
                }
            })
            .collect::<Vec<_>>()
    };

    view! {
        <section class="notice-board">
            <header class="notice-board__header">
                <h2>"Notices"</h2>
                <select
                    class="notice-board__category"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        board.update(|b| b.filter = std::mem::take(&mut b.filter).with_category(&value));
                    }
                >
                    <option value="all">"All categories"</option>
                    {category_options}
                </select>
                <Show when=move || shows_audience_selector(viewer())>
                    <select
                        class="notice-board__audience"
                        prop:value=move || board.with(|b| audience_filter_value(b.filter.audience))
                        on:change=move |ev| {
                            let audience = AudienceFilter::parse(&event_target_value(&ev));
                            board.update(|b| b.filter.audience = audience);
                        }
                    >
                        <option value="all">"Everyone"</option>
                        <option value="staff">"Staff only"</option>
                    </select>
                </Show>
            </header>

            <Show when=can_edit>
                <form class="notice-editor" on:submit=on_submit>
                    <input
                        class="notice-editor__title"
                        type="text"
                        placeholder="Title"
                        prop:value=move || form.with(|f| f.title.clone())
                        on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                    />
                    <textarea
                        class="notice-editor__content"
                        placeholder="Content"
                        prop:value=move || form.with(|f| f.content.clone())
                        on:input=move |ev| form.update(|f| f.content = event_target_value(&ev))
                    ></textarea>
                    <input
                        class="notice-editor__category"
                        type="text"
                        placeholder="Category"
                        prop:value=move || form.with(|f| f.category.clone())
                        on:input=move |ev| form.update(|f| f.category = event_target_value(&ev))
                    />
                    <select
                        class="notice-editor__audience"
                        prop:value=move || form.with(|f| f.audience.clone())
                        on:change=move |ev| form.update(|f| f.audience = event_target_value(&ev))
                    >
                        <option value="all">"Everyone"</option>
                        <option value="staff">"Staff"</option>
                    </select>
                    <button class="btn" type="submit" disabled=move || busy.get()>
                        {move || if form.with(|f| f.editing.is_some()) { "Update Notice" } else { "Post Notice" }}
                    </button>
                    <Show when=move || form.with(|f| f.editing.is_some())>
                        <button class="btn" type="button" on:click=move |_| form.set(NoticeForm::default())>
                            "Cancel"
                        </button>
                    </Show>
                </form>
            </Show>

            <Show when=move || message.with(Option::is_some)>
                <p class="notice-board__message">{move || message.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || board.with(|b| b.error.is_some())>
                <p class="notice-board__error">{move || board.with(|b| b.error.clone()).unwrap_or_default()}</p>
            </Show>

            <Show when=move || !board.with(|b| b.loading) fallback=|| view! { <p>"Loading notices..."</p> }>
                <ul class="notice-board__list">{notice_items}</ul>
            </Show>
        </section>
    }
}
