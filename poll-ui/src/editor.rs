use crate::bridge::HttpPollClient;
use leptos::*;
use poll_core::authoring::MIN_OPTIONS;
use poll_core::{OptionId, Poll, PollApi, PollChange, PollDraft, PollEditor};
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;

/// Receives the saved or deleted poll. A plain `Rc` rather than a
/// `Callback`, so it outlives the modal that fired it.
pub type OnChange = Rc<dyn Fn(PollChange)>;

#[derive(Clone, Debug, PartialEq)]
struct FormView {
    draft: PollDraft,
    can_submit: bool,
    error: Option<String>,
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Save,
    Delete,
}

fn snapshot<A: PollApi>(e: &PollEditor<A>) -> FormView {
    FormView {
        draft: e.draft(),
        can_submit: e.can_submit(),
        error: e.error_message(),
    }
}

/// Drives a save or delete to the end. Only owned handles are used once the
/// call is in flight: `notify` usually closes the modal, which disposes its
/// signals and stored values.
async fn settle<A: PollApi>(
    editor: Rc<PollEditor<A>>,
    action: Action,
    notify: OnChange,
) -> FormView {
    let result = match action {
        Action::Save => editor.submit().await,
        Action::Delete => editor.delete().await,
    };
    match result {
        Ok(change) => notify(change),
        Err(e) => debug!(?action, "poll change not applied: {e}"),
    }
    snapshot(&editor)
}

#[component]
pub fn PollEditorModal(
    existing: Option<Poll>,
    client: HttpPollClient,
    on_change: OnChange,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let has_poll = existing.is_some();
    let draft = existing
        .as_ref()
        .map(PollDraft::from_poll)
        .unwrap_or_default();
    let editor = store_value(Rc::new(PollEditor::new(client, draft)));
    let on_change = store_value(on_change);
    let form = create_rw_signal(editor.with_value(|e| snapshot(e)));
    let saving = create_rw_signal(false);

    let sync = move || form.set(editor.with_value(|e| snapshot(e)));

    let set_question = move |text: String| {
        editor.with_value(|e| e.edit(|d| d.set_question(text)));
        sync();
    };
    let set_option = move |id: OptionId, text: String| {
        editor.with_value(|e| e.edit(|d| d.set_option_text(id, text)));
        sync();
    };
    let add_option = move || {
        editor.with_value(|e| e.edit(PollDraft::add_option));
        sync();
    };
    let remove_option = move |id: OptionId| {
        editor.with_value(|e| e.edit(|d| d.remove_option(id)));
        sync();
    };

    let run = move |action: Action| {
        let e = editor.get_value();
        let notify = on_change.get_value();
        saving.set(true);
        spawn_local(async move {
            let view = settle(e, action, notify).await;
            let _ = saving.try_set(false);
            let _ = form.try_set(view);
        });
    };

    let option_ids = move || {
        form.with(|f| f.draft.options().iter().map(|o| o.id).collect::<Vec<_>>())
    };
    let option_text = move |id: OptionId| {
        form.with(|f| {
            f.draft
                .options()
                .iter()
                .find(|o| o.id == id)
                .map(|o| o.text.clone())
                .unwrap_or_default()
        })
    };
    let at_minimum = move || form.with(|f| f.draft.options().len() <= MIN_OPTIONS);

    view! {
      <div class="modal-backdrop">
        <div class="modal">
          <div class="row">
            <h2>{if has_poll { "Edit poll" } else { "Create poll" }}</h2>
            <button on:click=move |_| on_close.call(())>"Close"</button>
          </div>
          <div class="stack">
            <input
              prop:value=move || form.with(|f| f.draft.question().to_string())
              on:input=move |ev| set_question(event_target_value(&ev))
              placeholder="Question"
            />
            <For
              each=option_ids
              key=|id| *id
              children=move |id| view! {
                <div class="row">
                  <input
                    prop:value=move || option_text(id)
                    on:input=move |ev| set_option(id, event_target_value(&ev))
                    placeholder=format!("Option {id}")
                  />
                  <button
                    prop:disabled=at_minimum
                    on:click=move |_| remove_option(id)
                  >"Remove"</button>
                </div>
              }
            />
            <div class="row">
              <button on:click=move |_| add_option()>"Add option"</button>
              <button
                prop:disabled=move || saving.get() || !form.with(|f| f.can_submit)
                on:click=move |_| run(Action::Save)
              >"Save"</button>
              <Show when=move || has_poll fallback=|| ()>
                <button prop:disabled=move || saving.get() on:click=move |_| run(Action::Delete)>
                  "Delete poll"
                </button>
              </Show>
            </div>
          </div>
          <Show
            when=move || form.with(|f| f.error.is_some())
            fallback=|| ()
          >
            <pre class="error">{move || form.with(|f| f.error.clone().unwrap_or_default())}</pre>
          </Show>
        </div>
      </div>
    }
}
