use crate::bridge::HttpPollClient;
use crate::editor::PollEditorModal;
use crate::survey::SurveyModal;
use leptos::*;
use poll_core::error::RETRY_MESSAGE;
use poll_core::{ClientConfig, Poll, PollChange, ProfileApi};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

fn build_var(key: &str) -> Option<String> {
    match key {
        "POLL_API_BASE" => option_env!("POLL_API_BASE"),
        "POLL_PROFILE_ID" => option_env!("POLL_PROFILE_ID"),
        "POLL_STORAGE_PREFIX" => option_env!("POLL_STORAGE_PREFIX"),
        _ => None,
    }
    .map(ToString::to_string)
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_vars(build_var);
    let client = store_value(HttpPollClient::new(&config));
    let storage_prefix = store_value(config.storage_prefix);

    let poll = create_rw_signal(None::<Poll>);
    let loaded = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);
    let survey_open = create_rw_signal(false);
    let editor_open = create_rw_signal(false);

    let load_poll = move || {
        let client = client.get_value();
        spawn_local(async move {
            match client.fetch_poll().await {
                Ok(current) => {
                    poll.set(current);
                    error.set(None);
                }
                Err(e) => {
                    warn!("profile fetch failed: {e}");
                    error.set(Some(RETRY_MESSAGE.to_string()));
                }
            }
            loaded.set(true);
        });
    };

    load_poll();

    let on_change = move |change: PollChange| {
        match change {
            PollChange::Saved(saved) => poll.set(Some(saved)),
            PollChange::Deleted => poll.set(None),
        }
        editor_open.set(false);
    };

    let summary = move || match poll.get() {
        Some(p) => view! {
          <div>
            <h3>{p.question().to_string()}</h3>
            <div class="meta">
              {format!("{} options, {} votes", p.options().len(), p.total_votes())}
            </div>
            <div class="row">
              <button on:click=move |_| survey_open.set(true)>"Vote"</button>
              <button on:click=move |_| editor_open.set(true)>"Edit poll"</button>
            </div>
          </div>
        }
        .into_view(),
        None => view! {
          <div>
            <p class="meta">{move || if loaded.get() { "No poll yet." } else { "Loading…" }}</p>
            <button on:click=move |_| editor_open.set(true)>"Create poll"</button>
          </div>
        }
        .into_view(),
    };

    let survey = move || {
        if !survey_open.get() {
            return None;
        }
        let current = poll.get_untracked()?;
        Some(view! {
          <SurveyModal
            poll=current
            client=client.get_value()
            storage_prefix=storage_prefix.get_value()
            on_close=move |_| {
                survey_open.set(false);
                load_poll();
            }
          />
        })
    };

    let editor = move || {
        if !editor_open.get() {
            return None;
        }
        Some(view! {
          <PollEditorModal
            existing=poll.get_untracked()
            client=client.get_value()
            on_change=Rc::new(on_change)
            on_close=move |_| editor_open.set(false)
          />
        })
    };

    view! {
      <div class="layout">
        <section class="panel">
          <h2>"Poll"</h2>
          <button on:click=move |_| load_poll()>"Refresh"</button>
          {summary}
          <Show
            when=move || error.get().is_some()
            fallback=|| ()
          >
            <pre class="error">{move || error.get().unwrap_or_default()}</pre>
          </Show>
        </section>
        {survey}
        {editor}
      </div>
    }
}
