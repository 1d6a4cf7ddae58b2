use crate::bridge::HttpPollClient;
use crate::storage::LocalStore;
use leptos::*;
use poll_core::{OptionId, OptionResult, Poll, VoteController, VoteGuard, VotePhase};
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;

type Controller = VoteController<HttpPollClient, HttpPollClient, LocalStore>;

#[derive(Clone, Debug, PartialEq)]
struct SurveyView {
    question: String,
    phase: VotePhase,
    rows: Vec<OptionResult>,
    total: u64,
    error: Option<String>,
}

fn snapshot(c: &Controller) -> SurveyView {
    SurveyView {
        question: c.poll().question().to_string(),
        phase: c.phase(),
        rows: c.results(),
        total: c.total_votes(),
        error: c.error_message(),
    }
}

fn result_row(row: OptionResult) -> View {
    let class = if row.selected { "result selected" } else { "result" };
    view! {
      <li class=class>
        <div class="row">
          <span>{row.text}</span>
          <span class="meta">{format!("{}% ({})", row.percent, row.votes)}</span>
        </div>
        <div class="bar">
          <div class="bar-fill" style=format!("width: {}%", row.percent)></div>
        </div>
      </li>
    }
    .into_view()
}

#[component]
pub fn SurveyModal(
    poll: Poll,
    client: HttpPollClient,
    storage_prefix: String,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let controller = store_value(Rc::new(VoteController::mount(
        poll,
        client.clone(),
        client,
        VoteGuard::new(LocalStore, storage_prefix),
    )));
    let state = create_rw_signal(controller.with_value(|c| snapshot(c)));

    // The controller is held by its own `Rc` inside the task; the modal may
    // be closed before the vote settles.
    let choose = move |option_id: OptionId| {
        let c = controller.get_value();
        spawn_local(async move {
            let vote = c.vote(option_id);
            let _ = state.try_set(snapshot(&c));
            if let Err(e) = vote.await {
                debug!(option_id = %option_id, "vote not applied: {e}");
            }
            let _ = state.try_set(snapshot(&c));
        });
    };

    let rows = move || {
        let SurveyView { phase, rows, .. } = state.get();
        rows.into_iter()
            .map(|row| {
                if let VotePhase::Voted(_) = phase {
                    return result_row(row);
                }
                let id = row.id;
                let submitting = matches!(phase, VotePhase::Submitting(_));
                let class = if row.selected { "choice selected" } else { "choice" };
                let label = if row.selected && submitting {
                    format!("{} …", row.text)
                } else {
                    row.text
                };
                view! {
                  <li>
                    <button class=class prop:disabled=submitting on:click=move |_| choose(id)>
                      {label}
                    </button>
                  </li>
                }
                .into_view()
            })
            .collect_view()
    };

    view! {
      <div class="modal-backdrop">
        <div class="modal">
          <div class="row">
            <h2>{move || state.with(|s| s.question.clone())}</h2>
            <button on:click=move |_| on_close.call(())>"Close"</button>
          </div>
          <ul class="poll-options">{rows}</ul>
          <Show
            when=move || state.with(|s| matches!(s.phase, VotePhase::Voted(_)))
            fallback=|| ()
          >
            <div class="meta">{move || format!("{} votes", state.with(|s| s.total))}</div>
          </Show>
          <Show
            when=move || state.with(|s| s.error.is_some())
            fallback=|| ()
          >
            <pre class="error">{move || state.with(|s| s.error.clone().unwrap_or_default())}</pre>
          </Show>
        </div>
      </div>
    }
}
