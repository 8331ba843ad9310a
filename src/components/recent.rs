// src/components/recent.rs
use crate::date::format_date;
use crate::loader::{self, HistoryEntry};
use yew::prelude::*;

/// Recent-updates list on the home page. Shows nothing if the history file
/// cannot be loaded.
#[function_component(RecentUpdates)]
pub fn recent_updates() -> Html {
    let entries = use_state(Vec::<HistoryEntry>::new);

    {
        let entries = entries.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match loader::load_history().await {
                    Ok(loaded) => entries.set(loaded),
                    Err(e) => log::warn!("History list unavailable: {}", e),
                }
            });
            || ()
        });
    }

    if entries.is_empty() {
        return html! {};
    }

    html! {
        <section class="recent-updates">
            <h2>{"Recent updates"}</h2>
            <ul class="history-list">
                { for entries.iter().map(|entry| html! {
                    <li class={classes!("history-item", format!("history-{}", entry.kind))}>
                        <span class="history-type">{ entry.kind.clone() }</span>
                        <a class="history-link" href={entry.link.clone()}>{ entry.name.clone() }</a>
                        if let Some(date) = entry.date.as_deref() {
                            <span class="history-date">{ format_date(date) }</span>
                        }
                    </li>
                }) }
            </ul>
        </section>
    }
}
