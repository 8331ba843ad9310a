// src/components/back_to_top.rs
use crate::site_config::UiConfig;
use crate::utils;
use gloo_events::EventListener;
use yew::prelude::*;

#[function_component(BackToTop)]
pub fn back_to_top() -> Html {
    let visible = use_state(|| false);

    {
        let visible = visible.clone();
        use_effect_with((), move |_| {
            let threshold = UiConfig::default().back_to_top_threshold;
            let listener = EventListener::new(&gloo_utils::window(), "scroll", move |_| {
                visible.set(utils::scroll_offset().y > threshold);
            });
            move || drop(listener)
        });
    }

    let onclick = Callback::from(|_: MouseEvent| utils::smooth_scroll_to_top());

    html! {
        <button
            id="backToTop"
            class="back-to-top"
            aria-label="Back to top"
            style={if *visible { "display: block;" } else { "display: none;" }}
            {onclick}
        >
            {"↑"}
        </button>
    }
}
