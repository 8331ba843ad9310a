// src/components/tooltip.rs
//
// Markup for the three places tooltip content appears: the live tooltip,
// its off-screen sizer, and the fullscreen image view.

use super::audio_player::{audio_placeholder, AudioPlayer};
use crate::geometry::TooltipPlacement;
use crate::tooltip::{ActiveTooltip, MediaKind, TooltipDescriptor};
use crate::utils::cache_busted;
use yew::prelude::*;

fn text_block(descriptor: &TooltipDescriptor) -> Html {
    match descriptor.text_html() {
        Some(text) => html! {
            <div class="tooltip-text">{ Html::from_html_unchecked(AttrValue::from(text)) }</div>
        },
        None => html! {},
    }
}

fn placement_style(placement: Option<TooltipPlacement>) -> String {
    match placement {
        Some(p) => {
            let width = p
                .width
                .map(|w| format!(" width: {:.1}px; max-width: none;", w))
                .unwrap_or_default();
            format!("position: absolute; left: {:.1}px; top: {:.1}px;{}", p.left, p.top, width)
        }
        None => "position: absolute; left: 0; top: 0; visibility: hidden;".to_string(),
    }
}

#[derive(Properties, PartialEq)]
pub struct TooltipViewProps {
    pub tooltip: ActiveTooltip,
    /// False once the tooltip is fading out.
    pub live: bool,
    pub on_enter: Callback<()>,
    pub on_leave: Callback<()>,
    pub on_open_fullscreen: Callback<TooltipDescriptor>,
    pub on_audio: Callback<bool>,
}

#[function_component(TooltipView)]
pub fn tooltip_view(props: &TooltipViewProps) -> Html {
    let tip = &props.tooltip;
    let descriptor = &tip.descriptor;

    let media = match (descriptor.media.as_deref(), descriptor.media_kind()) {
        (Some(src), Some(MediaKind::Audio)) => html! {
            <AudioPlayer
                id={AttrValue::from(tip.audio_id().unwrap_or_default())}
                src={AttrValue::from(src.to_string())}
                looping={true}
                class={classes!("tooltip-audio")}
                on_playing={props.on_audio.clone()}
            />
        },
        (Some(src), Some(MediaKind::Image)) => {
            let on_open = props.on_open_fullscreen.clone();
            let full = descriptor.clone();
            html! {
                <img
                    class="tooltip-image zoomable"
                    src={cache_busted(src)}
                    alt={descriptor.display_alt()}
                    onclick={Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        on_open.emit(full.clone());
                    })}
                />
            }
        }
        (Some(src), _) => html! {
            <img class="tooltip-image" src={src.to_string()} alt={descriptor.display_alt()} />
        },
        (None, _) => html! {},
    };

    let onmouseenter = {
        let on_enter = props.on_enter.clone();
        Callback::from(move |_: MouseEvent| on_enter.emit(()))
    };
    let onmouseleave = {
        let on_leave = props.on_leave.clone();
        Callback::from(move |_: MouseEvent| on_leave.emit(()))
    };

    let below = tip.placement.map_or(false, |p| p.below);
    let class = classes!(
        "tooltip",
        below.then_some("bottom"),
        (props.live && tip.revealed).then_some("show"),
        (!props.live).then_some("leaving"),
    );

    html! {
        <div
            {class}
            data-tooltip-id={tip.id.to_string()}
            style={placement_style(tip.placement)}
            {onmouseenter}
            {onmouseleave}
        >
            { text_block(descriptor) }
            { media }
        </div>
    }
}

/// Off-screen copy of a tooltip used to measure it before first use.
pub fn sizer_view(id: u64, descriptor: &TooltipDescriptor, on_media_done: Callback<u64>) -> Html {
    let media = match (descriptor.media.as_deref(), descriptor.media_kind()) {
        (Some(_), Some(MediaKind::Audio)) => audio_placeholder(),
        (Some(src), _) => {
            let done = on_media_done.clone();
            let failed = on_media_done;
            html! {
                <img
                    class="tooltip-image"
                    src={src.to_string()}
                    onload={Callback::from(move |_: Event| done.emit(id))}
                    onerror={Callback::from(move |_: Event| failed.emit(id))}
                />
            }
        }
        (None, _) => html! {},
    };
    html! {
        <div
            class="tooltip sizer"
            data-sizer={id.to_string()}
            style="position: absolute; left: -9999px; top: -9999px; visibility: hidden; pointer-events: none;"
            aria-hidden="true"
        >
            { text_block(descriptor) }
            { media }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FullscreenViewProps {
    pub descriptor: TooltipDescriptor,
    pub on_close: Callback<()>,
}

/// Large view of a tooltip image. Clicking the backdrop closes it; clicks
/// on the content do not.
#[function_component(FullscreenView)]
pub fn fullscreen_view(props: &FullscreenViewProps) -> Html {
    let descriptor = &props.descriptor;
    let onclick = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="tooltip-fullscreen" {onclick}>
            <div class="tooltip-fullscreen-content" onclick={keep_open}>
                { text_block(descriptor) }
                if let Some(src) = descriptor.media.clone() {
                    <img class="tooltip-fullscreen-image" src={src} alt={descriptor.display_alt()} />
                }
            </div>
        </div>
    }
}
