// src/components/audio_player.rs
use crate::audio::{format_time, progress_percent, seek_step, track_fraction, AudioHub};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlAudioElement, HtmlElement, KeyboardEvent, PointerEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AudioPlayerProps {
    /// Name under which the player registers for exclusive playback.
    pub id: AttrValue,
    pub src: AttrValue,
    #[prop_or_default]
    pub title: Option<AttrValue>,
    #[prop_or_default]
    pub show_loop_toggle: bool,
    #[prop_or(true)]
    pub looping: bool,
    #[prop_or_default]
    pub class: Classes,
    /// Reports playback starting (`true`) and stopping (`false`).
    #[prop_or_default]
    pub on_playing: Callback<bool>,
}

#[function_component(AudioPlayer)]
pub fn audio_player(props: &AudioPlayerProps) -> Html {
    let hub = use_context::<AudioHub>().unwrap_or_default();
    let audio_ref = use_node_ref();
    let track_ref = use_node_ref();
    let handle_ref = use_node_ref();

    let playing = use_state(|| false);
    let current = use_state(|| 0.0f64);
    let duration = use_state(|| 0.0f64);
    let looping = use_state(|| props.looping);
    // Fraction shown while the handle is being dragged.
    let drag = use_state(|| None::<f64>);

    // ------ REGISTRATION ------
    {
        let hub = hub.clone();
        let audio_ref = audio_ref.clone();
        use_effect_with(props.id.clone(), move |id| {
            let id = id.to_string();
            if let Some(audio) = audio_ref.cast::<HtmlAudioElement>() {
                let mut arbiter = hub.0.borrow_mut();
                arbiter.register(id.clone(), audio);
                log::debug!("Audio player {} registered ({} on page)", id, arbiter.len());
            }
            move || {
                let mut arbiter = hub.0.borrow_mut();
                arbiter.halt(&id);
                arbiter.unregister(&id);
            }
        });
    }

    // ------ NEW SOURCE ------
    {
        let playing = playing.clone();
        let current = current.clone();
        let duration = duration.clone();
        let looping = looping.clone();
        let initial_loop = props.looping;
        use_effect_with(props.src.clone(), move |_| {
            playing.set(false);
            current.set(0.0);
            duration.set(0.0);
            looping.set(initial_loop);
        });
    }

    {
        let audio_ref = audio_ref.clone();
        use_effect_with(*looping, move |looping| {
            if let Some(audio) = audio_ref.cast::<HtmlAudioElement>() {
                audio.set_loop(*looping);
            }
        });
    }

    let toggle_play = {
        let audio_ref = audio_ref.clone();
        let hub = hub.clone();
        let id = props.id.clone();
        let playing = playing.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(audio) = audio_ref.cast::<HtmlAudioElement>() else {
                return;
            };
            if !audio.paused() {
                if let Err(e) = audio.pause() {
                    log::warn!("Failed to pause {}: {:?}", id, e);
                }
                return;
            }
            hub.0.borrow_mut().claim(&id);
            match audio.play() {
                Ok(promise) => {
                    let playing = playing.clone();
                    let id = id.clone();
                    spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            log::warn!("Playback of {} refused: {:?}", id, e);
                            playing.set(false);
                        }
                    });
                }
                Err(e) => {
                    log::warn!("Playback of {} failed: {:?}", id, e);
                    playing.set(false);
                }
            }
        })
    };

    let onplay = {
        let playing = playing.clone();
        let on_playing = props.on_playing.clone();
        Callback::from(move |_: Event| {
            playing.set(true);
            on_playing.emit(true);
        })
    };

    let onpause = {
        let playing = playing.clone();
        let hub = hub.clone();
        let id = props.id.clone();
        let on_playing = props.on_playing.clone();
        Callback::from(move |_: Event| {
            playing.set(false);
            // The arbiter may be mid-claim when another player starts.
            if let Ok(mut arbiter) = hub.0.try_borrow_mut() {
                arbiter.release(&id);
            }
            on_playing.emit(false);
        })
    };

    let ontimeupdate = {
        let audio_ref = audio_ref.clone();
        let current = current.clone();
        let duration = duration.clone();
        Callback::from(move |_: Event| {
            if let Some(audio) = audio_ref.cast::<HtmlAudioElement>() {
                current.set(audio.current_time());
                duration.set(audio.duration());
            }
        })
    };

    let onloadedmetadata = {
        let audio_ref = audio_ref.clone();
        let duration = duration.clone();
        Callback::from(move |_: Event| {
            if let Some(audio) = audio_ref.cast::<HtmlAudioElement>() {
                duration.set(audio.duration());
            }
        })
    };

    let onerror = {
        let playing = playing.clone();
        let current = current.clone();
        let duration = duration.clone();
        let id = props.id.clone();
        Callback::from(move |_: Event| {
            log::warn!("Audio {} could not be played", id);
            playing.set(false);
            current.set(0.0);
            duration.set(0.0);
        })
    };

    // ------ SEEKING ------
    let fraction_at = {
        let track_ref = track_ref.clone();
        move |client_x: i32| -> Option<f64> {
            let track = track_ref.cast::<HtmlElement>()?;
            let rect = track.get_bounding_client_rect();
            Some(track_fraction(client_x as f64, rect.left(), rect.width()))
        }
    };

    let seek_to = {
        let audio_ref = audio_ref.clone();
        let current = current.clone();
        move |fraction: f64| {
            if let Some(audio) = audio_ref.cast::<HtmlAudioElement>() {
                let total = audio.duration();
                if total.is_finite() && total > 0.0 {
                    audio.set_current_time(fraction * total);
                    current.set(fraction * total);
                }
            }
        }
    };

    let on_track_click = {
        let fraction_at = fraction_at.clone();
        let seek_to = seek_to.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(fraction) = fraction_at(e.client_x()) {
                seek_to(fraction);
            }
        })
    };

    let on_handle_down = {
        let drag = drag.clone();
        let handle_ref = handle_ref.clone();
        let current = current.clone();
        let duration = duration.clone();
        Callback::from(move |e: PointerEvent| {
            e.prevent_default();
            e.stop_propagation();
            if let Some(handle) = handle_ref.cast::<HtmlElement>() {
                if let Err(err) = handle.set_pointer_capture(e.pointer_id()) {
                    log::debug!("Pointer capture failed: {:?}", err);
                }
            }
            drag.set(Some(progress_percent(*current, *duration) / 100.0));
        })
    };

    let on_handle_move = {
        let drag = drag.clone();
        let fraction_at = fraction_at.clone();
        Callback::from(move |e: PointerEvent| {
            if drag.is_none() {
                return;
            }
            if let Some(fraction) = fraction_at(e.client_x()) {
                drag.set(Some(fraction));
            }
        })
    };

    let on_handle_up = {
        let drag = drag.clone();
        let handle_ref = handle_ref.clone();
        let fraction_at = fraction_at.clone();
        let seek_to = seek_to.clone();
        Callback::from(move |e: PointerEvent| {
            if drag.is_none() {
                return;
            }
            drag.set(None);
            if let Some(fraction) = fraction_at(e.client_x()) {
                seek_to(fraction);
            }
            if let Some(handle) = handle_ref.cast::<HtmlElement>() {
                if let Err(err) = handle.release_pointer_capture(e.pointer_id()) {
                    log::debug!("Pointer release failed: {:?}", err);
                }
            }
        })
    };

    let on_handle_key = {
        let audio_ref = audio_ref.clone();
        let current = current.clone();
        Callback::from(move |e: KeyboardEvent| {
            let Some(audio) = audio_ref.cast::<HtmlAudioElement>() else {
                return;
            };
            let total = audio.duration();
            if !total.is_finite() || total <= 0.0 {
                return;
            }
            let now = audio.current_time();
            let target = match e.key().as_str() {
                "ArrowLeft" => (now - seek_step(total)).max(0.0),
                "ArrowRight" => (now + seek_step(total)).min(total),
                "Home" => 0.0,
                "End" => total,
                _ => return,
            };
            e.prevent_default();
            audio.set_current_time(target);
            current.set(target);
        })
    };

    let toggle_loop = {
        let looping = looping.clone();
        Callback::from(move |_: MouseEvent| looping.set(!*looping))
    };

    let percent = match *drag {
        Some(fraction) => fraction * 100.0,
        None => progress_percent(*current, *duration),
    };
    let shown_time = match *drag {
        Some(fraction) if duration.is_finite() => fraction * *duration,
        _ => *current,
    };

    html! {
        <div class={classes!("audio-player", props.class.clone())} data-title={props.title.clone()}>
            <audio
                ref={audio_ref}
                src={props.src.clone()}
                preload="metadata"
                {onplay}
                {onpause}
                {ontimeupdate}
                {onloadedmetadata}
                {onerror}
            />
            <div class="audio-controls">
                <button class="play-pause" onclick={toggle_play}>
                    { if *playing { "⏸" } else { "▶" } }
                </button>
                <div class="progress-container" ref={track_ref} onclick={on_track_click}>
                    <div class="progress-bar" style={format!("width: {:.2}%;", percent)}></div>
                    <div
                        class="progress-handle"
                        ref={handle_ref}
                        tabindex="0"
                        role="slider"
                        aria-label="Seek"
                        aria-valuemin="0"
                        aria-valuemax="100"
                        aria-valuenow={format!("{}", percent.round())}
                        style={format!("left: {:.2}%;", percent)}
                        onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}
                        onpointerdown={on_handle_down}
                        onpointermove={on_handle_move}
                        onpointerup={on_handle_up}
                        onkeydown={on_handle_key}
                    ></div>
                </div>
                <span class="time">
                    <span class="current-time">{ format_time(shown_time) }</span>
                    {" / "}
                    <span class="duration">{ format_time(*duration) }</span>
                </span>
                if props.show_loop_toggle {
                    <button
                        class={classes!("loop-btn", looping.then_some("active"))}
                        title="Loop"
                        aria-pressed={looping.to_string()}
                        onclick={toggle_loop}
                    >
                        {"⟳"}
                    </button>
                }
            </div>
        </div>
    }
}

/// Static stand-in with the player's layout, used where a tooltip is
/// measured off-screen.
pub fn audio_placeholder() -> Html {
    html! {
        <div class="audio-player tooltip-audio">
            <div class="audio-controls">
                <button class="play-pause" tabindex="-1">{"▶"}</button>
                <div class="progress-container">
                    <div class="progress-bar"></div>
                    <div class="progress-handle"></div>
                </div>
                <span class="time">{"0:00 / 0:00"}</span>
            </div>
        </div>
    }
}
