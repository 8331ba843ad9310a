// src/components/lightbox.rs
use crate::geometry::{Point, Rect, Size};
use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, TouchEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LightboxOverlayProps {
    pub open: bool,
    pub src: Option<AttrValue>,
    pub alt: AttrValue,
    pub caption: Option<AttrValue>,
    pub frame: Option<Rect>,
    pub nav_visible: bool,
    /// Zoom transition in progress.
    pub fading: bool,
    pub on_close: Callback<()>,
    pub on_navigate: Callback<i32>,
    pub on_zoom: Callback<Point>,
    pub on_loaded: Callback<Size>,
    pub on_swipe_start: Callback<Point>,
    pub on_swipe_end: Callback<Point>,
}

fn touch_point(e: &TouchEvent, ended: bool) -> Option<Point> {
    let list = if ended { e.changed_touches() } else { e.touches() };
    let touch = list.get(0)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

#[function_component(LightboxOverlay)]
pub fn lightbox_overlay(props: &LightboxOverlayProps) -> Html {
    let onclick = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_image_click = {
        let on_zoom = props.on_zoom.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_zoom.emit(Point::new(e.client_x() as f64, e.client_y() as f64));
        })
    };

    let onload = {
        let on_loaded = props.on_loaded.clone();
        Callback::from(move |e: Event| {
            if let Some(img) = e.target().and_then(|t| t.dyn_into::<HtmlImageElement>().ok()) {
                on_loaded.emit(Size::new(img.natural_width() as f64, img.natural_height() as f64));
            }
        })
    };

    let nav = |direction: i32| {
        let on_navigate = props.on_navigate.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_navigate.emit(direction);
        })
    };

    let ontouchstart = {
        let on_swipe_start = props.on_swipe_start.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(point) = touch_point(&e, false) {
                on_swipe_start.emit(point);
            }
        })
    };

    let ontouchend = {
        let on_swipe_end = props.on_swipe_end.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(point) = touch_point(&e, true) {
                on_swipe_end.emit(point);
            }
        })
    };

    let image_style = match props.frame {
        Some(frame) => format!(
            "position: absolute; left: {:.1}px; top: {:.1}px; width: {:.1}px; height: {:.1}px; opacity: {};",
            frame.left,
            frame.top,
            frame.width,
            frame.height,
            if props.fading { 0 } else { 1 }
        ),
        None => "position: absolute; visibility: hidden;".to_string(),
    };
    let nav_style = if props.nav_visible { "" } else { "display: none;" };

    html! {
        <div
            id="lightbox"
            class={classes!("lightbox", props.open.then_some("open"))}
            style={if props.open { "display: block;" } else { "display: none;" }}
            {onclick}
            {ontouchstart}
            {ontouchend}
        >
            <button class="lightbox-nav lightbox-prev" style={nav_style} aria-label="Previous image" onclick={nav(-1)}>
                {"‹"}
            </button>
            if let Some(src) = props.src.clone() {
                <img
                    id="lightbox-img"
                    src={src}
                    alt={props.alt.clone()}
                    style={image_style}
                    onclick={on_image_click}
                    {onload}
                />
            }
            <button class="lightbox-nav lightbox-next" style={nav_style} aria-label="Next image" onclick={nav(1)}>
                {"›"}
            </button>
            if let Some(caption) = props.caption.clone() {
                <div id="lightbox-caption" class="lightbox-caption">{ caption }</div>
            }
        </div>
    }
}
