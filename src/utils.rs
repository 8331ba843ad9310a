// src/utils.rs
use crate::geometry::{Point, Rect, Size};
use crate::route::{anchor_scroll_top, base_path, parse_selection, NavState};
use crate::site_config::Section;
use gloo_utils::format::JsValueSerdeExt;
use wasm_bindgen::JsValue;
use web_sys::{window, Element, ScrollBehavior, ScrollToOptions, UrlSearchParams};

/// Directory of the current page, so the site works from a sub-path.
pub fn get_base_url() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .map(|pathname| base_path(&pathname).to_string())
        .unwrap_or_else(|| "/".to_string())
}

fn join_base(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Build a resource URL with the correct base path
pub fn resource_url(path: &str) -> String {
    join_base(&get_base_url(), path)
}

pub fn current_pathname() -> String {
    gloo_utils::window().location().pathname().unwrap_or_default()
}

pub fn current_search() -> String {
    gloo_utils::window().location().search().unwrap_or_default()
}

pub fn current_hash() -> String {
    gloo_utils::window().location().hash().unwrap_or_default()
}

/// Folder number for `section` in a query string such as `?poem=3`,
/// decoded the way the browser decodes it.
pub fn selection_from_search(search: &str, section: Section) -> Option<u32> {
    let params = UrlSearchParams::new_with_str(search).ok()?;
    params
        .get(section.query_key())
        .as_deref()
        .and_then(parse_selection)
}

/// Folder number in the URL for `section`.
pub fn url_selection(section: Section) -> Option<u32> {
    selection_from_search(&current_search(), section)
}

pub fn viewport() -> Size {
    let w = gloo_utils::window();
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(width, height)
}

pub fn scroll_offset() -> Point {
    let w = gloo_utils::window();
    Point::new(w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0))
}

pub fn client_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

/// First line box of an inline element; wrapped triggers report one rect
/// per line.
pub fn first_line_rect(element: &Element) -> Rect {
    let rects = element.get_client_rects();
    match rects.get(0) {
        Some(r) => Rect::new(r.left(), r.top(), r.width(), r.height()),
        None => client_rect(element),
    }
}

pub fn toggle_body_class(class: &str, on: bool) {
    if let Err(e) = gloo_utils::body().class_list().toggle_with_force(class, on) {
        log::warn!("Could not toggle body class {}: {:?}", class, e);
    }
}

pub fn toggle_root_class(class: &str, on: bool) {
    if let Err(e) = gloo_utils::document_element()
        .class_list()
        .toggle_with_force(class, on)
    {
        log::warn!("Could not toggle root class {}: {:?}", class, e);
    }
}

/// Lock or release page scrolling under an overlay.
pub fn set_scroll_locked(locked: bool) {
    let value = if locked { "hidden" } else { "" };
    if let Err(e) = gloo_utils::body().style().set_property("overflow", value) {
        log::warn!("Could not set body overflow: {:?}", e);
    }
}

pub fn push_history(state: &NavState, url: &str) {
    let Ok(history) = gloo_utils::window().history() else {
        return;
    };
    let state = JsValue::from_serde(state).unwrap_or(JsValue::NULL);
    if let Err(e) = history.push_state_with_url(&state, "", Some(url)) {
        log::warn!("pushState failed for {}: {:?}", url, e);
    }
}

pub fn nav_state(state: &JsValue) -> Option<NavState> {
    if state.is_null() || state.is_undefined() {
        return None;
    }
    state.into_serde().ok()
}

fn banner_height() -> f64 {
    gloo_utils::document()
        .get_element_by_id("banner-placeholder")
        .map(|banner| banner.get_bounding_client_rect().height())
        .unwrap_or(0.0)
}

/// Scroll so the element with `id` sits just under the sticky banner.
/// Returns false if there is no such element.
pub fn scroll_to_anchor(id: &str) -> bool {
    let Some(target) = gloo_utils::document().get_element_by_id(id) else {
        return false;
    };
    let top = anchor_scroll_top(
        target.get_bounding_client_rect().top(),
        scroll_offset().y,
        banner_height(),
    );
    gloo_utils::window().scroll_to_with_x_and_y(0.0, top);
    true
}

pub fn smooth_scroll_to_top() {
    let options = ScrollToOptions::new();
    options.set_top(0.0);
    options.set_behavior(ScrollBehavior::Smooth);
    gloo_utils::window().scroll_to_with_scroll_to_options(&options);
}

/// Whether the page itself is pinch-zoomed.
pub fn is_pinch_zoomed() -> bool {
    gloo_utils::window()
        .visual_viewport()
        .map(|v| v.scale() > 1.01)
        .unwrap_or(false)
}

pub fn encode_component(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

/// Same source with a throwaway query so animated images restart.
pub fn cache_busted(src: &str) -> String {
    let sep = if src.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", src, sep, js_sys::Date::now() as u64)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_selection_from_search_decodes() {
        assert_eq!(selection_from_search("?poem=12", Section::Poems), Some(12));
        assert_eq!(selection_from_search("?poem=%33", Section::Poems), Some(3));
        assert_eq!(selection_from_search("?po%65m=4", Section::Poems), Some(4));
        assert_eq!(selection_from_search("?x=1&blog=7", Section::Blogs), Some(7));
        assert_eq!(selection_from_search("?poem=12", Section::Blogs), None);
        assert_eq!(selection_from_search("", Section::Poems), None);
    }
}
