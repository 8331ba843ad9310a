// src/components/content_view.rs
//
// One rendered poem or blog post plus everything layered over it: the
// page audio player, the image lightbox, hover tooltips and the
// fullscreen tooltip image.

use super::audio_player::AudioPlayer;
use super::lightbox::LightboxOverlay;
use super::tooltip::{sizer_view, FullscreenView, TooltipView};
use crate::audio::AudioHub;
use crate::bindings::HandlerRegistry;
use crate::error::LoadError;
use crate::geometry::{place_tooltip, swipe_direction, Point, Size, TooltipPlacement};
use crate::lightbox::{Lightbox, LightboxImage};
use crate::loader;
use crate::manifest::ListItem;
use crate::markdown::Document;
use crate::route::{anchor_id, NavState};
use crate::site_config::{Section, UiConfig};
use crate::timer::DelaySlot;
use crate::tooltip::{
    ActiveTooltip, EnterDecision, LeaveDecision, TooltipDescriptor, TooltipManager, TriggerSpec,
};
use crate::utils;
use gloo::timers::callback::Timeout;
use gloo_events::{EventListener, EventListenerOptions};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlImageElement, KeyboardEvent};
use yew::context::ContextHandle;
use yew::prelude::*;

const MAIN_AUDIO_ID: &str = "main-audio";

#[derive(Properties, PartialEq)]
pub struct ContentViewProps {
    pub section: Section,
    pub item: Option<ListItem>,
}

pub enum ContentMsg {
    DocumentLoaded(String, Result<Document, LoadError>),
    TooltipsLoaded(String, Result<HashMap<String, TooltipDescriptor>, LoadError>),
    AudioChecked(String, String, bool),
    Refresh,
    // lightbox
    OpenLightbox(LightboxImage, Option<usize>),
    LightboxLoaded(Size),
    LightboxNavigate(i32),
    LightboxZoom(Point),
    ZoomFadeDone,
    CloseLightbox,
    SwipeStart(Point),
    SwipeEnd(Point),
    // page events
    Key(String),
    Resized,
    Scrolled,
    OutsideClick,
    // tooltips
    TriggerEnter(String, f64),
    TriggerLeave(bool),
    ShowTooltip(String, f64),
    HideTooltip,
    TooltipEnter,
    TooltipLeave,
    TooltipAudio(bool),
    Reveal,
    DropLeaving(u64),
    SizerMediaDone(u64),
    OpenFullscreen(TooltipDescriptor),
    CloseFullscreen,
}

enum LoadState {
    Empty,
    Loading,
    Ready { date: Option<String>, html: AttrValue },
    Failed,
}

pub struct ContentView {
    config: UiConfig,
    section: Section,
    folder: Option<String>,
    title: Option<String>,
    state: LoadState,
    audio_src: Option<String>,
    content_ref: NodeRef,
    hub: AudioHub,
    _hub_handle: Option<ContextHandle<AudioHub>>,
    // lightbox
    lightbox: Lightbox,
    zoom_fading: bool,
    swipe_start: Option<Point>,
    // tooltips
    tooltips: TooltipManager,
    triggers: HashMap<String, TooltipDescriptor>,
    leaving: Vec<(ActiveTooltip, Timeout)>,
    fullscreen: Option<TooltipDescriptor>,
    // raw DOM bindings and timers
    thumb_bindings: HandlerRegistry,
    trigger_bindings: HandlerRegistry,
    show_timer: DelaySlot,
    hide_timer: DelaySlot,
    fade_timer: DelaySlot,
    reveal_timer: DelaySlot,
    hash_timer: DelaySlot,
    scan_pending: bool,
    anchor_listener: Option<EventListener>,
    _listeners: Vec<EventListener>,
}

fn query_all<T: JsCast>(root: &Element, selector: &str) -> Vec<T> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn within(element: &Element, selector: &str) -> bool {
    matches!(element.closest(selector), Ok(Some(_)))
}

impl ContentView {
    fn page_listeners(ctx: &Context<Self>) -> Vec<EventListener> {
        let window = gloo_utils::window();
        let document = gloo_utils::document();

        let link = ctx.link().clone();
        let keydown = EventListener::new(&document, "keydown", move |event| {
            if let Some(e) = event.dyn_ref::<KeyboardEvent>() {
                link.send_message(ContentMsg::Key(e.key()));
            }
        });

        let link = ctx.link().clone();
        let resize = EventListener::new(&window, "resize", move |_| {
            link.send_message(ContentMsg::Resized);
        });

        let link = ctx.link().clone();
        let scroll = EventListener::new(&window, "scroll", move |_| {
            link.send_message(ContentMsg::Scrolled);
        });

        let link = ctx.link().clone();
        let click = EventListener::new(&document, "click", move |event| {
            let inside = event_element(event)
                .map_or(false, |el| within(&el, ".tooltip-trigger, .tooltip, .tooltip-fullscreen"));
            if !inside {
                link.send_message(ContentMsg::OutsideClick);
            }
        });

        vec![keydown, resize, scroll, click]
    }

    fn start_load(&mut self, ctx: &Context<Self>, item: &ListItem) {
        let folder = item.folder.clone();
        log::info!("Loading {:?} {}", self.section, folder);

        self.folder = Some(folder.clone());
        self.title = Some(item.clean_title());
        self.state = LoadState::Loading;
        self.audio_src = None;
        self.reset_overlays(ctx);
        self.tooltips.begin_content(&folder);

        let section = self.section;
        let doc_folder = folder.clone();
        ctx.link().send_future(async move {
            let result = loader::load_document(section, &doc_folder).await;
            ContentMsg::DocumentLoaded(doc_folder, result)
        });

        let tip_folder = folder.clone();
        ctx.link().send_future(async move {
            let result = loader::load_tooltips(section, &tip_folder).await;
            ContentMsg::TooltipsLoaded(tip_folder, result)
        });

        if let Some(file) = item.audio.as_deref().filter(|f| !f.is_empty()) {
            let src = section.audio_path(&folder, &utils::encode_component(file));
            ctx.link().send_future(async move {
                let ok = loader::exists(&src).await;
                ContentMsg::AudioChecked(folder, src, ok)
            });
        }
    }

    /// Drop everything tied to the previous document.
    fn reset_overlays(&mut self, ctx: &Context<Self>) {
        self.show_timer.cancel();
        self.hide_timer.cancel();
        self.reveal_timer.cancel();
        self.hash_timer.cancel();
        if let Some(previous) = self.tooltips.hide() {
            self.retire(ctx, previous);
        }
        self.triggers.clear();
        self.tooltips.clear_sizers();
        self.thumb_bindings.clear();
        self.trigger_bindings.clear();
        self.anchor_listener = None;
        self.lightbox.close();
        self.lightbox.attach(Vec::new());
        utils::toggle_body_class("lightbox-active", false);
    }

    /// Start fading out a tooltip that is no longer the live one.
    fn retire(&mut self, ctx: &Context<Self>, tooltip: ActiveTooltip) {
        if let Some(audio_id) = tooltip.audio_id() {
            self.hub.0.borrow_mut().halt(&audio_id);
        }
        let link = ctx.link().clone();
        let id = tooltip.id;
        let timeout = Timeout::new(self.config.tooltip_fade_ms, move || {
            link.send_message(ContentMsg::DropLeaving(id));
        });
        self.leaving.push((tooltip, timeout));
    }

    fn schedule_hide(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        self.hide_timer.schedule(self.config.hide_delay_ms, move || {
            link.send_message(ContentMsg::HideTooltip);
        });
    }

    fn attach_lightbox(&mut self, ctx: &Context<Self>, content: &Element) {
        let grid: Vec<HtmlImageElement> = query_all(content, ".image-grid img.click-zoom");
        self.lightbox.attach(
            grid.iter()
                .map(|img| LightboxImage::new(img.src(), img.alt()))
                .collect(),
        );

        for thumb in query_all::<HtmlImageElement>(content, "img.click-zoom") {
            let index = grid.iter().position(|g| g.is_same_node(Some(thumb.as_ref())));
            if let Err(e) = thumb.style().set_property("cursor", "pointer") {
                log::debug!("Could not style thumbnail: {:?}", e);
            }
            let key = self.thumb_bindings.key_for(&thumb);
            let link = ctx.link().clone();
            let image = LightboxImage::new(thumb.src(), thumb.alt());
            let listener = EventListener::new(&thumb, "click", move |_| {
                link.send_message(ContentMsg::OpenLightbox(image.clone(), index));
            });
            self.thumb_bindings.rebind(&key, vec![listener]);
        }
        log::debug!(
            "Lightbox bound {} thumbnails, {} in the grid",
            self.thumb_bindings.len(),
            self.lightbox.image_count()
        );
    }

    fn setup_triggers(&mut self, ctx: &Context<Self>, content: &Element) {
        for element in query_all::<Element>(content, "[data-tooltip], [tt]") {
            let spec = TriggerSpec {
                id: element.get_attribute("tt"),
                inline: element.get_attribute("data-tooltip"),
            };
            let Some(descriptor) = spec.resolve(self.tooltips.descriptors()) else {
                continue;
            };
            if let Err(e) = element.class_list().add_1("tooltip-trigger") {
                log::debug!("Could not mark trigger: {:?}", e);
            }
            let key = self.trigger_bindings.key_for(&element);

            let link = ctx.link().clone();
            let enter_key = key.clone();
            let enter = EventListener::new(&element, "mouseenter", move |event| {
                let x = event
                    .dyn_ref::<MouseEvent>()
                    .map(|e| e.client_x() as f64)
                    .unwrap_or_default();
                link.send_message(ContentMsg::TriggerEnter(enter_key.clone(), x));
            });

            let link = ctx.link().clone();
            let leave = EventListener::new(&element, "mouseleave", move |event| {
                let into_tooltip = event
                    .dyn_ref::<MouseEvent>()
                    .and_then(|e| e.related_target())
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map_or(false, |el| within(&el, ".tooltip"));
                link.send_message(ContentMsg::TriggerLeave(into_tooltip));
            });

            self.trigger_bindings.rebind(&key, vec![enter, leave]);
            self.tooltips.queue_sizer(&descriptor);
            self.triggers.insert(key, descriptor);
        }
    }

    fn bind_anchor_links(&mut self, content: &Element) {
        let options = EventListenerOptions::enable_prevent_default();
        self.anchor_listener = Some(EventListener::new_with_options(
            content,
            "click",
            options,
            move |event| {
                let Some(anchor) = event_element(event)
                    .and_then(|el| el.closest("a[href^='#']").ok().flatten())
                else {
                    return;
                };
                let Some(href) = anchor.get_attribute("href") else {
                    return;
                };
                let Some(id) = anchor_id(&href) else {
                    return;
                };
                if utils::scroll_to_anchor(id) {
                    event.prevent_default();
                    utils::push_history(&NavState::Anchor(id.to_string()), &href);
                }
            },
        ));
    }

    /// Measure mounted sizers whose media has settled. Sizers not yet in
    /// the document wait for the next render. Returns true if the sizer
    /// list changed.
    fn measure_sizers(&mut self) -> bool {
        if self.tooltips.sizers().is_empty() {
            return false;
        }
        let document = gloo_utils::document();
        let found = self.tooltips.measure_sizers(|id| {
            let selector = format!("[data-sizer=\"{}\"]", id);
            document
                .query_selector(&selector)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .map(|el| Size::new(el.offset_width() as f64, el.offset_height() as f64))
        });
        if found > 0 {
            log::debug!(
                "Measured {} tooltip sizers, {} sizes cached",
                found,
                self.tooltips.measured_count()
            );
        }
        found > 0
    }

    fn compute_placement(&self) -> Option<TooltipPlacement> {
        let active = self.tooltips.active()?;
        let content = self.content_ref.cast::<Element>()?;
        let trigger = content
            .query_selector(&self.trigger_bindings.selector(&active.trigger))
            .ok()
            .flatten()?;
        let size = self.tooltips.geometry(&active.key).or_else(|| {
            let selector = format!(".tooltip[data-tooltip-id=\"{}\"]", active.id);
            gloo_utils::document()
                .query_selector(&selector)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .map(|el| Size::new(el.offset_width() as f64, el.offset_height() as f64))
                .filter(|s| !s.is_empty())
        });
        let size = size.unwrap_or_else(|| {
            Size::new(self.config.default_tooltip_width, self.config.default_tooltip_height)
        });
        Some(place_tooltip(
            size,
            utils::first_line_rect(&trigger),
            active.cursor_x,
            utils::scroll_offset(),
            utils::viewport(),
            &self.config,
        ))
    }

    /// Follow the trigger after scroll or resize. Left alone while its
    /// audio plays.
    fn reposition(&mut self) -> bool {
        if self.tooltips.audio_playing() {
            return false;
        }
        let Some(placement) = self.compute_placement() else {
            return false;
        };
        if self.tooltips.active().and_then(|a| a.placement) == Some(placement) {
            return false;
        }
        self.tooltips.set_placement(placement);
        true
    }

    fn update_lightbox(&mut self, ctx: &Context<Self>, msg: ContentMsg) -> bool {
        match msg {
            ContentMsg::OpenLightbox(image, index) => {
                self.lightbox.open(image, index);
                self.lightbox.refit(utils::viewport());
                utils::toggle_body_class("lightbox-active", true);
                true
            }
            ContentMsg::LightboxLoaded(natural) => {
                self.lightbox.image_loaded(natural, utils::viewport());
                true
            }
            ContentMsg::LightboxNavigate(direction) => {
                if self.lightbox.navigate(direction) {
                    self.lightbox.refit(utils::viewport());
                    true
                } else {
                    false
                }
            }
            ContentMsg::LightboxZoom(cursor) => {
                if self.lightbox.cycle_zoom(Some(cursor), utils::viewport()).is_none() {
                    return false;
                }
                self.zoom_fading = true;
                let link = ctx.link().clone();
                self.fade_timer.schedule(self.config.zoom_fade_ms, move || {
                    link.send_message(ContentMsg::ZoomFadeDone);
                });
                true
            }
            ContentMsg::ZoomFadeDone => {
                self.fade_timer.fired();
                self.zoom_fading = false;
                true
            }
            ContentMsg::CloseLightbox => {
                self.lightbox.close();
                utils::toggle_body_class("lightbox-active", false);
                true
            }
            ContentMsg::SwipeStart(point) => {
                self.swipe_start = Some(point);
                false
            }
            ContentMsg::SwipeEnd(end) => {
                let Some(start) = self.swipe_start.take() else {
                    return false;
                };
                if !self.lightbox.accepts_swipe() || utils::is_pinch_zoomed() {
                    return false;
                }
                match swipe_direction(start, end, self.config.swipe_threshold) {
                    Some(direction) if self.lightbox.navigate(direction) => {
                        self.lightbox.refit(utils::viewport());
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn update_tooltips(&mut self, ctx: &Context<Self>, msg: ContentMsg) -> bool {
        match msg {
            ContentMsg::TriggerEnter(key, cursor_x) => {
                self.hide_timer.cancel();
                if self.tooltips.on_trigger_enter(&key) == EnterDecision::ScheduleShow {
                    let link = ctx.link().clone();
                    self.show_timer.schedule(self.config.show_delay_ms, move || {
                        link.send_message(ContentMsg::ShowTooltip(key, cursor_x));
                    });
                }
                false
            }
            ContentMsg::TriggerLeave(into_tooltip) => {
                self.show_timer.cancel();
                if self.tooltips.active().is_some()
                    && self.tooltips.on_trigger_leave(into_tooltip) == LeaveDecision::ScheduleHide
                {
                    self.schedule_hide(ctx);
                }
                false
            }
            ContentMsg::ShowTooltip(key, cursor_x) => {
                self.show_timer.fired();
                let Some(descriptor) = self.triggers.get(&key).cloned() else {
                    return false;
                };
                self.reveal_timer.cancel();
                if let Some(previous) = self.tooltips.show(&key, descriptor, Some(cursor_x)) {
                    self.retire(ctx, previous);
                }
                true
            }
            ContentMsg::HideTooltip => {
                self.hide_timer.fired();
                if !self.tooltips.hide_allowed() {
                    return false;
                }
                match self.tooltips.hide() {
                    Some(previous) => {
                        self.retire(ctx, previous);
                        true
                    }
                    None => false,
                }
            }
            ContentMsg::TooltipEnter => {
                self.hide_timer.cancel();
                false
            }
            ContentMsg::TooltipLeave => {
                if self.tooltips.on_tooltip_leave() == LeaveDecision::ScheduleHide {
                    self.schedule_hide(ctx);
                }
                false
            }
            ContentMsg::TooltipAudio(playing) => {
                self.tooltips.set_audio_playing(playing);
                if playing {
                    self.hide_timer.cancel();
                }
                false
            }
            ContentMsg::Reveal => {
                self.reveal_timer.fired();
                self.tooltips.reveal()
            }
            ContentMsg::DropLeaving(id) => {
                self.leaving.retain(|(tooltip, _)| tooltip.id != id);
                true
            }
            ContentMsg::SizerMediaDone(id) => self.tooltips.sizer_media_done(id),
            ContentMsg::OutsideClick => {
                self.show_timer.cancel();
                self.hide_timer.cancel();
                match self.tooltips.hide() {
                    Some(previous) => {
                        self.retire(ctx, previous);
                        true
                    }
                    None => false,
                }
            }
            ContentMsg::OpenFullscreen(descriptor) => {
                self.fullscreen = Some(descriptor);
                utils::set_scroll_locked(true);
                true
            }
            ContentMsg::CloseFullscreen => {
                self.fullscreen = None;
                utils::set_scroll_locked(false);
                true
            }
            _ => false,
        }
    }

    fn view_document(&self) -> Html {
        let prefix = self.section.css_prefix();
        match &self.state {
            LoadState::Empty => html! {},
            LoadState::Loading => html! {
                <p class="loading">{ self.section.loading_text() }</p>
            },
            LoadState::Failed => html! {
                <p class="error">{ self.section.load_error_text() }</p>
            },
            LoadState::Ready { date, html } => html! {
                <>
                    if let Some(date) = date.clone() {
                        <p class={classes!("content-date", format!("{}-date", prefix))}>{ date }</p>
                    }
                    if let Some(src) = self.audio_src.clone() {
                        <AudioPlayer
                            id={MAIN_AUDIO_ID}
                            src={src}
                            title={self.title.clone().map(AttrValue::from)}
                            show_loop_toggle={true}
                            looping={true}
                        />
                    }
                    <div class={classes!("markdown-body", format!("{}-text", prefix))} ref={self.content_ref.clone()}>
                        { Html::from_html_unchecked(html.clone()) }
                    </div>
                </>
            },
        }
    }

    fn view_tooltips(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let tooltip = |tip: &ActiveTooltip, live: bool| {
            html! {
                <TooltipView
                    key={tip.id}
                    tooltip={tip.clone()}
                    {live}
                    on_enter={link.callback(|_| ContentMsg::TooltipEnter)}
                    on_leave={link.callback(|_| ContentMsg::TooltipLeave)}
                    on_open_fullscreen={link.callback(ContentMsg::OpenFullscreen)}
                    on_audio={link.callback(ContentMsg::TooltipAudio)}
                />
            }
        };
        let overlay_shown = self.tooltips.active().map_or(false, |a| a.revealed);

        html! {
            <>
                <div class={classes!("tooltip-overlay", overlay_shown.then_some("show"))}></div>
                <div class="tooltip-layer">
                    { for self.leaving.iter().map(|(tip, _)| tooltip(tip, false)) }
                    if let Some(active) = self.tooltips.active() {
                        { tooltip(active, true) }
                    }
                </div>
                <div class="tooltip-sizers">
                    { for self.tooltips.sizers().iter().map(|p| {
                        html! {
                            <div key={p.id}>
                                { sizer_view(p.id, &p.descriptor, link.callback(ContentMsg::SizerMediaDone)) }
                            </div>
                        }
                    }) }
                </div>
                if let Some(descriptor) = self.fullscreen.clone() {
                    <FullscreenView {descriptor} on_close={link.callback(|_| ContentMsg::CloseFullscreen)} />
                }
            </>
        }
    }

    fn view_lightbox(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let shown = self.lightbox.shown();
        html! {
            <LightboxOverlay
                open={self.lightbox.is_open()}
                src={shown.map(|s| AttrValue::from(s.src.clone()))}
                alt={shown.map(|s| AttrValue::from(s.alt.clone())).unwrap_or_default()}
                caption={self.lightbox.caption().map(|c| AttrValue::from(c.to_string()))}
                frame={self.lightbox.frame()}
                nav_visible={self.lightbox.nav_visible()}
                fading={self.zoom_fading}
                on_close={link.callback(|_| ContentMsg::CloseLightbox)}
                on_navigate={link.callback(ContentMsg::LightboxNavigate)}
                on_zoom={link.callback(ContentMsg::LightboxZoom)}
                on_loaded={link.callback(ContentMsg::LightboxLoaded)}
                on_swipe_start={link.callback(ContentMsg::SwipeStart)}
                on_swipe_end={link.callback(ContentMsg::SwipeEnd)}
            />
        }
    }
}

impl Component for ContentView {
    type Message = ContentMsg;
    type Properties = ContentViewProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = UiConfig::default();
        let (hub, hub_handle) = match ctx.link().context::<AudioHub>(Callback::noop()) {
            Some((hub, handle)) => (hub, Some(handle)),
            None => (AudioHub::default(), None),
        };

        let mut view = Self {
            lightbox: Lightbox::new(config.clone()),
            config,
            section: ctx.props().section,
            folder: None,
            title: None,
            state: LoadState::Empty,
            audio_src: None,
            content_ref: NodeRef::default(),
            hub,
            _hub_handle: hub_handle,
            zoom_fading: false,
            swipe_start: None,
            tooltips: TooltipManager::new(),
            triggers: HashMap::new(),
            leaving: Vec::new(),
            fullscreen: None,
            thumb_bindings: HandlerRegistry::new("zoom"),
            trigger_bindings: HandlerRegistry::new("tip"),
            show_timer: DelaySlot::new(),
            hide_timer: DelaySlot::new(),
            fade_timer: DelaySlot::new(),
            reveal_timer: DelaySlot::new(),
            hash_timer: DelaySlot::new(),
            scan_pending: false,
            anchor_listener: None,
            _listeners: Self::page_listeners(ctx),
        };
        if let Some(item) = ctx.props().item.clone() {
            view.start_load(ctx, &item);
        }
        view
    }

    fn changed(&mut self, ctx: &Context<Self>, _old: &Self::Properties) -> bool {
        self.section = ctx.props().section;
        match ctx.props().item.clone() {
            Some(item) if self.folder.as_deref() != Some(item.folder.as_str()) => {
                self.start_load(ctx, &item);
                true
            }
            Some(_) => false,
            None => {
                let had_content = self.folder.take().is_some();
                self.reset_overlays(ctx);
                self.state = LoadState::Empty;
                had_content
            }
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ContentMsg::DocumentLoaded(folder, result) => match result {
                Ok(document) => {
                    log::info!("Rendered {}", folder);
                    self.state = LoadState::Ready {
                        date: document.date,
                        html: AttrValue::from(document.html),
                    };
                    self.scan_pending = true;
                    true
                }
                Err(e) => {
                    log::error!("Failed to load {}: {}", folder, e);
                    self.state = LoadState::Failed;
                    true
                }
            },
            ContentMsg::TooltipsLoaded(folder, result) => match result {
                Ok(raw) => {
                    let resource_dir = self.section.resource_dir(&folder);
                    if self.tooltips.load_descriptors(&folder, &resource_dir, raw) {
                        self.scan_pending = true;
                        true
                    } else {
                        false
                    }
                }
                Err(e) if e.is_not_found() => {
                    log::debug!("No tooltip file for {}", folder);
                    false
                }
                Err(e) => {
                    log::warn!("Tooltips for {} failed to load: {}", folder, e);
                    false
                }
            },
            ContentMsg::AudioChecked(folder, src, ok) => {
                if self.folder.as_deref() != Some(folder.as_str()) {
                    return false;
                }
                if ok {
                    self.audio_src = Some(utils::resource_url(&src));
                } else {
                    log::warn!("Audio {} is not available", src);
                }
                ok
            }
            ContentMsg::Refresh => true,
            ContentMsg::Key(key) => match key.as_str() {
                "Escape" if self.fullscreen.is_some() => {
                    self.update_tooltips(ctx, ContentMsg::CloseFullscreen)
                }
                "Escape" if self.lightbox.is_open() => {
                    self.update_lightbox(ctx, ContentMsg::CloseLightbox)
                }
                "ArrowLeft" if self.lightbox.is_open() => {
                    self.update_lightbox(ctx, ContentMsg::LightboxNavigate(-1))
                }
                "ArrowRight" if self.lightbox.is_open() => {
                    self.update_lightbox(ctx, ContentMsg::LightboxNavigate(1))
                }
                _ => false,
            },
            ContentMsg::Resized => {
                let mut changed = false;
                if self.lightbox.is_open() && self.lightbox.zoom_level() == 0 {
                    self.lightbox.refit(utils::viewport());
                    changed = true;
                }
                self.reposition() || changed
            }
            ContentMsg::Scrolled => self.reposition(),
            msg @ (ContentMsg::OpenLightbox(..)
            | ContentMsg::LightboxLoaded(_)
            | ContentMsg::LightboxNavigate(_)
            | ContentMsg::LightboxZoom(_)
            | ContentMsg::ZoomFadeDone
            | ContentMsg::CloseLightbox
            | ContentMsg::SwipeStart(_)
            | ContentMsg::SwipeEnd(_)) => self.update_lightbox(ctx, msg),
            msg => self.update_tooltips(ctx, msg),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class={classes!("content-view", format!("{}-content", self.section.css_prefix()))}>
                { self.view_document() }
                { self.view_tooltips(ctx) }
                { self.view_lightbox(ctx) }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if self.scan_pending {
            if let Some(content) = self.content_ref.cast::<Element>() {
                self.scan_pending = false;
                self.attach_lightbox(ctx, &content);
                self.setup_triggers(ctx, &content);
                self.bind_anchor_links(&content);

                let hash = utils::current_hash();
                if let Some(id) = anchor_id(&hash).map(str::to_string) {
                    self.hash_timer.schedule(50, move || {
                        utils::scroll_to_anchor(&id);
                    });
                }
                ctx.link().send_message(ContentMsg::Refresh);
            }
        }

        if self.measure_sizers() {
            ctx.link().send_message(ContentMsg::Refresh);
        }

        let needs_placement = self
            .tooltips
            .active()
            .map_or(false, |a| a.placement.is_none());
        if needs_placement {
            if let Some(placement) = self.compute_placement() {
                self.tooltips.set_placement(placement);
                let link = ctx.link().clone();
                self.reveal_timer.schedule(16, move || {
                    link.send_message(ContentMsg::Reveal);
                });
                ctx.link().send_message(ContentMsg::Refresh);
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        utils::toggle_body_class("lightbox-active", false);
        if self.fullscreen.take().is_some() {
            utils::set_scroll_locked(false);
        }
    }
}
