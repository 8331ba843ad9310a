// src/components/banner.rs
//
// Site banner: the shared HTML fragment (plus the home page header) fetched
// at startup, its dropdown menus, and the theme toggle.

use crate::bindings::HandlerRegistry;
use crate::error::LoadError;
use crate::geometry::{place_menu, Size};
use crate::loader;
use crate::site_config::{PageKind, UiConfig, BANNER_FRAGMENT, HEADER_FRAGMENT};
use crate::theme::Theme;
use crate::timer::DelaySlot;
use crate::utils;
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BannerProps {
    pub page: PageKind,
    pub theme: Theme,
    pub on_cycle_theme: Callback<()>,
}

pub enum BannerMsg {
    BannerLoaded(Result<String, LoadError>),
    HeaderLoaded(Result<String, LoadError>),
    MenuEnter(String),
    MenuLeave(String),
    MenuClick(String),
    OutsideClick,
    Scrolled,
    Resized,
    Rebind,
}

pub struct Banner {
    config: UiConfig,
    banner_html: Option<AttrValue>,
    header_html: Option<AttrValue>,
    banner_ref: NodeRef,
    menus: HandlerRegistry,
    /// Layout the menus are currently bound for.
    narrow: bool,
    bind_pending: bool,
    open_menu: Option<String>,
    rebind_timer: DelaySlot,
    _listeners: Vec<EventListener>,
}

fn dropdown_parts(dropdown: &Element) -> Option<(HtmlElement, HtmlElement)> {
    let button = dropdown.query_selector(".menu-button").ok()??;
    let menu = dropdown.query_selector(".dropdown-menu").ok()??;
    Some((button.dyn_into().ok()?, menu.dyn_into().ok()?))
}

fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in styles {
        if let Err(e) = style.set_property(name, value) {
            log::debug!("Could not set {} on menu: {:?}", name, e);
        }
    }
}

impl Banner {
    fn listeners(ctx: &Context<Self>) -> Vec<EventListener> {
        let window = gloo_utils::window();

        let link = ctx.link().clone();
        let scroll = EventListener::new(&window, "scroll", move |_| {
            link.send_message(BannerMsg::Scrolled);
        });

        let link = ctx.link().clone();
        let resize = EventListener::new(&window, "resize", move |_| {
            link.send_message(BannerMsg::Resized);
        });

        let link = ctx.link().clone();
        let click = EventListener::new(&gloo_utils::document(), "click", move |event| {
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map_or(false, |el| matches!(el.closest(".dropdown"), Ok(Some(_))));
            if !inside {
                link.send_message(BannerMsg::OutsideClick);
            }
        });

        vec![scroll, resize, click]
    }

    fn dropdowns(&self) -> Vec<Element> {
        let Some(root) = self.banner_ref.cast::<Element>() else {
            return Vec::new();
        };
        let Ok(list) = root.query_selector_all(".top-menu .dropdown") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn dropdown(&self, key: &str) -> Option<Element> {
        let root = self.banner_ref.cast::<Element>()?;
        root.query_selector(&self.menus.selector(key)).ok()?
    }

    /// Drop all menu handlers, close every menu and bind again for the
    /// current layout.
    fn bind_menus(&mut self, ctx: &Context<Self>) {
        self.menus.clear();
        self.open_menu = None;
        self.narrow = self.config.is_narrow(utils::viewport().width);

        for dropdown in self.dropdowns() {
            let Some((button, menu)) = dropdown_parts(&dropdown) else {
                continue;
            };
            if let Err(e) = dropdown.class_list().remove_1("active") {
                log::debug!("Could not reset dropdown: {:?}", e);
            }
            set_styles(&menu, &[("display", "none")]);

            let key = self.menus.key_for(&dropdown);
            let handlers = if self.narrow {
                let link = ctx.link().clone();
                let click_key = key.clone();
                let options = gloo_events::EventListenerOptions::enable_prevent_default();
                vec![EventListener::new_with_options(&button, "click", options, move |event| {
                    event.prevent_default();
                    link.send_message(BannerMsg::MenuClick(click_key.clone()));
                })]
            } else {
                let link = ctx.link().clone();
                let enter_key = key.clone();
                let enter = EventListener::new(&dropdown, "mouseenter", move |_| {
                    link.send_message(BannerMsg::MenuEnter(enter_key.clone()));
                });
                let link = ctx.link().clone();
                let leave_key = key.clone();
                let leave = EventListener::new(&dropdown, "mouseleave", move |_| {
                    link.send_message(BannerMsg::MenuLeave(leave_key.clone()));
                });
                vec![enter, leave]
            };
            self.menus.rebind(&key, handlers);
        }
        log::debug!("Bound {} dropdown menus (narrow: {})", self.menus.len(), self.narrow);
    }

    /// Pin an open desktop menu under its button.
    fn position_menu(&self, key: &str) {
        let Some((button, menu)) = self.dropdown(key).as_ref().and_then(dropdown_parts) else {
            return;
        };
        set_styles(&menu, &[("display", "block"), ("position", "fixed")]);
        let size = Size::new(menu.offset_width() as f64, menu.offset_height() as f64);
        let spot = place_menu(
            utils::client_rect(&button),
            size,
            utils::viewport(),
            self.config.menu_margin,
        );
        let left = format!("{}px", spot.x);
        let top = format!("{}px", spot.y);
        set_styles(&menu, &[("left", left.as_str()), ("top", top.as_str())]);
    }

    fn close_menu(&self, key: &str) {
        let Some(dropdown) = self.dropdown(key) else {
            return;
        };
        if let Err(e) = dropdown.class_list().remove_1("active") {
            log::debug!("Could not close dropdown: {:?}", e);
        }
        if let Some((_, menu)) = dropdown_parts(&dropdown) {
            set_styles(&menu, &[("display", "none")]);
        }
    }

    fn close_all(&mut self) {
        for dropdown in self.dropdowns() {
            let key = self.menus.key_for(&dropdown);
            self.close_menu(&key);
        }
        self.open_menu = None;
    }
}

impl Component for Banner {
    type Message = BannerMsg;
    type Properties = BannerProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_future(async {
            BannerMsg::BannerLoaded(loader::fetch_text(BANNER_FRAGMENT).await)
        });
        if ctx.props().page == PageKind::Home {
            ctx.link().send_future(async {
                BannerMsg::HeaderLoaded(loader::fetch_text(HEADER_FRAGMENT).await)
            });
        }

        let config = UiConfig::default();
        let narrow = config.is_narrow(utils::viewport().width);
        Self {
            config,
            banner_html: None,
            header_html: None,
            banner_ref: NodeRef::default(),
            menus: HandlerRegistry::new("menu"),
            narrow,
            bind_pending: false,
            open_menu: None,
            rebind_timer: DelaySlot::new(),
            _listeners: Self::listeners(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            BannerMsg::BannerLoaded(Ok(html)) => {
                self.banner_html = Some(AttrValue::from(html));
                self.bind_pending = true;
                true
            }
            BannerMsg::BannerLoaded(Err(e)) => {
                log::warn!("Banner unavailable: {}", e);
                false
            }
            BannerMsg::HeaderLoaded(Ok(html)) => {
                self.header_html = Some(AttrValue::from(html));
                true
            }
            BannerMsg::HeaderLoaded(Err(e)) => {
                log::warn!("Header unavailable: {}", e);
                false
            }
            BannerMsg::MenuEnter(key) => {
                self.position_menu(&key);
                self.open_menu = Some(key);
                false
            }
            BannerMsg::MenuLeave(key) => {
                self.close_menu(&key);
                if self.open_menu.as_deref() == Some(key.as_str()) {
                    self.open_menu = None;
                }
                false
            }
            BannerMsg::MenuClick(key) => {
                let was_open = self.open_menu.as_deref() == Some(key.as_str());
                self.close_all();
                if !was_open {
                    if let Some(dropdown) = self.dropdown(&key) {
                        if let Err(e) = dropdown.class_list().add_1("active") {
                            log::debug!("Could not open dropdown: {:?}", e);
                        }
                        if let Some((_, menu)) = dropdown_parts(&dropdown) {
                            set_styles(&menu, &[("display", "block")]);
                        }
                        self.open_menu = Some(key);
                    }
                }
                false
            }
            BannerMsg::OutsideClick => {
                if self.narrow && self.open_menu.is_some() {
                    self.close_all();
                }
                false
            }
            BannerMsg::Scrolled => {
                if !self.narrow {
                    if let Some(key) = self.open_menu.clone() {
                        self.position_menu(&key);
                    }
                }
                false
            }
            BannerMsg::Resized => {
                let narrow = self.config.is_narrow(utils::viewport().width);
                if narrow != self.narrow {
                    let link = ctx.link().clone();
                    self.rebind_timer.schedule(self.config.resize_debounce_ms, move || {
                        link.send_message(BannerMsg::Rebind);
                    });
                } else if !narrow {
                    if let Some(key) = self.open_menu.clone() {
                        self.position_menu(&key);
                    }
                }
                false
            }
            BannerMsg::Rebind => {
                self.rebind_timer.fired();
                self.bind_menus(ctx);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let theme = ctx.props().theme;
        let on_cycle = ctx.props().on_cycle_theme.clone();
        let onclick = Callback::from(move |_: MouseEvent| on_cycle.emit(()));

        html! {
            <>
                <div id="banner-placeholder" ref={self.banner_ref.clone()}>
                    if let Some(html) = self.banner_html.clone() {
                        { Html::from_html_unchecked(html) }
                    }
                    <button
                        id="themeToggle"
                        class="theme-toggle"
                        title={format!("Theme: {}", theme.as_str())}
                        aria-label="Change theme"
                        {onclick}
                    >
                        { theme.icon() }
                    </button>
                </div>
                if let Some(html) = self.header_html.clone() {
                    <div id="header-placeholder">{ Html::from_html_unchecked(html) }</div>
                }
            </>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if self.bind_pending {
            self.bind_pending = false;
            self.bind_menus(ctx);
        }
    }
}
