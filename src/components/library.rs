// src/components/library.rs
//
// Listing page for one section: the sidebar of entries on the left, the
// selected entry rendered on the right, with the URL and browser history
// kept in step with the selection.

use super::content_view::ContentView;
use super::sidebar::Sidebar;
use crate::error::LoadError;
use crate::listing::{build_entries, resolve_selection, ListEntry, Selection};
use crate::loader;
use crate::manifest::{ContentStore, ListItem};
use crate::route::{anchor_id, selection_query, NavState};
use crate::site_config::{Section, UiConfig};
use crate::utils;
use gloo_events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, PopStateEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LibraryProps {
    pub section: Section,
}

pub enum LibraryMsg {
    ManifestLoaded(Result<Vec<ListItem>, LoadError>),
    Select(usize),
    PopState(Option<NavState>),
    HashChanged,
    ToggleSidebar,
    CloseSidebar,
    Layout,
}

pub struct Library {
    config: UiConfig,
    store: ContentStore,
    entries: Rc<Vec<ListEntry>>,
    selected: Option<usize>,
    failed: bool,
    /// Overlay state on narrow screens.
    sidebar_open: bool,
    /// Collapsed state on wide screens.
    sidebar_collapsed: bool,
    narrow: bool,
    sidebar_top: f64,
    _listeners: Vec<EventListener>,
}

fn banner_bottom() -> f64 {
    gloo_utils::document()
        .get_element_by_id("banner-placeholder")
        .map(|banner| banner.get_bounding_client_rect().bottom().max(0.0))
        .unwrap_or(0.0)
}

impl Library {
    fn listeners(ctx: &Context<Self>) -> Vec<EventListener> {
        let window = gloo_utils::window();
        let document = gloo_utils::document();

        let link = ctx.link().clone();
        let popstate = EventListener::new(&window, "popstate", move |event| {
            let state = event
                .dyn_ref::<PopStateEvent>()
                .and_then(|e| utils::nav_state(&e.state()));
            link.send_message(LibraryMsg::PopState(state));
        });

        let link = ctx.link().clone();
        let hashchange = EventListener::new(&window, "hashchange", move |_| {
            link.send_message(LibraryMsg::HashChanged);
        });

        let link = ctx.link().clone();
        let scroll = EventListener::new(&window, "scroll", move |_| {
            link.send_message(LibraryMsg::Layout);
        });

        let link = ctx.link().clone();
        let resize = EventListener::new(&window, "resize", move |_| {
            link.send_message(LibraryMsg::Layout);
        });

        let link = ctx.link().clone();
        let click = EventListener::new(&document, "click", move |event| {
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map_or(false, |el| {
                    matches!(el.closest("#sidebar, .sidebar-floating-toggle"), Ok(Some(_)))
                });
            if !inside {
                link.send_message(LibraryMsg::CloseSidebar);
            }
        });

        vec![popstate, hashchange, scroll, resize, click]
    }

    fn load_manifest(ctx: &Context<Self>) {
        let section = ctx.props().section;
        ctx.link().send_future(async move {
            LibraryMsg::ManifestLoaded(loader::load_manifest(section).await)
        });
    }

    fn select_from_url(&mut self, section: Section) -> bool {
        let index = self.store.initial_index(utils::url_selection(section));
        let changed = index != self.selected;
        self.selected = index;
        changed
    }

    fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
        utils::toggle_body_class("no-scroll", open);
        utils::toggle_root_class("no-scroll", open);
    }
}

impl Component for Library {
    type Message = LibraryMsg;
    type Properties = LibraryProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self::load_manifest(ctx);
        let config = UiConfig::default();
        let narrow = config.is_narrow(utils::viewport().width);
        Self {
            config,
            store: ContentStore::new(),
            entries: Rc::new(Vec::new()),
            selected: None,
            failed: false,
            sidebar_open: false,
            sidebar_collapsed: false,
            narrow,
            sidebar_top: banner_bottom(),
            _listeners: Self::listeners(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let section = ctx.props().section;
        match msg {
            LibraryMsg::ManifestLoaded(Ok(items)) => {
                log::info!("Loaded {} entries for {:?}", items.len(), section);
                self.entries = Rc::new(build_entries(&items));
                self.store.set_current(items);
                self.failed = false;
                self.select_from_url(section);
                true
            }
            LibraryMsg::ManifestLoaded(Err(e)) => {
                log::error!("Failed to load the {:?} list: {}", section, e);
                self.failed = true;
                true
            }
            LibraryMsg::Select(index) => {
                let selection = resolve_selection(
                    self.store.current(),
                    index,
                    utils::url_selection(section),
                );
                if selection == Selection::Missing {
                    return false;
                }
                if self.narrow {
                    self.set_sidebar_open(false);
                }
                if let Selection::Load(number) = selection {
                    if let Some(number) = number {
                        utils::push_history(
                            &NavState::Selection(number),
                            &selection_query(section, number),
                        );
                    }
                    self.selected = Some(index);
                }
                true
            }
            LibraryMsg::PopState(Some(NavState::Anchor(id))) => {
                utils::scroll_to_anchor(&id);
                false
            }
            LibraryMsg::PopState(_) => {
                if self.store.is_empty() {
                    Self::load_manifest(ctx);
                    return false;
                }
                self.select_from_url(section)
            }
            LibraryMsg::HashChanged => {
                if let Some(id) = anchor_id(&utils::current_hash()) {
                    utils::scroll_to_anchor(id);
                }
                false
            }
            LibraryMsg::ToggleSidebar => {
                if self.narrow {
                    self.set_sidebar_open(!self.sidebar_open);
                } else {
                    self.sidebar_collapsed = !self.sidebar_collapsed;
                }
                true
            }
            LibraryMsg::CloseSidebar => {
                if self.narrow && self.sidebar_open {
                    self.set_sidebar_open(false);
                    true
                } else {
                    false
                }
            }
            LibraryMsg::Layout => {
                let narrow = self.config.is_narrow(utils::viewport().width);
                let top = banner_bottom();
                let mut changed = false;
                if narrow != self.narrow {
                    self.narrow = narrow;
                    if !narrow && self.sidebar_open {
                        self.set_sidebar_open(false);
                    }
                    changed = true;
                }
                if (top - self.sidebar_top).abs() >= 0.5 {
                    self.sidebar_top = top;
                    changed = true;
                }
                changed
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let section = ctx.props().section;
        let item = self.selected.and_then(|i| self.store.current().get(i)).cloned();
        let content_class = classes!(
            "content-area",
            (!self.narrow && self.sidebar_collapsed).then_some("sidebar-collapsed"),
        );

        html! {
            <div class={classes!("library", format!("{}-page", section.css_prefix()))}>
                <Sidebar
                    {section}
                    entries={self.entries.clone()}
                    active={self.selected}
                    open={self.narrow && self.sidebar_open}
                    collapsed={!self.narrow && self.sidebar_collapsed}
                    top={self.sidebar_top}
                    failed={self.failed}
                    on_select={ctx.link().callback(LibraryMsg::Select)}
                    on_toggle={ctx.link().callback(|_| LibraryMsg::ToggleSidebar)}
                />
                <main class={content_class}>
                    <ContentView {section} {item} />
                </main>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        utils::toggle_body_class("no-scroll", false);
        utils::toggle_root_class("no-scroll", false);
    }
}
