// src/main.rs
mod audio;
mod bindings;
mod components;
mod date;
mod error;
mod geometry;
mod lightbox;
mod listing;
mod loader;
mod manifest;
mod markdown;
mod route;
mod site_config;
mod theme;
mod timer;
mod tooltip;
mod utils;

use audio::AudioHub;
use components::back_to_top::BackToTop;
use components::banner::Banner;
use components::library::Library;
use components::recent::RecentUpdates;
use site_config::PageKind;
use theme::Theme;
use yew::prelude::*;

pub enum AppMsg {
    CycleTheme,
}

pub struct App {
    page: PageKind,
    theme: Theme,
    audio: AudioHub,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let theme = Theme::load();
        theme.apply();
        let page = PageKind::from_pathname(&utils::current_pathname());
        log::info!("Starting {:?} page with the {} theme", page, theme.as_str());

        Self {
            page,
            theme,
            audio: AudioHub::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::CycleTheme => {
                self.theme = self.theme.next();
                self.theme.apply();
                self.theme.save();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match self.page {
            PageKind::Home => html! {
                <main class="home">
                    <RecentUpdates />
                </main>
            },
            PageKind::Library(section) => html! { <Library {section} /> },
        };

        html! {
            <ContextProvider<AudioHub> context={self.audio.clone()}>
                <div class="app-container">
                    <Banner
                        page={self.page}
                        theme={self.theme}
                        on_cycle_theme={ctx.link().callback(|_| AppMsg::CycleTheme)}
                    />
                    { body }
                    <BackToTop />
                </div>
            </ContextProvider<AudioHub>>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
