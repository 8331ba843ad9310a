// src/site_config.rs
use serde::{Deserialize, Serialize};

/// The two content sections the site serves. Every path convention for a
/// section lives here so loaders never format paths on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Poems,
    Blogs,
}

impl Section {
    pub fn manifest_path(&self) -> &'static str {
        match self {
            Section::Poems => "poems/poems_manifest.json",
            Section::Blogs => "blogs/blogs_manifest.json",
        }
    }

    pub fn document_path(&self, folder: &str) -> String {
        match self {
            Section::Poems => format!("poems/{}/poem.md", folder),
            Section::Blogs => format!("blogs/{}/blog.md", folder),
        }
    }

    /// Folder that bare media filenames inside a document resolve against.
    pub fn resource_dir(&self, folder: &str) -> String {
        match self {
            Section::Poems => format!("poems/{}", folder),
            Section::Blogs => format!("blogs/{}/res", folder),
        }
    }

    pub fn tooltip_path(&self, folder: &str) -> String {
        format!("{}/tooltips.json", self.resource_dir(folder))
    }

    pub fn audio_path(&self, folder: &str, encoded_file: &str) -> String {
        format!("{}/{}", self.resource_dir(folder), encoded_file)
    }

    /// Query-string key carrying the selected folder number.
    pub fn query_key(&self) -> &'static str {
        match self {
            Section::Poems => "poem",
            Section::Blogs => "blog",
        }
    }

    pub fn load_error_text(&self) -> &'static str {
        match self {
            Section::Poems => "Error loading poem.",
            Section::Blogs => "Failed to load blog post.",
        }
    }

    pub fn loading_text(&self) -> &'static str {
        match self {
            Section::Poems => "Loading poem...",
            Section::Blogs => "Loading blog post...",
        }
    }

    pub fn search_placeholder(&self) -> &'static str {
        match self {
            Section::Poems => "Search poems...",
            Section::Blogs => "Search blogs...",
        }
    }

    pub fn css_prefix(&self) -> &'static str {
        match self {
            Section::Poems => "poem",
            Section::Blogs => "blog",
        }
    }
}

/// Which page the current document is, derived from the pathname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Library(Section),
}

impl PageKind {
    pub fn from_pathname(pathname: &str) -> Self {
        if pathname.contains("poems") {
            PageKind::Library(Section::Poems)
        } else if pathname.contains("blogs") {
            PageKind::Library(Section::Blogs)
        } else {
            PageKind::Home
        }
    }
}

pub const BANNER_FRAGMENT: &str = "banner.html";
pub const HEADER_FRAGMENT: &str = "header.html";
pub const HISTORY_FILE: &str = "resources/history.json";
pub const THEME_STORAGE_KEY: &str = "theme";

/// Timing and layout constants for the interactive chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub show_delay_ms: u32,
    pub hide_delay_ms: u32,
    pub tooltip_fade_ms: u32,
    pub zoom_fade_ms: u32,
    pub resize_debounce_ms: u32,
    pub zoom_multipliers: Vec<f64>,
    pub narrow_breakpoint: f64,
    pub swipe_threshold: f64,
    pub tooltip_margin: f64,
    pub tooltip_gap: f64,
    pub default_tooltip_width: f64,
    pub default_tooltip_height: f64,
    /// Horizontal space taken by the lightbox nav buttons and padding.
    pub lightbox_chrome: f64,
    pub lightbox_mobile_width_ratio: f64,
    pub lightbox_height_ratio: f64,
    pub back_to_top_threshold: f64,
    pub menu_margin: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 500,
            hide_delay_ms: 1000,
            tooltip_fade_ms: 300,
            zoom_fade_ms: 20,
            resize_debounce_ms: 100,
            zoom_multipliers: vec![1.0, 1.5, 2.0],
            narrow_breakpoint: 800.0,
            swipe_threshold: 50.0,
            tooltip_margin: 10.0,
            tooltip_gap: 10.0,
            default_tooltip_width: 250.0,
            default_tooltip_height: 100.0,
            lightbox_chrome: 160.0,
            lightbox_mobile_width_ratio: 0.95,
            lightbox_height_ratio: 0.9,
            back_to_top_threshold: 200.0,
            menu_margin: 8.0,
        }
    }
}

impl UiConfig {
    pub fn is_narrow(&self, viewport_width: f64) -> bool {
        viewport_width <= self.narrow_breakpoint
    }
}
