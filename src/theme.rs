// src/theme.rs
use crate::site_config::THEME_STORAGE_KEY;
use gloo::storage::{LocalStorage, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Sepia,
}

impl Theme {
    /// Next theme in the toggle cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Sepia,
            Theme::Sepia => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Sepia => "sepia",
        }
    }

    /// Stored theme name. Accepts the JSON-quoted form older saves used.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().trim_matches('"') {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            "sepia" => Some(Theme::Sepia),
            _ => None,
        }
    }

    /// Saved preference, or the default when nothing usable is stored.
    pub fn load() -> Self {
        LocalStorage::raw()
            .get_item(THEME_STORAGE_KEY)
            .ok()
            .flatten()
            .and_then(|name| Theme::parse(&name))
            .unwrap_or_default()
    }

    pub fn save(self) {
        if let Err(e) = LocalStorage::raw().set_item(THEME_STORAGE_KEY, self.as_str()) {
            log::warn!("Could not persist theme: {:?}", e);
        }
    }

    /// Set `data-theme` on the root element.
    pub fn apply(self) {
        let root = gloo_utils::document_element();
        if let Err(e) = root.set_attribute("data-theme", self.as_str()) {
            log::warn!("Could not apply theme: {:?}", e);
        }
    }

    /// Symbol shown on the toggle button.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☾",
            Theme::Light => "☀",
            Theme::Sepia => "❦",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_home() {
        let start = Theme::default();
        assert_eq!(start, Theme::Dark);
        assert_eq!(start.next(), Theme::Light);
        assert_eq!(start.next().next(), Theme::Sepia);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_names_round_trip() {
        for theme in [Theme::Dark, Theme::Light, Theme::Sepia] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse(" light\n"), Some(Theme::Light));
        assert_eq!(Theme::parse("\"sepia\""), Some(Theme::Sepia));
        assert_eq!(Theme::parse("neon"), None);
        assert_eq!(Theme::parse(""), None);
    }
}
