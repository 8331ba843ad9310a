// src/route.rs
use crate::site_config::Section;
use serde::{Deserialize, Serialize};

/// What a history entry pushed by the site points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavState {
    Selection(u32),
    Anchor(String),
}

/// Query string selecting an entry, e.g. `?poem=3`.
pub fn selection_query(section: Section, number: u32) -> String {
    format!("?{}={}", section.query_key(), number)
}

/// Folder number from a decoded query parameter value.
pub fn parse_selection(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Target id of an in-page link, `None` for anything that isn't one.
pub fn anchor_id(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Directory part of a pathname: everything up to and including the last
/// `/`.
pub fn base_path(pathname: &str) -> &str {
    match pathname.rfind('/') {
        Some(i) => &pathname[..=i],
        None => "/",
    }
}

/// Document scroll position that puts an element right under the sticky
/// banner.
pub fn anchor_scroll_top(element_top: f64, scroll_y: f64, banner_height: f64) -> f64 {
    (element_top + scroll_y - banner_height.ceil() - 8.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_query() {
        assert_eq!(selection_query(Section::Poems, 12), "?poem=12");
        assert_eq!(selection_query(Section::Blogs, 0), "?blog=0");
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("12"), Some(12));
        assert_eq!(parse_selection(" 3 "), Some(3));
        assert_eq!(parse_selection("abc"), None);
        assert_eq!(parse_selection(""), None);
        assert_eq!(parse_selection("-1"), None);
    }

    #[test]
    fn test_anchor_id() {
        assert_eq!(anchor_id("#notes"), Some("notes"));
        assert_eq!(anchor_id("#"), None);
        assert_eq!(anchor_id("other.html#notes"), None);
    }

    #[test]
    fn test_base_path() {
        assert_eq!(base_path("/site/poems.html"), "/site/");
        assert_eq!(base_path("/"), "/");
        assert_eq!(base_path("index.html"), "/");
    }

    #[test]
    fn test_anchor_scroll_top() {
        assert_eq!(anchor_scroll_top(300.0, 1000.0, 59.2), 1000.0 + 300.0 - 60.0 - 8.0);
        assert_eq!(anchor_scroll_top(-500.0, 100.0, 60.0), 0.0);
    }

    #[test]
    fn test_nav_state_json() {
        let json = serde_json::to_string(&NavState::Anchor("intro".to_string())).unwrap();
        assert_eq!(json, r#"{"anchor":"intro"}"#);
        let back: NavState = serde_json::from_str(r#"{"selection":4}"#).unwrap();
        assert_eq!(back, NavState::Selection(4));
    }
}
