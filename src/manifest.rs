// src/manifest.rs
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One poem or blog entry as listed in a section manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub folder: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

fn leading_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^\s*(?:\d{4}-\d{2}(?:-\d{2})?|\d+)[\s._\-]*").expect("valid prefix pattern")
    })
}

fn file_extension() -> &'static Regex {
    static EXT: OnceLock<Regex> = OnceLock::new();
    EXT.get_or_init(|| Regex::new(r"(?i)\.(md|mp3)$").expect("valid extension pattern"))
}

impl ListItem {
    #[cfg(test)]
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: None,
            title: None,
            date: None,
            audio: None,
        }
    }

    #[cfg(test)]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    #[cfg(test)]
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    /// Numeric prefix of the folder; the entry's identity in URLs.
    pub fn folder_number(&self) -> Option<u32> {
        let digits: String = self
            .folder
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// Year of the entry's date, if it has a parseable one.
    pub fn year(&self) -> Option<i32> {
        let date = self.date.as_deref()?.trim();
        date.get(..4)?.parse().ok()
    }

    /// Human title with numeric/date prefixes, extensions and underscores
    /// removed. Titles derived from file or folder names are capitalized
    /// word by word; an explicit `title` keeps its own casing.
    pub fn clean_title(&self) -> String {
        let (raw, explicit) = match (self.title.as_deref(), self.name.as_deref()) {
            (Some(title), _) => (title, true),
            (None, Some(name)) => (name, false),
            (None, None) => (self.folder.as_str(), false),
        };
        let mut title = file_extension().replace(raw, "").into_owned();
        loop {
            let stripped = leading_prefix().replace(&title, "").into_owned();
            if stripped == title || stripped.is_empty() {
                break;
            }
            title = stripped;
        }
        let title = title.replace('_', " ");
        if explicit {
            title.trim().to_string()
        } else {
            capitalize_words(title.trim())
        }
    }
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The manifest currently backing a listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStore {
    items: Vec<ListItem>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[ListItem] {
        &self.items
    }

    pub fn set_current(&mut self, items: Vec<ListItem>) {
        self.items = items;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ListItem> {
        self.items.get(index)
    }

    pub fn index_of_number(&self, number: u32) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.folder_number() == Some(number))
    }

    /// Entry named by the URL parameter, else the first entry.
    pub fn initial_index(&self, param: Option<u32>) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(param.and_then(|n| self.index_of_number(n)).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_entries() {
        let json = r#"[
            {"name": "3_sunset_over_the_bay.md", "folder": "3_sunset", "audio": "sunset.mp3", "date": "2023-05-01"},
            {"folder": "12_trip", "title": "A Trip North"}
        ]"#;
        let items: Vec<ListItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].audio.as_deref(), Some("sunset.mp3"));
        assert_eq!(items[1].title.as_deref(), Some("A Trip North"));
        assert_eq!(items[1].date, None);
    }

    #[test]
    fn test_folder_number() {
        assert_eq!(ListItem::new("12_trip").folder_number(), Some(12));
        assert_eq!(ListItem::new("007-x").folder_number(), Some(7));
        assert_eq!(ListItem::new("notes").folder_number(), None);
    }

    #[test]
    fn test_clean_title() {
        let mut item = ListItem::new("3_sunset");
        item.name = Some("3_sunset_over_the_bay.md".to_string());
        assert_eq!(item.clean_title(), "Sunset Over The Bay");

        let item = ListItem::new("5_x").with_title("2024-01-02 - New Year");
        assert_eq!(item.clean_title(), "New Year");

        assert_eq!(ListItem::new("8_walks").clean_title(), "Walks");
        assert_eq!(ListItem::new("1984").clean_title(), "1984");
    }

    #[test]
    fn test_year() {
        assert_eq!(ListItem::new("1").with_date("2023-05").year(), Some(2023));
        assert_eq!(ListItem::new("1").with_date("soon").year(), None);
        assert_eq!(ListItem::new("1").year(), None);
    }

    #[test]
    fn test_store_lookup() {
        let mut store = ContentStore::new();
        assert_eq!(store.initial_index(Some(3)), None);
        store.set_current(vec![ListItem::new("12_a"), ListItem::new("3_b")]);
        assert_eq!(store.index_of_number(3), Some(1));
        assert_eq!(store.initial_index(Some(3)), Some(1));
        assert_eq!(store.initial_index(Some(99)), Some(0));
        assert_eq!(store.initial_index(None), Some(0));
    }
}
