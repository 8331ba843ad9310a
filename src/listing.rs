// src/listing.rs
//
// Rows of the sidebar list: labels, date badges, year separators, search
// filtering with highlight ranges, and the two-tap date reveal.

use crate::date::format_date;
use crate::manifest::ListItem;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    /// Position in the manifest.
    pub index: usize,
    pub folder_number: Option<u32>,
    pub label: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    Separator(i32),
    Row(ListRow),
}

/// Build the list for a manifest. Rows are numbered in reverse, so the last
/// manifest entry (the oldest) is 0. A separator goes in front of an entry
/// whose year differs from the most recent dated entry above it.
pub fn build_entries(items: &[ListItem]) -> Vec<ListEntry> {
    let mut entries = Vec::with_capacity(items.len());
    let mut last_year = None;
    for (index, item) in items.iter().enumerate() {
        if let Some(year) = item.year() {
            if last_year.is_some() && last_year != Some(year) {
                entries.push(ListEntry::Separator(year));
            }
            last_year = Some(year);
        }
        entries.push(ListEntry::Row(ListRow {
            index,
            folder_number: item.folder_number(),
            label: format!("{} - {}", items.len() - 1 - index, item.clean_title()),
            date: item.date.as_deref().map(format_date),
        }));
    }
    entries
}

/// Byte range of the first case-insensitive occurrence of `query` in
/// `label`. The comparison is char by char so the range always lands on
/// char boundaries of the original text.
pub fn find_match(label: &str, query: &str) -> Option<Range<usize>> {
    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() {
        return Some(0..0);
    }
    let hay: Vec<(usize, char)> = label.char_indices().map(|(i, c)| (i, fold(c))).collect();
    hay.windows(needle.len()).find_map(|window| {
        let matches = window.iter().zip(&needle).all(|((_, a), b)| a == b);
        if !matches {
            return None;
        }
        let (start, _) = window[0];
        let (last, last_char) = window[window.len() - 1];
        let original_last = label[last..].chars().next().unwrap_or(last_char);
        Some(start..last + original_last.len_utf8())
    })
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visibility {
    Hidden,
    /// Shown, with the range to wrap in `<mark>` when searching.
    Shown(Option<Range<usize>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    /// One entry per list entry, in order.
    pub visibility: Vec<Visibility>,
    pub no_results: bool,
}

/// Filter the list for `query`. Separators stay visible only while their
/// year group has a visible row.
pub fn search(entries: &[ListEntry], query: &str) -> SearchView {
    if query.is_empty() {
        return SearchView {
            visibility: vec![Visibility::Shown(None); entries.len()],
            no_results: false,
        };
    }

    let mut visibility: Vec<Visibility> = entries
        .iter()
        .map(|entry| match entry {
            ListEntry::Row(row) => match find_match(&row.label, query) {
                Some(range) => Visibility::Shown(Some(range)),
                None => Visibility::Hidden,
            },
            ListEntry::Separator(_) => Visibility::Hidden,
        })
        .collect();

    for (i, entry) in entries.iter().enumerate() {
        if let ListEntry::Separator(_) = entry {
            let group_visible = entries[i + 1..]
                .iter()
                .zip(&visibility[i + 1..])
                .take_while(|(e, _)| matches!(e, ListEntry::Row(_)))
                .any(|(_, v)| *v != Visibility::Hidden);
            if group_visible {
                visibility[i] = Visibility::Shown(None);
            }
        }
    }

    let visible_rows = entries
        .iter()
        .zip(&visibility)
        .filter(|(e, v)| matches!(e, ListEntry::Row(_)) && **v != Visibility::Hidden)
        .count();

    SearchView {
        visibility,
        no_results: visible_rows == 0,
    }
}

/// Split a label around a highlight range.
pub fn split_highlight<'a>(label: &'a str, range: &Range<usize>) -> (&'a str, &'a str, &'a str) {
    (
        &label[..range.start],
        &label[range.start..range.end],
        &label[range.end..],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    RevealDate,
    Navigate,
}

/// Two-tap behaviour for touch on narrow screens: the first tap on a dated
/// row shows its date, the second follows the link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapGate {
    revealed: Option<usize>,
}

impl TapGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tap(&mut self, index: usize, has_date: bool, touch_on_narrow: bool) -> TapOutcome {
        if !touch_on_narrow || !has_date || self.revealed == Some(index) {
            self.revealed = None;
            return TapOutcome::Navigate;
        }
        self.revealed = Some(index);
        TapOutcome::RevealDate
    }

    pub fn revealed(&self) -> Option<usize> {
        self.revealed
    }

    pub fn reset(&mut self) {
        self.revealed = None;
    }
}

/// Whether `item` is the entry already named in the URL.
pub fn is_same_selection(item: &ListItem, url_number: Option<u32>) -> bool {
    match (item.folder_number(), url_number) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// What picking a list entry should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing at that position.
    Missing,
    /// The entry the URL already names; no refetch.
    Current,
    /// Show the entry and push its folder number, when it has one.
    Load(Option<u32>),
}

pub fn resolve_selection(items: &[ListItem], index: usize, url_number: Option<u32>) -> Selection {
    match items.get(index) {
        None => Selection::Missing,
        Some(item) if is_same_selection(item, url_number) => Selection::Current,
        Some(item) => Selection::Load(item.folder_number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(folder: &str, date: &str) -> ListItem {
        ListItem::new(folder).with_date(date)
    }

    fn rows(entries: &[ListEntry]) -> Vec<&ListRow> {
        entries
            .iter()
            .filter_map(|e| match e {
                ListEntry::Row(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_year_separator() {
        let items = vec![
            dated("3_a", "2023-05-01"),
            dated("2_b", "2023-08-01"),
            dated("1_c", "2024-01-01"),
        ];
        let entries = build_entries(&items);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2], ListEntry::Separator(2024));
        assert!(matches!(entries[0], ListEntry::Row(_)));
        assert!(matches!(entries[1], ListEntry::Row(_)));
    }

    #[test]
    fn test_undated_entries_do_not_split_years() {
        let items = vec![
            dated("3_a", "2023-05-01"),
            ListItem::new("2_b"),
            dated("1_c", "2023-01-01"),
        ];
        let entries = build_entries(&items);
        assert!(entries.iter().all(|e| matches!(e, ListEntry::Row(_))));
    }

    #[test]
    fn test_labels_count_down() {
        let mut item = ListItem::new("3_sunset");
        item.name = Some("3_sunset_over_the_bay.md".to_string());
        let items = vec![item, ListItem::new("2_x"), ListItem::new("1_y"), ListItem::new("0_z")];
        let entries = build_entries(&items);
        let rows = rows(&entries);
        assert_eq!(rows[0].label, "3 - Sunset Over The Bay");
        assert_eq!(rows[3].label, "0 - Z");
        assert_eq!(rows[0].folder_number, Some(3));
    }

    #[test]
    fn test_date_badge_formatted() {
        let entries = build_entries(&[dated("1_a", "2023-05-01")]);
        assert_eq!(rows(&entries)[0].date.as_deref(), Some("May 1, 2023"));
    }

    #[test]
    fn test_search_highlights_match() {
        let entries = vec![ListEntry::Row(ListRow {
            index: 0,
            folder_number: Some(3),
            label: "3 - Sunset Over The Bay".to_string(),
            date: None,
        })];
        let view = search(&entries, "sunset");
        assert!(!view.no_results);
        match &view.visibility[0] {
            Visibility::Shown(Some(range)) => {
                let (before, mark, after) = split_highlight("3 - Sunset Over The Bay", range);
                assert_eq!(before, "3 - ");
                assert_eq!(mark, "Sunset");
                assert_eq!(after, " Over The Bay");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_search_no_results_and_clear() {
        let items = vec![dated("2_a", "2023-01-01"), dated("1_b", "2024-01-01")];
        let entries = build_entries(&items);

        let view = search(&entries, "zzz");
        assert!(view.no_results);
        assert!(view.visibility.iter().all(|v| *v == Visibility::Hidden));

        let cleared = search(&entries, "");
        assert!(!cleared.no_results);
        assert!(cleared.visibility.iter().all(|v| *v == Visibility::Shown(None)));
    }

    #[test]
    fn test_search_keeps_whitespace() {
        let items = vec![dated("2_a", "2023-01-01"), dated("1_b", "2024-01-01")];
        let entries = build_entries(&items);

        let view = search(&entries, "   ");
        assert!(view.no_results);

        let entries = vec![ListEntry::Row(ListRow {
            index: 0,
            folder_number: Some(3),
            label: "3 - Sunset".to_string(),
            date: None,
        })];
        let view = search(&entries, "sunset ");
        assert!(view.no_results);
        let view = search(&entries, " sunset");
        assert!(!view.no_results);
    }

    #[test]
    fn test_separator_follows_its_group() {
        let mut a = dated("2_a", "2023-01-01");
        a.title = Some("Alpha".to_string());
        let mut b = dated("1_b", "2024-01-01");
        b.title = Some("Beta".to_string());
        let entries = build_entries(&[a, b]);

        let view = search(&entries, "alpha");
        assert_eq!(view.visibility[1], Visibility::Hidden);

        let view = search(&entries, "beta");
        assert_eq!(view.visibility[1], Visibility::Shown(None));
        assert_eq!(view.visibility[0], Visibility::Hidden);
    }

    #[test]
    fn test_find_match_non_ascii() {
        let label = "2 - Ärger über Öl";
        let range = find_match(label, "über").unwrap();
        assert_eq!(&label[range], "über");
        let range = find_match(label, "äRGER").unwrap();
        assert_eq!(&label[range], "Ärger");
        assert_eq!(find_match(label, "xyz"), None);
    }

    #[test]
    fn test_two_tap_reveal() {
        let mut gate = TapGate::new();
        assert_eq!(gate.tap(2, true, true), TapOutcome::RevealDate);
        assert_eq!(gate.revealed(), Some(2));
        assert_eq!(gate.tap(2, true, true), TapOutcome::Navigate);
        assert_eq!(gate.revealed(), None);
    }

    #[test]
    fn test_reset_needs_two_taps_again() {
        let mut gate = TapGate::new();
        gate.tap(3, true, true);
        gate.reset();
        assert_eq!(gate.revealed(), None);
        assert_eq!(gate.tap(3, true, true), TapOutcome::RevealDate);
    }

    #[test]
    fn test_tap_switches_revealed_row() {
        let mut gate = TapGate::new();
        gate.tap(1, true, true);
        assert_eq!(gate.tap(4, true, true), TapOutcome::RevealDate);
        assert_eq!(gate.revealed(), Some(4));
    }

    #[test]
    fn test_mouse_and_undated_navigate_immediately() {
        let mut gate = TapGate::new();
        assert_eq!(gate.tap(1, true, false), TapOutcome::Navigate);
        assert_eq!(gate.tap(1, false, true), TapOutcome::Navigate);
    }

    #[test]
    fn test_same_selection() {
        let item = ListItem::new("12_trip");
        assert!(is_same_selection(&item, Some(12)));
        assert!(!is_same_selection(&item, Some(1)));
        assert!(!is_same_selection(&item, None));
    }

    #[test]
    fn test_resolve_selection() {
        let items = vec![ListItem::new("12_trip"), ListItem::new("notes"), ListItem::new("3_sunset")];
        assert_eq!(resolve_selection(&items, 0, Some(12)), Selection::Current);
        assert_eq!(resolve_selection(&items, 2, Some(12)), Selection::Load(Some(3)));
        assert_eq!(resolve_selection(&items, 1, Some(12)), Selection::Load(None));
        assert_eq!(resolve_selection(&items, 0, None), Selection::Load(Some(12)));
        assert_eq!(resolve_selection(&items, 9, Some(12)), Selection::Missing);
    }
}
