// src/components/sidebar.rs
use crate::listing::{search, split_highlight, ListEntry, ListRow, TapGate, TapOutcome, Visibility};
use crate::site_config::{Section, UiConfig};
use crate::utils;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{HtmlInputElement, PointerEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub section: Section,
    pub entries: Rc<Vec<ListEntry>>,
    /// Manifest index of the entry being shown.
    pub active: Option<usize>,
    pub open: bool,
    pub collapsed: bool,
    pub top: f64,
    pub failed: bool,
    pub on_select: Callback<usize>,
    pub on_toggle: Callback<()>,
}

fn row_label(row: &ListRow, visibility: &Visibility) -> Html {
    match visibility {
        Visibility::Shown(Some(range)) if !range.is_empty() => {
            let (before, mark, after) = split_highlight(&row.label, range);
            html! { <>{ before }<mark>{ mark }</mark>{ after }</> }
        }
        _ => html! { { row.label.clone() } },
    }
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let query = use_state(String::new);
    let gate = use_state(TapGate::new);
    let last_pointer = use_mut_ref(|| String::from("mouse"));
    let config = use_memo((), |_| UiConfig::default());

    let view = search(&props.entries, &query);

    let oninput = {
        let query = query.clone();
        let gate = gate.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
            if gate.revealed().is_some() {
                let mut next = (*gate).clone();
                next.reset();
                gate.set(next);
            }
        })
    };

    let ontoggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_toggle.emit(());
        })
    };

    let item_view = |row: &ListRow, visibility: &Visibility| -> Html {
        let index = row.index;
        let has_date = row.date.is_some();
        let onpointerdown = {
            let last_pointer = last_pointer.clone();
            Callback::from(move |e: PointerEvent| {
                *last_pointer.borrow_mut() = e.pointer_type();
            })
        };
        let onclick = {
            let gate = gate.clone();
            let last_pointer: Rc<RefCell<String>> = last_pointer.clone();
            let on_select = props.on_select.clone();
            let config = config.clone();
            Callback::from(move |e: MouseEvent| {
                e.prevent_default();
                let touch = last_pointer.borrow().as_str() == "touch";
                let narrow = config.is_narrow(utils::viewport().width);
                let mut next = (*gate).clone();
                let outcome = next.tap(index, has_date, touch && narrow);
                gate.set(next);
                if outcome == TapOutcome::Navigate {
                    on_select.emit(index);
                }
            })
        };
        let hidden = *visibility == Visibility::Hidden;
        let revealed = gate.revealed() == Some(index);
        let class = classes!(
            "list-item",
            (props.active == Some(index)).then_some("active"),
            revealed.then_some("date-revealed"),
        );
        html! {
            <li key={format!("row-{}", index)} {class} style={hidden.then_some("display: none;")}>
                <a href={format!("?{}={}", props.section.query_key(), row.folder_number.unwrap_or_default())} {onclick} {onpointerdown}>
                    <span class="item-title">{ row_label(row, visibility) }</span>
                    if let Some(date) = row.date.clone() {
                        <span class="item-date">{ date }</span>
                    }
                </a>
            </li>
        }
    };

    let items = props.entries.iter().zip(view.visibility.iter()).map(|(entry, visibility)| {
        match entry {
            ListEntry::Separator(year) => html! {
                <li
                    key={format!("year-{}", year)}
                    class="year-separator"
                    style={(*visibility == Visibility::Hidden).then_some("display: none;")}
                >
                    { year }
                </li>
            },
            ListEntry::Row(row) => item_view(row, visibility),
        }
    });

    let prefix = props.section.css_prefix();
    let class = classes!(
        "sidebar",
        format!("{}-list", prefix),
        props.open.then_some("show"),
        props.collapsed.then_some("collapsed"),
    );

    html! {
        <>
            <aside id="sidebar" {class} style={format!("top: {:.0}px;", props.top)}>
                <div class="sidebar-header">
                    <button id="toggleSidebar" class="sidebar-toggle" aria-label="Toggle list" onclick={ontoggle.clone()}>
                        {"☰"}
                    </button>
                    <input
                        class="sidebar-search"
                        type="search"
                        placeholder={props.section.search_placeholder()}
                        value={(*query).clone()}
                        {oninput}
                    />
                </div>
                <ul class="sidebar-items">
                    if props.failed {
                        <li class="list-error">{"Failed to load the list."}</li>
                    }
                    { for items }
                    if view.no_results {
                        <li key="no-results" class="no-results">{"No results found"}</li>
                    }
                </ul>
            </aside>
            <button
                id="sidebarFloatingToggle"
                class={classes!("sidebar-floating-toggle", props.open.then_some("hidden"))}
                aria-label="Show list"
                onclick={ontoggle}
            >
                {"☰"}
            </button>
        </>
    }
}
