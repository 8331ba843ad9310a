// src/loader.rs
//
// Static-file fetches. Every path is resolved against the page's base path
// before it goes out.

use crate::error::LoadError;
use crate::manifest::ListItem;
use crate::markdown::{prepare_document, Document};
use crate::site_config::{Section, HISTORY_FILE};
use crate::tooltip::TooltipDescriptor;
use crate::utils::resource_url;
use gloo_net::http::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

async fn get_ok(path: &str) -> Result<Response, LoadError> {
    let url = resource_url(path);
    let resp = Request::get(&url).send().await?;
    if !resp.ok() {
        return Err(LoadError::Status {
            url,
            status: resp.status(),
        });
    }
    Ok(resp)
}

pub async fn fetch_text(path: &str) -> Result<String, LoadError> {
    let resp = get_ok(path).await?;
    Ok(resp.text().await?)
}

pub async fn fetch_json<T: DeserializeOwned>(path: &str) -> Result<T, LoadError> {
    let body = fetch_text(path).await?;
    Ok(serde_json::from_str(&body)?)
}

/// HEAD request; true only for a success status.
pub async fn exists(path: &str) -> bool {
    let url = resource_url(path);
    match RequestBuilder::new(&url).method(Method::HEAD).send().await {
        Ok(resp) => resp.ok(),
        Err(e) => {
            log::debug!("HEAD request for {} failed: {}", url, e);
            false
        }
    }
}

pub async fn load_manifest(section: Section) -> Result<Vec<ListItem>, LoadError> {
    let items: Vec<ListItem> = fetch_json(section.manifest_path()).await?;
    log::info!("Loaded {} entries from {}", items.len(), section.manifest_path());
    Ok(items)
}

pub async fn load_document(section: Section, folder: &str) -> Result<Document, LoadError> {
    let raw = fetch_text(&section.document_path(folder)).await?;
    Ok(prepare_document(&raw, &section.resource_dir(folder)))
}

pub async fn load_tooltips(
    section: Section,
    folder: &str,
) -> Result<HashMap<String, TooltipDescriptor>, LoadError> {
    fetch_json(&section.tooltip_path(folder)).await
}

/// One line of the home page's recent-updates list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub date: Option<String>,
}

pub async fn load_history() -> Result<Vec<HistoryEntry>, LoadError> {
    fetch_json(HISTORY_FILE).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_shape() {
        let entries: Vec<HistoryEntry> = serde_json::from_str(
            r#"[{"type": "poem", "name": "Sunset", "link": "poems.html?poem=3", "date": "2024-01-02"},
                {"type": "blog", "name": "Trip", "link": "blogs.html?blog=1"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].kind, "poem");
        assert_eq!(entries[1].date, None);
    }
}
