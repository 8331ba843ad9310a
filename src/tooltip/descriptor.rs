// src/tooltip/descriptor.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text and/or media backing one tooltip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    /// Still or animated image that can be opened fullscreen.
    Image,
    /// Anything else; shown as an image without the fullscreen affordance.
    Other,
}

const AUDIO_EXTENSIONS: [&str; 3] = [".mp3", ".wav", ".ogg"];
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

impl TooltipDescriptor {
    /// Cache key for measured geometry: the serialized descriptor.
    pub fn key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        let media = self.media.as_deref()?.to_ascii_lowercase();
        let path = media.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
        if AUDIO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            Some(MediaKind::Audio)
        } else if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            Some(MediaKind::Image)
        } else {
            Some(MediaKind::Other)
        }
    }

    /// Text with line breaks turned into `<br>` for HTML rendering.
    pub fn text_html(&self) -> Option<String> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| t.replace('\n', "<br>"))
    }

    /// Alt text for the fullscreen view, falling back to the tooltip text.
    pub fn display_alt(&self) -> String {
        self.alt
            .clone()
            .or_else(|| self.text.clone())
            .unwrap_or_else(|| "Tooltip media".to_string())
    }

    /// Rewrite a bare media filename into the content folder's resource
    /// path. Paths and URLs are left alone.
    pub fn scoped_to(mut self, resource_dir: &str) -> Self {
        if let Some(media) = self.media.as_ref() {
            if is_bare_filename(media) {
                self.media = Some(format!("{}/{}", resource_dir, media));
            }
        }
        self
    }
}

pub fn is_bare_filename(path: &str) -> bool {
    !path.is_empty() && !path.contains('/') && !path.contains(':')
}

/// The tooltip-related attributes read off a trigger element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriggerSpec {
    /// `tt` attribute: id into the folder's descriptor file.
    pub id: Option<String>,
    /// `data-tooltip` attribute: inline serialized descriptor.
    pub inline: Option<String>,
}

impl TriggerSpec {
    /// Resolve against the loaded descriptor table. The id path wins when
    /// present; an unknown id or malformed inline JSON yields `None`.
    pub fn resolve(&self, table: &HashMap<String, TooltipDescriptor>) -> Option<TooltipDescriptor> {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            let found = table.get(id).cloned();
            if found.is_none() {
                log::debug!("No tooltip descriptor for id {}", id);
            }
            return found;
        }
        let raw = self.inline.as_deref()?;
        match serde_json::from_str::<TooltipDescriptor>(raw) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                log::debug!("Skipping malformed inline tooltip: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HashMap<String, TooltipDescriptor> {
        let mut table = HashMap::new();
        table.insert(
            "cat".to_string(),
            TooltipDescriptor {
                text: Some("A cat".to_string()),
                media: Some("blogs/1_x/res/cat.gif".to_string()),
                alt: None,
            },
        );
        table
    }

    #[test]
    fn test_id_takes_precedence() {
        let spec = TriggerSpec {
            id: Some("cat".to_string()),
            inline: Some(r#"{"text":"inline"}"#.to_string()),
        };
        let resolved = spec.resolve(&table()).unwrap();
        assert_eq!(resolved.text.as_deref(), Some("A cat"));
    }

    #[test]
    fn test_unknown_id_does_not_fall_back_to_inline() {
        let spec = TriggerSpec {
            id: Some("dog".to_string()),
            inline: Some(r#"{"text":"inline"}"#.to_string()),
        };
        assert_eq!(spec.resolve(&table()), None);
    }

    #[test]
    fn test_inline_parse_and_failure() {
        let ok = TriggerSpec {
            id: None,
            inline: Some(r#"{"text":"Hello\nthere"}"#.to_string()),
        };
        let descriptor = ok.resolve(&table()).unwrap();
        assert_eq!(descriptor.text_html().as_deref(), Some("Hello<br>there"));

        let broken = TriggerSpec {
            id: None,
            inline: Some("{text: nope".to_string()),
        };
        assert_eq!(broken.resolve(&table()), None);
    }

    #[test]
    fn test_scoped_media() {
        let bare = TooltipDescriptor {
            media: Some("song.mp3".to_string()),
            ..Default::default()
        };
        assert_eq!(
            bare.scoped_to("blogs/2_y/res").media.as_deref(),
            Some("blogs/2_y/res/song.mp3")
        );
        let url = TooltipDescriptor {
            media: Some("https://example.org/a.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            url.scoped_to("blogs/2_y/res").media.as_deref(),
            Some("https://example.org/a.png")
        );
        let path = TooltipDescriptor {
            media: Some("shared/a.png".to_string()),
            ..Default::default()
        };
        assert_eq!(path.scoped_to("x").media.as_deref(), Some("shared/a.png"));
    }

    #[test]
    fn test_media_kind() {
        let kind = |m: &str| {
            TooltipDescriptor {
                media: Some(m.to_string()),
                ..Default::default()
            }
            .media_kind()
        };
        assert_eq!(kind("a/b.MP3"), Some(MediaKind::Audio));
        assert_eq!(kind("a/b.gif?t=1"), Some(MediaKind::Image));
        assert_eq!(kind("a/b.svg"), Some(MediaKind::Other));
        assert_eq!(TooltipDescriptor::default().media_kind(), None);
    }

    #[test]
    fn test_key_is_stable_for_equal_content() {
        let a: TooltipDescriptor = serde_json::from_str(r#"{"text":"x","media":"m.png"}"#).unwrap();
        let b: TooltipDescriptor = serde_json::from_str(r#"{"media":"m.png","text":"x"}"#).unwrap();
        assert_eq!(a.key(), b.key());
    }
}
