// src/markdown.rs
//
// Markdown documents as stored in content folders: front-matter date,
// media paths relative to the folder's resource directory, then HTML.

use crate::date::format_date;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Display form of the front-matter date.
    pub date: Option<String>,
    pub html: String,
}

/// Date + rewrite + render in one go.
pub fn prepare_document(raw: &str, resource_dir: &str) -> Document {
    let (date, body) = extract_date(raw);
    let body = rewrite_media(&body, resource_dir);
    Document {
        date: date.as_deref().map(format_date),
        html: render_markdown(&body),
    }
}

fn fenced_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\A\s*---[ \t]*\r?\ndate:[ \t]*(\d{4}-\d{2}(?:-\d{2})?)[ \t]*\r?\n---[ \t]*(?:\r?\n|\z)")
            .expect("valid fenced date pattern")
    })
}

fn leading_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\A\s*date:[ \t]*(\d{4}-\d{2}(?:-\d{2})?)[ \t]*(?:\r?\n|\z)(?:[ \t]*\r?\n)*(?:---[ \t]*(?:\r?\n|\z))?")
            .expect("valid leading date pattern")
    })
}

/// Pull the date out of a document, returning it with the remaining body.
/// Accepts a `---` fenced block or a bare leading `date:` line with an
/// optional rule after it.
pub fn extract_date(md: &str) -> (Option<String>, String) {
    for re in [fenced_date(), leading_date()] {
        if let Some(caps) = re.captures(md) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let date = caps.get(1).map(|m| m.as_str().to_string());
            let mut body = String::with_capacity(md.len());
            body.push_str(&md[..whole.start]);
            body.push_str(&md[whole.end..]);
            return (date, body);
        }
    }
    (None, md.to_string())
}

/// Bare filenames live in the resource directory; URLs and paths are
/// used as written.
pub fn resolve_src(src: &str, resource_dir: &str) -> String {
    if src.starts_with("http") || src.contains('/') {
        src.to_string()
    } else {
        format!("{}/{}", resource_dir, src)
    }
}

fn image_forms() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"\[<img(?P<link_attrs>[^>]+)>\]\((?P<link_src>[^)]+)\)"#,
            r#"|<img(?P<before>[^>]*?)src=["'](?P<raw_src>[^"']+)["'](?P<after>[^>]*)>"#,
            r#"|!\[(?P<alt>[^\]]*)\]\((?P<md_src>[^)]+)\)"#,
        ))
        .expect("valid image pattern")
    })
}

fn class_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)class=["']([^"']*)["']"#).expect("valid class pattern"))
}

fn src_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)\s*src=["'][^"']*["']"#).expect("valid src pattern"))
}

fn embed_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<embed[^>]+src=["']([^"']+)["'][^>]*>"#).expect("valid embed pattern")
    })
}

fn video_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<video([^>]*)>\s*<source([^>]*?)src=["']([^"']+)["']([^>]*)>\s*</video>"#)
            .expect("valid video pattern")
    })
}

fn video_shorthand() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!video\(([^)]+)\)").expect("valid video shorthand pattern"))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Move an element's own `class` attribute to the end, tidy the rest.
fn split_class(attrs: &str) -> (String, String) {
    let class = class_attr()
        .captures(attrs)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|c| !c.is_empty())
        .map(|c| format!(" class=\"{}\"", c))
        .unwrap_or_default();
    let rest = class_attr().replace(attrs, "");
    let rest = rest.trim();
    let rest = if rest.is_empty() {
        String::new()
    } else {
        format!(" {}", rest)
    };
    (rest, class)
}

fn rewrite_image(caps: &Captures, resource_dir: &str) -> String {
    if let (Some(attrs), Some(src)) = (caps.name("link_attrs"), caps.name("link_src")) {
        let attrs = src_attr().replace_all(attrs.as_str(), "");
        let (rest, class) = split_class(&attrs);
        let src = resolve_src(src.as_str().trim(), resource_dir);
        return format!(
            r#"<div class="image-wrapper"><img{}{} src="{}"></div>"#,
            rest, class, src
        );
    }
    if let Some(src) = caps.name("raw_src") {
        let before = caps.name("before").map(|m| m.as_str()).unwrap_or_default();
        let after = caps
            .name("after")
            .map(|m| m.as_str().trim().trim_end_matches('/').trim())
            .unwrap_or_default();
        let (rest, class) = split_class(before);
        let src = resolve_src(src.as_str(), resource_dir);
        let after = if after.is_empty() {
            String::new()
        } else {
            format!(" {}", after)
        };
        return format!(
            r#"<div class="image-wrapper"><img{}{} src="{}"{}></div>"#,
            rest, class, src, after
        );
    }
    let alt = caps.name("alt").map(|m| m.as_str()).unwrap_or_default();
    let src = caps.name("md_src").map(|m| m.as_str().trim()).unwrap_or_default();
    format!(
        r#"<div class="image-wrapper"><img class="hover-effect click-zoom" src="{}" alt="{}"></div>"#,
        resolve_src(src, resource_dir),
        escape_attr(alt)
    )
}

/// Point media at the document's resource directory and wrap images for
/// the lightbox. Every tag is matched by exactly one rule and rewritten
/// once.
pub fn rewrite_media(md: &str, resource_dir: &str) -> String {
    let md = image_forms().replace_all(md, |caps: &Captures| rewrite_image(caps, resource_dir));

    let md = embed_tag().replace_all(&md, |caps: &Captures| {
        let href = resolve_src(&caps[1], resource_dir);
        let filename = href.rsplit('/').next().unwrap_or(&href).to_string();
        format!(
            r#"<div class="pdf-placeholder"><a href="{}" target="_blank" rel="noopener noreferrer">Open schematic: {}</a></div>"#,
            href, filename
        )
    });

    let md = video_tag().replace_all(&md, |caps: &Captures| {
        format!(
            r#"<video{}> <source{}src="{}"{}> </video>"#,
            &caps[1],
            &caps[2],
            resolve_src(&caps[3], resource_dir),
            &caps[4]
        )
    });

    video_shorthand()
        .replace_all(&md, |caps: &Captures| {
            format!(
                r#"<video controls class="video-player"> <source src="{}" type="video/mp4"> Your browser does not support the video tag. </video>"#,
                resolve_src(caps[1].trim(), resource_dir)
            )
        })
        .into_owned()
}

pub fn render_markdown(md: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(md, options);
    let mut out = String::with_capacity(md.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: &str = "blogs/4_trip/res";

    #[test]
    fn test_extract_fenced_date() {
        let (date, body) = extract_date("---\ndate: 2023-05-01\n---\n# Title\n");
        assert_eq!(date.as_deref(), Some("2023-05-01"));
        assert_eq!(body, "# Title\n");
    }

    #[test]
    fn test_fenced_date_only_at_start() {
        let md = "# Title\n\nSome text\n---\ndate: 2023-05-01\n---\nMore\n";
        let (date, body) = extract_date(md);
        assert_eq!(date, None);
        assert_eq!(body, md);

        let (date, body) = extract_date("\n\n---\ndate: 2023-05\n---\nBody\n");
        assert_eq!(date.as_deref(), Some("2023-05"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_extract_leading_date_line() {
        let (date, body) = extract_date("date: 2024-02\n\n---\nFirst line\n");
        assert_eq!(date.as_deref(), Some("2024-02"));
        assert_eq!(body, "First line\n");

        let (date, body) = extract_date("date: 2024-02-10\nBody");
        assert_eq!(date.as_deref(), Some("2024-02-10"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_date_leaves_body() {
        let (date, body) = extract_date("Just words\n---\nmore");
        assert_eq!(date, None);
        assert_eq!(body, "Just words\n---\nmore");
    }

    #[test]
    fn test_resolve_src() {
        assert_eq!(resolve_src("a.png", RES), "blogs/4_trip/res/a.png");
        assert_eq!(resolve_src("shared/a.png", RES), "shared/a.png");
        assert_eq!(resolve_src("https://x.org/a.png", RES), "https://x.org/a.png");
    }

    #[test]
    fn test_markdown_image_wrapped_once() {
        let out = rewrite_media("![A \"fox\"](fox.jpg)", RES);
        assert_eq!(
            out,
            r#"<div class="image-wrapper"><img class="hover-effect click-zoom" src="blogs/4_trip/res/fox.jpg" alt="A &quot;fox&quot;"></div>"#
        );
        assert_eq!(out.matches("<img").count(), 1);
        assert_eq!(out.matches("image-wrapper").count(), 1);
    }

    #[test]
    fn test_raw_img_keeps_classes() {
        let out = rewrite_media(r#"<img class="click-zoom  wide" src="map.png" alt="Map">"#, RES);
        assert_eq!(
            out,
            r#"<div class="image-wrapper"><img class="click-zoom wide" src="blogs/4_trip/res/map.png" alt="Map"></div>"#
        );
    }

    #[test]
    fn test_linked_img_uses_link_target() {
        let out = rewrite_media(r#"[<img class="thumb" src="small.png">](big.png)"#, RES);
        assert_eq!(
            out,
            r#"<div class="image-wrapper"><img class="thumb" src="blogs/4_trip/res/big.png"></div>"#
        );
    }

    #[test]
    fn test_embed_becomes_link() {
        let out = rewrite_media(r#"<embed src="board.pdf" width="100%">"#, RES);
        assert!(out.contains(r#"href="blogs/4_trip/res/board.pdf""#));
        assert!(out.contains("Open schematic: board.pdf"));
        assert!(!out.contains("<embed"));
    }

    #[test]
    fn test_video_sources() {
        let out = rewrite_media(r#"<video controls><source src="clip.mp4" type="video/mp4"></video>"#, RES);
        assert!(out.contains(r#"src="blogs/4_trip/res/clip.mp4""#));

        let out = rewrite_media("!video(run.mp4)", RES);
        assert!(out.contains(r#"<source src="blogs/4_trip/res/run.mp4" type="video/mp4">"#));
        assert!(out.starts_with(r#"<video controls class="video-player">"#));
    }

    #[test]
    fn test_render_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_prepare_document() {
        let doc = prepare_document("---\ndate: 2023-05-01\n---\n![x](a.png)\n", RES);
        assert_eq!(doc.date.as_deref(), Some("May 1, 2023"));
        assert!(doc.html.contains(r#"src="blogs/4_trip/res/a.png""#));
        assert!(!doc.html.contains("date:"));
    }
}
