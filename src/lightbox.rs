// src/lightbox.rs
//
// Zoom and navigation state for the page's single lightbox. The component
// in `components::content_view` renders from this and feeds it DOM facts
// (viewport size, natural image size, cursor position).

use crate::geometry::{anchored_frame, centered_frame, fit_scale, Point, Rect, Size};
use crate::site_config::UiConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct LightboxImage {
    pub src: String,
    pub alt: String,
}

impl LightboxImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lightbox {
    config: UiConfig,
    images: Vec<LightboxImage>,
    current: Option<usize>,
    shown: Option<LightboxImage>,
    open: bool,
    zoom_level: usize,
    natural: Option<Size>,
    frame: Option<Rect>,
}

impl Lightbox {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            images: Vec::new(),
            current: None,
            shown: None,
            open: false,
            zoom_level: 0,
            natural: None,
            frame: None,
        }
    }

    /// Replace the navigable image set with the grid images of freshly
    /// rendered content.
    pub fn attach(&mut self, images: Vec<LightboxImage>) {
        self.images = images;
        if self.current.map_or(false, |i| i >= self.images.len()) {
            self.current = None;
        }
    }

    /// Open on `image`. `index` is its position in the grid list, `None`
    /// for images found elsewhere in the content.
    pub fn open(&mut self, image: LightboxImage, index: Option<usize>) {
        self.current = index.filter(|i| *i < self.images.len());
        self.show(image);
        self.open = true;
    }

    /// Step through the grid list with wraparound. Returns false (and
    /// leaves everything as it was) when there is nothing to step to.
    pub fn navigate(&mut self, direction: i32) -> bool {
        let current = match self.current {
            Some(current) if self.images.len() > 1 => current,
            _ => return false,
        };
        let len = self.images.len() as i64;
        let next = (current as i64 + direction as i64).rem_euclid(len) as usize;
        self.current = Some(next);
        let image = self.images[next].clone();
        self.show(image);
        true
    }

    fn show(&mut self, image: LightboxImage) {
        let same_src = self.shown.as_ref().map_or(false, |s| s.src == image.src);
        if !same_src {
            self.natural = None;
        }
        self.shown = Some(image);
        self.zoom_level = 0;
        self.frame = None;
    }

    /// The displayed image finished loading.
    pub fn image_loaded(&mut self, natural: Size, viewport: Size) {
        self.natural = Some(natural);
        self.refit(viewport);
    }

    /// Back to level 0: fit scale, centered. No-op until the image loaded.
    pub fn refit(&mut self, viewport: Size) {
        if let Some(natural) = self.natural {
            self.zoom_level = 0;
            let scale = fit_scale(natural, viewport, &self.config);
            self.frame = Some(centered_frame(natural, scale, viewport));
        }
    }

    /// Advance to the next zoom multiplier. Disabled on narrow viewports
    /// and before the image has loaded.
    pub fn cycle_zoom(&mut self, cursor: Option<Point>, viewport: Size) -> Option<Rect> {
        if self.config.is_narrow(viewport.width) || self.config.zoom_multipliers.is_empty() {
            return None;
        }
        let natural = self.natural?;
        self.zoom_level = (self.zoom_level + 1) % self.config.zoom_multipliers.len();
        let scale = self.scale_for(natural, viewport);
        let frame = match (cursor, self.frame) {
            (Some(cursor), Some(current)) if self.zoom_level > 0 => {
                anchored_frame(current, natural, scale, cursor)
            }
            _ => centered_frame(natural, scale, viewport),
        };
        self.frame = Some(frame);
        Some(frame)
    }

    pub fn scale_for(&self, natural: Size, viewport: Size) -> f64 {
        fit_scale(natural, viewport, &self.config) * self.config.zoom_multipliers[self.zoom_level]
    }

    pub fn close(&mut self) {
        self.open = false;
        self.zoom_level = 0;
        self.frame = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn zoom_level(&self) -> usize {
        self.zoom_level
    }

    #[cfg(test)]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    #[cfg(test)]
    pub fn images(&self) -> &[LightboxImage] {
        &self.images
    }

    pub fn shown(&self) -> Option<&LightboxImage> {
        self.shown.as_ref()
    }

    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }

    #[cfg(test)]
    pub fn has_natural_size(&self) -> bool {
        self.natural.is_some()
    }

    pub fn nav_visible(&self) -> bool {
        self.open && self.zoom_level == 0 && self.current.is_some() && self.images.len() > 1
    }

    /// Alt text to show under the image; hidden while zoomed.
    pub fn caption(&self) -> Option<&str> {
        if self.zoom_level > 0 {
            return None;
        }
        self.shown
            .as_ref()
            .map(|s| s.alt.trim())
            .filter(|alt| !alt.is_empty())
    }

    /// Swipes only navigate at the base zoom level.
    pub fn accepts_swipe(&self) -> bool {
        self.open && self.zoom_level == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Size {
        Size::new(1400.0, 1000.0)
    }

    fn grid(n: usize) -> Vec<LightboxImage> {
        (0..n)
            .map(|i| LightboxImage::new(format!("img{}.png", i), format!("Image {}", i)))
            .collect()
    }

    fn opened(n: usize, index: usize) -> Lightbox {
        let mut lightbox = Lightbox::new(UiConfig::default());
        lightbox.attach(grid(n));
        let image = lightbox.images()[index].clone();
        lightbox.open(image, Some(index));
        lightbox.image_loaded(Size::new(2000.0, 1500.0), viewport());
        lightbox
    }

    #[test]
    fn test_zoom_scales_monotonic_from_fit() {
        let mut lightbox = opened(3, 0);
        let natural = Size::new(2000.0, 1500.0);
        let base = fit_scale(natural, viewport(), &UiConfig::default());
        assert_eq!(lightbox.scale_for(natural, viewport()), base);

        let mut previous = base;
        for _ in 1..3 {
            lightbox.cycle_zoom(None, viewport());
            let scale = lightbox.scale_for(natural, viewport());
            assert!(scale >= previous);
            previous = scale;
        }
        lightbox.cycle_zoom(None, viewport());
        assert_eq!(lightbox.zoom_level(), 0);
        assert_eq!(lightbox.scale_for(natural, viewport()), base);
    }

    #[test]
    fn test_open_resets_zoom() {
        let mut lightbox = opened(3, 1);
        lightbox.cycle_zoom(Some(Point::new(700.0, 500.0)), viewport());
        assert_eq!(lightbox.zoom_level(), 1);
        lightbox.close();
        let image = lightbox.images()[2].clone();
        lightbox.open(image, Some(2));
        assert_eq!(lightbox.zoom_level(), 0);
    }

    #[test]
    fn test_navigate_round_trip() {
        for len in 2..6 {
            for start in 0..len {
                let mut lightbox = opened(len, start);
                assert!(lightbox.navigate(1));
                assert!(lightbox.navigate(-1));
                assert_eq!(lightbox.current_index(), Some(start));
            }
        }
    }

    #[test]
    fn test_navigate_wraps() {
        let mut lightbox = opened(3, 2);
        lightbox.navigate(1);
        assert_eq!(lightbox.current_index(), Some(0));
        lightbox.navigate(-1);
        assert_eq!(lightbox.current_index(), Some(2));
        assert_eq!(lightbox.shown().map(|s| s.src.as_str()), Some("img2.png"));
    }

    #[test]
    fn test_navigate_resets_zoom() {
        let mut lightbox = opened(3, 0);
        lightbox.cycle_zoom(None, viewport());
        lightbox.navigate(1);
        assert_eq!(lightbox.zoom_level(), 0);
        assert!(!lightbox.has_natural_size());
    }

    #[test]
    fn test_image_outside_grid_is_not_navigable() {
        let mut lightbox = Lightbox::new(UiConfig::default());
        lightbox.attach(grid(3));
        lightbox.open(LightboxImage::new("inline.png", ""), None);
        assert!(!lightbox.navigate(1));
        assert_eq!(lightbox.current_index(), None);
        assert_eq!(lightbox.shown().map(|s| s.src.as_str()), Some("inline.png"));
        assert!(!lightbox.nav_visible());
    }

    #[test]
    fn test_single_image_hides_nav() {
        let mut lightbox = opened(1, 0);
        assert!(!lightbox.navigate(1));
        assert_eq!(lightbox.current_index(), Some(0));
        assert!(lightbox.has_natural_size());
        assert!(!lightbox.nav_visible());
    }

    #[test]
    fn test_empty_list_navigate_is_noop() {
        let mut lightbox = Lightbox::new(UiConfig::default());
        lightbox.open(LightboxImage::new("a.png", ""), Some(0));
        assert_eq!(lightbox.current_index(), None);
        assert!(!lightbox.navigate(-1));
        assert!(!lightbox.nav_visible());
    }

    #[test]
    fn test_nav_hidden_while_zoomed() {
        let mut lightbox = opened(3, 0);
        assert!(lightbox.nav_visible());
        lightbox.cycle_zoom(None, viewport());
        assert!(!lightbox.nav_visible());
        assert_eq!(lightbox.caption(), None);
    }

    #[test]
    fn test_zoom_disabled_on_narrow_viewport() {
        let mut lightbox = opened(3, 0);
        assert_eq!(lightbox.cycle_zoom(None, Size::new(390.0, 800.0)), None);
        assert_eq!(lightbox.zoom_level(), 0);
    }

    #[test]
    fn test_cursor_zoom_keeps_anchor() {
        let mut lightbox = opened(3, 0);
        let before = lightbox.frame().unwrap();
        let cursor = Point::new(before.left + before.width * 0.75, before.top + before.height * 0.5);
        let after = lightbox.cycle_zoom(Some(cursor), viewport()).unwrap();
        assert!((after.left + after.width * 0.75 - cursor.x).abs() < 1e-6);
        assert!((after.top + after.height * 0.5 - cursor.y).abs() < 1e-6);
    }

    #[test]
    fn test_attach_drops_stale_index() {
        let mut lightbox = opened(4, 3);
        lightbox.attach(grid(2));
        assert_eq!(lightbox.current_index(), None);
    }

    #[test]
    fn test_caption_trimmed_and_hidden_when_empty() {
        let mut lightbox = Lightbox::new(UiConfig::default());
        lightbox.open(LightboxImage::new("a.png", "   "), None);
        assert_eq!(lightbox.caption(), None);
        lightbox.open(LightboxImage::new("b.png", " Harbour "), None);
        assert_eq!(lightbox.caption(), Some("Harbour"));
    }
}
