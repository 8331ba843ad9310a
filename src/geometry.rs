// src/geometry.rs
//
// Layout math shared by the lightbox, the tooltip layer and the dropdown
// menus. Everything here is pure so it can be checked without a browser.

use crate::site_config::UiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Scale that fits `natural` into the space the lightbox leaves free,
/// never upscaling past natural size.
pub fn fit_scale(natural: Size, viewport: Size, config: &UiConfig) -> f64 {
    if natural.is_empty() {
        return 1.0;
    }
    let available_width = if config.is_narrow(viewport.width) {
        viewport.width * config.lightbox_mobile_width_ratio
    } else {
        (viewport.width - config.lightbox_chrome).max(0.0)
    };
    let available_height = viewport.height * config.lightbox_height_ratio;
    (available_width / natural.width)
        .min(available_height / natural.height)
        .min(1.0)
}

/// Box of `natural` scaled by `scale`, centered in the viewport.
pub fn centered_frame(natural: Size, scale: f64, viewport: Size) -> Rect {
    let width = natural.width * scale;
    let height = natural.height * scale;
    Rect::new(
        (viewport.width - width) / 2.0,
        (viewport.height - height) / 2.0,
        width,
        height,
    )
}

/// Rescale `current` to `scale` so the image point under `cursor` stays
/// under the cursor.
pub fn anchored_frame(current: Rect, natural: Size, scale: f64, cursor: Point) -> Rect {
    let width = natural.width * scale;
    let height = natural.height * scale;
    let rel_x = if current.width > 0.0 {
        (cursor.x - current.left) / current.width
    } else {
        0.5
    };
    let rel_y = if current.height > 0.0 {
        (cursor.y - current.top) / current.height
    } else {
        0.5
    };
    Rect::new(
        cursor.x - rel_x * width,
        cursor.y - rel_y * height,
        width,
        height,
    )
}

/// Where a tooltip goes, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
    /// Set on narrow viewports where the tooltip is pinned to the page width.
    pub width: Option<f64>,
    pub below: bool,
}

/// Place a tooltip of `size` against the topmost visual line of its trigger.
///
/// `line` is in client coordinates; `scroll` converts it to page
/// coordinates. `cursor_x` (client) picks the horizontal anchor inside the
/// line when present.
pub fn place_tooltip(
    size: Size,
    line: Rect,
    cursor_x: Option<f64>,
    scroll: Point,
    viewport: Size,
    config: &UiConfig,
) -> TooltipPlacement {
    let margin = config.tooltip_margin;
    let gap = config.tooltip_gap;

    let room_above = line.top - size.height - gap >= margin;
    let (top, below) = if room_above {
        (scroll.y + line.top - size.height - gap, false)
    } else {
        (scroll.y + line.bottom() + gap, true)
    };

    if config.is_narrow(viewport.width) {
        return TooltipPlacement {
            left: scroll.x + margin,
            top,
            width: Some((viewport.width - 2.0 * margin).max(0.0)),
            below,
        };
    }

    let anchor_x = match cursor_x {
        Some(x) => x.clamp(line.left, line.right().max(line.left)),
        None => line.center_x(),
    };
    let min_left = scroll.x + margin;
    let max_left = scroll.x + viewport.width - size.width - margin;
    let mut left = scroll.x + anchor_x - size.width / 2.0;
    if left > max_left {
        left = max_left;
    }
    if left < min_left {
        left = min_left;
    }

    TooltipPlacement {
        left,
        top,
        width: None,
        below,
    }
}

/// Fixed position for a dropdown menu under its button, clamped to the
/// viewport and flipped above the button when it would overflow.
pub fn place_menu(button: Rect, menu: Size, viewport: Size, margin: f64) -> Point {
    let max_left = viewport.width - menu.width - margin;
    let left = (button.center_x() - menu.width / 2.0).min(max_left).max(margin);
    let mut top = button.bottom();
    if top + menu.height > viewport.height - margin {
        top = (button.top - menu.height).max(margin);
    }
    Point::new(left.round(), top.round())
}

/// Horizontal swipe between two touch points: `Some(+1)` for next,
/// `Some(-1)` for previous.
pub fn swipe_direction(start: Point, end: Point, threshold: f64) -> Option<i32> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() < threshold || dx.abs() < dy.abs() {
        return None;
    }
    Some(if dx < 0.0 { 1 } else { -1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Size {
        Size::new(1400.0, 1000.0)
    }

    #[test]
    fn test_fit_scale_never_upscales() {
        let config = UiConfig::default();
        let scale = fit_scale(Size::new(200.0, 100.0), desktop(), &config);
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn test_fit_scale_limited_by_height() {
        let config = UiConfig::default();
        let scale = fit_scale(Size::new(1000.0, 1800.0), desktop(), &config);
        assert!((scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_scale_mobile_uses_ratio() {
        let config = UiConfig::default();
        let scale = fit_scale(Size::new(800.0, 100.0), Size::new(400.0, 800.0), &config);
        assert!((scale - 400.0 * 0.95 / 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_scale_zero_dimensions() {
        let config = UiConfig::default();
        assert_eq!(fit_scale(Size::new(0.0, 10.0), desktop(), &config), 1.0);
    }

    #[test]
    fn test_centered_frame() {
        let frame = centered_frame(Size::new(400.0, 200.0), 1.0, desktop());
        assert_eq!(frame, Rect::new(500.0, 400.0, 400.0, 200.0));
    }

    #[test]
    fn test_anchored_frame_keeps_point_under_cursor() {
        let current = Rect::new(100.0, 100.0, 400.0, 200.0);
        let cursor = Point::new(200.0, 150.0);
        let next = anchored_frame(current, Size::new(400.0, 200.0), 2.0, cursor);
        // the point a quarter across and a quarter down stays put
        assert_eq!(next.width, 800.0);
        assert!((cursor.x - (next.left + 0.25 * next.width)).abs() < 1e-9);
        assert!((cursor.y - (next.top + 0.25 * next.height)).abs() < 1e-9);
    }

    #[test]
    fn test_tooltip_above_and_centered() {
        let config = UiConfig::default();
        let line = Rect::new(600.0, 500.0, 100.0, 20.0);
        let p = place_tooltip(
            Size::new(200.0, 80.0),
            line,
            None,
            Point::new(0.0, 1000.0),
            desktop(),
            &config,
        );
        assert!(!p.below);
        assert_eq!(p.left, 550.0);
        assert_eq!(p.top, 1000.0 + 500.0 - 80.0 - 10.0);
        assert_eq!(p.width, None);
    }

    #[test]
    fn test_tooltip_flips_below_without_room() {
        let config = UiConfig::default();
        let line = Rect::new(600.0, 30.0, 100.0, 20.0);
        let p = place_tooltip(Size::new(200.0, 80.0), line, None, Point::default(), desktop(), &config);
        assert!(p.below);
        assert_eq!(p.top, 60.0);
    }

    #[test]
    fn test_tooltip_clamped_to_viewport() {
        let config = UiConfig::default();
        let line = Rect::new(0.0, 500.0, 20.0, 20.0);
        let p = place_tooltip(Size::new(300.0, 80.0), line, None, Point::default(), desktop(), &config);
        assert_eq!(p.left, 10.0);

        let line = Rect::new(1390.0, 500.0, 10.0, 20.0);
        let p = place_tooltip(Size::new(300.0, 80.0), line, None, Point::default(), desktop(), &config);
        assert_eq!(p.left, 1400.0 - 300.0 - 10.0);
    }

    #[test]
    fn test_tooltip_narrow_pins_width() {
        let config = UiConfig::default();
        let line = Rect::new(50.0, 400.0, 100.0, 20.0);
        let p = place_tooltip(
            Size::new(200.0, 80.0),
            line,
            Some(60.0),
            Point::default(),
            Size::new(390.0, 800.0),
            &config,
        );
        assert_eq!(p.left, 10.0);
        assert_eq!(p.width, Some(370.0));
    }

    #[test]
    fn test_menu_flips_above() {
        let button = Rect::new(100.0, 560.0, 80.0, 30.0);
        let point = place_menu(button, Size::new(120.0, 100.0), Size::new(1000.0, 600.0), 8.0);
        assert_eq!(point, Point::new(80.0, 460.0));
    }

    #[test]
    fn test_swipe_direction() {
        let start = Point::new(300.0, 100.0);
        assert_eq!(swipe_direction(start, Point::new(200.0, 110.0), 50.0), Some(1));
        assert_eq!(swipe_direction(start, Point::new(400.0, 90.0), 50.0), Some(-1));
        assert_eq!(swipe_direction(start, Point::new(320.0, 100.0), 50.0), None);
        assert_eq!(swipe_direction(start, Point::new(200.0, 300.0), 50.0), None);
    }
}
