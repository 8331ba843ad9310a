// src/tooltip/manager.rs
//
// Bookkeeping behind the tooltip layer: descriptor table, measured
// geometry, which trigger owns the single live tooltip, and whether its
// audio is playing. Timers and DOM work stay in the component.

use super::descriptor::{MediaKind, TooltipDescriptor};
use crate::geometry::{Size, TooltipPlacement};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTooltip {
    pub id: u64,
    pub trigger: String,
    pub descriptor: TooltipDescriptor,
    pub key: String,
    pub cursor_x: Option<f64>,
    pub placement: Option<TooltipPlacement>,
    /// Set once the positioned tooltip has been laid out and may fade in.
    pub revealed: bool,
}

impl ActiveTooltip {
    /// Arbiter id of the embedded player, for audio tooltips.
    pub fn audio_id(&self) -> Option<String> {
        match self.descriptor.media_kind() {
            Some(MediaKind::Audio) => Some(format!("tooltip-{}", self.id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterDecision {
    AlreadyShowing,
    ScheduleShow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Stay,
    ScheduleHide,
}

/// Off-screen copy of a tooltip waiting to be measured.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSizer {
    pub id: u64,
    pub key: String,
    pub descriptor: TooltipDescriptor,
    /// Its image has not finished loading (or failing) yet.
    pub media_pending: bool,
}

#[derive(Debug, Default)]
pub struct TooltipManager {
    folder: Option<String>,
    descriptors: HashMap<String, TooltipDescriptor>,
    geometry: HashMap<String, Size>,
    sizers: Vec<PendingSizer>,
    next_sizer: u64,
    active: Option<ActiveTooltip>,
    audio_playing: bool,
    next_id: u64,
}

impl TooltipManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// New content is on screen: forget the previous folder's descriptors
    /// and every measured size.
    pub fn begin_content(&mut self, folder: &str) {
        self.folder = Some(folder.to_string());
        self.descriptors.clear();
        self.geometry.clear();
        self.sizers.clear();
    }

    /// Install the descriptor file for `folder`. Returns false (and keeps
    /// nothing) if another folder has been loaded since the fetch began.
    pub fn load_descriptors(
        &mut self,
        folder: &str,
        resource_dir: &str,
        raw: HashMap<String, TooltipDescriptor>,
    ) -> bool {
        if self.folder.as_deref() != Some(folder) {
            log::debug!("Discarding tooltips for {}; content moved on", folder);
            return false;
        }
        self.descriptors = raw
            .into_iter()
            .map(|(id, descriptor)| (id, descriptor.scoped_to(resource_dir)))
            .collect();
        log::info!("Loaded {} tooltip descriptors for {}", self.descriptors.len(), folder);
        true
    }

    pub fn descriptors(&self) -> &HashMap<String, TooltipDescriptor> {
        &self.descriptors
    }

    pub fn needs_geometry(&self, key: &str) -> bool {
        !self.geometry.contains_key(key)
    }

    /// Store a measured size. The first measurement for a key wins.
    pub fn record_geometry(&mut self, key: &str, size: Size) -> bool {
        if self.geometry.contains_key(key) {
            return false;
        }
        self.geometry.insert(key.to_string(), size);
        true
    }

    pub fn geometry(&self, key: &str) -> Option<Size> {
        self.geometry.get(key).copied()
    }

    pub fn measured_count(&self) -> usize {
        self.geometry.len()
    }

    /// Queue an off-screen measurement for `descriptor` unless its size is
    /// already known or a sizer for it is already waiting.
    pub fn queue_sizer(&mut self, descriptor: &TooltipDescriptor) -> Option<u64> {
        let key = descriptor.key();
        if !self.needs_geometry(&key) || self.sizers.iter().any(|p| p.key == key) {
            return None;
        }
        self.next_sizer += 1;
        let media_pending =
            descriptor.media.is_some() && descriptor.media_kind() != Some(MediaKind::Audio);
        self.sizers.push(PendingSizer {
            id: self.next_sizer,
            key,
            descriptor: descriptor.clone(),
            media_pending,
        });
        Some(self.next_sizer)
    }

    pub fn sizers(&self) -> &[PendingSizer] {
        &self.sizers
    }

    /// The sizer's image loaded or failed; it can be measured now.
    pub fn sizer_media_done(&mut self, id: u64) -> bool {
        match self.sizers.iter_mut().find(|p| p.id == id && p.media_pending) {
            Some(sizer) => {
                sizer.media_pending = false;
                true
            }
            None => false,
        }
    }

    /// Measure every sizer whose media has settled. `measure` answers
    /// `None` for a sizer that is not in the document yet; those stay
    /// queued for a later pass. Returns how many sizers were taken off the
    /// queue.
    pub fn measure_sizers<F>(&mut self, mut measure: F) -> usize
    where
        F: FnMut(u64) -> Option<Size>,
    {
        let found: Vec<(u64, String, Size)> = self
            .sizers
            .iter()
            .filter(|p| !p.media_pending)
            .filter_map(|p| measure(p.id).map(|size| (p.id, p.key.clone(), size)))
            .collect();
        for (id, key, size) in &found {
            self.sizers.retain(|p| p.id != *id);
            if !size.is_empty() {
                self.record_geometry(key, *size);
            }
        }
        found.len()
    }

    pub fn clear_sizers(&mut self) {
        self.sizers.clear();
    }

    pub fn on_trigger_enter(&self, trigger: &str) -> EnterDecision {
        match &self.active {
            Some(active) if active.trigger == trigger => EnterDecision::AlreadyShowing,
            _ => EnterDecision::ScheduleShow,
        }
    }

    pub fn on_trigger_leave(&self, into_tooltip: bool) -> LeaveDecision {
        if into_tooltip {
            LeaveDecision::Stay
        } else {
            LeaveDecision::ScheduleHide
        }
    }

    pub fn on_tooltip_leave(&self) -> LeaveDecision {
        if self.audio_playing {
            LeaveDecision::Stay
        } else {
            LeaveDecision::ScheduleHide
        }
    }

    /// Whether a fired hide timer may actually hide.
    pub fn hide_allowed(&self) -> bool {
        !self.audio_playing
    }

    pub fn set_audio_playing(&mut self, playing: bool) {
        self.audio_playing = playing;
    }

    pub fn audio_playing(&self) -> bool {
        self.audio_playing
    }

    /// Make a tooltip for `trigger` the live one. The previous tooltip, if
    /// any, is returned so the caller can fade it out.
    pub fn show(
        &mut self,
        trigger: &str,
        descriptor: TooltipDescriptor,
        cursor_x: Option<f64>,
    ) -> Option<ActiveTooltip> {
        let previous = self.hide();
        self.next_id += 1;
        let key = descriptor.key();
        self.active = Some(ActiveTooltip {
            id: self.next_id,
            trigger: trigger.to_string(),
            descriptor,
            key,
            cursor_x,
            placement: None,
            revealed: false,
        });
        previous
    }

    /// Take down the live tooltip, if any.
    pub fn hide(&mut self) -> Option<ActiveTooltip> {
        self.audio_playing = false;
        self.active.take()
    }

    pub fn active(&self) -> Option<&ActiveTooltip> {
        self.active.as_ref()
    }

    pub fn set_placement(&mut self, placement: TooltipPlacement) {
        if let Some(active) = self.active.as_mut() {
            active.placement = Some(placement);
        }
    }

    pub fn reveal(&mut self) -> bool {
        match self.active.as_mut() {
            Some(active) if !active.revealed => {
                active.revealed = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str) -> TooltipDescriptor {
        TooltipDescriptor {
            text: Some(t.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_geometry_recorded_once() {
        let mut manager = TooltipManager::new();
        manager.begin_content("1_a");
        let key = text("hello").key();
        assert!(manager.needs_geometry(&key));
        assert!(manager.record_geometry(&key, Size::new(200.0, 50.0)));
        // a second trigger with identical content reuses the measurement
        assert!(!manager.needs_geometry(&text("hello").key()));
        assert!(!manager.record_geometry(&key, Size::new(1.0, 1.0)));
        assert_eq!(manager.geometry(&key), Some(Size::new(200.0, 50.0)));
        assert_eq!(manager.measured_count(), 1);
    }

    fn image(src: &str) -> TooltipDescriptor {
        TooltipDescriptor {
            media: Some(src.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unmounted_measurement_stays_queued() {
        let mut manager = TooltipManager::new();
        manager.begin_content("1_a");
        let hello = text("hello");
        let id = manager.queue_sizer(&hello).unwrap();

        // first pass runs before the sizer is in the document
        assert_eq!(manager.measure_sizers(|_| None), 0);
        assert_eq!(manager.sizers().len(), 1);

        // a rescan of the same content does not queue it again
        assert_eq!(manager.queue_sizer(&hello), None);
        assert_eq!(manager.sizers().len(), 1);

        assert_eq!(manager.measure_sizers(|p| (p == id).then(|| Size::new(180.0, 40.0))), 1);
        assert!(manager.sizers().is_empty());
        assert_eq!(manager.geometry(&hello.key()), Some(Size::new(180.0, 40.0)));

        // once measured, later scans leave it alone
        assert_eq!(manager.queue_sizer(&hello), None);
        assert_eq!(manager.measure_sizers(|_| Some(Size::new(1.0, 1.0))), 0);
        assert_eq!(manager.measured_count(), 1);
    }

    #[test]
    fn test_image_measurement_waits_for_media() {
        let mut manager = TooltipManager::new();
        manager.begin_content("1_a");
        let id = manager.queue_sizer(&image("blogs/1_a/res/cat.gif")).unwrap();
        let audio = manager.queue_sizer(&image("blogs/1_a/res/purr.mp3")).unwrap();

        let mut seen = Vec::new();
        manager.measure_sizers(|p| {
            seen.push(p);
            Some(Size::new(100.0, 60.0))
        });
        assert_eq!(seen, vec![audio]);
        assert_eq!(manager.sizers().len(), 1);

        assert!(manager.sizer_media_done(id));
        assert!(!manager.sizer_media_done(id));
        assert_eq!(manager.measure_sizers(|_| Some(Size::new(120.0, 90.0))), 1);
        assert_eq!(manager.measured_count(), 2);
    }

    #[test]
    fn test_new_content_drops_pending_measurements() {
        let mut manager = TooltipManager::new();
        manager.begin_content("1_a");
        manager.queue_sizer(&text("a"));
        manager.begin_content("2_b");
        assert!(manager.sizers().is_empty());
    }

    #[test]
    fn test_new_content_invalidates_geometry() {
        let mut manager = TooltipManager::new();
        manager.begin_content("1_a");
        manager.record_geometry("k", Size::new(1.0, 1.0));
        manager.begin_content("2_b");
        assert!(manager.needs_geometry("k"));
    }

    #[test]
    fn test_at_most_one_active() {
        let mut manager = TooltipManager::new();
        assert!(manager.show("t1", text("a"), None).is_none());
        let previous = manager.show("t2", text("b"), Some(10.0)).unwrap();
        assert_eq!(previous.trigger, "t1");
        assert_eq!(manager.active().map(|a| a.trigger.as_str()), Some("t2"));
        assert_ne!(previous.id, manager.active().unwrap().id);
    }

    #[test]
    fn test_enter_same_trigger_does_not_reshow() {
        let mut manager = TooltipManager::new();
        manager.show("t1", text("a"), None);
        assert_eq!(manager.on_trigger_enter("t1"), EnterDecision::AlreadyShowing);
        assert_eq!(manager.on_trigger_enter("t2"), EnterDecision::ScheduleShow);
    }

    #[test]
    fn test_audio_keeps_tooltip_open() {
        let mut manager = TooltipManager::new();
        manager.show("t1", text("a"), None);
        manager.set_audio_playing(true);
        assert_eq!(manager.on_tooltip_leave(), LeaveDecision::Stay);
        assert!(!manager.hide_allowed());
        manager.hide();
        assert!(!manager.audio_playing());
    }

    #[test]
    fn test_leave_into_tooltip_stays() {
        let manager = TooltipManager::new();
        assert_eq!(manager.on_trigger_leave(true), LeaveDecision::Stay);
        assert_eq!(manager.on_trigger_leave(false), LeaveDecision::ScheduleHide);
    }

    #[test]
    fn test_stale_descriptor_file_discarded() {
        let mut manager = TooltipManager::new();
        manager.begin_content("2_new");
        let mut raw = HashMap::new();
        raw.insert("x".to_string(), text("old"));
        assert!(!manager.load_descriptors("1_old", "blogs/1_old/res", raw.clone()));
        assert!(manager.descriptors().is_empty());
        assert!(manager.load_descriptors("2_new", "blogs/2_new/res", raw));
        assert_eq!(manager.descriptors().len(), 1);
    }

    #[test]
    fn test_descriptor_media_scoped_on_load() {
        let mut manager = TooltipManager::new();
        manager.begin_content("3_c");
        let mut raw = HashMap::new();
        raw.insert(
            "song".to_string(),
            TooltipDescriptor {
                media: Some("tune.ogg".to_string()),
                ..Default::default()
            },
        );
        manager.load_descriptors("3_c", "blogs/3_c/res", raw);
        assert_eq!(
            manager.descriptors()["song"].media.as_deref(),
            Some("blogs/3_c/res/tune.ogg")
        );
    }

    #[test]
    fn test_reveal_once() {
        let mut manager = TooltipManager::new();
        manager.show("t", text("a"), None);
        assert!(manager.reveal());
        assert!(!manager.reveal());
    }
}
