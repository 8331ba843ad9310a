// src/audio.rs
//
// Page-wide "one audio at a time" arbitration plus the small pieces of
// math the player widgets share.

use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlAudioElement;

/// Anything that can report playback and be stopped.
pub trait Playback {
    fn is_playing(&self) -> bool;
    /// Pause and rewind to the start.
    fn halt(&self);
}

impl Playback for HtmlAudioElement {
    fn is_playing(&self) -> bool {
        !self.paused()
    }

    fn halt(&self) {
        if let Err(e) = self.pause() {
            log::warn!("Failed to pause audio: {:?}", e);
        }
        self.set_current_time(0.0);
    }
}

/// Registry of every audio element on the page. Starting playback goes
/// through [`AudioArbiter::claim`], which stops all the others first.
pub struct AudioArbiter<P> {
    players: Vec<(String, P)>,
    active: Option<String>,
}

impl<P: Playback> AudioArbiter<P> {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            active: None,
        }
    }

    pub fn register(&mut self, id: impl Into<String>, player: P) {
        let id = id.into();
        self.players.retain(|(existing, _)| *existing != id);
        self.players.push((id, player));
    }

    pub fn unregister(&mut self, id: &str) {
        self.players.retain(|(existing, _)| existing != id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    /// Halt every other playing element and mark `id` as the active one.
    /// Call before asking `id` to play.
    pub fn claim(&mut self, id: &str) {
        for (other, player) in &self.players {
            if other != id && player.is_playing() {
                log::debug!("Stopping audio {} in favour of {}", other, id);
                player.halt();
            }
        }
        self.active = Some(id.to_string());
    }

    /// `id` stopped on its own (pause, error, end).
    pub fn release(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    pub fn halt(&mut self, id: &str) {
        if let Some((_, player)) = self.players.iter().find(|(existing, _)| existing == id) {
            if player.is_playing() {
                player.halt();
            }
        }
        self.release(id);
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[cfg(test)]
    pub fn playing_count(&self) -> usize {
        self.players.iter().filter(|(_, p)| p.is_playing()).count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }
}

impl<P: Playback> Default for AudioArbiter<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the page's arbiter, handed out through a yew context.
#[derive(Clone, Default)]
pub struct AudioHub(pub Rc<RefCell<AudioArbiter<HtmlAudioElement>>>);

impl PartialEq for AudioHub {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// `m:ss`, with anything non-finite or negative shown as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Playback position as a percentage; 0 until the duration is known.
pub fn progress_percent(current: f64, duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        (current / duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Fraction of a track at `client_x` over a track starting at `left`.
pub fn track_fraction(client_x: f64, left: f64, width: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    ((client_x - left) / width).clamp(0.0, 1.0)
}

/// Keyboard seek step: 2% of the track, at least one second.
pub fn seek_step(duration: f64) -> f64 {
    (duration * 0.02).floor().max(1.0)
}
