// src/components/mod.rs
pub mod audio_player;
pub mod back_to_top;
pub mod banner;
pub mod content_view;
pub mod library;
pub mod lightbox;
pub mod recent;
pub mod sidebar;
pub mod tooltip;
