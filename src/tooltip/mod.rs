// src/tooltip/mod.rs
pub mod descriptor;
pub mod manager;

pub use descriptor::{MediaKind, TooltipDescriptor, TriggerSpec};
pub use manager::{ActiveTooltip, EnterDecision, LeaveDecision, TooltipManager};
