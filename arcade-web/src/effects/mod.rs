//! Effects module - transient visual feedback pools
//!
//! Re-exports only. All logic in submodules.

mod particles;
mod popups;

pub use particles::{ParticlePool, Particle, BurstOptions, HEAVY_COOLDOWN_MS};
pub use popups::{PopupPool, Popup};
