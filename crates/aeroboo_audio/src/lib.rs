//! Audio playback on top of `rodio`.
//!
//! Mixing happens on the backend's own thread. The game only issues
//! fire-and-forget effect plays and start/stop commands on one looping music
//! channel, and polls whether that channel is still producing sound.

pub mod clip;
pub mod system;

pub use clip::SoundClip;
pub use system::{AudioSystem, MusicChannel};
