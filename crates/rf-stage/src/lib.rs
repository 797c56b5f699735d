//! # rf-stage — Stage System for the three-reel mini-game
//!
//! Defines the canonical stages a spin round passes through.
//! Hosts (audio, UI, replay tooling) react to STAGES, never to internal
//! engine state.
//!
//! ## Philosophy
//!
//! Every round goes through the same semantic phases:
//! - Spin starts → Reels spin → Reels settle → Outcome resolved → Effects revert
//!
//! This crate defines these stages and the per-round trace that records them.

pub mod stage;
pub mod event;
pub mod trace;

pub use stage::*;
pub use event::*;
pub use trace::*;
