//! # rf-slot-game — Three-Reel Slot Mini-Game Core
//!
//! Deterministic core of a classic three-reel slot: reels that spin and
//! settle on random symbols, a win rule on the reference row, a credit
//! ledger and a timed effect lifecycle. Rendering and audio stay behind the
//! [`Presentation`] trait; time comes from the host through a logical clock.
//!
//! ## Features
//!
//! - **Spin Coordination**: One spin at a time, staggered reel starts, a single stop phase
//! - **Injectable Randomness**: Seeded or scripted symbol picks
//! - **Logical Clock**: `advance(delta_ms)` drives motion and scheduled tasks
//! - **Stage Traces**: Every round is recorded as an `rf-stage` trace
//!
//! ## Architecture
//!
//! ```text
//! SlotSession
//!     │
//!     ├── SymbolDeck (catalog + random pick)
//!     ├── Reel × N (slots, motion, wrap, settle)
//!     ├── Scheduler<ScheduledTask> (logical clock)
//!     └── CreditLedger
//!           │
//!           v
//!     RoundResolution → Presentation calls + StageTrace
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod presentation;
pub mod random;
pub mod reel;
pub mod resolver;
pub mod spin;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use ledger::*;
pub use presentation::*;
pub use random::*;
pub use reel::*;
pub use resolver::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
