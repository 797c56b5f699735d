//! Presentation boundary — everything the core asks the host to show or play
//!
//! The core never renders, loads assets or mixes audio. It drives a
//! [`Presentation`] implementation with fire-and-forget calls. Delayed
//! callbacks are not part of this boundary: the session owns its logical
//! clock and the host advances it.

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Border accent of the main reel frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accent {
    /// RGB color (0xRRGGBB)
    pub color: u32,
    /// Border width (px)
    pub width: f64,
}

impl Accent {
    pub const fn new(color: u32, width: f64) -> Self {
        Self { color, width }
    }
}

/// Credit text as shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditDisplay {
    pub text: String,
    /// CSS-style color ("green", "#ffffff", ...)
    pub color: String,
}

/// Playback options for a sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundOptions {
    pub looping: bool,
    pub volume: f64,
    /// Playback rate multiplier
    pub rate: f64,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            looping: false,
            volume: 1.0,
            rate: 1.0,
        }
    }
}

/// What an animation acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationTarget {
    /// One symbol slot of one reel
    Slot { reel: usize, slot: usize },
    /// The spin trigger control
    SpinControl,
}

/// Animated visual property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedProperty {
    Y,
    ScaleX,
    ScaleY,
}

/// Value a property animates towards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyTarget {
    pub property: AnimatedProperty,
    pub to: f64,
}

impl PropertyTarget {
    pub fn new(property: AnimatedProperty, to: f64) -> Self {
        Self { property, to }
    }
}

/// Playback options for an animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Play back to the start value after reaching the target
    pub yoyo: bool,
    /// Extra repetitions; -1 repeats until cancelled
    pub repeat: i32,
    /// Easing curve name understood by the host
    pub ease: String,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            yoyo: false,
            repeat: 0,
            ease: "Linear".into(),
        }
    }
}

/// Host side of the game: rendering, audio and animation sinks
pub trait Presentation {
    /// Draw `symbol` in slot `slot` of reel `reel` at vertical `position`.
    /// Must be idempotent.
    fn render_symbol_at(&mut self, reel: usize, slot: usize, symbol: &Symbol, position: f64);

    fn play_sound(&mut self, name: &str, options: &SoundOptions);

    fn stop_sound(&mut self, name: &str);

    fn animate(
        &mut self,
        target: AnimationTarget,
        properties: &[PropertyTarget],
        duration_ms: f64,
        options: &AnimationOptions,
    );

    /// Cancel every running animation as a batch
    fn cancel_animations(&mut self);

    fn set_frame_accent(&mut self, accent: Accent);

    fn show_credit(&mut self, display: &CreditDisplay);

    fn set_spin_label(&mut self, label: &str);

    /// Disable further spin triggers on the host side
    fn end_game(&mut self);
}

impl<P: Presentation + ?Sized> Presentation for Box<P> {
    fn render_symbol_at(&mut self, reel: usize, slot: usize, symbol: &Symbol, position: f64) {
        (**self).render_symbol_at(reel, slot, symbol, position)
    }

    fn play_sound(&mut self, name: &str, options: &SoundOptions) {
        (**self).play_sound(name, options)
    }

    fn stop_sound(&mut self, name: &str) {
        (**self).stop_sound(name)
    }

    fn animate(
        &mut self,
        target: AnimationTarget,
        properties: &[PropertyTarget],
        duration_ms: f64,
        options: &AnimationOptions,
    ) {
        (**self).animate(target, properties, duration_ms, options)
    }

    fn cancel_animations(&mut self) {
        (**self).cancel_animations()
    }

    fn set_frame_accent(&mut self, accent: Accent) {
        (**self).set_frame_accent(accent)
    }

    fn show_credit(&mut self, display: &CreditDisplay) {
        (**self).show_credit(display)
    }

    fn set_spin_label(&mut self, label: &str) {
        (**self).set_spin_label(label)
    }

    fn end_game(&mut self) {
        (**self).end_game()
    }
}

/// Discards every call (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn render_symbol_at(&mut self, _reel: usize, _slot: usize, _symbol: &Symbol, _position: f64) {}
    fn play_sound(&mut self, _name: &str, _options: &SoundOptions) {}
    fn stop_sound(&mut self, _name: &str) {}
    fn animate(
        &mut self,
        _target: AnimationTarget,
        _properties: &[PropertyTarget],
        _duration_ms: f64,
        _options: &AnimationOptions,
    ) {
    }
    fn cancel_animations(&mut self) {}
    fn set_frame_accent(&mut self, _accent: Accent) {}
    fn show_credit(&mut self, _display: &CreditDisplay) {}
    fn set_spin_label(&mut self, _label: &str) {}
    fn end_game(&mut self) {}
}

/// A recorded presentation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PresentationCall {
    RenderSymbol {
        reel: usize,
        slot: usize,
        symbol: String,
        position: f64,
    },
    PlaySound {
        name: String,
        options: SoundOptions,
    },
    StopSound {
        name: String,
    },
    Animate {
        target: AnimationTarget,
        properties: Vec<PropertyTarget>,
        duration_ms: f64,
        options: AnimationOptions,
    },
    CancelAnimations,
    FrameAccent {
        accent: Accent,
    },
    Credit {
        display: CreditDisplay,
    },
    SpinLabel {
        label: String,
    },
    EndGame,
}

impl PresentationCall {
    fn is_render(&self) -> bool {
        matches!(self, PresentationCall::RenderSymbol { .. })
    }
}

/// Records every call for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    calls: Vec<PresentationCall>,
    record_renders: bool,
}

impl RecordingPresentation {
    /// Record everything except per-frame symbol renders
    pub fn new() -> Self {
        Self::default()
    }

    /// Record symbol renders too (one call per slot per motion frame)
    pub fn with_renders() -> Self {
        Self {
            calls: Vec::new(),
            record_renders: true,
        }
    }

    pub fn calls(&self) -> &[PresentationCall] {
        &self.calls
    }

    /// Drain recorded calls
    pub fn take_calls(&mut self) -> Vec<PresentationCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Names of sounds started, in order
    pub fn sounds_played(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::PlaySound { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names of sounds stopped, in order
    pub fn sounds_stopped(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::StopSound { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Credit texts shown, in order
    pub fn credit_texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::Credit { display } => Some(display.text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_accent(&self) -> Option<Accent> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::FrameAccent { accent } => Some(*accent),
            _ => None,
        })
    }

    pub fn count(&self, predicate: impl Fn(&PresentationCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn end_game_count(&self) -> usize {
        self.count(|c| matches!(c, PresentationCall::EndGame))
    }

    fn record(&mut self, call: PresentationCall) {
        if call.is_render() && !self.record_renders {
            return;
        }
        self.calls.push(call);
    }
}

impl Presentation for RecordingPresentation {
    fn render_symbol_at(&mut self, reel: usize, slot: usize, symbol: &Symbol, position: f64) {
        self.record(PresentationCall::RenderSymbol {
            reel,
            slot,
            symbol: symbol.name.clone(),
            position,
        });
    }

    fn play_sound(&mut self, name: &str, options: &SoundOptions) {
        self.record(PresentationCall::PlaySound {
            name: name.to_string(),
            options: options.clone(),
        });
    }

    fn stop_sound(&mut self, name: &str) {
        self.record(PresentationCall::StopSound {
            name: name.to_string(),
        });
    }

    fn animate(
        &mut self,
        target: AnimationTarget,
        properties: &[PropertyTarget],
        duration_ms: f64,
        options: &AnimationOptions,
    ) {
        self.record(PresentationCall::Animate {
            target,
            properties: properties.to_vec(),
            duration_ms,
            options: options.clone(),
        });
    }

    fn cancel_animations(&mut self) {
        self.record(PresentationCall::CancelAnimations);
    }

    fn set_frame_accent(&mut self, accent: Accent) {
        self.record(PresentationCall::FrameAccent { accent });
    }

    fn show_credit(&mut self, display: &CreditDisplay) {
        self.record(PresentationCall::Credit {
            display: display.clone(),
        });
    }

    fn set_spin_label(&mut self, label: &str) {
        self.record(PresentationCall::SpinLabel {
            label: label.to_string(),
        });
    }

    fn end_game(&mut self) {
        self.record(PresentationCall::EndGame);
    }
}
