//! Slot game configuration
//!
//! Every constant the core reads lives here. Defaults reproduce the
//! classic three-reel game; JSON/YAML files override any subset.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::presentation::{Accent, AnimationOptions, SoundOptions};
use crate::symbols::CLASSIC_SYMBOLS;
use crate::timing::TimingConfig;

/// Reel indices are recorded as `u8` in stage traces
pub const MAX_REELS: usize = u8::MAX as usize + 1;

/// Reel geometry and motion (presentation units, px and px/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelLayout {
    /// Resting position of slot 0
    pub first_row_y: f64,
    /// Distance between resting positions
    pub row_spacing: f64,
    /// A spinning slot past this position wraps to the top
    pub wrap_threshold: f64,
    /// Where a wrapped slot re-enters (above the first resting offset)
    pub wrap_reset_y: f64,
    /// Downward velocity while spinning
    pub spin_velocity: f64,
    /// Settle bounce height
    pub bounce_height: f64,
    pub bounce_duration_ms: f64,
    pub bounce_ease: String,
}

impl ReelLayout {
    /// Canonical resting offset of slot `slot`
    pub fn resting_offset(&self, slot: usize) -> f64 {
        self.first_row_y + slot as f64 * self.row_spacing
    }
}

impl Default for ReelLayout {
    fn default() -> Self {
        Self {
            first_row_y: 160.0,
            row_spacing: 150.0,
            wrap_threshold: 480.0,
            wrap_reset_y: 110.0,
            spin_velocity: 1200.0,
            bounce_height: 40.0,
            bounce_duration_ms: 150.0,
            bounce_ease: "Sine.easeOut".into(),
        }
    }
}

/// Reward and transient display of one outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStyle {
    pub name: String,
    /// Signed credit delta
    pub reward: i64,
    /// Credit text color while the delta is shown
    pub credit_color: String,
    /// Frame accent while the effect lasts
    pub accent: Accent,
    /// How long the accent and delta text persist (ms)
    pub effect_duration_ms: f64,
}

impl OutcomeStyle {
    pub fn round_win() -> Self {
        Self {
            name: "round_win".into(),
            reward: 100,
            credit_color: "green".into(),
            accent: Accent::new(0x008000, 12.0),
            effect_duration_ms: 2000.0,
        }
    }

    pub fn round_loss() -> Self {
        Self {
            name: "round_loss".into(),
            reward: -20,
            credit_color: "red".into(),
            accent: Accent::new(0xff0000, 10.0),
            effect_duration_ms: 1000.0,
        }
    }
}

/// Win/loss styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeTable {
    pub win: OutcomeStyle,
    pub loss: OutcomeStyle,
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self {
            win: OutcomeStyle::round_win(),
            loss: OutcomeStyle::round_loss(),
        }
    }
}

/// A named sound with its playback options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSpec {
    pub name: String,
    #[serde(default)]
    pub options: SoundOptions,
}

/// Sounds the core starts and stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Loop played while reels spin
    pub reel_loop: SoundSpec,
    /// Loop played from a win until its effect reverts
    pub round_win: SoundSpec,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            reel_loop: SoundSpec {
                name: "reelsSound".into(),
                options: SoundOptions {
                    looping: true,
                    volume: 1.0,
                    rate: 7.0,
                },
            },
            round_win: SoundSpec {
                name: "roundWinSound".into(),
                options: SoundOptions {
                    looping: true,
                    volume: 1.0,
                    rate: 1.0,
                },
            },
        }
    }
}

/// Spin control label and pulse while spinning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinControlConfig {
    pub idle_label: String,
    pub spinning_label: String,
    pub pulse_scale_x: f64,
    pub pulse_scale_y: f64,
    pub pulse_duration_ms: f64,
    pub pulse_options: AnimationOptions,
}

impl Default for SpinControlConfig {
    fn default() -> Self {
        Self {
            idle_label: "Spin".into(),
            spinning_label: "Spinning".into(),
            pulse_scale_x: 1.3,
            pulse_scale_y: 1.2,
            pulse_duration_ms: 300.0,
            pulse_options: AnimationOptions {
                yoyo: true,
                repeat: -1,
                ease: "Sine.easeInOut".into(),
            },
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Game identifier used in stage traces
    pub game_id: String,
    /// Symbol catalog, in id order
    pub symbols: Vec<String>,
    pub reel_count: usize,
    pub slots_per_reel: usize,
    /// Slot index read across every reel to decide the outcome
    pub reference_row: usize,
    pub starting_credit: i64,
    pub timing: TimingConfig,
    pub layout: ReelLayout,
    pub outcomes: OutcomeTable,
    pub default_accent: Accent,
    pub credit_text_color: String,
    pub audio: AudioConfig,
    pub spin_control: SpinControlConfig,
    /// Completed stage traces kept by a session
    pub trace_history: usize,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            game_id: "classic_three".into(),
            symbols: CLASSIC_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            reel_count: 3,
            slots_per_reel: 3,
            reference_row: 1,
            starting_credit: 100,
            timing: TimingConfig::default(),
            layout: ReelLayout::default(),
            outcomes: OutcomeTable::default(),
            default_accent: Accent::new(0xc0c0c0, 5.0),
            credit_text_color: "#ffffff".into(),
            audio: AudioConfig::default(),
            spin_control: SpinControlConfig::default(),
            trace_history: 32,
        }
    }
}

impl SlotConfig {
    /// Same game with instant timing (trigger → settle on one instant)
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig::instant(),
            ..Self::default()
        }
    }

    /// Builder: replace the symbol catalog
    pub fn with_symbols<S: Into<String>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: replace timing
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Builder: replace the starting credit
    pub fn with_starting_credit(mut self, credit: i64) -> Self {
        self.starting_credit = credit;
        self
    }

    /// Parse JSON and validate
    pub fn from_json_str(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML and validate
    pub fn from_yaml_str(yaml: &str) -> SlotResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| SlotError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" | "yaml" | "yml" => {}
            "" => return Err(SlotError::UnsupportedFormat(path.display().to_string())),
            other => return Err(SlotError::UnsupportedFormat(other.to_string())),
        }

        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loading slot config from {}", path.display());

        if extension == "json" {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    pub fn to_json(&self) -> SlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fail fast on configurations that cannot produce a meaningful round
    pub fn validate(&self) -> SlotResult<()> {
        if self.symbols.is_empty() {
            return invalid("symbol catalog is empty");
        }
        let mut seen = HashSet::with_capacity(self.symbols.len());
        for (index, name) in self.symbols.iter().enumerate() {
            if name.trim().is_empty() {
                return invalid(format!("symbol #{index} has an empty name"));
            }
            if !seen.insert(name.as_str()) {
                return invalid(format!("duplicate symbol '{name}' in catalog"));
            }
        }
        if self.symbols.len() == 1 {
            log::warn!("Single-symbol catalog: every spin is a win");
        }

        if self.reel_count == 0 {
            return invalid("reel_count must be at least 1");
        }
        if self.reel_count > MAX_REELS {
            return invalid(format!(
                "reel_count {} exceeds the maximum of {MAX_REELS}",
                self.reel_count
            ));
        }
        if self.slots_per_reel == 0 {
            return invalid("slots_per_reel must be at least 1");
        }
        if self.reference_row >= self.slots_per_reel {
            return invalid(format!(
                "reference_row {} is outside a {}-slot reel",
                self.reference_row, self.slots_per_reel
            ));
        }

        let timing = &self.timing;
        non_negative("timing.stagger_delay_ms", timing.stagger_delay_ms)?;
        non_negative("timing.spin_duration_ms", timing.spin_duration_ms)?;
        non_negative("timing.tick_interval_ms", timing.tick_interval_ms)?;
        if timing.tick_interval_ms == 0.0 {
            return invalid("timing.tick_interval_ms must be positive");
        }
        let last_start = timing.reel_start_offset(self.reel_count - 1);
        if timing.spin_duration_ms < last_start {
            return invalid(format!(
                "spin_duration_ms {} ends before the last reel starts at {} ms",
                timing.spin_duration_ms, last_start
            ));
        }

        let layout = &self.layout;
        non_negative("layout.spin_velocity", layout.spin_velocity)?;
        non_negative("layout.row_spacing", layout.row_spacing)?;
        non_negative("layout.bounce_duration_ms", layout.bounce_duration_ms)?;
        for (field, value) in [
            ("layout.first_row_y", layout.first_row_y),
            ("layout.wrap_threshold", layout.wrap_threshold),
            ("layout.wrap_reset_y", layout.wrap_reset_y),
            ("layout.bounce_height", layout.bounce_height),
        ] {
            if !value.is_finite() {
                return invalid(format!("{field} must be finite"));
            }
        }
        if layout.wrap_reset_y >= layout.resting_offset(0) {
            return invalid("layout.wrap_reset_y must be above the first resting offset");
        }
        if layout.wrap_threshold <= layout.resting_offset(self.slots_per_reel - 1) {
            return invalid("layout.wrap_threshold must be below the last resting offset");
        }

        for style in [&self.outcomes.win, &self.outcomes.loss] {
            non_negative(
                &format!("outcomes.{}.effect_duration_ms", style.name),
                style.effect_duration_ms,
            )?;
        }
        non_negative(
            "spin_control.pulse_duration_ms",
            self.spin_control.pulse_duration_ms,
        )?;

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SlotResult<()> {
    Err(SlotError::InvalidConfig(message.into()))
}

fn non_negative(field: &str, value: f64) -> SlotResult<()> {
    if !value.is_finite() || value < 0.0 {
        return invalid(format!("{field} must be a non-negative number, got {value}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: SlotConfig, needle: &str) {
        match config.validate() {
            Err(SlotError::InvalidConfig(msg)) => {
                assert!(msg.contains(needle), "'{msg}' does not mention '{needle}'")
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = SlotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.symbols.len(), 5);
        assert_eq!(config.outcomes.win.reward, 100);
        assert_eq!(config.outcomes.loss.reward, -20);
        assert_eq!(config.layout.resting_offset(2), 460.0);
        assert!(SlotConfig::instant().validate().is_ok());
    }

    #[test]
    fn test_empty_catalog() {
        assert_invalid(SlotConfig::default().with_symbols(Vec::<String>::new()), "empty");
    }

    #[test]
    fn test_duplicate_symbol() {
        assert_invalid(SlotConfig::default().with_symbols(["A", "A"]), "duplicate");
    }

    #[test]
    fn test_blank_symbol_name() {
        assert_invalid(SlotConfig::default().with_symbols(["A", "  "]), "empty name");
        assert!(SlotConfig::from_json_str(r#"{"symbols": ["A", ""]}"#).is_err());
    }

    #[test]
    fn test_reel_count_bounds() {
        let mut config = SlotConfig::default();
        config.reel_count = MAX_REELS + 1;
        assert_invalid(config, "maximum");

        let mut config = SlotConfig::instant();
        config.reel_count = MAX_REELS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_duration() {
        let mut config = SlotConfig::default();
        config.outcomes.loss.effect_duration_ms = -1.0;
        assert_invalid(config, "effect_duration_ms");

        let mut config = SlotConfig::default();
        config.timing.stagger_delay_ms = f64::NAN;
        assert_invalid(config, "stagger_delay_ms");
    }

    #[test]
    fn test_stop_before_last_start() {
        let mut config = SlotConfig::default();
        config.timing.spin_duration_ms = 500.0; // last reel starts at 600
        assert_invalid(config, "before the last reel starts");

        let mut config = SlotConfig::default();
        config.timing.spin_duration_ms = 600.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_row_outside_reel() {
        let mut config = SlotConfig::default();
        config.reference_row = 3;
        assert_invalid(config, "reference_row");
    }

    #[test]
    fn test_wrap_geometry() {
        let mut config = SlotConfig::default();
        config.layout.wrap_reset_y = 200.0;
        assert_invalid(config, "wrap_reset_y");

        let mut config = SlotConfig::default();
        config.layout.wrap_threshold = 400.0;
        assert_invalid(config, "wrap_threshold");
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{
            "symbols": ["A", "B"],
            "starting_credit": 40,
            "timing": { "stagger_delay_ms": 0, "spin_duration_ms": 0 }
        }"#;
        let config = SlotConfig::from_json_str(json).unwrap();

        assert_eq!(config.symbols, vec!["A", "B"]);
        assert_eq!(config.starting_credit, 40);
        assert_eq!(config.timing.spin_duration_ms, 0.0);
        assert_eq!(config.timing.tick_interval_ms, 16.0);
        assert_eq!(config.reel_count, 3);
        assert_eq!(config.outcomes, OutcomeTable::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
game_id: fruit_mini
outcomes:
  win:
    name: round_win
    reward: 250
    credit_color: gold
    accent: { color: 16766720, width: 14 }
    effect_duration_ms: 1500
"#;
        let config = SlotConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.game_id, "fruit_mini");
        assert_eq!(config.outcomes.win.reward, 250);
        assert_eq!(config.outcomes.loss, OutcomeStyle::round_loss());
    }

    #[test]
    fn test_invalid_file_contents_fail_validation() {
        let json = r#"{ "symbols": [] }"#;
        assert!(matches!(
            SlotConfig::from_json_str(json),
            Err(SlotError::InvalidConfig(_))
        ));
        assert!(matches!(
            SlotConfig::from_json_str("{ not json"),
            Err(SlotError::Json(_))
        ));
        assert!(matches!(
            SlotConfig::from_yaml_str("symbols: [unclosed"),
            Err(SlotError::Yaml(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = SlotConfig::default().to_json().unwrap();
        assert_eq!(SlotConfig::from_json_str(&json).unwrap(), SlotConfig::default());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = std::env::temp_dir().join("rf-slot-game-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("game.toml");
        std::fs::write(&path, "symbols = []").unwrap();

        assert!(matches!(
            SlotConfig::load(&path),
            Err(SlotError::UnsupportedFormat(ext)) if ext == "toml"
        ));

        let missing = dir.join("missing.json");
        assert!(matches!(SlotConfig::load(&missing), Err(SlotError::Io(_))));

        let missing_toml = dir.join("missing.toml");
        assert!(matches!(
            SlotConfig::load(&missing_toml),
            Err(SlotError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }
}
