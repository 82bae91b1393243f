use serde::{Deserialize, Serialize};

/// Tunables for the AI opponent. Millisecond values are converted to ticks at
/// the configured tick rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Reaction latency at difficulty 1 (ms). Falls linearly to 0 at difficulty 10.
    pub max_reaction_ms: f32,
    /// Upper bound of the random reaction jitter (ms). Zero at difficulty 10.
    pub max_jitter_ms: f32,
    /// Chance of a panic think at difficulty 1. Falls linearly to 0 at difficulty 10.
    pub max_error_chance: f32,
    /// Delay before the first think of a round (ms).
    pub round_start_grace_ms: f32,
    /// Forced re-think delay after an anti-air jump (ms).
    pub rethink_ms: f32,
    /// Anti-air triggers when the diver would arrive within this many ticks.
    pub anti_air_window_ticks: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_reaction_ms: 600.0,
            max_jitter_ms: 50.0,
            max_error_chance: 0.3,
            round_start_grace_ms: 1000.0,
            rethink_ms: 50.0,
            anti_air_window_ticks: 30.0,
        }
    }
}

/// Data-driven configuration for the duel simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Playfield width.
    pub field_width: f32,
    /// Ground line (y grows downward).
    pub ground_y: f32,
    /// Distance of each spawn point from its wall.
    pub spawn_inset: f32,
    /// Downward acceleration per tick, scaled by archetype mass.
    pub gravity: f32,
    /// Horizontal velocity multiplier applied every tick.
    pub drag: f32,
    /// Trail capacity (positions kept per combatant).
    pub trail_length: usize,
    /// Simulation ticks per second.
    pub tick_rate: f32,
    /// Slow-motion window after a round win (frames).
    pub slow_mo_duration: u32,
    /// During slow motion one frame in this many runs a step.
    pub slow_mo_divisor: u32,
    /// Height advantage needed to win a dive-vs-dive clash.
    pub clash_margin: f32,
    /// Horizontal velocity multiplier on clash recoil (applied negated).
    pub clash_recoil_scale: f32,
    /// Vertical velocity set on clash recoil.
    pub clash_recoil_vy: f32,
    /// Screen shake set by a clash.
    pub clash_shake: f32,
    /// Screen shake set by a round win.
    pub win_shake: f32,
    /// Screen shake multiplier per tick.
    pub shake_decay: f32,
    /// Impulse applied to both bodies on a non-attacking bump.
    pub bump_force: f32,
    /// Particle life lost per tick.
    pub particle_decay: f32,
    pub ai: AiConfig,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            field_width: 1200.0,
            ground_y: 700.0,
            spawn_inset: 200.0,
            gravity: 0.6,
            drag: 0.98,
            trail_length: 12,
            tick_rate: vectorclash_core::time::DEFAULT_TICK_RATE_HZ,
            slow_mo_duration: 60,
            slow_mo_divisor: 10,
            clash_margin: 10.0,
            clash_recoil_scale: 1.5,
            clash_recoil_vy: -10.0,
            clash_shake: 15.0,
            win_shake: 20.0,
            shake_decay: 0.9,
            bump_force: 3.0,
            particle_decay: 0.05,
            ai: AiConfig::default(),
        }
    }
}

impl DuelConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("VECTORCLASH_DUEL_CONFIG")
            .unwrap_or_else(|_| "config/duel.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<DuelConfig>(&content) {
                Ok(cfg) => cfg.validated(),
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    DuelConfig::default()
                },
            },
            Err(_) => DuelConfig::default(),
        }
    }

    /// Clamp values into supported ranges.
    pub fn validated(mut self) -> Self {
        let defaults = DuelConfig::default();
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            tracing::warn!(
                tick_rate = self.tick_rate,
                "tick_rate must be > 0, using {}",
                defaults.tick_rate
            );
            self.tick_rate = defaults.tick_rate;
        }
        if self.slow_mo_divisor == 0 {
            tracing::warn!("slow_mo_divisor must be >= 1, using 1");
            self.slow_mo_divisor = 1;
        }
        if !(0.0..=1.0).contains(&self.drag) {
            let drag = if self.drag.is_nan() {
                defaults.drag
            } else {
                self.drag.clamp(0.0, 1.0)
            };
            tracing::warn!(drag = self.drag, "drag must be within [0, 1], using {drag}");
            self.drag = drag;
        }
        if self.trail_length == 0 {
            tracing::warn!("trail_length must be >= 1, using 1");
            self.trail_length = 1;
        }
        self
    }
}
