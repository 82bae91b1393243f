use std::path::Path;

use serde::{Deserialize, Serialize};

use vectorclash_core::game_trait::MatchSetup;
use vectorclash_core::player::{ArchetypeKind, Difficulty};

use crate::error::ConfigError;

/// Host configuration, loaded from `config/host.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Archetypes and control sources for both sides.
    pub setup: MatchSetup,
    /// Round wins that take the match.
    pub win_score: u32,
    /// Pause between a decided round and the next one (ms).
    pub between_round_ms: u64,
    /// Fixed RNG seed for reproducible matches. Entropy when unset.
    pub seed: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            setup: MatchSetup::cpu_versus_cpu(
                ArchetypeKind::Triangle,
                ArchetypeKind::Pentagon,
                Difficulty(5),
                Difficulty(5),
            ),
            win_score: 5,
            between_round_ms: 800,
            seed: None,
        }
    }
}

impl HostConfig {
    /// Load from `$VECTORCLASH_HOST_CONFIG` or `config/host.toml`. Falls back
    /// to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("VECTORCLASH_HOST_CONFIG")
            .unwrap_or_else(|_| "config/host.toml".to_string());
        match Self::from_path(&path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Io { .. }) => HostConfig::default(),
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                HostConfig::default()
            },
        }
    }

    /// Load from an explicit path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>".to_string())
    }

    fn parse(content: &str, path: String) -> Result<Self, ConfigError> {
        let cfg: HostConfig =
            toml::from_str(content).map_err(|source| ConfigError::Parse { path, source })?;
        Ok(cfg.validated())
    }

    /// Clamp values into supported ranges.
    pub fn validated(mut self) -> Self {
        self.setup = self.setup.clamped();
        if self.win_score == 0 {
            tracing::warn!("win_score must be > 0, using 1");
            self.win_score = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use vectorclash_core::player::ControlSource;

    use super::*;

    #[test]
    fn defaults_are_first_to_five() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.win_score, 5);
        assert_eq!(cfg.between_round_ms, 800);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = HostConfig::from_toml("seed = 42\n").unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.win_score, 5);
    }

    #[test]
    fn setup_parses_and_clamps() {
        let cfg = HostConfig::from_toml(
            r#"
            win_score = 3

            [[setup.combatants]]
            archetype = "diamond"
            control = { type = "human" }

            [[setup.combatants]]
            archetype = "square"
            control = { type = "ai", difficulty = 14 }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.win_score, 3);
        assert_eq!(cfg.setup.combatants[0].archetype, ArchetypeKind::Diamond);
        assert_eq!(cfg.setup.combatants[0].control, ControlSource::Human);
        assert_eq!(
            cfg.setup.combatants[1].control,
            ControlSource::Ai {
                difficulty: Difficulty(10)
            }
        );
    }

    #[test]
    fn zero_win_score_is_raised() {
        let cfg = HostConfig::from_toml("win_score = 0\n").unwrap();
        assert_eq!(cfg.win_score, 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = HostConfig::from_path("/definitely/not/here/host.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here/host.toml"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = HostConfig::from_toml("win_score = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
