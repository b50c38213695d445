//! Matchmaking configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MatchmakingMode
// ---------------------------------------------------------------------------

/// How connections are paired.
///
/// - **QuickPair**: one global waiting seat. The first connection waits,
///   the next one is paired with it. Nobody picks an opponent.
/// - **RoomCode**: a player opens a room under a short code, the list of
///   open rooms is pushed to everyone, another player joins by code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchmakingMode {
    #[default]
    QuickPair,
    RoomCode,
}

impl fmt::Display for MatchmakingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuickPair => write!(f, "quick_pair"),
            Self::RoomCode => write!(f, "room_code"),
        }
    }
}

impl FromStr for MatchmakingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "quick_pair" => Ok(Self::QuickPair),
            "room_code" => Ok(Self::RoomCode),
            other => Err(format!("unknown matchmaking mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchmakingConfig
// ---------------------------------------------------------------------------

/// Matchmaking settings for a server instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingConfig {
    /// Pairing strategy.
    pub mode: MatchmakingMode,

    /// Tear the room down once a `game_over` has been relayed. Both
    /// players go back to the lobby and the code becomes reusable.
    pub close_room_on_game_over: bool,
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            mode: MatchmakingMode::QuickPair,
            close_room_on_game_over: true,
        }
    }
}

impl MatchmakingConfig {
    /// Default settings for the given mode.
    pub fn with_mode(mode: MatchmakingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str_accepts_both_spellings() {
        assert_eq!("quick_pair".parse(), Ok(MatchmakingMode::QuickPair));
        assert_eq!("Room-Code".parse(), Ok(MatchmakingMode::RoomCode));
        assert!("ladder".parse::<MatchmakingMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [MatchmakingMode::QuickPair, MatchmakingMode::RoomCode] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }

    #[test]
    fn test_config_default() {
        let config = MatchmakingConfig::default();
        assert_eq!(config.mode, MatchmakingMode::QuickPair);
        assert!(config.close_room_on_game_over);
    }

    #[test]
    fn test_config_deserializes_with_missing_fields() {
        let config: MatchmakingConfig =
            serde_json::from_str(r#"{"mode":"room_code"}"#).unwrap();
        assert_eq!(config, MatchmakingConfig::with_mode(MatchmakingMode::RoomCode));
    }
}
