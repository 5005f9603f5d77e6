use crate::game::constants::TICK_RATE_HZ;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub port: u16,
  /// STATE frames per second; the tick itself always runs at `TICK_RATE_HZ`.
  pub broadcast_hz: u64,
  /// Lets multiplayer sessions spawn agents too. Solo sessions always do.
  pub multiplayer_agents: bool,
  pub debug_commands: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      port: 8787,
      broadcast_hz: 30,
      multiplayer_agents: false,
      debug_commands: false,
    }
  }
}

impl ServerConfig {
  pub fn load_or_default() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut config = Self::default();

    if let Some(port) = lookup("PORT") {
      match port.trim().parse::<u16>() {
        Ok(parsed) if parsed > 0 => config.port = parsed,
        _ => tracing::warn!("invalid PORT '{}', using {}", port, config.port),
      }
    }

    if let Some(rate) = lookup("BROADCAST_HZ") {
      match rate.trim().parse::<u64>() {
        Ok(parsed) if (1..=TICK_RATE_HZ).contains(&parsed) => config.broadcast_hz = parsed,
        _ => tracing::warn!(
          "BROADCAST_HZ must be 1-{}, got '{}', using {}",
          TICK_RATE_HZ,
          rate,
          config.broadcast_hz
        ),
      }
    }

    if let Some(value) = lookup("MULTIPLAYER_AGENTS") {
      config.multiplayer_agents = parse_flag(&value);
    }

    if let Some(value) = lookup("ENABLE_DEBUG_COMMANDS") {
      config.debug_commands = parse_flag(&value);
    }

    config
  }

  /// Number of simulation ticks between two STATE broadcasts.
  pub fn broadcast_every(&self) -> u64 {
    (TICK_RATE_HZ / self.broadcast_hz.clamp(1, TICK_RATE_HZ)).max(1)
  }
}

fn parse_flag(value: &str) -> bool {
  matches!(value.trim(), "1" | "true" | "TRUE" | "yes")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn defaults_when_nothing_is_set() {
    let config = ServerConfig::from_lookup(|_| None);
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.broadcast_every(), 2);
  }

  #[test]
  fn reads_valid_values() {
    let config = ServerConfig::from_lookup(lookup_from(&[
      ("PORT", "9000"),
      ("BROADCAST_HZ", "60"),
      ("MULTIPLAYER_AGENTS", "true"),
      ("ENABLE_DEBUG_COMMANDS", "1"),
    ]));
    assert_eq!(config.port, 9000);
    assert_eq!(config.broadcast_every(), 1);
    assert!(config.multiplayer_agents);
    assert!(config.debug_commands);
  }

  #[test]
  fn invalid_values_fall_back_to_defaults() {
    let config = ServerConfig::from_lookup(lookup_from(&[
      ("PORT", "0"),
      ("BROADCAST_HZ", "120"),
      ("MULTIPLAYER_AGENTS", "nope"),
    ]));
    assert_eq!(config.port, 8787);
    assert_eq!(config.broadcast_hz, 30);
    assert!(!config.multiplayer_agents);
  }
}
