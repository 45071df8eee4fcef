//! Session Configuration
//!
//! Read once at startup from the environment:
//!
//! | Variable              | Meaning                            | Default      |
//! |-----------------------|------------------------------------|--------------|
//! | `ROTATION_SEED`       | Tie-break seed (u64)               | OS entropy   |
//! | `ROTATION_STORE_PATH` | JSON roster file                   | in-memory    |
//! | `ROTATION_COURTS`     | Courts available                   | 4            |
//! | `ROTATION_SKILL_BAND` | Max skill spread inside a group    | 2            |

use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use crate::rotation::orchestrator::RotationConfig;

/// Session configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed tie-break seed. If None, one is drawn from OS entropy.
    pub seed: Option<u64>,
    /// Roster file. If None, the caller supplies a store.
    pub store_path: Option<PathBuf>,
    /// Round-building parameters.
    pub rotation: RotationConfig,
}

impl SessionConfig {
    /// Create config from environment variables.
    ///
    /// Unparseable values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RotationConfig::default();

        let courts = parse_var(&lookup, "ROTATION_COURTS")
            .filter(|&c: &usize| {
                if c == 0 {
                    warn!("ROTATION_COURTS must be at least 1; using default");
                }
                c > 0
            })
            .unwrap_or(defaults.courts);

        Self {
            seed: parse_var(&lookup, "ROTATION_SEED"),
            store_path: lookup("ROTATION_STORE_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            rotation: RotationConfig {
                courts,
                skill_band: parse_var(&lookup, "ROTATION_SKILL_BAND").unwrap_or(defaults.skill_band),
            },
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config_from(pairs: &[(&str, &str)]) -> SessionConfig {
        let vars: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SessionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.rotation.courts, 4);
        assert_eq!(config.rotation.skill_band, 2);
    }

    #[test]
    fn test_all_set() {
        let config = config_from(&[
            ("ROTATION_SEED", "42"),
            ("ROTATION_STORE_PATH", "/tmp/players.json"),
            ("ROTATION_COURTS", "3"),
            ("ROTATION_SKILL_BAND", " 1 "),
        ]);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/players.json")));
        assert_eq!(config.rotation, RotationConfig { courts: 3, skill_band: 1 });
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("ROTATION_SEED", "not-a-number"),
            ("ROTATION_STORE_PATH", "  "),
            ("ROTATION_COURTS", "0"),
            ("ROTATION_SKILL_BAND", "-1"),
        ]);
        assert_eq!(config, SessionConfig::default());
    }
}
