use crate::core::{Amount, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_MINING_REWARD: Amount = 10;
const DEFAULT_OWNER: &str = "owner";

const DIFFICULTY_KEY: &str = "LEDGER_DIFFICULTY";
const MINING_REWARD_KEY: &str = "LEDGER_MINING_REWARD";
const OWNER_KEY: &str = "LEDGER_OWNER";
const MAX_MINING_ATTEMPTS_KEY: &str = "LEDGER_MAX_MINING_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Leading hex zeros required of every mined block hash
    pub difficulty: u32,
    /// Amount credited to the miner of each block
    pub mining_reward: Amount,
    /// Participant that mines when no miner is named
    pub owner: String,
    /// Give up a proof-of-work search after this many attempts
    pub max_mining_attempts: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            owner: String::from(DEFAULT_OWNER),
            max_mining_attempts: None,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file at `path`, then the environment
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::parse_file(path)?,
            None => Config::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(difficulty) = env_value(DIFFICULTY_KEY)? {
            self.difficulty = difficulty;
        }
        if let Some(reward) = env_value(MINING_REWARD_KEY)? {
            self.mining_reward = reward;
        }
        if let Ok(owner) = env::var(OWNER_KEY) {
            self.owner = owner;
        }
        if let Some(attempts) = env_value(MAX_MINING_ATTEMPTS_KEY)? {
            self.max_mining_attempts = Some(attempts);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(LedgerError::Config(format!(
                "difficulty {} exceeds maximum of {MAX_DIFFICULTY}",
                self.difficulty
            )));
        }
        if self.owner.trim().is_empty() {
            return Err(LedgerError::Config("owner must not be empty".to_string()));
        }
        if self.max_mining_attempts == Some(0) {
            return Err(LedgerError::Config(
                "max_mining_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| LedgerError::Config(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.difficulty, 4);
        assert_eq!(config.mining_reward, 10);
        assert_eq!(config.owner, "owner");
        assert_eq!(config.max_mining_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("difficulty = 2\nowner = \"alice\"\n").unwrap();
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.owner, "alice");
        assert_eq!(config.mining_reward, 10);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml_str("dificulty = 2"),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_impossible_difficulty() {
        assert!(matches!(
            Config::from_toml_str("difficulty = 65"),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_zero_attempt_bound() {
        assert!(Config::from_toml_str("max_mining_attempts = 0").is_err());
        let config = Config::from_toml_str("max_mining_attempts = 500").unwrap();
        assert_eq!(config.max_mining_attempts, Some(500));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "mining_reward = 25").unwrap();
        writeln!(file, "owner = \"miner-1\"").unwrap();

        let config = Config::parse_file(&path).unwrap();
        assert_eq!(config.mining_reward, 25);
        assert_eq!(config.owner, "miner-1");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::parse_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
