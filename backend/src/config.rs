use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATA_FILE: &str = "user_data.json";
const DEFAULT_STATIC_DIR: &str = "../frontend/dist";
const DEFAULT_MAX_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    pub max_attempts: u32,
    /// Admin endpoints refuse every request when unset.
    pub admin_id: Option<i64>,
    pub static_dir: PathBuf,
}

#[derive(Debug)]
pub struct ConfigError {
    key: &'static str,
    value: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let invalid = |key: &'static str, raw: String| ConfigError { key, value: raw };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| invalid("BIND_ADDR", bind_addr.clone()))?;

        let max_attempts = match lookup("MAX_ATTEMPTS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid("MAX_ATTEMPTS", raw.clone()))?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let admin_id = match lookup("ADMIN_ID") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(id) if id > 0 => Some(id),
                _ => return Err(invalid("ADMIN_ID", raw)),
            },
            None => None,
        };

        Ok(Self {
            bind_addr,
            data_file: lookup("DATA_FILE")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
                .into(),
            max_attempts,
            admin_id,
            static_dir: lookup("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.admin_id, None);
        assert_eq!(config.data_file, PathBuf::from("user_data.json"));
    }

    #[test]
    fn test_overrides_and_errors() {
        let config = config(&[("MAX_ATTEMPTS", "5"), ("ADMIN_ID", "777")]).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.admin_id, Some(777));

        assert!(self::config(&[("MAX_ATTEMPTS", "many")]).is_err());
        assert!(self::config(&[("ADMIN_ID", "-3")]).is_err());
        assert!(self::config(&[("BIND_ADDR", "nowhere")]).is_err());
    }
}
