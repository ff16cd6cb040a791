// Configuration module
// `key = value` files with `#`/`;` comments. Section headers are accepted
// but ignored, so every key lives in one flat namespace.
//
// With an environment prefix set, `<prefix><Key>` in the environment takes
// precedence over the file.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Default)]
pub struct Config {
    values: HashMap<String, String>,
    env_prefix: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// No file, only environment variables starting with `env_prefix`
    pub fn from_env(env_prefix: &str) -> Self {
        Self::new().with_env_prefix(env_prefix)
    }

    /// Read and parse `path`, with environment overrides under `env_prefix`
    pub fn load(path: &Path, env_prefix: &str) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content).with_env_prefix(env_prefix))
    }

    pub fn parse(content: &str) -> Self {
        let values = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with(['#', ';', '[']))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
            .collect();
        Self {
            values,
            env_prefix: None,
        }
    }

    pub fn with_env_prefix(mut self, env_prefix: &str) -> Self {
        self.env_prefix = Some(env_prefix.to_string());
        self
    }

    /// Raw value of `key`, environment first
    pub fn get(&self, key: &str) -> Option<String> {
        self.env_prefix
            .as_ref()
            .and_then(|prefix| std::env::var(format!("{}{}", prefix, key.replace('.', "_"))).ok())
            .or_else(|| self.values.get(key).cloned())
    }

    /// `key` parsed as `T`; unset and unparseable values are both `None`
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| value.parse().ok())
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get_parsed(key)
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get_parsed(key)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let config = Config::new();
        assert_eq!(config.get("LogsDir"), None);
        assert_eq!(config.get_int("LogLevel"), None);
        assert_eq!(config.get_float("PlayerHeight"), None);
    }

    #[test]
    fn test_parse() {
        let config = Config::parse(
            "# player capsule\n\
             [Walkmap]\n\
             PlayerHeight = 1.8\n\
             ; radius is quoted\n\
             PlayerRadius = \"0.3\"\n\
             LogsDir = logs\n\
             LogLevel=3\n\
             StepHeight = tall\n\
             no equals sign here\n",
        );

        assert_eq!(config.get_float("PlayerHeight"), Some(1.8));
        assert_eq!(config.get_float("PlayerRadius"), Some(0.3));
        assert_eq!(config.get("LogsDir").as_deref(), Some("logs"));
        assert_eq!(config.get_int("LogLevel"), Some(3));
        assert_eq!(config.get_float("StepHeight"), None);
        assert_eq!(config.get("Walkmap"), None);
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/walkmap.conf"), "Walkmap_").is_err());
    }
}
