use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Required, command-line-supplied parameters. Port and password are always
/// given positionally at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub password: String,
    pub options: ServerOptions,
}

impl ServerConfig {
    pub fn new(port: u16, password: String) -> ServerConfig {
        ServerConfig { port, password, options: ServerOptions::default() }
    }
}

/// Optional tuning loaded from an `--config` TOML file: the server's
/// self-reported name, the maximum number of simultaneous connections the
/// reactor will accept, and the maximum length of one inbound protocol line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerOptions {
    pub server_name: String,
    pub max_connections: usize,
    pub max_message_length: usize,
}

impl Default for ServerOptions {
    fn default() -> ServerOptions {
        ServerOptions {
            server_name: "ircd".to_string(),
            max_connections: 1024,
            max_message_length: 4096,
        }
    }
}

impl ServerOptions {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ServerOptions, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "could not read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "could not parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let opts = ServerOptions::default();
        assert_eq!(opts.server_name, "ircd");
        assert!(opts.max_connections > 0);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let opts: ServerOptions = toml::from_str("server_name = \"myrelay\"\n").unwrap();
        assert_eq!(opts.server_name, "myrelay");
        assert_eq!(opts.max_connections, 1024);
    }
}
