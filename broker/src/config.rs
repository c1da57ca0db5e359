// Copyright (c) 2024 Sol Broker Contributors. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SocketFamily {
    Unix,
    Inet,
}

/// Mirrors the four `loglevel` names recognized by the config file, mapped
/// onto the `log` crate's own level filters.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LogLevel {
    Debug,
    Information,
    Warning,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Debug,
            Self::Information => log::LevelFilter::Info,
            Self::Warning => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

/// Broker configuration. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub hostname: String,
    pub port: u16,
    pub socket_family: SocketFamily,
    pub tcp_backlog: u32,

    /// Upper bound in bytes on any single inbound packet.
    pub max_request_size: usize,

    /// Multiplexer wait timeout in milliseconds under the original
    /// readiness-loop design; parsed for config-file compatibility but
    /// inert under the Tokio runtime, which has no single blocking wait
    /// call to bound.
    pub epoll_timeout: i32,

    pub stats_pub_interval: u64,
    pub loglevel: LogLevel,

    /// Informational upper bound in bytes, surfaced only through the
    /// `$SOL/broker/memory/used` statistic; not enforced as a hard
    /// allocator limit.
    pub max_memory: u64,

    /// When set, log lines are appended here in addition to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".to_string(),
            port: 1883,
            socket_family: SocketFamily::Inet,
            tcp_backlog: 128,
            max_request_size: 2 * 1024 * 1024,
            epoll_timeout: -1,
            stats_pub_interval: 10,
            loglevel: LogLevel::Warning,
            max_memory: 64 * 1024 * 1024,
            log_file: None,
        }
    }
}

impl Config {
    /// # Errors
    /// Returns `Error` if the file can't be read or a recognized key has
    /// an invalid value.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a plain `key value`-per-line config file. Blank lines and
    /// lines starting with `#` are skipped; unrecognized keys are logged
    /// and ignored.
    ///
    /// # Errors
    /// Returns `Error` if a recognized key has an invalid value.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut config = Self::default();
        for (lineno, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            if key.is_empty() {
                continue;
            }
            config.apply(key, value, lineno + 1)?;
        }
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str, lineno: usize) -> Result<(), Error> {
        match key {
            "hostname" => self.hostname = value.to_string(),
            "port" => self.port = parse_field(key, value, lineno)?,
            "socket_family" => {
                self.socket_family = match value.to_ascii_uppercase().as_str() {
                    "UNIX" => SocketFamily::Unix,
                    "INET" => SocketFamily::Inet,
                    _ => {
                        return Err(Error::new(
                            ErrorKind::Config,
                            format!("line {lineno}: invalid socket_family {value}"),
                        ))
                    }
                };
            }
            "tcp_backlog" => self.tcp_backlog = parse_field(key, value, lineno)?,
            "max_request_size" => self.max_request_size = parse_field(key, value, lineno)?,
            "epoll_timeout" => self.epoll_timeout = parse_field(key, value, lineno)?,
            "stats_pub_interval" => self.stats_pub_interval = parse_field(key, value, lineno)?,
            "loglevel" => {
                self.loglevel = match value.to_ascii_uppercase().as_str() {
                    "DEBUG" => LogLevel::Debug,
                    "INFORMATION" => LogLevel::Information,
                    "WARNING" => LogLevel::Warning,
                    "ERROR" => LogLevel::Error,
                    _ => {
                        return Err(Error::new(
                            ErrorKind::Config,
                            format!("line {lineno}: invalid loglevel {value}"),
                        ))
                    }
                };
            }
            "max_memory" => self.max_memory = parse_field(key, value, lineno)?,
            "log_file" => self.log_file = Some(PathBuf::from(value)),
            _ => log::warn!("config: unrecognized key {key:?} at line {lineno}, ignoring"),
        }
        Ok(())
    }
}

fn parse_field<T: FromStr>(key: &str, value: &str, lineno: usize) -> Result<T, Error> {
    value.parse().map_err(|_err| {
        Error::new(
            ErrorKind::Config,
            format!("line {lineno}: invalid value for {key}: {value}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_keys() {
        let config = Config::parse(
            "hostname 0.0.0.0\nport 1884\nsocket_family INET\n# a comment\nmax_request_size 4096\nloglevel DEBUG\n",
        )
        .unwrap();
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.port, 1884);
        assert_eq!(config.socket_family, SocketFamily::Inet);
        assert_eq!(config.max_request_size, 4096);
        assert_eq!(config.loglevel, LogLevel::Debug);
    }

    #[test]
    fn ignores_unrecognized_keys() {
        let config = Config::parse("nonsense value\nport 1999\n").unwrap();
        assert_eq!(config.port, 1999);
    }

    #[test]
    fn rejects_invalid_value() {
        assert!(Config::parse("port notanumber\n").is_err());
    }
}
