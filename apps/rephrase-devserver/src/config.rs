//! Command line and environment configuration

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "rephrase-devserver")]
#[command(version, about = "Local backend for the Rephrase web app")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "REPHRASE_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Directory served at `/` (the built web app)
    #[arg(long, env = "REPHRASE_STATIC_DIR", default_value = "apps/rephrase-web/www")]
    pub static_dir: PathBuf,

    /// How often stats are broadcast to connected clients
    #[arg(long, env = "REPHRASE_STATS_INTERVAL_MS", default_value = "2000")]
    pub stats_interval_ms: u64,

    /// Word limit for every action except research
    #[arg(long, env = "REPHRASE_WORD_LIMIT", default_value = "200", value_parser = clap::value_parser!(u64).range(1..))]
    pub word_limit: u64,
}

impl ServerConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms.max(100))
    }

    pub fn word_limit(&self) -> usize {
        usize::try_from(self.word_limit).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["rephrase-devserver"]);
        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.stats_interval(), Duration::from_secs(2));
        assert_eq!(config.word_limit(), 200);
    }

    #[test]
    fn test_flags_override() {
        let config = ServerConfig::parse_from([
            "rephrase-devserver",
            "--addr",
            "0.0.0.0:9000",
            "--word-limit",
            "50",
            "--stats-interval-ms",
            "10",
        ]);
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.word_limit(), 50);
        assert_eq!(config.stats_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_word_limit_rejected() {
        assert!(ServerConfig::try_parse_from(["rephrase-devserver", "--word-limit", "0"]).is_err());
    }
}
