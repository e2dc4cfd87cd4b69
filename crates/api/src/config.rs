//! Application configuration loaded from environment variables.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

/// Secret used when `JWT_SECRET` is unset. Only fit for local development.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: IPv4 or IPv6 bind address (default: `"0.0.0.0"`)
/// - `PORT`: REST listen port (default: `8084`)
/// - `GRPC_PORT`: gRPC listen port (default: `9084`)
/// - `DATABASE_URL`: PostgreSQL URL; the in-memory store is used when unset
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `10`)
/// - `JWT_SECRET`: HS256 signing secret (default: [`DEV_JWT_SECRET`])
/// - `REQUEST_TIMEOUT_SECS`: per-request timeout on both servers (default: `30`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub grpc_port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            grpc_port: env_or("GRPC_PORT", defaults.grpc_port),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            database_max_connections: env_or(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Returns the REST bind address.
    pub fn addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.socket_addr(self.port)
    }

    /// Returns the gRPC bind address.
    pub fn grpc_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.socket_addr(self.grpc_port)
    }

    fn socket_addr(&self, port: u16) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// True when the signing secret is still the development default.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8084,
            grpc_port: 9084,
            database_url: None,
            database_max_connections: 10,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8084);
        assert_eq!(config.grpc_port, 9084);
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            grpc_port: 9090,
            ..Config::default()
        };
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.grpc_addr().unwrap().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let config = Config {
            host: "::".to_string(),
            ..Config::default()
        };
        let grpc = config.grpc_addr().unwrap();
        assert!(grpc.is_ipv6());
        assert_eq!(grpc.port(), 9084);
        assert_eq!(grpc.to_string(), "[::]:9084");
        assert_eq!(config.addr().unwrap().to_string(), "[::]:8084");
    }

    #[test]
    fn test_host_must_be_an_ip_address() {
        let config = Config {
            host: "localhost".to_string(),
            ..Config::default()
        };
        assert!(config.addr().is_err());
        assert!(config.grpc_addr().is_err());
    }

    #[test]
    fn test_custom_secret_is_not_dev() {
        let config = Config {
            jwt_secret: "prod-secret".to_string(),
            ..Config::default()
        };
        assert!(!config.uses_dev_secret());
    }
}
