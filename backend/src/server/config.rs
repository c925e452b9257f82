//! HTTP server settings and the configuration object built from them.

use std::net::{AddrParseError, SocketAddr};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use notekeeper::domain::PasswordHashError;
use notekeeper::inbound::http::session_config::SessionSettings;
use notekeeper::outbound::hashing::Argon2PasswordHasher;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Start-up settings loaded from `NOTEKEEPER_*` variables and CLI flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTEKEEPER")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Create the demo accounts and notes on start-up.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 iteration count.
    pub hash_iterations: Option<u32>,
    /// Argon2 lanes.
    pub hash_parallelism: Option<u32>,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Password hasher honouring any configured cost overrides.
    pub fn hasher(&self) -> Result<Argon2PasswordHasher, PasswordHashError> {
        Argon2PasswordHasher::with_cost(
            self.hash_memory_kib,
            self.hash_iterations,
            self.hash_parallelism,
        )
    }
}

/// Everything [`super::create_server`] needs besides application state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) ttl_hours: u32,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Combine validated session settings with the listen address.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
            ttl_hours,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            ttl_hours,
            bind_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "NOTEKEEPER_BIND_ADDR",
        "NOTEKEEPER_SEED_DEMO_DATA",
        "NOTEKEEPER_HASH_MEMORY_KIB",
        "NOTEKEEPER_HASH_ITERATIONS",
        "NOTEKEEPER_HASH_PARALLELISM",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("notekeeper")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(!settings.seed_demo_data);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.hash_memory_kib.is_none());
        assert!(settings.hasher().is_ok());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("NOTEKEEPER_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("NOTEKEEPER_SEED_DEMO_DATA", Some("true".to_owned())),
            ("NOTEKEEPER_HASH_MEMORY_KIB", Some("8".to_owned())),
            ("NOTEKEEPER_HASH_ITERATIONS", Some("1".to_owned())),
            ("NOTEKEEPER_HASH_PARALLELISM", Some("1".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.seed_demo_data);
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.hash_memory_kib, Some(8));
        assert!(settings.hasher().is_ok());
    }

    fn settings() -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            seed_demo_data: false,
            hash_memory_kib: None,
            hash_iterations: None,
            hash_parallelism: None,
        }
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let settings = ServerSettings {
            bind_addr: Some("not-an-address".to_owned()),
            ..settings()
        };
        assert!(settings.bind_addr().is_err());
    }

    #[rstest]
    fn argon2_cost_below_minimum_is_rejected() {
        let settings = ServerSettings {
            hash_memory_kib: Some(1),
            ..settings()
        };
        assert!(settings.hasher().is_err());
    }
}
