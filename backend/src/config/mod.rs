//! Runtime configuration.
//!
//! [`AppSettings`] is layered by OrthoConfig from CLI flags, `FLOWBOARD_*`
//! environment variables and configuration files. The token signing secret
//! is loaded separately by [`token_secret_from_env`] so it never lands in
//! a settings struct that might be logged.

mod token;

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

pub use token::{
    BuildMode, TOKEN_SECRET_ENV, TOKEN_SECRET_FILE_ENV, TOKEN_SECRET_MIN_LEN, TokenConfigError,
    TokenSecret, token_secret_from_env,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_TOKEN_TTL_HOURS: u32 = 24;
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 10;
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Invalid values found in [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("bcrypt cost {value} outside supported range 4..=31")]
    BcryptCost { value: u32 },
    #[error("token ttl must be at least one hour")]
    TokenTtl,
    #[error("max db connections must be at least one")]
    MaxDbConnections,
}

/// Service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLOWBOARD")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one, debug builds use in-memory stores.
    pub database_url: Option<String>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: Option<u32>,
    /// Lifetime of issued bearer tokens, in hours.
    pub token_ttl_hours: Option<u32>,
    /// Upper bound on pooled database connections.
    pub max_db_connections: Option<u32>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, if persistence is configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// bcrypt cost to hash with.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BcryptCost`] outside the range bcrypt accepts.
    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
        if BCRYPT_COST_RANGE.contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::BcryptCost { value: cost })
        }
    }

    /// Lifetime of issued tokens.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TokenTtl`] when configured as zero.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS) {
            0 => Err(SettingsError::TokenTtl),
            hours => Ok(Duration::hours(i64::from(hours))),
        }
    }

    /// Pool size for the database.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MaxDbConnections`] when configured as zero.
    pub fn max_db_connections(&self) -> Result<u32, SettingsError> {
        match self.max_db_connections.unwrap_or(DEFAULT_MAX_DB_CONNECTIONS) {
            0 => Err(SettingsError::MaxDbConnections),
            size => Ok(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "FLOWBOARD_BIND_ADDR",
        "FLOWBOARD_DATABASE_URL",
        "FLOWBOARD_BCRYPT_COST",
        "FLOWBOARD_TOKEN_TTL_HOURS",
        "FLOWBOARD_MAX_DB_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("flowboard")]).expect("settings should load")
    }

    fn empty() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            bcrypt_cost: None,
            token_ttl_hours: None,
            max_db_connections: None,
        }
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("valid addr")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.bcrypt_cost(), Ok(DEFAULT_BCRYPT_COST));
        assert_eq!(settings.token_ttl(), Ok(Duration::hours(24)));
        assert_eq!(settings.max_db_connections(), Ok(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FLOWBOARD_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "FLOWBOARD_DATABASE_URL",
                Some("postgres://localhost/flowboard".to_owned()),
            ),
            ("FLOWBOARD_BCRYPT_COST", Some("6".to_owned())),
            ("FLOWBOARD_TOKEN_TTL_HOURS", Some("2".to_owned())),
            ("FLOWBOARD_MAX_DB_CONNECTIONS", Some("3".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("valid addr")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/flowboard"));
        assert_eq!(settings.bcrypt_cost(), Ok(6));
        assert_eq!(settings.token_ttl(), Ok(Duration::hours(2)));
        assert_eq!(settings.max_db_connections(), Ok(3));
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn bcrypt_cost_outside_range_is_rejected(#[case] cost: u32) {
        let settings = AppSettings {
            bcrypt_cost: Some(cost),
            ..empty()
        };
        assert_eq!(settings.bcrypt_cost(), Err(SettingsError::BcryptCost { value: cost }));
    }

    #[rstest]
    fn zero_values_are_rejected() {
        let settings = AppSettings {
            token_ttl_hours: Some(0),
            max_db_connections: Some(0),
            ..empty()
        };
        assert_eq!(settings.token_ttl(), Err(SettingsError::TokenTtl));
        assert_eq!(settings.max_db_connections(), Err(SettingsError::MaxDbConnections));
    }

    #[rstest]
    #[case("localhost")]
    #[case("0.0.0.0")]
    fn malformed_bind_addr_is_rejected(#[case] raw: &str) {
        let settings = AppSettings {
            bind_addr: Some(raw.to_owned()),
            ..empty()
        };
        assert!(matches!(settings.bind_addr(), Err(SettingsError::BindAddr { .. })));
    }

    #[rstest]
    fn blank_database_url_means_none() {
        let settings = AppSettings {
            database_url: Some("   ".to_owned()),
            ..empty()
        };
        assert_eq!(settings.database_url(), None);
    }
}
