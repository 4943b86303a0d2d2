//! Runtime configuration, read from the environment with working defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_LOCALE: &str = "en_US";

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Prefix for every absolute admin URL placed in grid cells.
    pub base_url: String,
    /// Rows per grid page when the request carries no usable `length`.
    pub page_size: u64,
    pub max_page_size: u64,
    /// Row cap for CSV exports, `None` exports everything.
    pub csv_limit: Option<u64>,
    pub export_dir: PathBuf,
    pub default_locale: String,
    /// Bearer token the default access guard accepts; `None` denies every request.
    pub admin_token: Option<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            csv_limit: None,
            export_dir: env::temp_dir(),
            default_locale: DEFAULT_LOCALE.to_string(),
            admin_token: None,
        }
    }
}

impl ManagerConfig {
    /// Build the configuration from `DATABASE_URL` and the `EOM_*` variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: env::var("EOM_BIND_ADDR").unwrap_or(defaults.bind_address),
            base_url: env::var("EOM_BASE_URL").unwrap_or(defaults.base_url),
            page_size: parse_var("EOM_PAGE_SIZE").unwrap_or(defaults.page_size),
            max_page_size: parse_var("EOM_MAX_PAGE_SIZE").unwrap_or(defaults.max_page_size),
            csv_limit: parse_var("EOM_CSV_LIMIT"),
            export_dir: env::var("EOM_EXPORT_DIR").map_or(defaults.export_dir, PathBuf::from),
            default_locale: env::var("EOM_DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
            admin_token: env::var("EOM_ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    /// Rows for one grid page: the requested length when positive, clamped to the max.
    #[must_use]
    pub fn grid_limit(&self, requested_length: i64) -> u64 {
        u64::try_from(requested_length)
            .ok()
            .filter(|length| *length > 0)
            .map_or(self.page_size, |length| length.min(self.max_page_size))
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}
