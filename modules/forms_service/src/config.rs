//! Configuration for forms service module

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Forms service configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Page size when a listing does not specify one
    #[serde(default = "default_page_limit")]
    pub default_page_limit: i64,

    /// Sort field when a listing does not specify one
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Collation locale for listing sorts
    #[serde(default = "default_collation")]
    pub collation: String,

    /// Site key used by reCAPTCHA tags when the caller passes none
    #[serde(default)]
    pub recaptcha_site_key: Option<String>,

    /// Form handle used when a success email is requested without one
    #[serde(default = "default_success_email_handle")]
    pub default_success_email_handle: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_limit: default_page_limit(),
            default_sort: default_sort(),
            collation: default_collation(),
            recaptcha_site_key: None,
            default_success_email_handle: default_success_email_handle(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load forms configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Keys read from `FORMS_*` variables; other `FORMS_*` variables are ignored
const ENV_KEYS: [&str; 5] = [
    "default_page_limit",
    "default_sort",
    "collation",
    "recaptcha_site_key",
    "default_success_email_handle",
];

impl Config {
    /// Defaults, then the optional YAML file, then `FORMS_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("FORMS_").only(&ENV_KEYS))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }
}

fn default_page_limit() -> i64 {
    25
}

fn default_sort() -> String {
    "name".to_string()
}

fn default_collation() -> String {
    "en".to_string()
}

fn default_success_email_handle() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    // Jail serializes environment changes across tests

    #[test]
    fn test_load_merges_yaml_over_defaults() {
        Jail::expect_with(|_jail| {
            let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
            writeln!(file, "default_page_limit: 50").unwrap();
            writeln!(file, "recaptcha_site_key: site-key-123").unwrap();

            let cfg = Config::load(Some(file.path())).unwrap();
            assert_eq!(cfg.default_page_limit, 50);
            assert_eq!(cfg.recaptcha_site_key.as_deref(), Some("site-key-123"));
            assert_eq!(cfg.default_sort, "name");
            assert_eq!(cfg.collation, "en");
            Ok(())
        });
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        Jail::expect_with(|_jail| {
            let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
            writeln!(file, "page_size: 10").unwrap();

            assert!(Config::load(Some(file.path())).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_known_keys_and_ignores_others() {
        Jail::expect_with(|jail| {
            jail.set_env("FORMS_DEFAULT_PAGE_LIMIT", "40");
            jail.set_env("FORMS_COLLATION", "de");
            jail.set_env("FORMS_API_TOKEN", "unrelated");
            jail.set_env("FORMS_PAGE_SIZE", "10");

            let cfg = Config::load(None).unwrap();
            assert_eq!(cfg.default_page_limit, 40);
            assert_eq!(cfg.collation, "de");
            assert_eq!(cfg.default_sort, "name");
            Ok(())
        });
    }
}
