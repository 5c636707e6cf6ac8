//! Environment-driven configuration, validated once at startup.
//!
//! All secrets arrive through the environment (or a `.env` file loaded by
//! the binary); nothing is hard-coded.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub extract_base_url: String,
    pub extract_client_id: String,
    pub extract_client_secret: String,
    pub report_base_url: String,
    pub report_api_key: String,
    pub report_model: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Overall deadline for one extraction job.
    pub extract_timeout: Duration,
    /// Per-request timeout for the generation call.
    pub report_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Split out from [`from_env`]
    /// so tests don't have to mutate process-wide environment state.
    ///
    /// [`from_env`]: Config::from_env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            extract_base_url: or_default(
                &lookup,
                "PDF_SERVICES_BASE_URL",
                credlens_extract::DEFAULT_BASE_URL,
            ),
            extract_client_id: require(&lookup, "PDF_SERVICES_CLIENT_ID")?,
            extract_client_secret: require(&lookup, "PDF_SERVICES_CLIENT_SECRET")?,
            report_base_url: or_default(&lookup, "OPENAI_BASE_URL", credlens_report::DEFAULT_BASE_URL),
            report_api_key: require(&lookup, "OPENAI_API_KEY")?,
            report_model: or_default(&lookup, "REPORT_MODEL", credlens_report::DEFAULT_MODEL),
            upload_dir: PathBuf::from(or_default(&lookup, "UPLOAD_DIR", "uploads")),
            output_dir: PathBuf::from(or_default(&lookup, "OUTPUT_DIR", "output")),
            extract_timeout: Duration::from_secs(parse_or(&lookup, "EXTRACT_TIMEOUT_SECS", 1000)?),
            report_timeout: Duration::from_secs(parse_or(&lookup, "REPORT_TIMEOUT_SECS", 60)?),
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name).ok_or(ConfigError::MissingVar(name))
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var: name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("PDF_SERVICES_CLIENT_ID", "client-id"),
            ("PDF_SERVICES_CLIENT_SECRET", "client-secret"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
    }

    fn lookup_in(
        vars: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn defaults_apply_when_only_secrets_are_set() {
        let config = Config::from_lookup(lookup_in(base_vars())).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.extract_timeout, Duration::from_secs(1000));
        assert_eq!(config.report_timeout, Duration::from_secs(60));
        assert_eq!(config.report_model, "gpt-3.5-turbo");
    }

    #[test]
    fn missing_secret_names_the_variable() {
        let mut vars = base_vars();
        vars.remove("OPENAI_API_KEY");
        let err = Config::from_lookup(lookup_in(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("OPENAI_API_KEY")));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let mut vars = base_vars();
        vars.insert("PORT", "8080");
        vars.insert("EXTRACT_TIMEOUT_SECS", "30");
        vars.insert("UPLOAD_DIR", "/srv/uploads");
        let config = Config::from_lookup(lookup_in(vars)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.extract_timeout, Duration::from_secs(30));
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
    }

    #[test]
    fn unparsable_number_is_rejected() {
        let mut vars = base_vars();
        vars.insert("PORT", "not-a-port");
        let err = Config::from_lookup(lookup_in(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { var: "PORT", .. }));
    }
}
