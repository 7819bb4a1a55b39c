use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `PIRATESEARCH_API__URL`
const ENV_PREFIX: &str = "PIRATESEARCH_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path)))
}

/// Load configuration from an optional file; a missing file means defaults
/// plus environment overrides
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        extract(Figment::from(Serialized::defaults(Config::default())))
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[api]
url = "https://apibay.example"
timeout_secs = 5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.api.url, "https://apibay.example");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let toml = r#"
[api
url =
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/piratesearch.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config =
            load_config_or_default(Path::new("/nonexistent/piratesearch.toml")).unwrap();
        assert_eq!(config.fetch.max_results, 100);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[fetch]
concurrency = 2

[datasets]
dir = "/tmp/sets"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.fetch.concurrency, 2);
        assert_eq!(config.fetch.max_results, 100);
        assert_eq!(config.datasets.dir.to_str().unwrap(), "/tmp/sets");
    }
}
