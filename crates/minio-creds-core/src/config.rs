//! Root configuration validation and loading
//!
//! The host hands over the root credential as a flat map of strings and
//! booleans. `RootConfig::from_raw` checks it once so every later consumer
//! can rely on typed connection settings.

use crate::error::{ConfigError, Result};
use crate::secret::SecureString;
use crate::template::DEFAULT_USERNAME_TEMPLATE;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Raw configuration map as exchanged with the host
pub type RawConfig = Map<String, Value>;

pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const URL_KEY: &str = "url";
pub const USE_SSL_KEY: &str = "useSSL";
pub const USERNAME_TEMPLATE_KEY: &str = "username_template";

/// Keys that must be present and string typed
pub const REQUIRED_KEYS: &[&str] = &[USERNAME_KEY, PASSWORD_KEY, URL_KEY, USE_SSL_KEY];

/// Keys whose values are replaced by placeholders before display
pub const SECRET_KEYS: &[&str] = &[PASSWORD_KEY];

/// Validated connection settings for the admin endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub username: String,
    pub password: SecureString,
    pub url: String,
    pub use_ssl: bool,
}

/// Validated root configuration
#[derive(Clone)]
pub struct RootConfig {
    raw: RawConfig,
    connection: ConnectionConfig,
    username_template: Option<String>,
}

impl RootConfig {
    /// Validate a raw configuration map
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        for field in REQUIRED_KEYS {
            match raw.get(*field) {
                None => return Err(ConfigError::missing_field(*field)),
                Some(Value::String(_)) => {}
                Some(_) => return Err(ConfigError::not_a_string(*field)),
            }
        }

        let use_ssl_raw = required_str(&raw, USE_SSL_KEY)?;
        let use_ssl = parse_bool(use_ssl_raw)
            .ok_or_else(|| ConfigError::invalid_bool(USE_SSL_KEY, use_ssl_raw))?;

        let connection = ConnectionConfig {
            username: required_str(&raw, USERNAME_KEY)?.to_string(),
            password: SecureString::new(required_str(&raw, PASSWORD_KEY)?),
            url: required_str(&raw, URL_KEY)?.to_string(),
            use_ssl,
        };

        let username_template = match raw.get(USERNAME_TEMPLATE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(ConfigError::not_a_string(USERNAME_TEMPLATE_KEY)),
        };

        Ok(Self {
            raw,
            connection,
            username_template,
        })
    }

    /// Load and validate a configuration file (`.json`, `.yaml` or `.yml`)
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let raw: RawConfig = if is_yaml {
            serde_yaml_ng::from_str(&content)
                .map_err(|e| ConfigError::parse(&display, e.to_string()))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse(&display, e.to_string()))?
        };

        Self::from_raw(raw)
    }

    /// The configuration exactly as supplied
    pub fn raw(&self) -> &RawConfig {
        &self.raw
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// The template source in effect, falling back to the default
    pub fn username_template(&self) -> &str {
        self.username_template
            .as_deref()
            .unwrap_or(DEFAULT_USERNAME_TEMPLATE)
    }

    /// Whether the caller supplied their own template
    pub fn has_custom_template(&self) -> bool {
        self.username_template.is_some()
    }

    /// Configured values of the sensitive keys, paired with the key name
    pub fn secret_values(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        SECRET_KEYS
            .iter()
            .filter_map(move |key| match self.raw.get(*key) {
                Some(Value::String(v)) => Some((*key, v.as_str())),
                _ => None,
            })
    }
}

impl fmt::Debug for RootConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootConfig")
            .field("connection", &self.connection)
            .field("username_template", &self.username_template)
            .finish_non_exhaustive()
    }
}

fn required_str<'a>(raw: &'a RawConfig, field: &str) -> Result<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ConfigError::missing_field(field))
}

/// Boolean spellings accepted for `useSSL`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn raw(value: Value) -> RawConfig {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid() -> RawConfig {
        raw(json!({
            "username": "admin",
            "password": "s3cr3t",
            "url": "https://store.local",
            "useSSL": "true",
        }))
    }

    #[test]
    fn test_valid_config() {
        let config = RootConfig::from_raw(valid()).unwrap();
        assert_eq!(config.connection().username, "admin");
        assert_eq!(config.connection().password.expose(), "s3cr3t");
        assert_eq!(config.connection().url, "https://store.local");
        assert!(config.connection().use_ssl);
        assert!(!config.has_custom_template());
        assert_eq!(config.username_template(), DEFAULT_USERNAME_TEMPLATE);
    }

    #[test]
    fn test_missing_use_ssl_names_field() {
        let mut map = valid();
        map.remove("useSSL");

        let err = RootConfig::from_raw(map).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
        assert!(err.to_string().contains("\"useSSL\""), "got: {}", err);
    }

    #[test]
    fn test_each_required_field_checked() {
        for field in REQUIRED_KEYS {
            let mut map = valid();
            map.remove(*field);
            let err = RootConfig::from_raw(map).unwrap_err();
            assert!(
                err.to_string().contains(field),
                "expected {field} in error, got: {err}"
            );
        }
    }

    #[test]
    fn test_non_string_field_rejected() {
        let mut map = valid();
        map.insert("useSSL".to_string(), json!(true));

        let err = RootConfig::from_raw(map).unwrap_err();
        assert!(matches!(err, ConfigError::NotAString { ref field } if field == "useSSL"));
    }

    #[test]
    fn test_use_ssl_must_parse() {
        let mut map = valid();
        map.insert("useSSL".to_string(), json!("yes"));

        let err = RootConfig::from_raw(map).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));
    }

    #[test]
    fn test_parse_bool_spellings() {
        for v in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("tRuE"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_custom_and_empty_template() {
        let mut map = valid();
        map.insert("username_template".to_string(), json!("{{ role_name }}"));
        let config = RootConfig::from_raw(map).unwrap();
        assert!(config.has_custom_template());
        assert_eq!(config.username_template(), "{{ role_name }}");

        let mut map = valid();
        map.insert("username_template".to_string(), json!(""));
        let config = RootConfig::from_raw(map).unwrap();
        assert!(!config.has_custom_template());

        let mut map = valid();
        map.insert("username_template".to_string(), json!(42));
        assert!(RootConfig::from_raw(map).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let config = RootConfig::from_raw(valid()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cr3t"), "leaked: {debug}");
    }

    #[test]
    fn test_secret_values() {
        let config = RootConfig::from_raw(valid()).unwrap();
        let secrets: Vec<_> = config.secret_values().collect();
        assert_eq!(secrets, vec![("password", "s3cr3t")]);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "username: admin\npassword: s3cr3t\nurl: store.local:9000\nuseSSL: \"false\""
        )
        .unwrap();

        let config = RootConfig::load(file.path()).unwrap();
        assert_eq!(config.connection().url, "store.local:9000");
        assert!(!config.connection().use_ssl);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", Value::Object(valid())).unwrap();

        let config = RootConfig::load(file.path()).unwrap();
        assert_eq!(config.connection().username, "admin");
    }

    #[test]
    fn test_load_missing_file() {
        let err = RootConfig::load(Path::new("/nonexistent/minio.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = RootConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
