//! Offline validation of a root configuration file

use anyhow::{Context, Result};
use minio_creds_core::{RootConfig, UsernameMetadata, UsernameTemplate};
use serde_json::json;
use std::path::Path;

use crate::cli::ValidateArgs;
use crate::output;

pub fn run(args: ValidateArgs) -> Result<()> {
    let (config, sample) = match check(&args.file) {
        Ok(checked) => checked,
        Err(e) => {
            output::error("Configuration is invalid");
            return Err(e);
        }
    };
    let connection = config.connection();

    if args.json {
        let summary = json!({
            "valid": true,
            "username": connection.username,
            "url": connection.url,
            "useSSL": connection.use_ssl,
            "customTemplate": config.has_custom_template(),
            "sampleUsername": sample,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::success(&format!("{} is valid", args.file.display()));
    output::kv("username", &connection.username);
    output::kv("password", &connection.password.to_string());
    output::kv("url", &connection.url);
    output::kv("useSSL", &connection.use_ssl.to_string());
    output::kv(
        "template",
        if config.has_custom_template() {
            "custom"
        } else {
            "default"
        },
    );
    output::kv("sample username", &sample);
    Ok(())
}

/// Load the file and prove its template renders, returning a sample username
fn check(path: &Path) -> Result<(RootConfig, String)> {
    let config = RootConfig::load(path)?;
    let template = UsernameTemplate::compile_checked(config.username_template())?;
    let sample = template
        .generate(&UsernameMetadata::default())
        .context("failed to render sample username")?;
    Ok((config, sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    fn test_valid_file() {
        let file = write_config(
            r#"{"username":"admin","password":"s3cr3t","url":"https://store.local","useSSL":"true"}"#,
        );
        let (config, sample) = check(file.path()).unwrap();
        assert!(config.connection().use_ssl);
        assert!(sample.starts_with("v---"));
    }

    #[test]
    fn test_missing_field() {
        let file = write_config(r#"{"username":"admin","password":"s3cr3t","url":"x"}"#);
        let err = check(file.path()).unwrap_err();
        assert!(err.to_string().contains("useSSL"));
    }

    #[test]
    fn test_bad_template() {
        let file = write_config(
            r#"{"username":"admin","password":"p","url":"x","useSSL":"false","username_template":"{{ missing }}"}"#,
        );
        let err = check(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid username template"));
    }
}
