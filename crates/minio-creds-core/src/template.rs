//! Username template engine
//!
//! Usernames are produced by rendering a Tera template against the
//! request's display name and role name. A handful of helpers are
//! registered on every template so usernames can carry randomness,
//! timestamps and bounded-length segments:
//!
//! - functions: `random(length)`, `unix_time()`, `unix_time_millis()`,
//!   `uuid()`, `timestamp(format)`
//! - filters: `truncate(length)`, `truncate_sha256(length)`, `sha256`,
//!   `base64`, `lowercase`, `uppercase`
//!
//! Compiling and generating are separate steps: a template can parse
//! cleanly and still fail every render (an unknown variable, a helper
//! called with bad arguments), so callers probe once before trusting it.

use crate::error::{ConfigError, TemplateError};
use base64::Engine;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use tera::{Context, Tera, Value};
use tracing::trace;

/// Template used when the configuration does not name one.
///
/// Produces `v-<display name>-<role name>-<random>-<unix time>` with the
/// name segments capped at 15 characters and the whole capped at 100.
pub const DEFAULT_USERNAME_TEMPLATE: &str = "{% filter truncate(length=100) %}v-{{ display_name | truncate(length=15) }}-{{ role_name | truncate(length=15) }}-{{ random(length=20) }}-{{ unix_time() }}{% endfilter %}";

const TEMPLATE_NAME: &str = "username";

/// Hex characters of the tail hash kept by `truncate_sha256`
const SHA256_SUFFIX_LEN: usize = 8;

/// Per-request inputs available to a username template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameMetadata {
    pub display_name: String,
    pub role_name: String,
}

impl UsernameMetadata {
    pub fn new(display_name: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role_name: role_name.into(),
        }
    }
}

/// A compiled username template
pub struct UsernameTemplate {
    tera: Tera,
    source: String,
}

impl UsernameTemplate {
    /// Parse a template. Fails only on syntax errors.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        register_helpers(&mut tera);
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| TemplateError::syntax(&e))?;

        Ok(Self {
            tera,
            source: source.to_string(),
        })
    }

    /// Parse a template and render it once against empty metadata, so a
    /// template that parses but can never render is rejected up front
    pub fn compile_checked(source: &str) -> Result<Self, ConfigError> {
        let template = Self::compile(source).map_err(ConfigError::TemplateCompile)?;
        template
            .generate(&UsernameMetadata::default())
            .map_err(ConfigError::TemplateProbe)?;
        Ok(template)
    }

    /// Render a username for the given metadata
    pub fn generate(&self, metadata: &UsernameMetadata) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("display_name", &metadata.display_name);
        context.insert("role_name", &metadata.role_name);

        let rendered = self
            .tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| TemplateError::render(&e))?;

        let username = rendered.trim().to_string();
        trace!(template_len = self.source.len(), "Generated username");
        Ok(username)
    }

    /// The template source this generator was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for UsernameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernameTemplate")
            .field("source", &self.source)
            .finish()
    }
}

fn register_helpers(tera: &mut Tera) {
    tera.register_function("random", random);
    tera.register_function("unix_time", unix_time);
    tera.register_function("unix_time_millis", unix_time_millis);
    tera.register_function("uuid", uuid);
    tera.register_function("timestamp", timestamp);

    // Replaces Tera's builtin, which appends an ellipsis
    tera.register_filter("truncate", truncate);
    tera.register_filter("truncate_sha256", truncate_sha256);
    tera.register_filter("sha256", sha256);
    tera.register_filter("base64", base64_encode);
    tera.register_filter("lowercase", lowercase);
    tera.register_filter("uppercase", uppercase);
}

fn length_arg(helper: &str, args: &HashMap<String, Value>) -> tera::Result<usize> {
    let length = args
        .get("length")
        .and_then(Value::as_u64)
        .ok_or_else(|| tera::Error::msg(format!("{helper}: `length` must be a positive integer")))?;
    if length == 0 {
        return Err(tera::Error::msg(format!(
            "{helper}: `length` must be greater than zero"
        )));
    }
    usize::try_from(length).map_err(|_| tera::Error::msg(format!("{helper}: `length` too large")))
}

fn value_str(helper: &str, value: &Value) -> tera::Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(tera::Error::msg(format!(
            "{helper}: cannot apply to {other}"
        ))),
    }
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn random(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let length = length_arg("random", args)?;
    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    Ok(Value::String(token))
}

fn unix_time(_args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::from(chrono::Utc::now().timestamp()))
}

fn unix_time_millis(_args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::from(chrono::Utc::now().timestamp_millis()))
}

fn uuid(_args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(uuid::Uuid::new_v4().to_string()))
}

fn timestamp(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let format = args
        .get("format")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("timestamp: `format` must be a string"))?;

    let mut out = String::new();
    write!(out, "{}", chrono::Utc::now().format(format))
        .map_err(|_| tera::Error::msg(format!("timestamp: invalid format {format:?}")))?;
    Ok(Value::String(out))
}

fn truncate(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let length = length_arg("truncate", args)?;
    let s = value_str("truncate", value)?;
    Ok(Value::String(take_chars(&s, length)))
}

fn truncate_sha256(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let length = length_arg("truncate_sha256", args)?;
    if length <= SHA256_SUFFIX_LEN {
        return Err(tera::Error::msg(format!(
            "truncate_sha256: `length` must be greater than {SHA256_SUFFIX_LEN}, got {length}"
        )));
    }
    let s = value_str("truncate_sha256", value)?;
    if s.chars().count() <= length {
        return Ok(Value::String(s));
    }

    // Keep the head and replace the tail with a short hash of it
    let keep = length - SHA256_SUFFIX_LEN;
    let split = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
    let (head, tail) = s.split_at(split);
    let digest = hex::encode(Sha256::digest(tail.as_bytes()));
    Ok(Value::String(format!("{head}{}", &digest[..SHA256_SUFFIX_LEN])))
}

fn sha256(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value_str("sha256", value)?;
    Ok(Value::String(hex::encode(Sha256::digest(s.as_bytes()))))
}

fn base64_encode(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value_str("base64", value)?;
    Ok(Value::String(
        base64::engine::general_purpose::STANDARD.encode(s.as_bytes()),
    ))
}

fn lowercase(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(value_str("lowercase", value)?.to_lowercase()))
}

fn uppercase(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(value_str("uppercase", value)?.to_uppercase()))
}
