//! `landkit check`: validate a contact payload outside the page.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use landkit::{FormData, ValidatorRegistry, validate_payload};
use serde_json::Value;
use tracing::{debug, info};

use crate::output::{write_human, write_json};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Field value as NAME=VALUE (repeatable, overrides --file)
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// JSON or YAML mapping of field names to values
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Comma-separated names of required fields
    #[arg(
        long,
        value_name = "NAME,...",
        value_delimiter = ',',
        default_value = "name,email,subject,message"
    )]
    pub required: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Parse a `NAME=VALUE` pair. The value may be empty or contain `=`.
///
/// # Errors
///
/// Returns an error if there is no `=` or the name is empty.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(format!("expected NAME=VALUE, got `{raw}`"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Load a payload file. `.yaml` and `.yml` files are read as YAML, anything
/// else as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or is not a
/// mapping of scalar values.
pub fn load_payload(path: &Path) -> anyhow::Result<FormData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload {}", path.display()))?;
    let value: Value = match path.extension().and_then(OsStr::to_str) {
        Some("yaml" | "yml") => serde_saphyr::from_str(&content)
            .map_err(|err| anyhow::anyhow!("Invalid YAML in {}: {err}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
    };
    payload_from_value(&value)
}

/// Convert a JSON object into form data. Numbers and booleans become their
/// text form and `null` becomes an empty value.
///
/// # Errors
///
/// Returns an error if `value` is not an object or a field holds a list or
/// an object.
pub fn payload_from_value(value: &Value) -> anyhow::Result<FormData> {
    let Value::Object(map) = value else {
        bail!("Payload must be a mapping of field names to values");
    };
    let mut data = FormData::new();
    for (name, field) in map {
        let text = match field {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            Value::Array(_) | Value::Object(_) => {
                bail!("Field `{name}` must be a scalar value")
            }
        };
        data.insert(name.clone(), text);
    }
    Ok(data)
}

/// The payload from `--file` with `--field` values applied on top.
///
/// # Errors
///
/// Returns an error if the payload file cannot be loaded.
pub fn collect_payload(args: &CheckArgs) -> anyhow::Result<FormData> {
    let mut data = match &args.file {
        Some(path) => load_payload(path)?,
        None => FormData::new(),
    };
    for (name, value) in &args.fields {
        data.insert(name.clone(), value.clone());
    }
    Ok(data)
}

/// Run the check and print the report to stdout.
///
/// # Errors
///
/// Returns an error if the payload cannot be loaded, the report cannot be
/// written, or any field is invalid.
pub fn run(args: &CheckArgs) -> anyhow::Result<()> {
    let data = collect_payload(args)?;
    let required: Vec<String> = args
        .required
        .iter()
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .collect();
    debug!(fields = data.len(), required = ?required, "Checking payload");

    let report = validate_payload(ValidatorRegistry::standard(), &data, &required);
    info!(
        checked = report.checked_fields,
        errors = report.errors_count(),
        "Payload checked"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Human => write_human(&report, &mut out)?,
        OutputFormat::Json => write_json(&report, &mut out)?,
    }

    if !report.ok {
        bail!("{} invalid field(s)", report.errors_count());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("name=Jane Doe").unwrap(),
            ("name".to_owned(), "Jane Doe".to_owned())
        );
        assert_eq!(
            parse_field("subject=a=b").unwrap(),
            ("subject".to_owned(), "a=b".to_owned())
        );
        assert_eq!(parse_field("phone=").unwrap().1, "");
        assert!(parse_field("name").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_payload_from_value_converts_scalars() {
        let value = serde_json::json!({"name": "Jane", "phone": 5_551_234_567_u64, "opt_in": true, "company": null});
        let data = payload_from_value(&value).unwrap();
        assert_eq!(data.get("name"), Some("Jane"));
        assert_eq!(data.get("phone"), Some("5551234567"));
        assert_eq!(data.get("opt_in"), Some("true"));
        assert_eq!(data.get("company"), Some(""));
    }

    #[test]
    fn test_payload_rejects_nested_values() {
        let err = payload_from_value(&serde_json::json!({"name": ["a"]})).unwrap_err();
        assert!(err.to_string().contains("`name`"), "got: {err}");
        let err = payload_from_value(&serde_json::json!(["name"])).unwrap_err();
        assert!(err.to_string().contains("mapping"), "got: {err}");
    }
}
