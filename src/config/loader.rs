//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading is split in two steps so the command layer can apply its own
//! overrides in between:
//!
//! 1. [`load_config_with`] reads the optional TOML file, substitutes `${VAR}`
//!    placeholders and applies environment overrides.
//! 2. [`finalize_config`] downgrades incomplete email settings and validates.
//!
//! Variables are read through a lookup function instead of the process
//! environment directly, so tests can supply their own.

use super::schema::{LogFormat, RunConfig, StorageBackend};
use super::secret::secret_string;
use crate::domain::errors::FetcherError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads, finalizes and validates configuration from the process environment
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Errors
///
/// Returns [`FetcherError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use contract_fetcher::config::load_config;
///
/// let (config, warnings) = load_config(None).expect("Failed to load config");
/// ```
pub fn load_config(path: Option<&Path>) -> Result<(RunConfig, Vec<String>)> {
    let mut config = load_config_with(path, |name| std::env::var(name).ok())?;
    let warnings = finalize_config(&mut config)?;
    Ok((config, warnings))
}

/// Builds a [`RunConfig`] from an optional TOML file and variable lookup
///
/// The result is not validated; call [`finalize_config`] once all overrides
/// have been applied.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, a `${VAR}` it
/// references is not set, or the TOML does not parse.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RunConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path, &lookup)?,
        None => RunConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;

    Ok(config)
}

/// Downgrades incomplete email settings and validates
///
/// Returns the warnings produced along the way.
///
/// # Errors
///
/// Returns [`FetcherError::Configuration`] when validation fails.
pub fn finalize_config(config: &mut RunConfig) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    if let Some(warning) = config.downgrade_incomplete_email() {
        warnings.push(warning);
    }

    config.validate().map_err(|e| {
        FetcherError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(warnings)
}

fn read_config_file<F>(path: &Path, lookup: &F) -> Result<RunConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        return Err(FetcherError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FetcherError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents, lookup)?;

    toml::from_str(&contents)
        .map_err(|e| FetcherError::Configuration(format!("Failed to parse TOML: {}", e)))
}

/// Substitutes `${VAR_NAME}` placeholders, leaving comment lines untouched
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars<F>(input: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| FetcherError::Other(format!("Invalid substitution pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match lookup(var_name) {
                Some(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FetcherError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies the job's environment variables on top of the file/default values
///
/// Unparseable numeric values are a configuration error; unrecognised
/// boolean values read as `false`.
fn apply_env_overrides<F>(config: &mut RunConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    // Application
    if let Some(val) = var("LOG_LEVEL") {
        config.application.log_level = val.trim().to_lowercase();
    }
    if let Some(val) = var("LOG_FORMAT") {
        config.application.log_format = match val.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" => LogFormat::Text,
            other => {
                return Err(FetcherError::Configuration(format!(
                    "Invalid LOG_FORMAT '{}'. Must be 'text' or 'json'",
                    other
                )))
            }
        };
    }
    if let Some(val) = var("REQUEST_TIMEOUT_SECONDS") {
        config.application.request_timeout_seconds = parse_number("REQUEST_TIMEOUT_SECONDS", &val)?;
    }

    // Opportunities API
    if let Some(val) = var("SAM_API_KEY").or_else(|| var("API_KEY")) {
        config.sam.api_key = Some(secret_string(val));
    }
    if let Some(val) = var("SAM_BASE_URL") {
        config.sam.base_url = val;
    }
    if let Some(val) = var("ORG_CODES") {
        let codes = split_list(&val);
        if codes.is_empty() {
            tracing::warn!(
                value = %val,
                "ORG_CODES has no codes, keeping configured organizations"
            );
        } else {
            config.sam.org_codes = codes;
        }
    }
    if let Some(val) = var("SAM_PAGE_LIMIT") {
        config.sam.page_limit = parse_number("SAM_PAGE_LIMIT", &val)?;
    }

    // Storage
    if let Some(val) = var("GCS_BUCKET_NAME") {
        config.storage.bucket = val;
    }
    if let Some(val) = var("GCS_PREFIX") {
        config.storage.prefix = val;
    }
    if let Some(val) = var("WORK_DIR") {
        config.storage.work_dir = val;
    }
    if let Some(val) = var("LOCAL_OUTPUT_DIR") {
        config.storage.backend = StorageBackend::Local;
        config.storage.local_root = Some(val);
    }

    // Warehouse
    if let Some(val) = var("PROJECT_ID") {
        config.warehouse.project_id = Some(val);
    }
    if let Some(val) = var("BIGQUERY_DATASET") {
        config.warehouse.dataset = val;
    }
    if let Some(val) = var("BIGQUERY_TABLE") {
        config.warehouse.table = val;
    }
    if let Some(val) = var("WAREHOUSE_ENABLED") {
        config.warehouse.enabled = Some(parse_bool(&val));
    }

    // Email
    if let Some(val) = var("SEND_EMAILS") {
        config.email.enabled = parse_bool(&val);
    }
    if let Some(val) = var("MAILGUN_API_KEY") {
        config.email.mailgun_api_key = Some(secret_string(val));
    }
    if let Some(val) = var("MAILGUN_DOMAIN") {
        config.email.mailgun_domain = Some(val);
    }
    if let Some(val) = var("NOTIFICATION_EMAIL") {
        config.email.recipient = Some(val);
    }

    // Credentials
    if let Some(val) = var("GCP_ACCESS_TOKEN") {
        config.gcp.access_token = Some(secret_string(val));
    }

    // Logging
    if let Some(val) = var("LOG_DIR") {
        config.logging.local_enabled = true;
        config.logging.local_path = val;
    }

    Ok(())
}

/// Splits a comma-separated list, trimming entries and dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a boolean-like string (`true`, `1`, `yes`, `on`)
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        FetcherError::Configuration(format!("{} must be a number, got '{}'", name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_substitute_env_vars() {
        let lookup = lookup_from(&[("TEST_VAR", "test_value")]);
        let result = substitute_env_vars("api_key = \"${TEST_VAR}\"", &lookup).unwrap();
        assert_eq!(result, "api_key = \"test_value\"\n");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let lookup = lookup_from(&[]);
        let err = substitute_env_vars("api_key = \"${MISSING_VAR}\"", &lookup).unwrap_err();
        assert!(err.to_string().contains("MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let lookup = lookup_from(&[]);
        let result = substitute_env_vars("# key = \"${NOT_SET}\"", &lookup).unwrap();
        assert!(result.contains("${NOT_SET}"));
    }

    #[test]
    fn test_load_without_file_uses_env() {
        let lookup = lookup_from(&[
            ("API_KEY", "sam-key"),
            ("GCS_BUCKET_NAME", "bucket"),
            ("ORG_CODES", "070, 047,,"),
            ("PROJECT_ID", "proj"),
        ]);
        let mut config = load_config_with(None, lookup).unwrap();
        let warnings = finalize_config(&mut config).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(
            config.sam.api_key.as_ref().unwrap().expose_secret().as_ref(),
            "sam-key"
        );
        assert_eq!(config.sam.org_codes, vec!["070", "047"]);
        assert!(config.warehouse.is_enabled());
    }

    #[test]
    fn test_blank_org_codes_keep_default() {
        let lookup = lookup_from(&[
            ("SAM_API_KEY", "k"),
            ("GCS_BUCKET_NAME", "bucket"),
            ("ORG_CODES", " , "),
        ]);
        let mut config = load_config_with(None, lookup).unwrap();
        finalize_config(&mut config).unwrap();

        assert_eq!(config.sam.org_codes, vec!["070"]);
    }

    #[test]
    fn test_sam_api_key_wins_over_alias() {
        let lookup = lookup_from(&[("API_KEY", "old"), ("SAM_API_KEY", "new")]);
        let config = load_config_with(None, lookup).unwrap();
        assert_eq!(
            config.sam.api_key.as_ref().unwrap().expose_secret().as_ref(),
            "new"
        );
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let lookup = lookup_from(&[("GCS_BUCKET_NAME", "bucket")]);
        let mut config = load_config_with(None, lookup).unwrap();
        let err = finalize_config(&mut config).unwrap_err();
        assert!(err.to_string().contains("SAM_API_KEY not set"));
    }

    #[test]
    fn test_incomplete_email_is_downgraded() {
        let lookup = lookup_from(&[
            ("SAM_API_KEY", "k"),
            ("GCS_BUCKET_NAME", "bucket"),
            ("SEND_EMAILS", "TRUE"),
            ("MAILGUN_DOMAIN", "mg.example.com"),
        ]);
        let mut config = load_config_with(None, lookup).unwrap();
        let warnings = finalize_config(&mut config).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(!config.email.enabled);
    }

    #[test]
    fn test_invalid_timeout_is_configuration_error() {
        let lookup = lookup_from(&[("REQUEST_TIMEOUT_SECONDS", "soon")]);
        let err = load_config_with(None, lookup).unwrap_err();
        assert!(matches!(err, FetcherError::Configuration(_)));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" Yes "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_with(Some(Path::new("nonexistent.toml")), lookup_from(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_file_with_env_override() {
        let toml_content = r#"
[application]
log_level = "debug"

[sam]
api_key = "${TEST_SAM_KEY}"
org_codes = ["070", "047"]

[storage]
bucket = "file-bucket"
prefix = "daily"

[warehouse]
project_id = "proj"
dataset = "gov"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let lookup = lookup_from(&[("TEST_SAM_KEY", "from-env"), ("GCS_BUCKET_NAME", "env-bucket")]);
        let mut config = load_config_with(Some(temp_file.path()), lookup).unwrap();
        finalize_config(&mut config).unwrap();

        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.sam.org_codes, vec!["070", "047"]);
        assert_eq!(config.storage.bucket, "env-bucket");
        assert_eq!(config.storage.prefix, "daily");
        assert_eq!(config.warehouse.full_table_id(), "proj.gov.contracts");
    }
}
