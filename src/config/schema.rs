//! Configuration schema types
//!
//! [`RunConfig`] is the resolved configuration of one invocation. It is built
//! once by the loader and then passed by reference into every component.

use crate::config::secret::{is_blank_secret, SecretString};
use crate::domain::ids::OrgCode;
use serde::{Deserialize, Serialize};

/// Where the durable copy of each run's output is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Google Cloud Storage bucket
    #[default]
    Gcs,
    /// Local directory (local testing)
    Local,
}

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line records
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Opportunities API settings
    #[serde(default)]
    pub sam: SamConfig,

    /// Durable object storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Warehouse settings
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Email notification settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Ambient cloud credential settings
    #[serde(default)]
    pub gcp: GcpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RunConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.sam.validate()?;
        self.storage.validate()?;
        self.warehouse.validate()?;
        self.email.validate()?;
        Ok(())
    }

    /// Turns email off when it is enabled without complete Mailgun settings
    ///
    /// Returns a warning describing the downgrade, if one happened.
    pub fn downgrade_incomplete_email(&mut self) -> Option<String> {
        if !self.email.enabled {
            return None;
        }

        let missing = self.email.missing_fields();
        if missing.is_empty() {
            return None;
        }

        self.email.enabled = false;
        Some(format!(
            "Email notifications disabled: missing {}",
            missing.join(", ")
        ))
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Console log format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Hard timeout applied to every outbound HTTP call
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err("application.request_timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            request_timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Opportunities search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamConfig {
    /// API key (required)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Search endpoint URL
    #[serde(default = "default_sam_base_url")]
    pub base_url: String,

    /// Organization codes to query, in order
    #[serde(default = "default_org_codes")]
    pub org_codes: Vec<String>,

    /// `limit` parameter sent with every search
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl SamConfig {
    fn validate(&self) -> Result<(), String> {
        if is_blank_secret(self.api_key.as_ref()) {
            return Err("SAM_API_KEY not set".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("sam.base_url must start with http:// or https://".to_string());
        }

        if self.org_codes().is_empty() {
            return Err("sam.org_codes cannot be empty".to_string());
        }

        if !(1..=1000).contains(&self.page_limit) {
            return Err(format!(
                "sam.page_limit must be between 1 and 1000, got {}",
                self.page_limit
            ));
        }

        Ok(())
    }

    /// Configured organization codes, blanks dropped, order kept
    pub fn org_codes(&self) -> Vec<OrgCode> {
        self.org_codes
            .iter()
            .filter_map(|code| OrgCode::new(code.as_str()).ok())
            .collect()
    }
}

impl Default for SamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_sam_base_url(),
            org_codes: default_org_codes(),
            page_limit: default_page_limit(),
        }
    }
}

/// Durable object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend receives the durable copy
    #[serde(default)]
    pub backend: StorageBackend,

    /// Bucket name (required for the GCS backend)
    #[serde(default)]
    pub bucket: String,

    /// Logical prefix the object is written under
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Cloud Storage API root
    #[serde(default = "default_gcs_base_url")]
    pub base_url: String,

    /// Output directory for the local backend
    #[serde(default)]
    pub local_root: Option<String>,

    /// Directory for the transient local artifact
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        match self.backend {
            StorageBackend::Gcs => {
                if self.bucket.trim().is_empty() {
                    return Err("GCS_BUCKET_NAME not set".to_string());
                }
            }
            StorageBackend::Local => {
                if self
                    .local_root
                    .as_deref()
                    .map(|r| r.trim().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "storage.local_root is required when storage.backend = 'local'"
                            .to_string(),
                    );
                }
            }
        }

        if self.prefix.contains("..") {
            return Err("storage.prefix cannot contain '..'".to_string());
        }

        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: String::new(),
            prefix: default_prefix(),
            base_url: default_gcs_base_url(),
            local_root: None,
            work_dir: default_work_dir(),
        }
    }
}

/// Warehouse (BigQuery) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Explicit toggle; when unset the warehouse is enabled iff a project id is set
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Project id
    #[serde(default)]
    pub project_id: Option<String>,

    /// Dataset id
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Table id
    #[serde(default = "default_table")]
    pub table: String,

    /// BigQuery API root
    #[serde(default = "default_bigquery_base_url")]
    pub base_url: String,

    /// Upper bound on rows per insert request
    #[serde(default = "default_max_rows_per_request")]
    pub max_rows_per_request: usize,
}

impl WarehouseConfig {
    /// Whether warehouse sync runs
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or_else(|| self.project().is_some())
    }

    /// Non-blank project id
    pub fn project(&self) -> Option<&str> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// `project.dataset.table`
    pub fn full_table_id(&self) -> String {
        format!(
            "{}.{}.{}",
            self.project().unwrap_or_default(),
            self.dataset,
            self.table
        )
    }

    fn validate(&self) -> Result<(), String> {
        if !self.is_enabled() {
            return Ok(());
        }

        if self.project().is_none() {
            return Err("PROJECT_ID is required when warehouse sync is enabled".to_string());
        }

        if self.dataset.trim().is_empty() || self.table.trim().is_empty() {
            return Err("warehouse.dataset and warehouse.table cannot be empty".to_string());
        }

        if self.max_rows_per_request == 0 || self.max_rows_per_request > 10_000 {
            return Err(format!(
                "warehouse.max_rows_per_request must be between 1 and 10000, got {}",
                self.max_rows_per_request
            ));
        }

        Ok(())
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            project_id: None,
            dataset: default_dataset(),
            table: default_table(),
            base_url: default_bigquery_base_url(),
            max_rows_per_request: default_max_rows_per_request(),
        }
    }
}

/// Email notification configuration (Mailgun)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Send a summary email after a successful run
    #[serde(default)]
    pub enabled: bool,

    /// Mailgun API key
    #[serde(default)]
    pub mailgun_api_key: Option<SecretString>,

    /// Mailgun sending domain
    #[serde(default)]
    pub mailgun_domain: Option<String>,

    /// Recipient address
    #[serde(default)]
    pub recipient: Option<String>,

    /// Mailgun API root
    #[serde(default = "default_mailgun_base_url")]
    pub base_url: String,
}

impl EmailConfig {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank_secret(self.mailgun_api_key.as_ref()) {
            missing.push("MAILGUN_API_KEY");
        }
        if is_blank(self.mailgun_domain.as_deref()) {
            missing.push("MAILGUN_DOMAIN");
        }
        if is_blank(self.recipient.as_deref()) {
            missing.push("NOTIFICATION_EMAIL");
        }
        missing
    }

    fn validate(&self) -> Result<(), String> {
        if self.enabled {
            let missing = self.missing_fields();
            if !missing.is_empty() {
                return Err(format!(
                    "email enabled but missing: {}",
                    missing.join(", ")
                ));
            }
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mailgun_api_key: None,
            mailgun_domain: None,
            recipient: None,
            base_url: default_mailgun_base_url(),
        }
    }
}

/// Ambient cloud credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    /// Explicit OAuth access token; when unset the metadata server is used
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Instance metadata server root
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            metadata_url: default_metadata_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Additionally write JSON logs to a rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for rolling log files
    #[serde(default)]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_sam_base_url() -> String {
    "https://api.sam.gov/opportunities/v2/search".to_string()
}

fn default_org_codes() -> Vec<String> {
    vec!["070".to_string()]
}

fn default_page_limit() -> u32 {
    200
}

fn default_prefix() -> String {
    "contracts".to_string()
}

fn default_gcs_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_work_dir() -> String {
    std::env::temp_dir().to_string_lossy().to_string()
}

fn default_dataset() -> String {
    "contracts_data".to_string()
}

fn default_table() -> String {
    "contracts".to_string()
}

fn default_bigquery_base_url() -> String {
    "https://bigquery.googleapis.com".to_string()
}

fn default_max_rows_per_request() -> usize {
    500
}

fn default_mailgun_base_url() -> String {
    "https://api.mailgun.net/v3".to_string()
}

fn default_metadata_url() -> String {
    "http://metadata.google.internal".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;

    fn valid_config() -> RunConfig {
        let mut config = RunConfig::default();
        config.sam.api_key = Some(secret_string("key".to_string()));
        config.storage.bucket = "contracts-bucket".to_string();
        config
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.sam.org_codes, vec!["070"]);
        assert_eq!(config.sam.page_limit, 200);
        assert_eq!(config.storage.prefix, "contracts");
        assert_eq!(config.application.request_timeout_seconds, 30);
        assert!(!config.email.enabled);
        assert!(!config.warehouse.is_enabled());
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = valid_config();
        config.sam.api_key = None;
        assert_eq!(config.validate().unwrap_err(), "SAM_API_KEY not set");

        config.sam.api_key = Some(secret_string("   ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_bucket_for_gcs_backend() {
        let mut config = valid_config();
        config.storage.bucket = String::new();
        assert_eq!(config.validate().unwrap_err(), "GCS_BUCKET_NAME not set");
    }

    #[test]
    fn test_local_backend_needs_root_not_bucket() {
        let mut config = valid_config();
        config.storage.bucket = String::new();
        config.storage.backend = StorageBackend::Local;
        assert!(config.validate().is_err());

        config.storage.local_root = Some("output".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_org_codes() {
        let mut config = valid_config();
        config.sam.org_codes = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_limit_bounds() {
        let mut config = valid_config();
        config.sam.page_limit = 0;
        assert!(config.validate().is_err());
        config.sam.page_limit = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warehouse_enabled_follows_project() {
        let mut config = valid_config();
        config.warehouse.project_id = Some("my-project".to_string());
        assert!(config.warehouse.is_enabled());
        assert_eq!(
            config.warehouse.full_table_id(),
            "my-project.contracts_data.contracts"
        );

        config.warehouse.enabled = Some(false);
        assert!(!config.warehouse.is_enabled());
    }

    #[test]
    fn test_warehouse_enabled_without_project() {
        let mut config = valid_config();
        config.warehouse.enabled = Some(true);
        assert!(config
            .validate()
            .unwrap_err()
            .contains("PROJECT_ID is required"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.application.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_downgrade_incomplete_email() {
        let mut config = valid_config();
        config.email.enabled = true;
        config.email.mailgun_domain = Some("mg.example.com".to_string());

        let warning = config.downgrade_incomplete_email().unwrap();
        assert!(warning.contains("MAILGUN_API_KEY"));
        assert!(warning.contains("NOTIFICATION_EMAIL"));
        assert!(!warning.contains("MAILGUN_DOMAIN"));
        assert!(!config.email.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_complete_email_is_kept() {
        let mut config = valid_config();
        config.email.enabled = true;
        config.email.mailgun_api_key = Some(secret_string("mg-key".to_string()));
        config.email.mailgun_domain = Some("mg.example.com".to_string());
        config.email.recipient = Some("ops@example.com".to_string());

        assert!(config.downgrade_incomplete_email().is_none());
        assert!(config.email.enabled);
    }
}
