use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use forum_contracts::RejectPolicy;
use jsonschema::{validator_for, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "FORUM_CONTRACT_CONFIG";

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct CliConfig {
    /// Default handling of malformed records in list responses: "record" or "response".
    #[serde(default)]
    pub policy: Option<RejectPolicy>,
    /// Pretty-print emitted JSON (schemas).
    #[serde(default)]
    pub pretty: Option<bool>,
    /// Log filter used when RUST_LOG is unset, e.g. "forum_contracts=debug".
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl CliConfig {
    pub fn policy(&self) -> RejectPolicy {
        self.policy.unwrap_or_default()
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }
}

static CONFIG_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema = schemars::schema_for!(CliConfig);
    let schema_value = serde_json::to_value(&schema).expect("schema value");
    validator_for(&schema_value).expect("valid schema")
});

pub fn load_config(path: &Path) -> Result<CliConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let raw: toml::Value =
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
    let json_value = serde_json::to_value(&raw)?;
    let validation_errors: Vec<_> = CONFIG_SCHEMA
        .iter_errors(&json_value)
        .map(|e| e.to_string())
        .collect();
    if !validation_errors.is_empty() {
        return Err(anyhow::anyhow!(
            "invalid config {}: {}",
            path.display(),
            validation_errors.join(", ")
        ));
    }
    let cfg: CliConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Loads the config named by the flag, else by the environment; defaults when neither is set.
pub fn resolve_config(flag: Option<&Path>) -> Result<CliConfig> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => load_config(&path),
        None => Ok(CliConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_policy_and_flags() {
        let file = write_config("policy = \"record\"\npretty = false\nlog_filter = \"debug\"\n");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.policy(), RejectPolicy::Record);
        assert!(!cfg.pretty());
        assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let file = write_config("");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.policy(), RejectPolicy::Response);
        assert!(cfg.pretty());
    }

    #[test]
    fn rejects_unknown_policy() {
        let file = write_config("policy = \"drop-all\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn rejects_wrong_types() {
        let file = write_config("pretty = \"yes\"\n");
        assert!(load_config(file.path()).is_err());
    }
}
