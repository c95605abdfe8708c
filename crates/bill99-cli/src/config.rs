// Signer configuration for the CLI
//
// A JSON config file supplies the SignerConfig; fields it omits take their
// defaults. Command-line flags are applied on top.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use bill99_sign::{EncodePolicy, SignerConfig};

/// Command-line overrides for the signer configuration.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Disable schema ordering.
    pub no_sort: bool,
    pub encode_policy: Option<String>,
    /// Replaces the ignore list when non-empty.
    pub ignores: Vec<String>,
}

/// Validates a config JSON string and returns the configuration.
///
/// # Arguments
/// * `config_json` - JSON object with optional `ignores`, `sort` and `encode_policy`
///
/// # Returns
/// * `Ok(SignerConfig)` - The configuration with defaults filled in
/// * `Err` - If the JSON is malformed or names an unsupported encode policy
pub fn parse_config(config_json: &str) -> Result<SignerConfig> {
    serde_json::from_str(config_json).map_err(|e| anyhow!("Invalid signer config: {}", e))
}

/// Loads the configuration file if one is given, or the defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<SignerConfig> {
    let Some(path) = path else {
        return Ok(SignerConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read signer config '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded signer config");

    parse_config(&content)
}

/// Applies command-line overrides to a loaded configuration.
pub fn apply_overrides(
    mut config: SignerConfig,
    overrides: &ConfigOverrides,
) -> Result<SignerConfig> {
    if overrides.no_sort {
        config.sort = false;
    }

    if let Some(policy) = &overrides.encode_policy {
        config.encode_policy = policy.parse::<EncodePolicy>()?;
    }

    if !overrides.ignores.is_empty() {
        config.ignores = overrides.ignores.iter().cloned().collect();
    }

    Ok(config)
}

/// Returns a summary of the configuration for display.
pub fn summary(config: &SignerConfig) -> String {
    let ignores: Vec<&str> = config.ignores.iter().map(String::as_str).collect();
    let lines = [
        format!("Ignores: {}", ignores.join(", ")),
        format!("Sort: {}", config.sort),
        format!("Encode policy: {}", config.encode_policy),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("{}").expect("should parse empty config");

        assert_eq!(config, SignerConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{"ignores": ["signMsg", "ext2"], "sort": false, "encode_policy": "JSON"}"#;
        let config = parse_config(json).unwrap();

        assert!(config.ignores.contains("ext2"));
        assert!(!config.sort);
        assert_eq!(config.encode_policy, EncodePolicy::Json);
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        let result = parse_config(r#"{"encode_policy": "FORM"}"#);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported encode policy"));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(load_config(None).unwrap(), SignerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let overrides = ConfigOverrides {
            no_sort: true,
            encode_policy: Some("json".to_string()),
            ignores: vec!["signMsg".to_string(), "ext1".to_string()],
        };
        let config = apply_overrides(SignerConfig::default(), &overrides).unwrap();

        assert!(!config.sort);
        assert_eq!(config.encode_policy, EncodePolicy::Json);
        assert_eq!(config.ignores.len(), 2);
    }

    #[test]
    fn test_override_bad_policy_fails() {
        let overrides = ConfigOverrides {
            encode_policy: Some("xml".to_string()),
            ..ConfigOverrides::default()
        };

        assert!(apply_overrides(SignerConfig::default(), &overrides).is_err());
    }

    #[test]
    fn test_summary() {
        let summary = summary(&SignerConfig::default());

        assert!(summary.contains("Ignores: signMsg"));
        assert!(summary.contains("Encode policy: QUERY"));
    }
}
