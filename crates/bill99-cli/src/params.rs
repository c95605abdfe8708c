// Parameter input for the CLI
//
// Parameters come from a JSON object file (document order kept) and from
// repeated `key=value` arguments, which override file values.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use bill99_sign::ParameterSet;

/// Builds the parameter set from an optional JSON file and `key=value` arguments.
pub fn collect_params(file: Option<&Path>, args: &[String]) -> Result<ParameterSet> {
    let mut params = match file {
        Some(path) => load_params_file(path)?,
        None => ParameterSet::new(),
    };

    params.extend_from(&parse_params(args)?);
    Ok(params)
}

/// Reads a JSON object of scalar parameters.
pub fn load_params_file(path: &Path) -> Result<ParameterSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read params file '{}'", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse params file '{}'", path.display()))
}

/// Parses a list of key=value strings, in argument order.
pub fn parse_params(args: &[String]) -> Result<ParameterSet> {
    let mut params = ParameterSet::new();
    for arg in args {
        let (key, value) = parse_key_value(arg)?;
        params.insert(key, value);
    }
    Ok(params)
}

/// Parses a single "key=value" string.
///
/// The key is trimmed; the value is kept byte for byte since it is signed.
fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid parameter format: '{}'. Expected 'key=value'", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Empty key in parameter: '{}'", arg));
    }

    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_key_value() {
        let params = parse_params(&args(&["orderId=A1", "orderAmount=100"])).unwrap();

        assert_eq!(params.get("orderId"), Some("A1"));
        assert_eq!(params.get("orderAmount"), Some("100"));
    }

    #[test]
    fn test_value_with_equals_sign() {
        let params = parse_params(&args(&["bgUrl=https://a.example/?x=1&y=2"])).unwrap();

        assert_eq!(params.get("bgUrl"), Some("https://a.example/?x=1&y=2"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let params = parse_params(&args(&["ext1="])).unwrap();

        assert_eq!(params.get("ext1"), Some(""));
    }

    #[test]
    fn test_value_whitespace_preserved() {
        let params = parse_params(&args(&["  productName = x "])).unwrap();

        assert_eq!(params.get("productName"), Some(" x "));
    }

    #[test]
    fn test_invalid_format_no_equals() {
        let result = parse_params(&args(&["no_equals_sign"]));

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Expected 'key=value'"));
    }

    #[test]
    fn test_invalid_format_empty_key() {
        let result = parse_params(&args(&["=value"]));

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty key"));
    }

    #[test]
    fn test_arguments_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"orderId": "A1", "orderAmount": 100}}"#).unwrap();

        let params = collect_params(Some(file.path()), &args(&["orderId=B2", "ext1=e"])).unwrap();

        let entries: Vec<_> = params.iter().collect();
        assert_eq!(
            entries,
            vec![("orderId", "B2"), ("orderAmount", "100"), ("ext1", "e")]
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = collect_params(Some(Path::new("/nonexistent/params.json")), &[]);

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("/nonexistent/params.json"));
    }
}
