//! Error types for the signer.

/// Suffix appended to private key failures, shown to merchant operators.
pub const PRIVATE_KEY_HINT: &str = "应用私钥格式有误";

/// Suffix appended to public key failures, shown to merchant operators.
pub const PUBLIC_KEY_HINT: &str = "公钥格式有误";

/// Signer error type.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// Key could not be read, is not valid PEM, or was rejected by the RSA backend.
    #[error("{0}")]
    KeyFormat(String),

    /// The RSA primitive failed for a reason other than the key format.
    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Unsupported encode policy: '{0}' (expected 'QUERY' or 'JSON')")]
    UnsupportedPolicy(String),

    #[error("Unsupported digest algorithm: '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SignerError {
    /// Builds a private key error: the underlying reason, then the operator hint.
    pub fn private_key(reason: impl std::fmt::Display) -> Self {
        SignerError::KeyFormat(format!("{}\n{}", reason, PRIVATE_KEY_HINT))
    }

    /// Builds a public key error: the underlying reason, then the operator hint.
    pub fn public_key(reason: impl std::fmt::Display) -> Self {
        SignerError::KeyFormat(format!(
            "The public key is invalid: {}\n{}",
            reason, PUBLIC_KEY_HINT
        ))
    }
}

pub type Result<T> = std::result::Result<T, SignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_message_has_two_lines() {
        let err = SignerError::private_key("bad ASN.1");
        let message = err.to_string();
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines, vec!["bad ASN.1", PRIVATE_KEY_HINT]);
    }

    #[test]
    fn test_public_key_message_ends_with_hint() {
        let err = SignerError::public_key("bad ASN.1");
        assert!(err.to_string().ends_with("\n公钥格式有误"));
        assert!(matches!(err, SignerError::KeyFormat(_)));
    }
}
