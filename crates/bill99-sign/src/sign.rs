// Signing logic for gateway messages
//
// This module provides the Signer, which binds a parameter set to a
// SignerConfig and produces either an RSA signature (Base64) or a keyed MD5
// digest (uppercase hex) over the canonical content.

use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::canonical;
use crate::error::{Result, SignerError};
use crate::hash::md5_hex_upper;
use crate::keys::load_private_key;
use crate::params::ParameterSet;
use crate::types::{DigestAlgorithm, EncodePolicy, SignerConfig};

/// Separator placed between the canonical content and the MD5 secret.
const MD5_KEY_SEPARATOR: &str = "&key=";

/// Signs one parameter set under one configuration.
///
/// Setters consume and return the signer, so configuration is fixed once the
/// signer is built.
///
/// # Example
/// ```
/// use bill99_sign::{ParameterSet, Signer};
///
/// let params = ParameterSet::from([("orderId", "A1"), ("signMsg", "OLD")]);
/// let signer = Signer::new(params);
/// assert_eq!(signer.content_to_sign().unwrap(), "orderId=A1");
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    params: ParameterSet,
    config: SignerConfig,
}

impl Signer {
    /// Creates a signer with the default configuration.
    pub fn new(params: ParameterSet) -> Self {
        Self::with_config(params, SignerConfig::default())
    }

    pub fn with_config(params: ParameterSet, config: SignerConfig) -> Self {
        Self { params, config }
    }

    /// Replaces the ignore list (the default ignores only `signMsg`).
    pub fn ignores<I, S>(mut self, ignores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ignores = ignores.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        self
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.config.sort = sort;
        self
    }

    pub fn encode_policy(mut self, policy: EncodePolicy) -> Self {
        self.config.encode_policy = policy;
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Parameters that take part in the signature, in signing order.
    pub fn params_to_sign(&self) -> ParameterSet {
        canonical::params_to_sign(&self.params, &self.config)
    }

    pub fn content_to_sign(&self) -> Result<String> {
        canonical::content_to_sign(&self.params, &self.config)
    }

    /// Signs the canonical content with an RSA private key.
    ///
    /// # Arguments
    /// * `private_key` - Path to a PEM file, PEM text, or a bare Base64 body
    /// * `alg` - Digest used with PKCS#1 v1.5 (the gateway uses SHA1)
    ///
    /// # Returns
    /// The Base64-encoded raw signature
    pub fn sign_with_rsa(&self, private_key: &str, alg: DigestAlgorithm) -> Result<String> {
        let content = self.content_to_sign()?;
        sign_content_with_rsa(content.as_bytes(), private_key, alg)
    }

    /// Signs the canonical content with the merchant's MD5 secret.
    ///
    /// Returns the uppercase hex digest of `content + "&key=" + key`.
    pub fn sign_with_md5(&self, key: &str) -> Result<String> {
        let content = self.content_to_sign()?;
        Ok(sign_content_with_md5(&content, key))
    }
}

/// Signs arbitrary content with an RSA private key and returns the Base64 signature.
///
/// A key that cannot be parsed, or is too small for the digest, is reported as
/// `SignerError::KeyFormat`; other backend failures as `SignerError::Signing`.
pub fn sign_content_with_rsa(
    content: &[u8],
    private_key: &str,
    alg: DigestAlgorithm,
) -> Result<String> {
    let private_key = load_private_key(private_key)?;

    let hashed = alg.digest(content);
    let signature = private_key
        .sign(alg.pkcs1v15(), &hashed)
        .map_err(|e| match e {
            rsa::Error::MessageTooLong => SignerError::private_key(e),
            other => SignerError::Signing(other.to_string()),
        })?;

    tracing::debug!(
        algorithm = %alg,
        signature_len = signature.len(),
        "signed content with RSA"
    );

    Ok(BASE64_STANDARD.encode(signature))
}

/// The exact string hashed for an MD5 signature.
///
/// The separator is appended even when `content` is empty.
pub fn md5_content(content: &str, key: &str) -> String {
    let mut keyed = String::with_capacity(content.len() + MD5_KEY_SEPARATOR.len() + key.len());
    keyed.push_str(content);
    keyed.push_str(MD5_KEY_SEPARATOR);
    keyed.push_str(key);
    keyed
}

/// Uppercase hex MD5 of `content + "&key=" + key`.
pub fn sign_content_with_md5(content: &str, key: &str) -> String {
    let signature = md5_hex_upper(md5_content(content, key).as_bytes());
    tracing::debug!("signed content with MD5");
    signature
}
