// Signature verification for gateway messages
//
// RSA and MD5 checks return booleans: a mismatched or undecodable signature is
// a failed verification, not an error. Only key problems are errors.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::error::Result;
use crate::hash::md5_hex;
use crate::keys::load_public_key;
use crate::sign::{md5_content, Signer};
use crate::types::DigestAlgorithm;

/// Verifies a Base64 RSA signature over `content`.
///
/// # Returns
/// * `Ok(true)` - the signature matches
/// * `Ok(false)` - the signature does not match or is not valid Base64
/// * `Err(SignerError::KeyFormat)` - the public key cannot be loaded
pub fn verify_with_rsa(
    content: &[u8],
    signature: &str,
    public_key: &str,
    alg: DigestAlgorithm,
) -> Result<bool> {
    let public_key = load_public_key(public_key)?;

    // Line breaks are tolerated in transported signatures.
    let compact: String = signature
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let signature_bytes = match BASE64_STANDARD.decode(compact) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "signature is not valid base64");
            return Ok(false);
        }
    };

    let hashed = alg.digest(content);
    let verified = public_key
        .verify(alg.pkcs1v15(), &hashed, &signature_bytes)
        .is_ok();

    tracing::debug!(algorithm = %alg, verified, "verified RSA signature");
    Ok(verified)
}

/// Legacy MD5 check: lowercase MD5 of `content + key` compared exactly with `signature`.
///
/// This is the gateway library's historical check and is kept for
/// compatibility. It does not add the `&key=` separator and does not
/// normalize case, so it never accepts the uppercase output of
/// [`Signer::sign_with_md5`] as is. Use [`Signer::verify_with_md5`] for
/// notifications signed by the gateway.
pub fn verify_with_md5(content: &str, signature: &str, key: &str) -> bool {
    let mut keyed = String::with_capacity(content.len() + key.len());
    keyed.push_str(content);
    keyed.push_str(key);
    md5_hex(keyed.as_bytes()) == signature
}

impl Signer {
    /// Verifies an RSA signature over this signer's canonical content.
    pub fn verify_with_rsa(
        &self,
        signature: &str,
        public_key: &str,
        alg: DigestAlgorithm,
    ) -> Result<bool> {
        let content = self.content_to_sign()?;
        verify_with_rsa(content.as_bytes(), signature, public_key, alg)
    }

    /// Verifies an MD5 signature over this signer's canonical content.
    ///
    /// Recomputes `MD5(content + "&key=" + key)` and compares it with
    /// `signature` ignoring case.
    pub fn verify_with_md5(&self, signature: &str, key: &str) -> Result<bool> {
        let content = self.content_to_sign()?;
        let expected = md5_hex(md5_content(&content, key).as_bytes());
        Ok(expected.eq_ignore_ascii_case(signature.trim()))
    }
}
