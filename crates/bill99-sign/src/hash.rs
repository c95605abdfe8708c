// MD5 digest helpers for the gateway's keyed-MD5 signature type

use md5::{Digest, Md5};

/// Computes the MD5 digest of the input bytes and returns it as a lowercase hex string.
pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Same digest as [`md5_hex`], rendered in uppercase as the gateway expects in `signMsg`.
pub fn md5_hex_upper(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode_upper(result)
}
