// Bill99 Sign - request/response signing for the 99Bill payment gateway

pub mod canonical;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;
pub mod schema;
pub mod sign;
pub mod types;
pub mod verify;

pub use canonical::{canonical_bytes, content_to_sign, params_to_sign};
pub use error::{Result, SignerError};
pub use hash::{md5_hex, md5_hex_upper};
pub use keys::{convert_key, format_key, load_private_key, load_public_key, resolve_key_text};
pub use params::ParameterSet;
pub use schema::{Direction, REQUEST_SCHEMA, RESPONSE_SCHEMA};
pub use sign::{md5_content, sign_content_with_md5, sign_content_with_rsa, Signer};
pub use types::{DigestAlgorithm, EncodePolicy, KeyType, SignerConfig};
pub use verify::{verify_with_md5, verify_with_rsa};
