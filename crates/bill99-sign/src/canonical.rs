// Canonical signed content for gateway messages
//
// The signed content is a pure function of the parameters and the signer
// configuration: ignored keys are removed, keys are optionally ordered by the
// schema of the message direction, empty values are dropped, and the result is
// serialized as a literal query string or as compact JSON.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::Result;
use crate::params::ParameterSet;
use crate::schema::{order_by_schema, Direction};
use crate::types::{EncodePolicy, SignerConfig};

/// Applies the ignore list, schema ordering and empty-value filter.
///
/// Only values of length zero are dropped; `"0"` and `"false"` are signed.
pub fn params_to_sign(params: &ParameterSet, config: &SignerConfig) -> ParameterSet {
    let mut selected = params.clone();
    selected.retain(|key, _| !config.ignores.contains(key));

    if config.sort {
        let direction = Direction::detect(&selected);
        tracing::trace!(?direction, "ordering parameters by schema");
        selected = order_by_schema(&selected, direction.schema());
    }

    selected.retain(|_, value| !value.is_empty());
    selected
}

/// Returns the content to sign as a string.
pub fn content_to_sign(params: &ParameterSet, config: &SignerConfig) -> Result<String> {
    let selected = params_to_sign(params, config);

    tracing::debug!(
        policy = %config.encode_policy,
        sorted = config.sort,
        fields = selected.len(),
        "canonicalized parameters"
    );

    match config.encode_policy {
        EncodePolicy::Query => Ok(encode_query(&selected)),
        EncodePolicy::Json => encode_json(&selected),
    }
}

/// Returns the UTF-8 bytes of the content to sign.
pub fn canonical_bytes(params: &ParameterSet, config: &SignerConfig) -> Result<Vec<u8>> {
    Ok(content_to_sign(params, config)?.into_bytes())
}

/// Joins `k=v` pairs with `&`. Values are not percent-encoded.
fn encode_query(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Serializes the parameters as a compact JSON object in their current order.
///
/// An empty parameter set is written as `[]`, as the gateway's reference
/// encoder does for an empty list.
fn encode_json(params: &ParameterSet) -> Result<String> {
    if params.is_empty() {
        return Ok("[]".to_string());
    }

    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, GatewayFormatter);
    params.serialize(&mut serializer)?;

    // The formatter only ever writes ASCII.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Compact JSON with the gateway's string escaping: `/` becomes `\/` and every
/// non-ASCII character becomes a lowercase `\uXXXX` escape.
struct GatewayFormatter;

impl Formatter for GatewayFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch != '/' && ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            if ch == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
