// Canonical key order for messages exchanged with the gateway
//
// Each message direction has a fixed, ordered list of the keys that take part
// in the signature. Keys outside the list are not signed.

use crate::params::ParameterSet;

/// Key whose presence marks a gateway-to-merchant response.
pub const RESPONSE_MARKER: &str = "payAmount";

/// Signed keys of a merchant-to-gateway payment request, in signing order.
pub const REQUEST_SCHEMA: &[&str] = &[
    "inputCharset",
    "pageUrl",
    "bgUrl",
    "version",
    "language",
    "signType",
    "merchantAcctId",
    "payerName",
    "payerContactType",
    "payerContact",
    "payerIdType",
    "payerId",
    "payerIP",
    "orderId",
    "orderAmount",
    "orderTime",
    "orderTimestamp",
    "productName",
    "productNum",
    "productId",
    "productDesc",
    "ext1",
    "ext2",
    "payType",
    "bankId",
    "period",
    "cardIssuer",
    "cardNum",
    "remitType",
    "remitCode",
    "redoFlag",
    "pid",
    "submitType",
    "orderTimeOut",
    "extDataType",
    "extDataContent",
];

/// Signed keys of a gateway-to-merchant payment notification, in signing order.
///
/// `orderTime` is listed twice by the gateway documentation; it is signed once.
/// Whether the second entry was meant to be a different field is unknown.
pub const RESPONSE_SCHEMA: &[&str] = &[
    "merchantAcctId",
    "version",
    "language",
    "signType",
    "payType",
    "period",
    "bankId",
    "orderId",
    "orderTime",
    "orderTime",
    "orderAmount",
    "bindCard",
    "bindMobile",
    "dealId",
    "bankDealId",
    "dealTime",
    "payAmount",
    "fee",
    "ext1",
    "ext2",
    "payResult",
    "errCode",
];

/// Direction of a message relative to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Merchant to gateway.
    Request,
    /// Gateway to merchant.
    Response,
}

impl Direction {
    /// Responses are recognised by the presence of `payAmount`, whatever its value.
    pub fn detect(params: &ParameterSet) -> Self {
        if params.contains_key(RESPONSE_MARKER) {
            Direction::Response
        } else {
            Direction::Request
        }
    }

    pub fn schema(&self) -> &'static [&'static str] {
        match self {
            Direction::Request => REQUEST_SCHEMA,
            Direction::Response => RESPONSE_SCHEMA,
        }
    }
}

/// Returns the schema keys present in `params`, in schema order, each at most once.
pub fn order_by_schema(params: &ParameterSet, schema: &[&str]) -> ParameterSet {
    let mut ordered = ParameterSet::new();
    for key in schema {
        if ordered.contains_key(key) {
            continue;
        }
        if let Some(value) = params.get(key) {
            ordered.insert(*key, value);
        }
    }
    ordered
}
