//! Reply envelope view.
//!
//! The transport hands back an untyped tree shaped as
//!
//! ```json
//! {
//!   "Header": { "GatewayRspCode": "0", "GatewayTxnId": "123", ... },
//!   "Transaction": { "CreditSale": { "RspCode": "00", ... } }
//! }
//! ```
//!
//! Every field is looked up by presence: an absent key reads as `None`,
//! never as an error. Scalars may arrive as JSON strings or numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::encoding::{parse_amount, parse_flag, parse_utc};
use crate::{GATEWAY_SUCCESS, ProtocolError};

/// A raw gateway reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply(Value);

impl Reply {
    /// Wraps an already decoded reply tree.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parses a reply from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Json`] if the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(Self(serde_json::from_str(text)?))
    }

    /// Returns the underlying tree.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Decodes the header section.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingHeader`] when there is no header object
    /// and [`ProtocolError::MissingField`] when it lacks `GatewayRspCode`.
    pub fn header(&self) -> Result<ReplyHeader, ProtocolError> {
        let header = Fields::new(&self.0)
            .nested("Header")
            .ok_or(ProtocolError::MissingHeader)?;
        ReplyHeader::from_fields(header)
    }

    /// Returns the body keyed by the transaction tag, if present.
    #[must_use]
    pub fn body(&self, tag: &str) -> Option<Fields<'_>> {
        Fields::new(&self.0).nested("Transaction")?.nested(tag)
    }
}

/// Decoded reply header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyHeader {
    /// Gateway response code; `"0"` means accepted.
    pub gateway_rsp_code: String,
    /// Gateway response message.
    pub gateway_rsp_msg: Option<String>,
    /// Gateway-assigned transaction id.
    pub gateway_txn_id: Option<i64>,
    /// Echo of the caller's client transaction id.
    pub client_txn_id: Option<i64>,
    /// Gateway response timestamp.
    pub response_dt: Option<DateTime<Utc>>,
    /// Multi-use token outcome, present when a token was requested.
    pub token: Option<ReplyToken>,
}

impl ReplyHeader {
    fn from_fields(fields: Fields<'_>) -> Result<Self, ProtocolError> {
        let gateway_rsp_code = fields
            .string("GatewayRspCode")
            .ok_or(ProtocolError::MissingField("GatewayRspCode"))?;
        Ok(Self {
            gateway_rsp_code,
            gateway_rsp_msg: fields.string("GatewayRspMsg"),
            gateway_txn_id: fields.int("GatewayTxnId"),
            client_txn_id: fields.int("ClientTxnId"),
            response_dt: fields.timestamp("RspDT"),
            token: fields.nested("TokenData").map(ReplyToken::from_fields),
        })
    }

    /// Returns `true` when the gateway accepted the request.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.gateway_rsp_code == GATEWAY_SUCCESS
    }
}

/// Token section of the reply header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyToken {
    /// The token value (absent when tokenization failed).
    pub value: Option<String>,
    /// Tokenization response code.
    pub rsp_code: Option<String>,
    /// Tokenization response message.
    pub rsp_msg: Option<String>,
}

impl ReplyToken {
    fn from_fields(fields: Fields<'_>) -> Self {
        Self {
            value: fields.string("TokenValue"),
            rsp_code: fields.string("TokenRspCode"),
            rsp_msg: fields.string("TokenRspMsg"),
        }
    }
}

/// Presence-based accessor over one object in a reply.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(&'a Value);

impl<'a> Fields<'a> {
    /// Wraps a value.
    #[must_use]
    pub const fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn value(&self) -> &'a Value {
        self.0
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Reads a scalar as a string. Blank strings read as `None`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        match self.raw(key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_owned())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Reads an integer.
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.raw(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Reads a decimal amount.
    #[must_use]
    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        self.string(key).as_deref().and_then(parse_amount)
    }

    /// Reads a `Y`/`N` flag.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.raw(key)? {
            Value::Bool(b) => Some(*b),
            _ => self.string(key).as_deref().and_then(parse_flag),
        }
    }

    /// Reads a UTC timestamp.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.string(key).as_deref().and_then(parse_utc)
    }

    /// Returns a nested object.
    #[must_use]
    pub fn nested(&self, key: &str) -> Option<Self> {
        self.raw(key).filter(|v| v.is_object()).map(Self)
    }

    /// Returns the objects under `key`.
    ///
    /// XML-derived replies collapse single-element lists into a bare object,
    /// so both shapes are accepted. Order is preserved.
    #[must_use]
    pub fn list(&self, key: &str) -> Vec<Self> {
        match self.raw(key) {
            Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).map(Self).collect(),
            Some(v @ Value::Object(_)) => vec![Self(v)],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_header_decodes_strings_and_numbers() {
        let reply = Reply::new(json!({
            "Header": {
                "GatewayRspCode": 0,
                "GatewayRspMsg": "Success",
                "GatewayTxnId": "123",
                "ClientTxnId": 77,
                "TokenData": { "TokenRspCode": "0", "TokenValue": "supt_abc" }
            }
        }));
        let header = reply.header().unwrap();
        assert!(header.is_success());
        assert_eq!(header.gateway_txn_id, Some(123));
        assert_eq!(header.client_txn_id, Some(77));
        assert_eq!(
            header.token.and_then(|t| t.value).as_deref(),
            Some("supt_abc")
        );
    }

    #[test]
    fn test_missing_header() {
        let reply = Reply::new(json!({ "Transaction": {} }));
        assert!(matches!(reply.header(), Err(ProtocolError::MissingHeader)));
        let reply = Reply::new(json!({ "Header": { "GatewayTxnId": "1" } }));
        assert!(matches!(
            reply.header(),
            Err(ProtocolError::MissingField("GatewayRspCode"))
        ));
    }

    #[test]
    fn test_body_fields_by_presence() {
        let reply = Reply::new(json!({
            "Header": { "GatewayRspCode": "0" },
            "Transaction": { "CreditSale": { "RspCode": "00", "AuthAmt": "10.00", "AuthCode": "" } }
        }));
        let body = reply.body("CreditSale").unwrap();
        assert_eq!(body.string("RspCode").as_deref(), Some("00"));
        assert_eq!(body.decimal("AuthAmt"), Some(dec!(10.00)));
        assert_eq!(body.string("AuthCode"), None);
        assert_eq!(body.string("AVSRsltCode"), None);
        assert!(reply.body("CreditAuth").is_none());
    }

    #[test]
    fn test_list_accepts_single_object() {
        let value = json!({ "Details": { "GatewayTxnId": "1" } });
        assert_eq!(Fields::new(&value).list("Details").len(), 1);
        let value = json!({ "Details": [{ "GatewayTxnId": "1" }, { "GatewayTxnId": "2" }] });
        let ids: Vec<_> = Fields::new(&value)
            .list("Details")
            .iter()
            .filter_map(|d| d.int("GatewayTxnId"))
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
