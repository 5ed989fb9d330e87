//! Recovery controller.
//!
//! Classifies a reply into an [`Assessment`] and, for the two timeout
//! classes, turns the outcome of the single compensating reversal into the
//! final error. A timeout is always raised, reversed or not.
//!
//! ```text
//! Submitted ─┬─ Accepted ───────────────────────────────▶ response
//!            ├─ Rejected(err) ──────────────────────────▶ err
//!            ├─ GatewayTimeout ─ reverse once ─ resolve ─▶ err
//!            └─ IssuerTimeout ── reverse once ─ resolve ─▶ err
//! ```

use portico_proto::{Reply, ReplyHeader};

use crate::codes::{
    CHECK_ACCEPTED, CHECK_REJECTED, GATEWAY_TIMEOUT, ISSUER_TIMEOUT, NO_MATCHING_TRANSACTION,
    translate_gateway, translate_gift, translate_issuer,
};
use crate::entities::{ReverseRequest, TransactionRequest};
use crate::error::{CheckError, CreditError, ErrorCode, GatewayError, PorticoError};
use crate::kind::{Family, TransactionKind};
use crate::mapper::{check_rejections, unexpected};

/// Classification of a reply.
#[derive(Debug)]
pub enum Assessment {
    /// Gateway and body codes are acceptable.
    Accepted,
    /// Gateway timed out reaching the processor on a reversible kind.
    GatewayTimeout(ReplyHeader),
    /// Issuer timed out on a reversible kind.
    IssuerTimeout {
        /// Reply header.
        header: ReplyHeader,
        /// Issuer response text.
        rsp_text: Option<String>,
    },
    /// Any other failure, translated through the code tables.
    Rejected(PorticoError),
}

impl Assessment {
    /// Collapses the assessment without recovery.
    ///
    /// Timeouts become their plain translated errors. Used for the
    /// compensating reversal, which is never itself reversed.
    ///
    /// # Errors
    ///
    /// Returns the translated error for every class except `Accepted`.
    pub fn into_result(self) -> Result<(), PorticoError> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(err) => Err(err),
            Self::GatewayTimeout(header) => Err(translate_gateway(
                &header.gateway_rsp_code,
                header.gateway_rsp_msg.as_deref(),
            )
            .map_or_else(
                || GatewayError::new(ErrorCode::GatewayTimeout, "Gateway timed out.").into(),
                PorticoError::from,
            )),
            Self::IssuerTimeout { header, rsp_text } => Err(translate_issuer(
                ISSUER_TIMEOUT,
                rsp_text.as_deref(),
                header.gateway_txn_id,
            )
            .map_or_else(
                || CreditError::new(ErrorCode::IssuerTimeout, "The card issuer timed-out.").into(),
                PorticoError::from,
            )),
        }
    }
}

/// Classifies a reply for `kind`.
#[must_use]
pub fn assess(kind: TransactionKind, reply: &Reply) -> Assessment {
    let header = match reply.header() {
        Ok(header) => header,
        Err(e) => return Assessment::Rejected(unexpected(&e)),
    };

    if !header.is_success() {
        if header.gateway_rsp_code == GATEWAY_TIMEOUT && kind.is_reversible() {
            return Assessment::GatewayTimeout(header);
        }
        return match translate_gateway(&header.gateway_rsp_code, header.gateway_rsp_msg.as_deref()) {
            Some(err) => Assessment::Rejected(err.into()),
            None => Assessment::Accepted,
        };
    }

    let Some(body) = reply.body(kind.tag()) else {
        return Assessment::Accepted;
    };
    let Some(code) = body.string("RspCode") else {
        return Assessment::Accepted;
    };
    let txn_id = header.gateway_txn_id;

    match kind.family() {
        Family::Credit | Family::Ebt | Family::Debit => {
            let rsp_text = body.string("RspText");
            if code == ISSUER_TIMEOUT && kind.is_reversible() {
                return Assessment::IssuerTimeout { header, rsp_text };
            }
            translate_issuer(&code, rsp_text.as_deref(), txn_id)
                .map_or(Assessment::Accepted, |e| Assessment::Rejected(e.into()))
        }
        Family::Gift => translate_gift(&code, body.string("RspText").as_deref(), txn_id)
            .map_or(Assessment::Accepted, |e| Assessment::Rejected(e.into())),
        Family::Check if code != CHECK_ACCEPTED => {
            let message = body
                .string("RspMessage")
                .or_else(|| body.string("RspText"))
                .unwrap_or_else(|| CHECK_REJECTED.to_owned());
            Assessment::Rejected(
                CheckError::new(ErrorCode::CheckRejected, message)
                    .with_transaction_id(txn_id)
                    .with_response_code(code)
                    .with_details(check_rejections(body))
                    .into(),
            )
        }
        Family::Check | Family::Report => Assessment::Accepted,
    }
}

/// Builds the compensating reversal for a timed-out request.
///
/// Uses the original amount, currency and payment method. Returns `None`
/// for kinds that are never reversed.
#[must_use]
pub fn reversal_for(request: &TransactionRequest) -> Option<ReverseRequest> {
    match request {
        TransactionRequest::Authorize(r) | TransactionRequest::Charge(r) => Some(ReverseRequest {
            currency: r.currency.clone(),
            payment: r.payment.clone(),
            details: r.details.clone(),
            ..ReverseRequest::new(r.amount)
        }),
        _ => None,
    }
}

fn is_no_match(err: &PorticoError) -> bool {
    matches!(err, PorticoError::Gateway(e) if e.gateway_code.as_deref() == Some(NO_MATCHING_TRANSACTION))
}

/// Final error after a gateway timeout.
///
/// - reversal accepted: `gateway_timeout_reversal_error` with the original
///   gateway code and message;
/// - reversal found no matching transaction: the original `gateway_timeout`;
/// - reversal failed otherwise: `issuer_timeout_reversal_error` wrapping the
///   reversal failure.
#[must_use]
pub fn resolve_gateway_timeout(header: &ReplyHeader, reversal: Result<(), PorticoError>) -> PorticoError {
    let code = header.gateway_rsp_code.as_str();
    let msg = header.gateway_rsp_msg.clone();
    match reversal {
        Ok(()) => GatewayError::new(
            ErrorCode::GatewayTimeoutReversalError,
            "Gateway timed out; the transaction was reversed.",
        )
        .with_gateway(code, msg)
        .into(),
        Err(e) if is_no_match(&e) => translate_gateway(code, msg.as_deref()).map_or_else(
            || GatewayError::new(ErrorCode::GatewayTimeout, "Gateway timed out.").into(),
            PorticoError::from,
        ),
        Err(e) => CreditError::new(
            ErrorCode::IssuerTimeoutReversalError,
            "Error occurred while reversing a charge due to gateway timeout.",
        )
        .with_transaction_id(header.gateway_txn_id)
        .with_inner(e)
        .into(),
    }
}

/// Final error after an issuer timeout.
///
/// - reversal accepted: `issuer_timeout_reversal_error` with the original
///   issuer code and text;
/// - reversal found no matching transaction: the original `issuer_timeout`;
/// - reversal failed otherwise: `issuer_timeout_reversal_error` wrapping the
///   reversal failure.
#[must_use]
pub fn resolve_issuer_timeout(
    header: &ReplyHeader,
    rsp_text: Option<String>,
    reversal: Result<(), PorticoError>,
) -> PorticoError {
    let txn_id = header.gateway_txn_id;
    match reversal {
        Ok(()) => CreditError::new(
            ErrorCode::IssuerTimeoutReversalError,
            "The card issuer timed-out; the transaction was reversed.",
        )
        .with_transaction_id(txn_id)
        .with_issuer(ISSUER_TIMEOUT, rsp_text)
        .into(),
        Err(e) if is_no_match(&e) => translate_issuer(ISSUER_TIMEOUT, rsp_text.as_deref(), txn_id)
            .map_or_else(
                || CreditError::new(ErrorCode::IssuerTimeout, "The card issuer timed-out.").into(),
                PorticoError::from,
            ),
        Err(e) => CreditError::new(
            ErrorCode::IssuerTimeoutReversalError,
            "Error occurred while reversing a charge due to issuer timeout.",
        )
        .with_transaction_id(txn_id)
        .with_issuer(ISSUER_TIMEOUT, rsp_text)
        .with_inner(e)
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AuthRequest, CardToken};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn header(code: &str) -> ReplyHeader {
        Reply::new(json!({ "Header": { "GatewayRspCode": code, "GatewayRspMsg": "msg", "GatewayTxnId": "9" } }))
            .header()
            .unwrap()
    }

    #[test]
    fn test_assess_gateway_timeout_only_for_reversible_kinds() {
        let reply = Reply::new(json!({ "Header": { "GatewayRspCode": "30" } }));
        assert!(matches!(
            assess(TransactionKind::Charge, &reply),
            Assessment::GatewayTimeout(_)
        ));
        match assess(TransactionKind::Refund, &reply) {
            Assessment::Rejected(e) => assert_eq!(e.code(), ErrorCode::GatewayTimeout),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_assess_issuer_codes() {
        let reply = |code: &str| {
            Reply::new(json!({
                "Header": { "GatewayRspCode": "0", "GatewayTxnId": "4" },
                "Transaction": { "CreditAuth": { "RspCode": code, "RspText": "text" } }
            }))
        };
        assert!(matches!(
            assess(TransactionKind::Authorize, &reply("00")),
            Assessment::Accepted
        ));
        assert!(matches!(
            assess(TransactionKind::Authorize, &reply("10")),
            Assessment::Accepted
        ));
        assert!(matches!(
            assess(TransactionKind::Authorize, &reply("91")),
            Assessment::IssuerTimeout { .. }
        ));
        match assess(TransactionKind::Authorize, &reply("05")) {
            Assessment::Rejected(e) => {
                assert_eq!(e.code(), ErrorCode::CardDeclined);
                assert_eq!(e.transaction_id(), Some(4));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_assess_check_rejection() {
        let reply = Reply::new(json!({
            "Header": { "GatewayRspCode": "0", "GatewayTxnId": "8" },
            "Transaction": { "CheckSale": {
                "RspCode": "1", "RspMessage": "Transaction declined",
                "CheckRspInfo": { "Type": "Error", "Code": "E7", "Message": "Invalid routing" }
            } }
        }));
        match assess(TransactionKind::CheckReturn, &reply) {
            Assessment::Rejected(PorticoError::Check(e)) => {
                assert_eq!(e.response_code.as_deref(), Some("1"));
                assert_eq!(e.details.len(), 1);
                assert_eq!(e.details[0].code.as_deref(), Some("E7"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reports_never_fail_on_body_codes() {
        let reply = Reply::new(json!({
            "Header": { "GatewayRspCode": "0" },
            "Transaction": { "ReportTxnDetail": { "RspCode": "05" } }
        }));
        assert!(matches!(assess(TransactionKind::Get, &reply), Assessment::Accepted));
    }

    #[test]
    fn test_reversal_reuses_amount_and_payment() {
        let mut auth = AuthRequest::new(dec!(25));
        auth.payment.token = Some(CardToken::new("tok"));
        let reversal = reversal_for(&TransactionRequest::Charge(auth)).unwrap();
        assert_eq!(reversal.amount, dec!(25));
        assert_eq!(reversal.currency, "usd");
        assert_eq!(reversal.reference_count(), 1);
        assert!(reversal_for(&TransactionRequest::BatchClose).is_none());
    }

    #[test]
    fn test_gateway_timeout_resolutions() {
        let h = header("30");
        let reversed = resolve_gateway_timeout(&h, Ok(()));
        assert_eq!(reversed.code(), ErrorCode::GatewayTimeoutReversalError);
        assert!(reversed.record().details.is_some());

        let no_match: PorticoError = translate_gateway("3", Some("no match")).unwrap().into();
        let original = resolve_gateway_timeout(&h, Err(no_match));
        assert_eq!(original.code(), ErrorCode::GatewayTimeout);

        let other: PorticoError = GatewayError::new(ErrorCode::UnknownGatewayError, "down").into();
        let wrapped = resolve_gateway_timeout(&h, Err(other));
        assert_eq!(wrapped.code(), ErrorCode::IssuerTimeoutReversalError);
        assert!(matches!(&wrapped, PorticoError::Credit(e) if e.inner.is_some()));
    }

    #[test]
    fn test_issuer_timeout_resolutions() {
        let h = header("0");
        let reversed = resolve_issuer_timeout(&h, Some("SYSTEM ERROR".into()), Ok(()));
        assert_eq!(reversed.code(), ErrorCode::IssuerTimeoutReversalError);
        assert_eq!(reversed.transaction_id(), Some(9));

        let no_match: PorticoError = translate_gateway("3", None).unwrap().into();
        let original = resolve_issuer_timeout(&h, None, Err(no_match));
        assert_eq!(original.code(), ErrorCode::IssuerTimeout);
    }
}
