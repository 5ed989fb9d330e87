//! Static code tables.
//!
//! Three process-wide tables translate raw response codes into error codes and
//! messages: one for gateway codes (reply header), one for card-issuer codes
//! (credit, debit and EBT bodies) and one for gift card processor codes.
//!
//! Codes are compared as strings throughout. Replies decoded from XML carry
//! every scalar as text, so `"0"` and `0` are never confused.

use crate::error::{CreditError, ErrorCode, GatewayError};

/// Gateway code for a timeout reaching the processor.
pub const GATEWAY_TIMEOUT: &str = "30";

/// Gateway code for "no matching original transaction".
pub const NO_MATCHING_TRANSACTION: &str = "3";

/// Issuer code for "issuer or switch inoperative".
pub const ISSUER_TIMEOUT: &str = "91";

/// Issuer codes that mean the transaction went through.
///
/// `10` is a partial approval and `85` is the "no reason to decline"
/// outcome of an account verification.
pub const ISSUER_ACCEPTED: &[&str] = &["00", "0", "10", "85"];

/// Gift card codes that mean the transaction went through.
///
/// `13` is a partial approval with a split-tender balance due.
pub const GIFT_ACCEPTED: &[&str] = &["0", "13"];

/// Check response code for an accepted check.
pub const CHECK_ACCEPTED: &str = "0";

/// Message used when a rejected check carries no processor text.
pub const CHECK_REJECTED: &str = "The check was rejected.";

/// One row of a code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    /// Raw response code.
    pub rsp_code: &'static str,
    /// Translated error code.
    pub error: ErrorCode,
    /// Fixed message; `None` means the reply's own text is used.
    pub message: Option<&'static str>,
}

const fn entry(rsp_code: &'static str, error: ErrorCode, message: Option<&'static str>) -> CodeEntry {
    CodeEntry {
        rsp_code,
        error,
        message,
    }
}

/// Gateway response codes. Anything absent and non-zero translates to
/// [`ErrorCode::UnknownGatewayError`] with the reply text.
pub static GATEWAY_CODES: &[CodeEntry] = &[
    entry(
        "-2",
        ErrorCode::AuthenticationError,
        Some("Authentication error. Please double check your service configuration."),
    ),
    entry("1", ErrorCode::UnknownGatewayError, None),
    entry(NO_MATCHING_TRANSACTION, ErrorCode::InvalidOriginalTransaction, None),
    entry("5", ErrorCode::NoOpenBatch, None),
    entry("12", ErrorCode::InvalidCpcData, Some("Invalid CPC data.")),
    entry("13", ErrorCode::InvalidCardData, Some("Invalid card data.")),
    entry("14", ErrorCode::InvalidNumber, Some("The card number is not valid.")),
    entry("26", ErrorCode::InvalidCardData, Some("Invalid card data.")),
    entry("27", ErrorCode::InvalidCardData, Some("Invalid card data.")),
    entry(GATEWAY_TIMEOUT, ErrorCode::GatewayTimeout, Some("Gateway timed out.")),
    entry("34", ErrorCode::InvalidCardData, Some("Invalid card data.")),
];

/// Issuer response codes. Anything absent and not accepted translates to
/// [`ErrorCode::UnknownCreditError`].
pub static ISSUER_CODES: &[CodeEntry] = &[
    entry("02", ErrorCode::CardDeclined, None),
    entry("03", ErrorCode::CardDeclined, None),
    entry("04", ErrorCode::CardDeclined, None),
    entry("05", ErrorCode::CardDeclined, None),
    entry("41", ErrorCode::CardDeclined, None),
    entry("43", ErrorCode::CardDeclined, None),
    entry("44", ErrorCode::CardDeclined, None),
    entry("51", ErrorCode::CardDeclined, None),
    entry("56", ErrorCode::CardDeclined, None),
    entry("61", ErrorCode::CardDeclined, None),
    entry("62", ErrorCode::CardDeclined, None),
    entry("63", ErrorCode::CardDeclined, None),
    entry("65", ErrorCode::CardDeclined, None),
    entry("78", ErrorCode::CardDeclined, None),
    entry("R1", ErrorCode::CardDeclined, None),
    entry("06", ErrorCode::ProcessingError, None),
    entry("07", ErrorCode::ProcessingError, None),
    entry("12", ErrorCode::ProcessingError, None),
    entry("15", ErrorCode::ProcessingError, None),
    entry("19", ErrorCode::ProcessingError, None),
    entry("52", ErrorCode::ProcessingError, None),
    entry("53", ErrorCode::ProcessingError, None),
    entry("57", ErrorCode::ProcessingError, None),
    entry("58", ErrorCode::ProcessingError, None),
    entry("76", ErrorCode::ProcessingError, None),
    entry("77", ErrorCode::ProcessingError, None),
    entry("96", ErrorCode::ProcessingError, None),
    entry("EC", ErrorCode::ProcessingError, None),
    entry("13", ErrorCode::InvalidAmount, None),
    entry("14", ErrorCode::IncorrectNumber, None),
    entry("54", ErrorCode::ExpiredCard, None),
    entry("55", ErrorCode::InvalidPin, None),
    entry("75", ErrorCode::PinEntriesExceeded, None),
    entry("80", ErrorCode::InvalidExpiry, None),
    entry("86", ErrorCode::PinVerification, None),
    entry(ISSUER_TIMEOUT, ErrorCode::IssuerTimeout, None),
    entry("EB", ErrorCode::IncorrectCvc, None),
    entry("N7", ErrorCode::IncorrectCvc, None),
    entry("FR", ErrorCode::PossibleFraudDetected, None),
];

/// Gift card response codes. Anything absent and not accepted translates to
/// [`ErrorCode::UnknownGiftError`].
pub static GIFT_CODES: &[CodeEntry] = &[
    entry("1", ErrorCode::UnknownGiftError, None),
    entry("2", ErrorCode::UnknownGiftError, None),
    entry("11", ErrorCode::UnknownGiftError, None),
    entry("3", ErrorCode::InvalidCardData, None),
    entry("8", ErrorCode::InvalidCardData, None),
    entry("4", ErrorCode::ExpiredCard, None),
    entry("5", ErrorCode::CardDeclined, None),
    entry("12", ErrorCode::CardDeclined, None),
    entry("6", ErrorCode::ProcessingError, None),
    entry("7", ErrorCode::ProcessingError, None),
    entry("10", ErrorCode::ProcessingError, None),
    entry("9", ErrorCode::InvalidAmount, None),
    entry("14", ErrorCode::InvalidPin, None),
];

/// Default message for an issuer-side error code.
#[must_use]
pub const fn issuer_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::CardDeclined => "The card was declined.",
        ErrorCode::ProcessingError => "An error occurred while processing the card.",
        ErrorCode::InvalidAmount => "Must be greater than or equal 0.",
        ErrorCode::IncorrectNumber => "The card number is incorrect.",
        ErrorCode::ExpiredCard => "The card has expired.",
        ErrorCode::InvalidPin => "The pin is invalid.",
        ErrorCode::PinEntriesExceeded => "Maximum number of pin retries exceeded.",
        ErrorCode::InvalidExpiry => "Card expiration date is invalid.",
        ErrorCode::PinVerification => "Can't verify card pin number.",
        ErrorCode::IssuerTimeout => "The card issuer timed-out.",
        ErrorCode::IncorrectCvc => "The card's security code is incorrect.",
        ErrorCode::PossibleFraudDetected => "Possible fraud detected.",
        ErrorCode::InvalidCardData => "The card data is invalid.",
        ErrorCode::UnknownGiftError => "An unknown gift error has occurred.",
        _ => "An unknown issuer error has occurred.",
    }
}

fn lookup(table: &'static [CodeEntry], rsp_code: &str) -> Option<&'static CodeEntry> {
    table.iter().find(|e| e.rsp_code == rsp_code)
}

/// Translates a gateway response code.
///
/// Returns `None` for `"0"`.
#[must_use]
pub fn translate_gateway(rsp_code: &str, rsp_msg: Option<&str>) -> Option<GatewayError> {
    if rsp_code == portico_proto::GATEWAY_SUCCESS {
        return None;
    }
    let (code, fixed) = lookup(GATEWAY_CODES, rsp_code)
        .map_or((ErrorCode::UnknownGatewayError, None), |e| (e.error, e.message));
    let message = fixed
        .map(str::to_owned)
        .or_else(|| rsp_msg.map(str::to_owned))
        .unwrap_or_else(|| format!("Unexpected gateway response code {rsp_code}."));
    Some(GatewayError::new(code, message).with_gateway(rsp_code, rsp_msg.map(str::to_owned)))
}

/// Translates an issuer response code.
///
/// Returns `None` for the codes in [`ISSUER_ACCEPTED`].
#[must_use]
pub fn translate_issuer(
    rsp_code: &str,
    rsp_text: Option<&str>,
    transaction_id: Option<i64>,
) -> Option<CreditError> {
    if ISSUER_ACCEPTED.contains(&rsp_code) {
        return None;
    }
    let code = lookup(ISSUER_CODES, rsp_code).map_or(ErrorCode::UnknownCreditError, |e| e.error);
    Some(
        CreditError::new(code, issuer_message(code))
            .with_transaction_id(transaction_id)
            .with_issuer(rsp_code, rsp_text.map(str::to_owned)),
    )
}

/// Translates a gift card response code.
///
/// Returns `None` for the codes in [`GIFT_ACCEPTED`].
#[must_use]
pub fn translate_gift(
    rsp_code: &str,
    rsp_text: Option<&str>,
    transaction_id: Option<i64>,
) -> Option<CreditError> {
    if GIFT_ACCEPTED.contains(&rsp_code) {
        return None;
    }
    let code = lookup(GIFT_CODES, rsp_code).map_or(ErrorCode::UnknownGiftError, |e| e.error);
    Some(
        CreditError::new(code, issuer_message(code))
            .with_transaction_id(transaction_id)
            .with_issuer(rsp_code, rsp_text.map(str::to_owned)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_have_unique_codes() {
        for table in [GATEWAY_CODES, ISSUER_CODES, GIFT_CODES] {
            let codes: HashSet<_> = table.iter().map(|e| e.rsp_code).collect();
            assert_eq!(codes.len(), table.len());
        }
    }

    #[test]
    fn test_gateway_success_translates_to_nothing() {
        assert!(translate_gateway("0", Some("Success")).is_none());
    }

    #[test]
    fn test_gateway_fixed_and_reply_messages() {
        let err = translate_gateway("30", Some("Timeout")).unwrap();
        assert_eq!(err.code, ErrorCode::GatewayTimeout);
        assert_eq!(err.message, "Gateway timed out.");
        assert_eq!(err.gateway_code.as_deref(), Some("30"));

        let err = translate_gateway("5", Some("No open batch")).unwrap();
        assert_eq!(err.code, ErrorCode::NoOpenBatch);
        assert_eq!(err.message, "No open batch");
    }

    #[test]
    fn test_gateway_unknown_code() {
        let err = translate_gateway("999", None).unwrap();
        assert_eq!(err.code, ErrorCode::UnknownGatewayError);
        assert_eq!(err.message, "Unexpected gateway response code 999.");
    }

    #[test]
    fn test_issuer_accepted_codes() {
        for code in ISSUER_ACCEPTED {
            assert!(translate_issuer(code, None, None).is_none());
        }
    }

    #[test]
    fn test_issuer_decline() {
        let err = translate_issuer("05", Some("DECLINE"), Some(9)).unwrap();
        assert_eq!(err.code, ErrorCode::CardDeclined);
        assert_eq!(err.message, "The card was declined.");
        assert_eq!(err.transaction_id, Some(9));
        assert_eq!(err.issuer_message.as_deref(), Some("DECLINE"));
    }

    #[test]
    fn test_issuer_timeout_and_unknown() {
        assert_eq!(
            translate_issuer("91", None, None).unwrap().code,
            ErrorCode::IssuerTimeout
        );
        assert_eq!(
            translate_issuer("ZZ", None, None).unwrap().code,
            ErrorCode::UnknownCreditError
        );
    }

    #[test]
    fn test_gift_codes() {
        assert!(translate_gift("13", None, None).is_none());
        assert_eq!(
            translate_gift("4", None, None).unwrap().code,
            ErrorCode::ExpiredCard
        );
        assert_eq!(
            translate_gift("99", None, None).unwrap().code,
            ErrorCode::UnknownGiftError
        );
    }
}
