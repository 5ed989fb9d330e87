//! Request serializer.
//!
//! Turns a validated [`TransactionRequest`] into the fragment the transport
//! embeds in its envelope: one top-level element named by the kind's tag,
//! usually wrapping a `Block1`. Absent optional blocks emit nothing.

mod check;
mod credit;
mod debit;
mod ebt;
mod gift;
mod report;

use portico_proto::Element;
use portico_proto::encoding::{amount, flag};
use rust_decimal::Decimal;

use crate::entities::{
    AutoSubstantiation, CardHolder, DirectMarketData, EncryptionData, PaymentMethod, PaymentSlots,
    TransactionDetails, TransactionRequest,
};

/// Wire limit on auto-substantiation amount lines.
pub const MAX_ADDITIONAL_AMOUNTS: usize = 4;

const AMOUNT_ORDINALS: [&str; MAX_ADDITIONAL_AMOUNTS] = ["First", "Second", "Third", "Fourth"];

/// Serializes a request into its gateway fragment.
#[must_use]
pub fn serialize(request: &TransactionRequest) -> Element {
    let tag = request.kind().tag();
    match request {
        TransactionRequest::Authorize(r) | TransactionRequest::Charge(r) => credit::auth(tag, r),
        TransactionRequest::Capture(r) => credit::capture(tag, r),
        TransactionRequest::Refund(r) => credit::refund(tag, r),
        TransactionRequest::Reverse(r) => credit::reverse(tag, r),
        TransactionRequest::Verify(r) => credit::verify(tag, r),
        TransactionRequest::Void(r) => {
            Element::new(tag).leaf_opt("GatewayTxnId", r.transaction_id.map(|id| id.to_string()))
        }
        TransactionRequest::Edit(r) => credit::edit(tag, r),
        TransactionRequest::CpcEdit(r) => credit::cpc_edit(tag, r),
        TransactionRequest::List(r) => report::activity(tag, r),
        TransactionRequest::Get(r) => report::detail(tag, r),
        TransactionRequest::BatchClose => Element::new(tag),
        TransactionRequest::GiftCard(r) => gift::value(tag, r),
        TransactionRequest::GiftReplace(r) => gift::replace(tag, r),
        TransactionRequest::GiftAlias(r) => gift::alias(tag, r),
        TransactionRequest::GiftVoid(r) => gift::void(tag, r),
        TransactionRequest::GiftReversal(r) => gift::reversal(tag, r),
        TransactionRequest::Check(r) => check::sale(tag, r),
        TransactionRequest::CheckVoid(r) => check::void(tag, r),
        TransactionRequest::Ebt(r) => ebt::ebt(tag, r),
        TransactionRequest::Debit(r) => debit::debit(tag, r),
    }
}

fn amount_opt(value: Option<Decimal>) -> Option<String> {
    value.map(amount)
}

fn id_opt(value: Option<i64>) -> Option<String> {
    value.map(|id| id.to_string())
}

/// Appends the payment-method section for the single filled slot.
///
/// Card, track and token go into `CardData`; a stored key is a bare
/// `PaymentMethodKey`; a wallet payment is a manual entry plus a
/// `SecureECommerce` block carrying the cryptogram.
fn payment(block: Element, slots: &PaymentSlots, request_token: bool) -> Element {
    match slots.selected() {
        Some(PaymentMethod::StoredKey(key)) => block.leaf_child("PaymentMethodKey", key),
        Some(PaymentMethod::Wallet(wallet)) => {
            let entry = Element::new("ManualEntry")
                .leaf_child("CardNbr", &wallet.number)
                .leaf_child("ExpMonth", wallet.exp_month.to_string())
                .leaf_child("ExpYear", wallet.exp_year.to_string())
                .leaf_child("CardPresent", flag(false))
                .leaf_child("ReaderPresent", flag(false));
            let secure = Element::new("SecureECommerce")
                .leaf_child("PaymentDataSource", wallet.source.as_str())
                .leaf_child("TypeOfPaymentData", "3DSecure")
                .child(Element::leaf("PaymentData", &wallet.cryptogram).attribute("encoding", "base64"))
                .leaf_opt("ECommerceIndicator", wallet.eci.as_deref());
            block
                .child(card_data(entry, request_token, None))
                .child(secure)
        }
        Some(PaymentMethod::Card(card)) => {
            let entry = Element::new("ManualEntry")
                .leaf_child("CardNbr", &card.number)
                .leaf_child("ExpMonth", card.exp_month.to_string())
                .leaf_child("ExpYear", card.exp_year.to_string())
                .leaf_opt("CVV2", card.cvv.as_deref())
                .leaf_child("CardPresent", flag(card.card_present))
                .leaf_child("ReaderPresent", flag(card.reader_present));
            block.child(card_data(entry, request_token, card.encryption.as_ref()))
        }
        Some(PaymentMethod::Track(track)) => {
            let entry = Element::leaf("TrackData", &track.value).attribute("method", track.method.as_str());
            block.child(card_data(entry, request_token, track.encryption.as_ref()))
        }
        Some(PaymentMethod::Token(token)) => {
            let entry = Element::new("TokenData")
                .leaf_child("TokenValue", &token.value)
                .leaf_opt("ExpMonth", token.exp_month.map(|m| m.to_string()))
                .leaf_opt("ExpYear", token.exp_year.map(|y| y.to_string()))
                .leaf_child("CardPresent", flag(token.card_present))
                .leaf_child("ReaderPresent", flag(token.reader_present));
            block.child(card_data(entry, request_token, None))
        }
        None => block,
    }
}

fn card_data(entry: Element, request_token: bool, encryption: Option<&EncryptionData>) -> Element {
    Element::new("CardData")
        .child(entry)
        .leaf_child("TokenRequest", flag(request_token))
        .child_opt(encryption.map(encryption_data))
}

fn encryption_data(data: &EncryptionData) -> Element {
    Element::new("EncryptionData")
        .leaf_child("Version", &data.version)
        .leaf_opt("EncryptedTrackNumber", data.encrypted_track_number.as_deref())
        .leaf_opt("KTB", data.ktb.as_deref())
        .leaf_opt("KSN", data.ksn.as_deref())
}

fn card_holder(holder: Option<&CardHolder>) -> Option<Element> {
    let holder = holder?;
    let address = holder.address.as_ref();
    let phone = holder
        .phone
        .as_deref()
        .map(|p| p.chars().filter(char::is_ascii_digit).collect::<String>());
    Element::new("CardHolderData")
        .leaf_opt("CardHolderFirstName", holder.first_name.as_deref())
        .leaf_opt("CardHolderLastName", holder.last_name.as_deref())
        .leaf_opt("CardHolderPhone", phone)
        .leaf_opt("CardHolderEmail", holder.email.as_deref())
        .leaf_opt("CardHolderAddr", address.and_then(|a| a.street.as_deref()))
        .leaf_opt("CardHolderCity", address.and_then(|a| a.city.as_deref()))
        .leaf_opt("CardHolderState", address.and_then(|a| a.state.as_deref()))
        .leaf_opt("CardHolderZip", address.and_then(|a| a.zip.as_deref()))
        .non_empty()
}

fn additional_fields(details: Option<&TransactionDetails>) -> Option<Element> {
    let details = details?;
    Element::new("AdditionalTxnFields")
        .leaf_opt("Description", details.memo.as_deref())
        .leaf_opt("InvoiceNbr", details.invoice_number.as_deref())
        .leaf_opt("CustomerID", details.customer_id.as_deref())
        .non_empty()
}

fn direct_market(data: Option<&DirectMarketData>) -> Option<Element> {
    let data = data?;
    Some(
        Element::new("DirectMktData")
            .leaf_child("DirectMktInvoiceNbr", &data.invoice_number)
            .leaf_child("DirectMktShipMonth", data.ship_month.to_string())
            .leaf_child("DirectMktShipDay", data.ship_day.to_string()),
    )
}

fn auto_substantiation(data: Option<&AutoSubstantiation>) -> Option<Element> {
    let data = data?;
    let mut block = Element::new("AutoSubstantiation");
    for (ordinal, line) in AMOUNT_ORDINALS.iter().zip(&data.additional_amounts) {
        block.push(
            Element::new(format!("{ordinal}AdditionalAmtInfo"))
                .leaf_child("AmtType", &line.amount_type)
                .leaf_child("Amt", amount(line.amount)),
        );
    }
    Some(
        block
            .leaf_opt("MerchantVerificationValue", data.merchant_verification_value.as_deref())
            .leaf_child("RealTimeSubstantiation", flag(data.real_time_substantiation)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AuthRequest, CardToken, CreditCard, EntryMethod, ListRequest, TrackData, VoidRequest,
        WalletPayment,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn charge_with(slots: PaymentSlots) -> TransactionRequest {
        let mut request = AuthRequest::new(dec!(10));
        request.payment = slots;
        TransactionRequest::Charge(request)
    }

    #[test]
    fn test_charge_with_manual_card() {
        let fragment = serialize(&charge_with(PaymentSlots {
            card: Some(CreditCard::new("4111111111111111", 12, 2030).with_cvv("123")),
            ..PaymentSlots::default()
        }));
        assert_eq!(fragment.name(), "CreditSale");
        assert_eq!(fragment.text_at(&["Block1", "Amt"]), Some("10.00"));
        assert_eq!(fragment.text_at(&["Block1", "AllowDup"]), Some("N"));
        let entry = ["Block1", "CardData", "ManualEntry"];
        let manual = fragment.find_path(&entry).unwrap();
        assert_eq!(manual.text_at(&["CardNbr"]), Some("4111111111111111"));
        assert_eq!(manual.text_at(&["CVV2"]), Some("123"));
        assert_eq!(manual.text_at(&["CardPresent"]), Some("N"));
        assert_eq!(
            fragment.text_at(&["Block1", "CardData", "TokenRequest"]),
            Some("N")
        );
    }

    #[test]
    fn test_absent_optional_blocks_are_omitted() {
        let fragment = serialize(&charge_with(PaymentSlots {
            token: Some(CardToken::new("supt_abc")),
            ..PaymentSlots::default()
        }));
        let block = fragment.find("Block1").unwrap();
        for name in [
            "CardHolderData",
            "AdditionalTxnFields",
            "DirectMktData",
            "AutoSubstantiation",
            "GratuityAmtInfo",
            "TxnDescriptor",
            "CPCReq",
            "SecureECommerce",
        ] {
            assert!(block.find(name).is_none(), "{name} should be absent");
        }
        assert!(block.children().iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_empty_card_holder_is_omitted() {
        let mut request = AuthRequest::new(dec!(1));
        request.payment.method_key = Some("pmk_1".into());
        request.card_holder = Some(CardHolder::default());
        let fragment = serialize(&TransactionRequest::Authorize(request));
        assert_eq!(fragment.name(), "CreditAuth");
        assert!(fragment.find_path(&["Block1", "CardHolderData"]).is_none());
        assert_eq!(
            fragment.text_at(&["Block1", "PaymentMethodKey"]),
            Some("pmk_1")
        );
    }

    #[test]
    fn test_track_data_carries_method_attribute() {
        let fragment = serialize(&charge_with(PaymentSlots {
            track: Some(TrackData::new("%B4012...?").with_method(EntryMethod::Proximity)),
            ..PaymentSlots::default()
        }));
        let track = fragment
            .find_path(&["Block1", "CardData", "TrackData"])
            .unwrap();
        assert_eq!(track.text(), Some("%B4012...?"));
        assert_eq!(
            track.attributes(),
            &[("method".to_owned(), "proximity".to_owned())]
        );
    }

    #[test]
    fn test_wallet_payment_adds_cryptogram_block() {
        let wallet = WalletPayment::from_payload("4111111111111111", "301231", "Q3J5cHRv")
            .unwrap()
            .with_eci("5");
        let fragment = serialize(&charge_with(PaymentSlots {
            wallet: Some(wallet),
            ..PaymentSlots::default()
        }));
        assert_eq!(
            fragment.text_at(&["Block1", "CardData", "ManualEntry", "ExpYear"]),
            Some("2030")
        );
        let secure = fragment.find_path(&["Block1", "SecureECommerce"]).unwrap();
        assert_eq!(secure.text_at(&["PaymentData"]), Some("Q3J5cHRv"));
        assert_eq!(secure.text_at(&["ECommerceIndicator"]), Some("5"));
    }

    #[test]
    fn test_flags_and_amounts_encoding() {
        let mut request = AuthRequest::new(dec!(5.5));
        request.payment.method_key = Some("pmk".into());
        request.allow_duplicates = true;
        request.allow_partial_auth = true;
        request.gratuity = Some(dec!(1));
        request.auto_substantiation = Some(
            AutoSubstantiation::new()
                .with_amount("TOTAL_HEALTHCARE_AMT", dec!(5.5))
                .with_amount("SUBTOTAL_PRESCRIPTION_AMT", dec!(2)),
        );
        let fragment = serialize(&TransactionRequest::Charge(request));
        let block = fragment.find("Block1").unwrap();
        assert_eq!(block.text_at(&["Amt"]), Some("5.50"));
        assert_eq!(block.text_at(&["GratuityAmtInfo"]), Some("1.00"));
        assert_eq!(block.text_at(&["AllowDup"]), Some("Y"));
        assert_eq!(block.text_at(&["AllowPartialAuth"]), Some("Y"));
        assert_eq!(
            block.text_at(&["AutoSubstantiation", "SecondAdditionalAmtInfo", "Amt"]),
            Some("2.00")
        );
        assert_eq!(
            block.text_at(&["AutoSubstantiation", "RealTimeSubstantiation"]),
            Some("N")
        );
    }

    #[test]
    fn test_void_and_report_fragments() {
        let void = serialize(&TransactionRequest::Void(VoidRequest {
            transaction_id: Some(77),
            client_transaction_id: None,
        }));
        assert_eq!(void.text_at(&["GatewayTxnId"]), Some("77"));

        let list = serialize(&TransactionRequest::List(ListRequest {
            start: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()),
            filter: None,
        }));
        assert_eq!(list.name(), "ReportActivity");
        assert_eq!(
            list.text_at(&["RptStartUtcDT"]),
            Some("2024-01-02T03:04:05.00Z")
        );

        let close = serialize(&TransactionRequest::BatchClose);
        assert_eq!(close.name(), "BatchClose");
        assert!(close.is_empty());
    }
}
