//! End-to-end pipeline tests against a scripted in-memory transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use portico::entities::{
    CardToken, CheckAccount, CheckAction, CreditCard, DebitOperation, TrackData, WalletPayment,
};
use portico::validation::ONE_PAYMENT_METHOD;
use portico::{
    BoxFuture, ErrorCode, GatewayRequest, PorticoClient, PorticoError, ServicesConfig,
    TransactionKind, Transport, TransportError,
};
use portico_proto::Reply;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Reply, TransportError>>>,
    submissions: Mutex<Vec<GatewayRequest>>,
}

impl ScriptedTransport {
    fn with_replies(replies: impl IntoIterator<Item = Result<Reply, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            submissions: Mutex::new(Vec::new()),
        })
    }

    fn submissions(&self) -> Vec<GatewayRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn submit<'a>(
        &'a self,
        request: &'a GatewayRequest,
    ) -> BoxFuture<'a, Result<Reply, TransportError>> {
        Box::pin(async move {
            self.submissions.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("no scripted reply".into())))
        })
    }
}

fn client(transport: &Arc<ScriptedTransport>) -> PorticoClient {
    PorticoClient::new(
        ServicesConfig::with_secret_api_key("skapi_cert_MTA3MjY"),
        transport.clone(),
    )
}

fn reply(header: Value, tag: &str, body: Value) -> Result<Reply, TransportError> {
    Ok(Reply::new(json!({ "Header": header, "Transaction": { tag: body } })))
}

fn header_only(header: Value) -> Result<Reply, TransportError> {
    Ok(Reply::new(json!({ "Header": header })))
}

fn card() -> CreditCard {
    CreditCard::new("4111111111111111", 12, 2030).with_cvv("123")
}

#[tokio::test]
async fn test_charge_round_trip() {
    let transport = ScriptedTransport::with_replies([reply(
        json!({ "GatewayRspCode": "0", "GatewayRspMsg": "Success", "GatewayTxnId": "123" }),
        "CreditSale",
        json!({ "RspCode": "00", "RspText": "APPROVAL", "AuthCode": "ABC123" }),
    )]);
    let client = client(&transport);

    let response = client
        .charge(dec!(10.00))
        .with_currency("usd")
        .with_card(card())
        .execute()
        .await
        .unwrap();

    assert_eq!(response.base.transaction_id, Some(123));
    assert_eq!(response.base.response_code.as_deref(), Some("00"));
    assert_eq!(response.authorization_code.as_deref(), Some("ABC123"));

    let sent = transport.submissions();
    assert_eq!(sent.len(), 1);
    let fragment = &sent[0].transaction;
    assert_eq!(fragment.name(), "CreditSale");
    assert_eq!(fragment.text_at(&["Block1", "Amt"]), Some("10.00"));
    assert_eq!(
        fragment.text_at(&["Block1", "CardData", "ManualEntry", "CardNbr"]),
        Some("4111111111111111")
    );
    assert_eq!(sent[0].header.secret_api_key.as_deref(), Some("skapi_cert_MTA3MjY"));
}

#[tokio::test]
async fn test_payment_method_arity() {
    let transport = ScriptedTransport::with_replies([]);
    let client = client(&transport);

    let none = client.authorize(dec!(5)).execute().await.unwrap_err();
    assert!(matches!(&none, PorticoError::Argument(e) if e.message.contains(ONE_PAYMENT_METHOD)));

    let two = client
        .authorize(dec!(5))
        .with_card(card())
        .with_token(CardToken::new("tok"))
        .execute()
        .await
        .unwrap_err();
    assert_eq!(two.code(), ErrorCode::MultiplePaymentMethods);

    let track_and_key = client
        .verify()
        .with_track(TrackData::new("%B4012002000060016^VI TEST CREDIT^251210118039000000000396?"))
        .with_payment_method_key("pmt_key")
        .execute()
        .await
        .unwrap_err();
    assert_eq!(track_and_key.code(), ErrorCode::MultiplePaymentMethods);

    assert!(transport.submissions().is_empty());
}

#[tokio::test]
async fn test_exactly_one_reference_for_refund_reverse_and_wallet() {
    let transport = ScriptedTransport::with_replies([]);
    let client = client(&transport);

    let refund = client
        .refund(dec!(5))
        .with_card(card())
        .with_transaction_id(1_234)
        .execute()
        .await
        .unwrap_err();
    assert_eq!(refund.code(), ErrorCode::MultiplePaymentMethods);

    let reverse = client
        .reverse_authorization(dec!(5))
        .with_token(CardToken::new("supt_abc"))
        .with_original_client_transaction_id(77)
        .execute()
        .await
        .unwrap_err();
    assert_eq!(reverse.code(), ErrorCode::MultiplePaymentMethods);

    let wallet = WalletPayment::from_payload("4111111111111111", "301231", "Q3J5cHRv").unwrap();
    let wallet_and_card = client
        .charge(dec!(5))
        .with_wallet(wallet)
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(wallet_and_card.code(), ErrorCode::MultiplePaymentMethods);
    assert_eq!(wallet_and_card.message(), ONE_PAYMENT_METHOD);

    assert!(transport.submissions().is_empty());
}

#[tokio::test]
async fn test_negative_amount_is_rejected_before_submit() {
    let transport = ScriptedTransport::with_replies([]);
    let err = client(&transport)
        .charge(dec!(-0.01))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    match err {
        PorticoError::InvalidRequest(e) => {
            assert_eq!(e.code, ErrorCode::InvalidAmount);
            assert_eq!(e.param, "amount");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(transport.submissions().is_empty());
}

#[tokio::test]
async fn test_currency_rules() {
    let transport = ScriptedTransport::with_replies([]);
    let client = client(&transport);

    let eur = client
        .charge(dec!(1))
        .with_currency("eur")
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(eur.code(), ErrorCode::InvalidCurrency);

    let empty = client
        .charge(dec!(1))
        .with_currency("")
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(empty.code(), ErrorCode::MissingCurrency);
}

#[tokio::test]
async fn test_invalid_configuration_fails_before_submit() {
    let transport = ScriptedTransport::with_replies([]);
    let client = PorticoClient::new(ServicesConfig::default(), transport.clone());
    let err = client.charge(dec!(1)).with_card(card()).execute().await.unwrap_err();
    assert!(matches!(err, PorticoError::Authentication(_)));
    assert_eq!(err.code(), ErrorCode::InvalidConfiguration);
    assert!(transport.submissions().is_empty());
}

#[tokio::test]
async fn test_gateway_timeout_is_reversed_once() {
    let transport = ScriptedTransport::with_replies([
        header_only(json!({ "GatewayRspCode": "30", "GatewayRspMsg": "Timeout", "GatewayTxnId": "77" })),
        reply(
            json!({ "GatewayRspCode": "0", "GatewayTxnId": "78" }),
            "CreditReversal",
            json!({ "RspCode": "00", "RspText": "APPROVAL" }),
        ),
    ]);
    let err = client(&transport)
        .charge(dec!(10))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, PorticoError::Gateway(_)));
    assert_eq!(err.code(), ErrorCode::GatewayTimeoutReversalError);

    let sent = transport.submissions();
    assert_eq!(sent.len(), 2);
    let reversal = &sent[1].transaction;
    assert_eq!(reversal.name(), "CreditReversal");
    assert_eq!(reversal.text_at(&["Block1", "Amt"]), Some("10.00"));
    assert_eq!(
        reversal.text_at(&["Block1", "CardData", "ManualEntry", "CardNbr"]),
        Some("4111111111111111")
    );
}

#[tokio::test]
async fn test_gateway_timeout_with_unmatched_reversal_keeps_original_error() {
    let transport = ScriptedTransport::with_replies([
        header_only(json!({ "GatewayRspCode": "30", "GatewayRspMsg": "Timeout" })),
        header_only(json!({ "GatewayRspCode": "3", "GatewayRspMsg": "Transaction not found" })),
    ]);
    let err = client(&transport)
        .authorize(dec!(10))
        .with_token(CardToken::new("tok"))
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::GatewayTimeout);
    assert_eq!(transport.submissions().len(), 2);
}

#[tokio::test]
async fn test_gateway_timeout_with_failed_reversal_wraps_failure() {
    let transport = ScriptedTransport::with_replies([
        header_only(json!({ "GatewayRspCode": "30", "GatewayTxnId": "77" })),
        Err(TransportError::Connection("reset by peer".into())),
    ]);
    let err = client(&transport)
        .charge(dec!(10))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();

    match &err {
        PorticoError::Credit(e) => {
            assert_eq!(e.code, ErrorCode::IssuerTimeoutReversalError);
            let inner = e.inner.as_deref().unwrap();
            assert_eq!(inner.code(), ErrorCode::UnknownGatewayError);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(transport.submissions().len(), 2);
}

#[tokio::test]
async fn test_issuer_timeout_is_reversed_once() {
    let transport = ScriptedTransport::with_replies([
        reply(
            json!({ "GatewayRspCode": "0", "GatewayTxnId": "91" }),
            "CreditAuth",
            json!({ "RspCode": "91", "RspText": "SYSTEM ERROR" }),
        ),
        reply(
            json!({ "GatewayRspCode": "0", "GatewayTxnId": "92" }),
            "CreditReversal",
            json!({ "RspCode": "00" }),
        ),
    ]);
    let err = client(&transport)
        .authorize(dec!(25))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, PorticoError::Credit(_)));
    assert_eq!(err.code(), ErrorCode::IssuerTimeoutReversalError);
    assert_eq!(err.transaction_id(), Some(91));
    assert_eq!(transport.submissions().len(), 2);
}

#[tokio::test]
async fn test_timeout_on_refund_is_not_reversed() {
    let transport = ScriptedTransport::with_replies([header_only(
        json!({ "GatewayRspCode": "30", "GatewayRspMsg": "Timeout" }),
    )]);
    let err = client(&transport)
        .refund(dec!(5))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GatewayTimeout);
    assert_eq!(transport.submissions().len(), 1);
}

#[tokio::test]
async fn test_decline_is_translated_without_reversal() {
    let transport = ScriptedTransport::with_replies([reply(
        json!({ "GatewayRspCode": "0", "GatewayTxnId": "5" }),
        "CreditSale",
        json!({ "RspCode": "05", "RspText": "DECLINE" }),
    )]);
    let err = client(&transport)
        .charge(dec!(5))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardDeclined);
    assert_eq!(err.transaction_id(), Some(5));
    assert_eq!(transport.submissions().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_is_a_gateway_error() {
    let transport = ScriptedTransport::with_replies([Err(TransportError::Http {
        status: 500,
        body: "boom".into(),
    })]);
    let err = client(&transport)
        .verify()
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, PorticoError::Gateway(_)));
    assert_eq!(err.code(), ErrorCode::UnknownGatewayError);
}

#[tokio::test]
async fn test_list_filter_preserves_reply_order() {
    let record = |id: i64, service: &str| {
        json!({ "GatewayTxnId": id.to_string(), "ServiceName": service, "GatewayRspCode": "0", "IssuerRspCode": "00" })
    };
    let transport = ScriptedTransport::with_replies([reply(
        json!({ "GatewayRspCode": "0" }),
        "ReportActivity",
        json!({ "Details": [
            record(1, "CreditAuth"),
            record(2, "CreditSale"),
            record(3, "CreditAuth"),
            record(4, "CreditReturn"),
            record(5, "CreditAuth"),
        ] }),
    )]);
    let now = Utc::now();
    let report = client(&transport)
        .list_transactions()
        .with_start_date(now - Duration::days(1))
        .with_end_date(now - Duration::minutes(1))
        .with_transaction_type(TransactionKind::Authorize)
        .execute()
        .await
        .unwrap();

    let ids: Vec<_> = report.records.iter().filter_map(|r| r.transaction_id).collect();
    assert_eq!(ids, vec![1, 3, 5]);
}

#[tokio::test]
async fn test_list_rejects_future_dates() {
    let transport = ScriptedTransport::with_replies([]);
    let now = Utc::now();
    let err = client(&transport)
        .list_transactions()
        .with_start_date(now - Duration::days(1))
        .with_end_date(now + Duration::days(1))
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDate);
}

#[tokio::test]
async fn test_execute_twice_submits_twice() {
    let ok = || {
        reply(
            json!({ "GatewayRspCode": "0", "GatewayTxnId": "10" }),
            "CreditAccountVerify",
            json!({ "RspCode": "85", "AuthCode": "" }),
        )
    };
    let transport = ScriptedTransport::with_replies([ok(), ok()]);
    let client = client(&transport);
    let builder = client.verify().with_token(CardToken::new("tok"));

    let first = builder.execute().await.unwrap();
    let second = builder.execute().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(transport.submissions().len(), 2);
}

#[tokio::test]
async fn test_multi_use_token_is_returned() {
    let transport = ScriptedTransport::with_replies([reply(
        json!({
            "GatewayRspCode": "0",
            "GatewayTxnId": "11",
            "TokenData": { "TokenRspCode": "0", "TokenRspMsg": "Success", "TokenValue": "supt_abc" }
        }),
        "CreditSale",
        json!({ "RspCode": "00" }),
    )]);
    let response = client(&transport)
        .charge(dec!(1))
        .with_card(card())
        .with_request_multi_use_token(true)
        .execute()
        .await
        .unwrap();

    let token = response.base.token_data.unwrap();
    assert_eq!(token.value.as_deref(), Some("supt_abc"));
    assert_eq!(token.rsp_code.as_deref(), Some("0"));
    assert_eq!(
        transport.submissions()[0].transaction.text_at(&["Block1", "CardData", "TokenRequest"]),
        Some("Y")
    );
}

#[tokio::test]
async fn test_void_without_body_reports_success() {
    let transport = ScriptedTransport::with_replies([header_only(
        json!({ "GatewayRspCode": "0", "GatewayTxnId": "12" }),
    )]);
    let response = client(&transport).void(12).execute().await.unwrap();
    assert_eq!(response.response_code.as_deref(), Some("00"));
    assert_eq!(response.transaction_id, Some(12));
}

#[tokio::test]
async fn test_declined_check_carries_rejections() {
    let transport = ScriptedTransport::with_replies([reply(
        json!({ "GatewayRspCode": "0", "GatewayTxnId": "13" }),
        "CheckSale",
        json!({
            "RspCode": "1",
            "RspMessage": "Transaction declined",
            "CheckRspInfo": [
                { "Type": "Error", "Code": "E01", "Message": "Invalid account" },
                { "Type": "Warning", "Code": "W02", "Message": "Duplicate check" }
            ]
        }),
    )]);
    let err = client(&transport)
        .check(CheckAction::Sale, dec!(20))
        .with_account(CheckAccount::new("490000018", "24413815", "PPD"))
        .execute()
        .await
        .unwrap_err();

    match err {
        PorticoError::Check(e) => {
            assert_eq!(e.code, ErrorCode::CheckRejected);
            assert_eq!(e.transaction_id, Some(13));
            let codes: Vec<_> = e.details.iter().filter_map(|d| d.code.as_deref()).collect();
            assert_eq!(codes, vec!["E01", "W02"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

const DEBIT_TRACK: &str = "%B4012002000060016^VI TEST CREDIT^251210118039000000000396?";
const PIN_BLOCK: &str = "32539F50C245A6A93D123412324000AA";

#[tokio::test]
async fn test_debit_sale_round_trip() {
    let transport = ScriptedTransport::with_replies([reply(
        json!({ "GatewayRspCode": "0", "GatewayTxnId": "501" }),
        "DebitSale",
        json!({ "RspCode": "00", "RspText": "APPROVAL", "AuthCode": "D0001", "AuthAmt": "14.01" }),
    )]);

    let response = client(&transport)
        .debit(DebitOperation::Sale, Some(dec!(14.01)))
        .with_track(TrackData::new(DEBIT_TRACK))
        .with_pin_block(PIN_BLOCK)
        .with_cash_back(dec!(5))
        .execute()
        .await
        .unwrap();

    assert_eq!(response.base.kind, TransactionKind::DebitSale);
    assert_eq!(response.base.transaction_id, Some(501));
    assert_eq!(response.authorization_code.as_deref(), Some("D0001"));
    assert_eq!(response.authorized_amount, Some(dec!(14.01)));

    let sent = transport.submissions();
    let fragment = &sent[0].transaction;
    assert_eq!(fragment.name(), "DebitSale");
    assert_eq!(fragment.text_at(&["Block1", "PinBlock"]), Some(PIN_BLOCK));
    assert_eq!(fragment.text_at(&["Block1", "CashbackAmtInfo"]), Some("5.00"));
}

#[tokio::test]
async fn test_debit_wrong_pin_uses_issuer_table() {
    let transport = ScriptedTransport::with_replies([reply(
        json!({ "GatewayRspCode": "0", "GatewayTxnId": "502" }),
        "DebitSale",
        json!({ "RspCode": "55", "RspText": "INCORRECT PIN" }),
    )]);

    let err = client(&transport)
        .debit(DebitOperation::Sale, Some(dec!(10)))
        .with_token(CardToken::new("supt_debit"))
        .with_pin_block(PIN_BLOCK)
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, PorticoError::Credit(_)));
    assert_eq!(err.code(), ErrorCode::InvalidPin);
    assert_eq!(err.transaction_id(), Some(502));
    assert_eq!(transport.submissions().len(), 1);
}

#[tokio::test]
async fn test_debit_requires_pin_before_submit() {
    let transport = ScriptedTransport::with_replies([]);
    let err = client(&transport)
        .debit(DebitOperation::AddValue, Some(dec!(10)))
        .with_track(TrackData::new(DEBIT_TRACK))
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingArgument);
    assert_eq!(err.message(), "pin_block is required for DebitAddValue");
    assert!(transport.submissions().is_empty());
}
