//! Client pipeline over the HTTP transport against a mock gateway.

use std::sync::Arc;

use portico::entities::CreditCard;
use portico::{ErrorCode, PorticoClient, PorticoError, ServicesConfig};
use portico_http::HttpTransport;
use rust_decimal_macros::dec;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE_PATH: &str = "/Hps.Exchange.PosGateway/PosGatewayService.asmx";

fn envelope(inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body>\
         <PosResponse rootUrl=\"https://cert.api2.heartlandportico.com/Hps.Exchange.PosGateway\" xmlns=\"http://Hps.Exchange.PosGateway\">\
         <Ver1.0>{inner}</Ver1.0></PosResponse></soap:Body></soap:Envelope>"
    )
}

fn client(server: &MockServer) -> PorticoClient {
    let url = Url::parse(&format!("{}{SERVICE_PATH}", server.uri())).unwrap();
    let config = ServicesConfig::with_secret_api_key("skapi_cert_MTA3MjY").with_service_url(url);
    let transport = HttpTransport::try_new(&config).unwrap();
    PorticoClient::new(config, Arc::new(transport))
}

fn card() -> CreditCard {
    CreditCard::new("4111111111111111", 12, 2030).with_cvv("123")
}

#[tokio::test]
async fn test_charge_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(body_string_contains("<CreditSale>"))
        .and(body_string_contains("<Amt>10.00</Amt>"))
        .and(body_string_contains("<CardNbr>4111111111111111</CardNbr>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<Header><LicenseId>1</LicenseId><SiteId>2</SiteId><DeviceId>3</DeviceId>\
             <GatewayTxnId>1034567890</GatewayTxnId><GatewayRspCode>0</GatewayRspCode>\
             <GatewayRspMsg>Success</GatewayRspMsg><RspDT>2026-10-19T12:00:00.123</RspDT></Header>\
             <Transaction><CreditSale><RspCode>00</RspCode><RspText>APPROVAL</RspText>\
             <AuthCode>ABC123</AuthCode><AVSRsltCode>Y</AVSRsltCode><CVVRsltCode>M</CVVRsltCode>\
             <CardType>Visa</CardType></CreditSale></Transaction>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .charge(dec!(10))
        .with_card(card())
        .execute()
        .await
        .unwrap();

    assert_eq!(response.base.transaction_id, Some(1_034_567_890));
    assert_eq!(response.base.response_code.as_deref(), Some("00"));
    assert_eq!(response.authorization_code.as_deref(), Some("ABC123"));
}

#[tokio::test]
async fn test_decline_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<Header><GatewayTxnId>9</GatewayTxnId><GatewayRspCode>0</GatewayRspCode></Header>\
             <Transaction><CreditSale><RspCode>05</RspCode><RspText>DECLINE</RspText></CreditSale></Transaction>",
        )))
        .mount(&server)
        .await;

    let err = client(&server)
        .charge(dec!(10))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, PorticoError::Credit(_)));
    assert_eq!(err.code(), ErrorCode::CardDeclined);
}

#[tokio::test]
async fn test_gateway_timeout_reverses_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("<CreditSale>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<Header><GatewayTxnId>77</GatewayTxnId><GatewayRspCode>30</GatewayRspCode>\
             <GatewayRspMsg>Timeout</GatewayRspMsg></Header>",
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("<CreditReversal>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            "<Header><GatewayTxnId>78</GatewayTxnId><GatewayRspCode>0</GatewayRspCode></Header>\
             <Transaction><CreditReversal><RspCode>00</RspCode></CreditReversal></Transaction>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .charge(dec!(10))
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, PorticoError::Gateway(_)));
    assert_eq!(err.code(), ErrorCode::GatewayTimeoutReversalError);
}

#[tokio::test]
async fn test_http_failure_is_an_unknown_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .verify()
        .with_card(card())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownGatewayError);
    assert!(err.to_string().contains("500"));
}
