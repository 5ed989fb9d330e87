//! SOAP envelope writing and reply parsing.
//!
//! Requests are written as text with every value escaped. Replies are read
//! with a streaming `quick-xml` reader into a JSON tree shaped the way
//! [`Reply`] expects:
//!
//! - elements with children become objects keyed by local name
//! - leaf and empty elements become strings
//! - repeated siblings become arrays in document order
//! - attributes and namespace prefixes are dropped

use portico::{GatewayRequest, RequestHeader, TransportError};
use portico_proto::{Element, Reply};
use quick_xml::Reader;
use quick_xml::escape::{escape, resolve_predefined_entity};
use quick_xml::events::Event;
use serde_json::{Map, Value};

/// Namespace of the gateway's request and reply elements.
pub const GATEWAY_NAMESPACE: &str = "http://Hps.Exchange.PosGateway";

const SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Path from the envelope root to the versioned reply object.
const REPLY_PATH: [&str; 3] = ["Body", "PosResponse", "Ver1.0"];

/// Writes the full SOAP envelope for a request.
#[must_use]
pub fn write_envelope(request: &GatewayRequest) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    out.push_str(&format!(
        r#"<soap:Envelope xmlns:soap="{SOAP_NAMESPACE}"><soap:Body><PosRequest xmlns="{GATEWAY_NAMESPACE}"><Ver1.0>"#
    ));
    write_header(&mut out, &request.header);
    out.push_str("<Transaction>");
    write_element(&mut out, &request.transaction);
    out.push_str("</Transaction></Ver1.0></PosRequest></soap:Body></soap:Envelope>");
    out
}

fn write_header(out: &mut String, header: &RequestHeader) {
    out.push_str("<Header>");
    if let Some(key) = &header.secret_api_key {
        write_leaf(out, "SecretAPIKey", key);
    } else {
        let tuple = [
            ("SiteId", &header.site_id),
            ("DeviceId", &header.device_id),
            ("LicenseId", &header.license_id),
            ("UserName", &header.user_name),
            ("Password", &header.password),
        ];
        for (name, value) in tuple {
            if let Some(value) = value {
                write_leaf(out, name, value);
            }
        }
    }
    let trailing = [
        ("DeveloperID", &header.developer_id),
        ("VersionNbr", &header.version_number),
        ("SiteTrace", &header.site_trace),
    ];
    for (name, value) in trailing {
        if let Some(value) = value {
            write_leaf(out, name, value);
        }
    }
    if let Some(id) = header.client_txn_id {
        write_leaf(out, "ClientTxnId", &id.to_string());
    }
    out.push_str("</Header>");
}

fn write_leaf(out: &mut String, name: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&escape(text));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_element(out: &mut String, element: &Element) {
    let name = element.name();
    out.push('<');
    out.push_str(name);
    for (key, value) in element.attributes() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if let Some(text) = element.text() {
        out.push('>');
        out.push_str(&escape(text));
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    } else if element.children().is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        for child in element.children() {
            write_element(out, child);
        }
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}

/// Parses a SOAP reply envelope into a [`Reply`].
///
/// # Errors
///
/// Returns [`TransportError::MalformedReply`] when the text is not well-formed
/// XML, carries a SOAP fault, or lacks the `PosResponse/Ver1.0` element.
pub fn parse_reply(text: &str) -> Result<Reply, TransportError> {
    let (root, tree) = parse_tree(text)?;
    if root != "Envelope" {
        return Err(malformed(format!("unexpected root element {root}")));
    }
    if let Some(fault) = tree.get("Body").and_then(|body| body.get("Fault")) {
        let reason = fault
            .get("faultstring")
            .and_then(Value::as_str)
            .unwrap_or("SOAP fault");
        return Err(malformed(reason.to_owned()));
    }
    REPLY_PATH
        .iter()
        .try_fold(&tree, |node, key| node.get(key))
        .filter(|v| v.is_object())
        .cloned()
        .map(Reply::new)
        .ok_or_else(|| malformed("reply is missing PosResponse/Ver1.0".to_owned()))
}

fn malformed(reason: String) -> TransportError {
    TransportError::MalformedReply(reason)
}

/// Reads the document into `(root name, root value)`.
fn parse_tree(text: &str) -> Result<(String, Value), TransportError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<(String, Map<String, Value>)> = Vec::new();
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push((name, Map::new()));
                current_text.clear();
            }
            Ok(Event::End(_)) => {
                let Some((name, obj)) = stack.pop() else {
                    return Err(malformed("unbalanced end tag".to_owned()));
                };
                let value = if obj.is_empty() {
                    Value::String(current_text.trim().to_owned())
                } else {
                    Value::Object(obj)
                };
                current_text.clear();
                match stack.last_mut() {
                    Some((_, parent)) => add_to_parent(parent, &name, value),
                    None => return Ok((name, value)),
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match stack.last_mut() {
                    Some((_, parent)) => add_to_parent(parent, &name, Value::String(String::new())),
                    None => return Ok((name, Value::String(String::new()))),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .xml_content()
                    .map_err(|e| malformed(format!("XML decode error: {e}")))?;
                current_text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                current_text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    current_text.push(ch);
                } else {
                    let name = e
                        .decode()
                        .map_err(|e| malformed(format!("XML decode error: {e}")))?;
                    let resolved = resolve_predefined_entity(&name)
                        .ok_or_else(|| malformed(format!("unknown entity &{name};")))?;
                    current_text.push_str(resolved);
                }
            }
            Ok(Event::Eof) => return Err(malformed("unexpected end of document".to_owned())),
            Ok(_) => {}
            Err(e) => return Err(malformed(format!("XML parse error: {e}"))),
        }
    }
}

fn add_to_parent(parent: &mut Map<String, Value>, name: &str, value: Value) {
    match parent.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name.to_owned(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use portico_proto::Fields;

    use super::*;

    fn envelope(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="{SOAP_NAMESPACE}"><soap:Body><PosResponse rootUrl="https://example" xmlns="{GATEWAY_NAMESPACE}"><Ver1.0>{inner}</Ver1.0></PosResponse></soap:Body></soap:Envelope>"#
        )
    }

    #[test]
    fn test_envelope_uses_secret_key_and_escapes_text() {
        let request = GatewayRequest {
            header: RequestHeader {
                secret_api_key: Some("skapi_cert_key".into()),
                site_id: Some("12345".into()),
                developer_id: Some("002914".into()),
                client_txn_id: Some(42),
                ..RequestHeader::default()
            },
            transaction: Element::new("CreditSale").child(
                Element::new("Block1")
                    .leaf_child("Amt", "10.00")
                    .leaf_child("Memo", "Fish & <Chips>")
                    .child(Element::new("Empty")),
            ),
        };
        let xml = write_envelope(&request);
        assert!(xml.contains("<SecretAPIKey>skapi_cert_key</SecretAPIKey>"));
        assert!(!xml.contains("<SiteId>"));
        assert!(xml.contains("<DeveloperID>002914</DeveloperID>"));
        assert!(xml.contains("<ClientTxnId>42</ClientTxnId>"));
        assert!(xml.contains("<Memo>Fish &amp; &lt;Chips&gt;</Memo>"));
        assert!(xml.contains("<Empty/>"));
        assert!(xml.contains(
            "<Transaction><CreditSale><Block1><Amt>10.00</Amt>"
        ));
    }

    #[test]
    fn test_envelope_writes_credential_tuple_and_attributes() {
        let request = GatewayRequest {
            header: RequestHeader {
                site_id: Some("1".into()),
                device_id: Some("2".into()),
                license_id: Some("3".into()),
                user_name: Some("user".into()),
                password: Some("p\"w".into()),
                ..RequestHeader::default()
            },
            transaction: Element::new("ReportActivity")
                .attribute("kind", "a<b")
                .leaf_child("RptStartUtcDT", "2026-01-01T00:00:00Z"),
        };
        let xml = write_envelope(&request);
        assert!(xml.contains(
            "<Header><SiteId>1</SiteId><DeviceId>2</DeviceId><LicenseId>3</LicenseId><UserName>user</UserName><Password>p&quot;w</Password></Header>"
        ));
        assert!(xml.contains(r#"<ReportActivity kind="a&lt;b">"#));
    }

    #[test]
    fn test_envelope_is_written_in_full() {
        let request = GatewayRequest {
            header: RequestHeader {
                secret_api_key: Some("k".into()),
                ..RequestHeader::default()
            },
            transaction: Element::new("DebitSale").child(
                Element::new("Block1")
                    .child(Element::leaf("TrackData", "%B4&1?").attribute("method", "swipe")),
            ),
        };
        assert_eq!(
            write_envelope(&request),
            format!(
                r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="{SOAP_NAMESPACE}"><soap:Body><PosRequest xmlns="{GATEWAY_NAMESPACE}"><Ver1.0><Header><SecretAPIKey>k</SecretAPIKey></Header><Transaction><DebitSale><Block1><TrackData method="swipe">%B4&amp;1?</TrackData></Block1></DebitSale></Transaction></Ver1.0></PosRequest></soap:Body></soap:Envelope>"#
            )
        );
    }

    #[test]
    fn test_parse_reply_reads_header_and_body() {
        let xml = envelope(
            "<Header><LicenseId>1</LicenseId><GatewayTxnId>123</GatewayTxnId>\
             <GatewayRspCode>0</GatewayRspCode><GatewayRspMsg>Success</GatewayRspMsg>\
             <TokenData><TokenRspCode>0</TokenRspCode><TokenValue>supt_x</TokenValue></TokenData></Header>\
             <Transaction><CreditSale><RspCode>00</RspCode><RspText>APPROVAL</RspText>\
             <AuthCode>ABC123</AuthCode></CreditSale></Transaction>",
        );
        let reply = parse_reply(&xml).unwrap();
        let header = reply.header().unwrap();
        assert!(header.is_success());
        assert_eq!(header.gateway_txn_id, Some(123));
        assert_eq!(
            header.token.unwrap().value.as_deref(),
            Some("supt_x")
        );
        let body = reply.body("CreditSale").unwrap();
        assert_eq!(body.string("RspCode").as_deref(), Some("00"));
        assert_eq!(body.string("AuthCode").as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_parse_reply_collects_repeated_siblings() {
        let xml = envelope(
            "<Header><GatewayRspCode>0</GatewayRspCode></Header>\
             <Transaction><ReportActivity>\
             <Details><GatewayTxnId>1</GatewayTxnId></Details>\
             <Details><GatewayTxnId>2</GatewayTxnId></Details>\
             <Details><GatewayTxnId>3</GatewayTxnId></Details>\
             </ReportActivity></Transaction>",
        );
        let reply = parse_reply(&xml).unwrap();
        let ids: Vec<_> = reply
            .body("ReportActivity")
            .unwrap()
            .list("Details")
            .iter()
            .map(|d| d.int("GatewayTxnId").unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_reply_resolves_entities_and_empty_bodies() {
        let xml = envelope(
            "<Header><GatewayRspCode>0</GatewayRspCode>\
             <GatewayRspMsg>A &amp; B &#65;</GatewayRspMsg></Header>\
             <Transaction><CreditVoid/></Transaction>",
        );
        let reply = parse_reply(&xml).unwrap();
        let header = reply.header().unwrap();
        assert_eq!(header.gateway_rsp_msg.as_deref(), Some("A & B A"));
        assert!(reply.body("CreditVoid").is_none());
        let transaction = Fields::new(reply.as_value()).nested("Transaction").unwrap();
        assert_eq!(transaction.value()["CreditVoid"], Value::String(String::new()));
    }

    #[test]
    fn test_parse_reply_rejects_fault_and_garbage() {
        let fault = format!(
            r#"<soap:Envelope xmlns:soap="{SOAP_NAMESPACE}"><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>Server was unable to process request.</faultstring></soap:Fault></soap:Body></soap:Envelope>"#
        );
        let err = parse_reply(&fault).unwrap_err();
        assert!(
            matches!(&err, TransportError::MalformedReply(m) if m.contains("unable to process"))
        );

        assert!(matches!(
            parse_reply("<html><body>gateway</body></html>"),
            Err(TransportError::MalformedReply(_))
        ));
        assert!(matches!(
            parse_reply("<soap:Envelope"),
            Err(TransportError::MalformedReply(_))
        ));
    }
}
