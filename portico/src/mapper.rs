//! Response mapper.
//!
//! Turns a raw reply into the [`TransactionResponse`] shape for its kind.
//! Header fields always populate [`TransactionBase`]; body fields are read by
//! presence only. Mapping is a pure function of its inputs, so mapping the
//! same reply twice yields equal values.

use portico_proto::{Fields, GATEWAY_SUCCESS, Reply, ReplyHeader};

use crate::codes::{CHECK_ACCEPTED, CHECK_REJECTED, translate_gateway, translate_gift, translate_issuer};
use crate::entities::{
    ActivityReport, AuthorizationResponse, BatchResponse, CheckResponse, DebitResponse, EbtResponse,
    GiftAliasResponse,
    GiftCard, GiftCardResponse, ReversalResponse, TokenData, TransactionBase, TransactionDetail,
    TransactionDetails, TransactionResponse, TransactionSummary,
};
use crate::entities::response::MULTI_USE_TOKEN;
use crate::error::{CheckError, CheckRejection, ErrorCode, ExceptionRecord, GatewayError, PorticoError};
use crate::kind::{Family, TransactionKind};

/// Response code reported for kinds whose reply has no body.
pub const BODYLESS_SUCCESS: &str = "00";

/// Kinds whose accepted reply carries only a header.
#[must_use]
pub const fn is_bodyless(kind: TransactionKind) -> bool {
    matches!(
        kind,
        TransactionKind::Capture
            | TransactionKind::Refund
            | TransactionKind::Void
            | TransactionKind::Edit
            | TransactionKind::CpcEdit
    )
}

/// Wraps a header decoding failure.
pub(crate) fn unexpected(err: &portico_proto::ProtocolError) -> PorticoError {
    GatewayError::new(
        ErrorCode::UnexpectedGatewayResponse,
        format!("Unexpected gateway response: {err}."),
    )
    .into()
}

/// Maps a reply for `kind`.
///
/// `filter` applies to activity reports only: records whose service name
/// differs from the filter kind's tag are dropped, preserving reply order.
/// Kinds sharing a tag match each other's records.
///
/// # Errors
///
/// Returns [`ErrorCode::UnexpectedGatewayResponse`] when the reply has no
/// usable header.
pub fn map_response(
    kind: TransactionKind,
    reply: &Reply,
    filter: Option<TransactionKind>,
) -> Result<TransactionResponse, PorticoError> {
    let header = reply.header().map_err(|e| unexpected(&e))?;
    let body = reply.body(kind.tag());
    let base = base(kind, &header, body);

    let response = match kind {
        TransactionKind::Authorize | TransactionKind::Charge | TransactionKind::Verify => {
            TransactionResponse::Authorization(authorization(base, body))
        }
        TransactionKind::Capture
        | TransactionKind::Refund
        | TransactionKind::Void
        | TransactionKind::Edit
        | TransactionKind::CpcEdit => TransactionResponse::Basic(base),
        TransactionKind::Reverse => TransactionResponse::Reversal(reversal(base, body)),
        TransactionKind::BatchClose => TransactionResponse::Batch(batch(base, body)),
        TransactionKind::Get => TransactionResponse::Detail(Box::new(detail(base, body))),
        TransactionKind::List => TransactionResponse::Activity(activity(base, body, filter)),
        TransactionKind::GiftAlias => TransactionResponse::GiftAlias(gift_alias(base, body)),
        TransactionKind::GiftActivate
        | TransactionKind::GiftAddValue
        | TransactionKind::GiftBalance
        | TransactionKind::GiftDeactivate
        | TransactionKind::GiftReplace
        | TransactionKind::GiftReward
        | TransactionKind::GiftSale
        | TransactionKind::GiftVoid
        | TransactionKind::GiftReversal => TransactionResponse::GiftCard(gift(base, body)),
        TransactionKind::CheckSale
        | TransactionKind::CheckReturn
        | TransactionKind::CheckOverride
        | TransactionKind::CheckVoid => TransactionResponse::Check(check(base, body)),
        TransactionKind::EbtPurchase
        | TransactionKind::EbtRefund
        | TransactionKind::EbtCashBack
        | TransactionKind::EbtCashBenefitWithdrawal
        | TransactionKind::EbtBalance
        | TransactionKind::EbtVoucherPurchase => TransactionResponse::Ebt(ebt(base, body)),
        TransactionKind::DebitSale
        | TransactionKind::DebitReturn
        | TransactionKind::DebitReversal
        | TransactionKind::DebitAddValue
        | TransactionKind::DebitBalance => TransactionResponse::Debit(debit(base, body)),
    };
    Ok(response)
}

fn base(kind: TransactionKind, header: &ReplyHeader, body: Option<Fields<'_>>) -> TransactionBase {
    let field = |key: &str| body.and_then(|b| b.string(key));
    let response_code = if is_bodyless(kind) {
        Some(BODYLESS_SUCCESS.to_owned())
    } else {
        field("RspCode")
    };
    TransactionBase {
        kind,
        transaction_id: header.gateway_txn_id,
        client_transaction_id: header.client_txn_id,
        gateway_response_code: header.gateway_rsp_code.clone(),
        gateway_response_message: header.gateway_rsp_msg.clone(),
        response_code,
        response_text: field("RspText").or_else(|| field("RspMessage")),
        reference_number: field("RefNbr"),
        response_date: header.response_dt,
        token_data: header.token.as_ref().map(|t| TokenData {
            value: t.value.clone(),
            token_type: MULTI_USE_TOKEN.to_owned(),
            rsp_code: t.rsp_code.clone(),
            rsp_msg: t.rsp_msg.clone(),
        }),
    }
}

fn authorization(base: TransactionBase, body: Option<Fields<'_>>) -> AuthorizationResponse {
    let s = |key: &str| body.and_then(|b| b.string(key));
    AuthorizationResponse {
        base,
        authorization_code: s("AuthCode"),
        avs_result_code: s("AVSRsltCode"),
        avs_result_text: s("AVSRsltText"),
        cvv_result_code: s("CVVRsltCode"),
        cvv_result_text: s("CVVRsltText"),
        cpc_indicator: s("CPCInd"),
        authorized_amount: body.and_then(|b| b.decimal("AuthAmt")),
        card_type: s("CardType"),
        descriptor: s("TxnDescriptor"),
    }
}

fn reversal(base: TransactionBase, body: Option<Fields<'_>>) -> ReversalResponse {
    let s = |key: &str| body.and_then(|b| b.string(key));
    ReversalResponse {
        base,
        avs_result_code: s("AVSRsltCode"),
        avs_result_text: s("AVSRsltText"),
        cvv_result_code: s("CVVRsltCode"),
        cvv_result_text: s("CVVRsltText"),
        cpc_indicator: s("CPCInd"),
    }
}

fn batch(base: TransactionBase, body: Option<Fields<'_>>) -> BatchResponse {
    BatchResponse {
        base,
        batch_id: body.and_then(|b| b.int("BatchId")),
        transaction_count: body.and_then(|b| b.int("TxnCnt")),
        total_amount: body.and_then(|b| b.decimal("TotalAmt")),
        sequence_number: body.and_then(|b| b.int("BatchSeqNbr")),
    }
}

/// Failure of a reported past transaction, as a record instead of an error.
fn past_failure(
    family: Family,
    gateway: (Option<String>, Option<String>),
    issuer: (Option<String>, Option<String>),
    transaction_id: Option<i64>,
) -> Option<ExceptionRecord> {
    let (gateway_code, gateway_msg) = gateway;
    if let Some(code) = gateway_code.filter(|c| c != GATEWAY_SUCCESS) {
        return translate_gateway(&code, gateway_msg.as_deref())
            .map(|e| PorticoError::from(e).record());
    }
    let (issuer_code, issuer_text) = issuer;
    let code = issuer_code?;
    let err: PorticoError = match family {
        Family::Gift => translate_gift(&code, issuer_text.as_deref(), transaction_id)?.into(),
        Family::Check if code != CHECK_ACCEPTED => {
            CheckError::new(ErrorCode::CheckRejected, issuer_text.unwrap_or_else(|| CHECK_REJECTED.to_owned()))
                .with_transaction_id(transaction_id)
                .with_response_code(code)
                .into()
        }
        Family::Check | Family::Report => return None,
        Family::Credit | Family::Ebt | Family::Debit => {
            translate_issuer(&code, issuer_text.as_deref(), transaction_id)?.into()
        }
    };
    Some(err.record())
}

fn detail(mut base: TransactionBase, body: Option<Fields<'_>>) -> TransactionDetail {
    let s = |key: &str| body.and_then(|b| b.string(key));
    let data = body.and_then(|b| b.nested("Data")).or(body);
    let d = |key: &str| data.and_then(|b| b.string(key));
    let amount = |key: &str| data.and_then(|b| b.decimal(key));

    if let Some(id) = body.and_then(|b| b.int("GatewayTxnId")) {
        base.transaction_id = Some(id);
    }
    if let Some(id) = body.and_then(|b| b.int("ClientTxnId")) {
        base.client_transaction_id = Some(id);
    }
    let service_name = s("ServiceName");
    let reported_kind = service_name.as_deref().and_then(TransactionKind::from_service_name);
    let issuer_code = d("RspCode");
    let issuer_text = d("RspText");
    let exception = past_failure(
        reported_kind.map_or(Family::Credit, |k| k.family()),
        (s("GatewayRspCode"), s("GatewayRspMsg")),
        (issuer_code.clone(), issuer_text.clone()),
        base.transaction_id,
    );
    let details = data
        .and_then(|b| b.nested("AdditionalTxnFields"))
        .map(|f| TransactionDetails {
            memo: f.string("Description"),
            invoice_number: f.string("InvoiceNbr"),
            customer_id: f.string("CustomerID"),
        });

    TransactionDetail {
        original_transaction_id: body.and_then(|b| b.int("OriginalGatewayTxnId")),
        service_name,
        reported_kind,
        masked_card_number: d("MaskedCardNbr"),
        transaction_date: body.and_then(|b| b.timestamp("ReqUtcDT")),
        authorized_amount: amount("AuthAmt"),
        settlement_amount: amount("SettlementAmt"),
        gratuity_amount: amount("GratuityAmtInfo"),
        authorization_code: d("AuthCode"),
        avs_result_code: d("AVSRsltCode"),
        cvv_result_code: d("CVVRsltCode"),
        cpc_indicator: d("CPCInd"),
        issuer_response_code: issuer_code,
        issuer_response_text: issuer_text,
        details,
        exception,
        base,
    }
}

fn summary(record: Fields<'_>) -> TransactionSummary {
    let s = |key: &str| record.string(key);
    let transaction_id = record.int("GatewayTxnId");
    let service_name = s("ServiceName");
    let kind = service_name.as_deref().and_then(TransactionKind::from_service_name);
    let gateway_response_code = s("GatewayRspCode");
    let gateway_response_message = s("GatewayRspMsg");
    let issuer_response_code = s("IssuerRspCode");
    let issuer_response_text = s("IssuerRspText");
    let exception = past_failure(
        kind.map_or(Family::Credit, |k| k.family()),
        (gateway_response_code.clone(), gateway_response_message.clone()),
        (issuer_response_code.clone(), issuer_response_text.clone()),
        transaction_id,
    );
    TransactionSummary {
        transaction_id,
        original_transaction_id: record.int("OriginalGatewayTxnId"),
        client_transaction_id: record.int("ClientTxnId"),
        service_name,
        kind,
        masked_card_number: s("MaskedCardNbr"),
        transaction_date: record.timestamp("TxnUtcDT"),
        amount: record.decimal("Amt"),
        settlement_amount: record.decimal("SettlementAmt"),
        authorization_code: s("AuthCode"),
        gateway_response_code,
        gateway_response_message,
        issuer_response_code,
        issuer_response_text,
        status: s("TxnStatus"),
        exception,
    }
}

fn activity(
    base: TransactionBase,
    body: Option<Fields<'_>>,
    filter: Option<TransactionKind>,
) -> ActivityReport {
    let records = body
        .map(|b| b.list("Details"))
        .unwrap_or_default()
        .into_iter()
        .map(summary)
        .filter(|record| {
            filter.is_none_or(|wanted| record.kind.is_some_and(|k| k.tag() == wanted.tag()))
        })
        .collect();
    ActivityReport { base, records }
}

fn gift(base: TransactionBase, body: Option<Fields<'_>>) -> GiftCardResponse {
    let s = |key: &str| body.and_then(|b| b.string(key));
    let amount = |key: &str| body.and_then(|b| b.decimal(key));
    GiftCardResponse {
        base,
        authorization_code: s("AuthCode"),
        balance_amount: amount("BalanceAmt"),
        points_balance_amount: amount("PointsBalanceAmt"),
        rewards: s("Rewards"),
        notes: s("Notes"),
        split_tender_card_amount: amount("SplitTenderCardAmt"),
        split_tender_balance_due: amount("SplitTenderBalanceDueAmt"),
    }
}

fn gift_alias(base: TransactionBase, body: Option<Fields<'_>>) -> GiftAliasResponse {
    let card = body.and_then(|b| b.nested("CardData")).map(|c| GiftCard {
        number: c.string("CardNbr"),
        pin: c.string("PIN"),
        ..GiftCard::default()
    });
    GiftAliasResponse { base, card }
}

/// Reads `CheckRspInfo` entries in reply order.
pub(crate) fn check_rejections(body: Fields<'_>) -> Vec<CheckRejection> {
    body.list("CheckRspInfo")
        .into_iter()
        .map(|info| CheckRejection {
            category: info.string("Type"),
            code: info.string("Code"),
            message: info.string("Message"),
            field_number: info.string("FieldNumber"),
            field_name: info.string("FieldName"),
        })
        .collect()
}

fn check(base: TransactionBase, body: Option<Fields<'_>>) -> CheckResponse {
    CheckResponse {
        base,
        authorization_code: body.and_then(|b| b.string("AuthCode")),
        details: body.map(check_rejections).unwrap_or_default(),
    }
}

fn ebt(base: TransactionBase, body: Option<Fields<'_>>) -> EbtResponse {
    EbtResponse {
        base,
        authorization_code: body.and_then(|b| b.string("AuthCode")),
        balance_amount: body.and_then(|b| b.decimal("BalanceAmt")),
    }
}

fn debit(base: TransactionBase, body: Option<Fields<'_>>) -> DebitResponse {
    DebitResponse {
        base,
        authorization_code: body.and_then(|b| b.string("AuthCode")),
        authorized_amount: body.and_then(|b| b.decimal("AuthAmt")),
        available_balance: body.and_then(|b| b.decimal("AvailableBalance")),
    }
}
