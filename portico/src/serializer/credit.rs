use portico_proto::Element;
use portico_proto::encoding::{amount, flag};

use super::{
    additional_fields, amount_opt, auto_substantiation, card_holder, direct_market, id_opt, payment,
};
use crate::entities::{
    AuthRequest, CaptureRequest, CpcEditRequest, EditRequest, RefundRequest, ReverseRequest,
    VerifyRequest,
};

pub(super) fn auth(tag: &str, r: &AuthRequest) -> Element {
    let block = Element::new("Block1")
        .leaf_child("Amt", amount(r.amount))
        .leaf_opt("GratuityAmtInfo", amount_opt(r.gratuity))
        .leaf_opt("ConvenienceAmtInfo", amount_opt(r.convenience_amount))
        .leaf_opt("ShippingAmtInfo", amount_opt(r.shipping_amount))
        .leaf_child("AllowDup", flag(r.allow_duplicates))
        .leaf_child("AllowPartialAuth", flag(r.allow_partial_auth))
        .leaf_opt("CPCReq", r.cpc_request.then_some(flag(true)));
    let block = payment(block, &r.payment, r.request_token)
        .child_opt(card_holder(r.card_holder.as_ref()))
        .child_opt(additional_fields(r.details.as_ref()))
        .child_opt(direct_market(r.direct_market.as_ref()))
        .child_opt(auto_substantiation(r.auto_substantiation.as_ref()))
        .leaf_opt("TxnDescriptor", r.descriptor.as_deref());
    Element::new(tag).child(block)
}

pub(super) fn verify(tag: &str, r: &VerifyRequest) -> Element {
    let block = payment(Element::new("Block1"), &r.payment, r.request_token)
        .child_opt(card_holder(r.card_holder.as_ref()));
    Element::new(tag).child(block)
}

pub(super) fn capture(tag: &str, r: &CaptureRequest) -> Element {
    Element::new(tag)
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id))
        .leaf_opt("Amt", amount_opt(r.amount))
        .leaf_opt("GratuityAmtInfo", amount_opt(r.gratuity))
        .child_opt(direct_market(r.direct_market.as_ref()))
}

pub(super) fn refund(tag: &str, r: &RefundRequest) -> Element {
    let block = Element::new("Block1")
        .leaf_child("Amt", amount(r.amount))
        .leaf_child("AllowDup", flag(r.allow_duplicates))
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id));
    let block = payment(block, &r.payment, false)
        .child_opt(card_holder(r.card_holder.as_ref()))
        .child_opt(additional_fields(r.details.as_ref()))
        .child_opt(direct_market(r.direct_market.as_ref()));
    Element::new(tag).child(block)
}

pub(super) fn reverse(tag: &str, r: &ReverseRequest) -> Element {
    let block = Element::new("Block1")
        .leaf_child("Amt", amount(r.amount))
        .leaf_opt("AuthAmt", amount_opt(r.auth_amount))
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id))
        .leaf_opt("ClientTxnId", id_opt(r.original_client_transaction_id));
    let block = payment(block, &r.payment, false).child_opt(additional_fields(r.details.as_ref()));
    Element::new(tag).child(block)
}

pub(super) fn edit(tag: &str, r: &EditRequest) -> Element {
    Element::new(tag)
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id))
        .leaf_opt("Amt", amount_opt(r.amount))
        .leaf_opt("GratuityAmtInfo", amount_opt(r.gratuity))
}

pub(super) fn cpc_edit(tag: &str, r: &CpcEditRequest) -> Element {
    let cpc = r.cpc.as_ref().map(|cpc| {
        Element::new("CPCData")
            .leaf_opt("CardHolderPONbr", cpc.po_number.as_deref())
            .leaf_child("TaxType", cpc.tax_type.as_str())
            .leaf_opt("TaxAmt", amount_opt(cpc.tax_amount))
    });
    Element::new(tag)
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id))
        .child_opt(cpc)
}
