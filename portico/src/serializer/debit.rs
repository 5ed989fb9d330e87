use portico_proto::Element;
use portico_proto::encoding::flag;

use super::{additional_fields, amount_opt, card_holder, id_opt, payment};
use crate::entities::{DebitOperation, DebitRequest};

pub(super) fn debit(tag: &str, r: &DebitRequest) -> Element {
    let original = matches!(r.operation, DebitOperation::Return | DebitOperation::Reversal);
    let mut block = Element::new("Block1")
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id.filter(|_| original)))
        .leaf_opt("Amt", amount_opt(r.amount));
    block = match r.operation {
        DebitOperation::Sale => block
            .leaf_opt("CashbackAmtInfo", amount_opt(r.cash_back))
            .leaf_child("AllowDup", flag(r.allow_duplicates))
            .leaf_child("AllowPartialAuth", flag(r.allow_partial_auth)),
        DebitOperation::Reversal => block.leaf_opt("AuthAmt", amount_opt(r.auth_amount)),
        DebitOperation::Return | DebitOperation::AddValue => {
            block.leaf_child("AllowDup", flag(r.allow_duplicates))
        }
        DebitOperation::Balance => block,
    };
    block = payment(block, &r.payment, r.request_token)
        .leaf_opt("PinBlock", r.pin_block.as_deref())
        .child_opt(card_holder(r.card_holder.as_ref()))
        .child_opt(additional_fields(r.details.as_ref()));
    Element::new(tag).child(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CardToken, TrackData};
    use rust_decimal_macros::dec;

    #[test]
    fn test_sale_with_cash_back() {
        let mut request = DebitRequest::new(DebitOperation::Sale, Some(dec!(20)));
        request.payment.track = Some(TrackData::new("%B4012...?"));
        request.pin_block = Some("PIN".into());
        request.cash_back = Some(dec!(5));
        request.allow_partial_auth = true;
        let fragment = debit("DebitSale", &request);
        let block = fragment.find("Block1").unwrap();
        assert_eq!(block.text_at(&["Amt"]), Some("20.00"));
        assert_eq!(block.text_at(&["CashbackAmtInfo"]), Some("5.00"));
        assert_eq!(block.text_at(&["AllowPartialAuth"]), Some("Y"));
        assert_eq!(block.text_at(&["CardData", "TrackData"]), Some("%B4012...?"));
        assert_eq!(block.text_at(&["PinBlock"]), Some("PIN"));
        assert!(block.find("GatewayTxnId").is_none());
    }

    #[test]
    fn test_reversal_by_original_id() {
        let mut request = DebitRequest::new(DebitOperation::Reversal, Some(dec!(20)));
        request.transaction_id = Some(4321);
        request.auth_amount = Some(dec!(15));
        let fragment = debit("DebitReversal", &request);
        let block = fragment.find("Block1").unwrap();
        assert_eq!(block.text_at(&["GatewayTxnId"]), Some("4321"));
        assert_eq!(block.text_at(&["AuthAmt"]), Some("15.00"));
        assert!(block.find("CardData").is_none());
        assert!(block.find("PinBlock").is_none());
        assert!(block.find("AllowDup").is_none());
    }

    #[test]
    fn test_balance_inquiry_has_no_amount() {
        let mut request = DebitRequest::new(DebitOperation::Balance, None);
        request.payment.token = Some(CardToken::new("supt_abc"));
        request.pin_block = Some("PIN".into());
        let fragment = debit("DebitBalanceInquiry", &request);
        let block = fragment.find("Block1").unwrap();
        assert!(block.find("Amt").is_none());
        assert_eq!(
            block.text_at(&["CardData", "TokenData", "TokenValue"]),
            Some("supt_abc")
        );
    }
}
