use portico_proto::Element;
use portico_proto::encoding::flag;

use super::{amount_opt, card_holder, payment};
use crate::entities::{EbtOperation, EbtRequest};

pub(super) fn ebt(tag: &str, r: &EbtRequest) -> Element {
    let mut block = Element::new("Block1")
        .leaf_opt("Amt", amount_opt(r.amount))
        .leaf_child("AllowDup", flag(r.allow_duplicates));
    block = payment(block, &r.payment, r.request_token)
        .leaf_opt("PinBlock", r.pin_block.as_deref())
        .child_opt(card_holder(r.card_holder.as_ref()));
    block = match r.operation {
        EbtOperation::CashBack => block.leaf_opt("CashBackAmount", amount_opt(r.cash_back)),
        EbtOperation::Balance => {
            block.leaf_opt("BalanceInquiryType", r.balance_type.map(|t| t.as_str()))
        }
        EbtOperation::VoucherPurchase => match &r.voucher {
            Some(voucher) => block
                .leaf_child("ElectronicVoucherSerialNbr", &voucher.serial_number)
                .leaf_child("VoucherApprovalCd", &voucher.approval_code),
            None => block,
        },
        _ => block,
    };
    Element::new(tag).child(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BalanceType, CardToken, EbtVoucher};
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_inquiry() {
        let mut request = EbtRequest::new(EbtOperation::Balance, None);
        request.payment.token = Some(CardToken::new("tok"));
        request.pin_block = Some("PIN".into());
        request.balance_type = Some(BalanceType::Cash);
        let fragment = ebt("EBTBalanceInquiry", &request);
        let block = fragment.find("Block1").unwrap();
        assert!(block.find("Amt").is_none());
        assert_eq!(block.text_at(&["BalanceInquiryType"]), Some("CASH"));
        assert_eq!(block.text_at(&["PinBlock"]), Some("PIN"));
    }

    #[test]
    fn test_voucher_purchase() {
        let mut request = EbtRequest::new(EbtOperation::VoucherPurchase, Some(dec!(7.5)));
        request.payment.token = Some(CardToken::new("tok"));
        request.voucher = Some(EbtVoucher {
            serial_number: "123456789012345".into(),
            approval_code: "123456".into(),
        });
        let fragment = ebt("EBTVoucherPurchase", &request);
        let block = fragment.find("Block1").unwrap();
        assert_eq!(block.text_at(&["Amt"]), Some("7.50"));
        assert_eq!(block.text_at(&["VoucherApprovalCd"]), Some("123456"));
        assert!(block.find("PinBlock").is_none());
    }
}
