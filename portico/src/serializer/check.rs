use portico_proto::Element;
use portico_proto::encoding::{amount, flag};

use super::{additional_fields, id_opt};
use crate::entities::{CheckAccount, CheckRequest, CheckVoidRequest, ConsumerInfo};

fn account_info(account: &CheckAccount) -> Option<Element> {
    Element::new("AccountInfo")
        .leaf_opt("RoutingNumber", account.routing_number.as_deref())
        .leaf_opt("AccountNumber", account.account_number.as_deref())
        .leaf_opt("CheckNumber", account.check_number.as_deref())
        .leaf_opt("MICRData", account.micr_data.as_deref())
        .leaf_opt("AccountType", account.account_type.map(|t| t.as_str()))
        .non_empty()
}

fn consumer_info(consumer: Option<&ConsumerInfo>) -> Option<Element> {
    let consumer = consumer?;
    let address = consumer.address.as_ref();
    Element::new("ConsumerInfo")
        .leaf_opt("FirstName", consumer.first_name.as_deref())
        .leaf_opt("LastName", consumer.last_name.as_deref())
        .leaf_opt("CheckName", consumer.check_name.as_deref())
        .leaf_opt("Address1", address.and_then(|a| a.street.as_deref()))
        .leaf_opt("City", address.and_then(|a| a.city.as_deref()))
        .leaf_opt("State", address.and_then(|a| a.state.as_deref()))
        .leaf_opt("Zip", address.and_then(|a| a.zip.as_deref()))
        .leaf_opt("PhoneNumber", consumer.phone.as_deref())
        .leaf_opt("EmailAddress", consumer.email.as_deref())
        .leaf_opt("DLNumber", consumer.dl_number.as_deref())
        .leaf_opt("DLState", consumer.dl_state.as_deref())
        .non_empty()
}

pub(super) fn sale(tag: &str, r: &CheckRequest) -> Element {
    let mut block = Element::new("Block1")
        .leaf_child("Amt", amount(r.amount))
        .leaf_child("CheckAction", r.action.as_str());
    if let Some(account) = &r.account {
        block = block
            .child_opt(account_info(account))
            .leaf_opt("CheckType", account.check_type.map(|t| t.as_str()))
            .leaf_child("DataEntryMode", account.entry_mode.as_str())
            .leaf_child("SECCode", &account.sec_code)
            .leaf_opt("VerifyInfo", account.verify.then_some(flag(true)));
    }
    let block = block
        .leaf_opt("TokenValue", r.token.as_deref())
        .child_opt(consumer_info(r.consumer.as_ref()))
        .child_opt(additional_fields(r.details.as_ref()));
    Element::new(tag).child(block)
}

pub(super) fn void(tag: &str, r: &CheckVoidRequest) -> Element {
    let block = Element::new("Block1")
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id))
        .leaf_opt("ClientTxnId", id_opt(r.original_client_transaction_id));
    Element::new(tag).child(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountType, CheckAction, CheckType};
    use rust_decimal_macros::dec;

    #[test]
    fn test_check_return_shares_sale_tag() {
        let request = CheckRequest {
            action: CheckAction::Return,
            amount: dec!(15),
            account: Some(
                CheckAccount::new("490000018", "24413815", "PPD")
                    .with_types(AccountType::Checking, CheckType::Personal),
            ),
            token: None,
            consumer: None,
            details: None,
            client_transaction_id: None,
        };
        let fragment = sale("CheckSale", &request);
        let block = fragment.find("Block1").unwrap();
        assert_eq!(block.text_at(&["CheckAction"]), Some("RETURN"));
        assert_eq!(block.text_at(&["AccountInfo", "AccountType"]), Some("CHECKING"));
        assert_eq!(block.text_at(&["CheckType"]), Some("PERSONAL"));
        assert_eq!(block.text_at(&["SECCode"]), Some("PPD"));
        assert!(block.find("ConsumerInfo").is_none());
        assert!(block.find("VerifyInfo").is_none());
    }
}
