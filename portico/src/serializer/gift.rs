use portico_proto::Element;
use portico_proto::encoding::amount;

use super::{amount_opt, encryption_data, id_opt};
use crate::entities::{
    GiftAliasRequest, GiftCard, GiftCardRequest, GiftOperation, GiftReplaceRequest,
    GiftReversalRequest, GiftVoidRequest,
};

/// Gift card reference under the given element name.
fn card(name: &str, card: &GiftCard) -> Element {
    Element::new(name)
        .leaf_opt("CardNbr", card.number.as_deref())
        .leaf_opt("TrackData", card.track_data.as_deref())
        .leaf_opt("TokenValue", card.token.as_deref())
        .leaf_opt("Alias", card.alias.as_deref())
        .leaf_opt("PIN", card.pin.as_deref())
        .child_opt(card.encryption.as_ref().map(encryption_data))
}

pub(super) fn value(tag: &str, r: &GiftCardRequest) -> Element {
    let moves_value = r.operation.requires_amount();
    let block = Element::new("Block1")
        .leaf_opt("Amt", amount_opt(r.amount))
        .leaf_opt(
            "GratuityAmtInfo",
            amount_opt(r.gratuity.filter(|_| r.operation == GiftOperation::Sale)),
        )
        .leaf_opt("Currency", moves_value.then_some(r.currency.as_str()))
        .child(card("CardData", &r.card));
    Element::new(tag).child(block)
}

pub(super) fn replace(tag: &str, r: &GiftReplaceRequest) -> Element {
    let block = Element::new("Block1")
        .child_opt(r.old_card.as_ref().map(|c| card("OldCardData", c)))
        .child_opt(r.new_card.as_ref().map(|c| card("NewCardData", c)));
    Element::new(tag).child(block)
}

pub(super) fn alias(tag: &str, r: &GiftAliasRequest) -> Element {
    let block = Element::new("Block1")
        .leaf_child("Action", r.action.as_str())
        .leaf_child("Alias", &r.alias)
        .child_opt(r.card.as_ref().map(|c| card("CardData", c)));
    Element::new(tag).child(block)
}

pub(super) fn void(tag: &str, r: &GiftVoidRequest) -> Element {
    Element::new(tag)
        .child(Element::new("Block1").leaf_opt("GatewayTxnId", id_opt(r.transaction_id)))
}

pub(super) fn reversal(tag: &str, r: &GiftReversalRequest) -> Element {
    let block = Element::new("Block1")
        .leaf_child("Amt", amount(r.amount))
        .leaf_opt("GatewayTxnId", id_opt(r.transaction_id))
        .child_opt(r.card.as_ref().map(|c| card("CardData", c)));
    Element::new(tag).child(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AliasAction, GiftCurrency};
    use rust_decimal_macros::dec;

    #[test]
    fn test_sale_in_points() {
        let request = GiftCardRequest {
            operation: GiftOperation::Sale,
            card: GiftCard::number("5022440000000000098").with_pin("1234"),
            amount: Some(dec!(10)),
            currency: GiftCurrency::Points,
            gratuity: None,
            client_transaction_id: None,
        };
        let fragment = value("GiftCardSale", &request);
        assert_eq!(fragment.text_at(&["Block1", "Currency"]), Some("POINTS"));
        assert_eq!(fragment.text_at(&["Block1", "Amt"]), Some("10.00"));
        assert_eq!(fragment.text_at(&["Block1", "CardData", "PIN"]), Some("1234"));
        assert!(fragment.find_path(&["Block1", "CardData", "Alias"]).is_none());
    }

    #[test]
    fn test_balance_has_no_currency() {
        let request = GiftCardRequest {
            operation: GiftOperation::Balance,
            card: GiftCard::alias("9725550100"),
            amount: None,
            currency: GiftCurrency::Usd,
            gratuity: Some(dec!(1)),
            client_transaction_id: None,
        };
        let fragment = value("GiftCardBalance", &request);
        let block = fragment.find("Block1").unwrap();
        assert_eq!(block.children().len(), 1);
        assert_eq!(block.text_at(&["CardData", "Alias"]), Some("9725550100"));
    }

    #[test]
    fn test_alias_create_without_card() {
        let request = GiftAliasRequest {
            action: AliasAction::Create,
            alias: "9725550100".into(),
            card: None,
        };
        let fragment = alias("GiftCardAlias", &request);
        assert_eq!(fragment.text_at(&["Block1", "Action"]), Some("CREATE"));
        assert!(fragment.find_path(&["Block1", "CardData"]).is_none());
    }

    #[test]
    fn test_replace_uses_old_and_new_card_blocks() {
        let request = GiftReplaceRequest {
            old_card: Some(GiftCard::number("1")),
            new_card: Some(GiftCard::number("2")),
        };
        let fragment = replace("GiftCardReplace", &request);
        assert_eq!(fragment.text_at(&["Block1", "OldCardData", "CardNbr"]), Some("1"));
        assert_eq!(fragment.text_at(&["Block1", "NewCardData", "CardNbr"]), Some("2"));
    }
}
