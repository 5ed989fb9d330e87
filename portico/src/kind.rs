//! Transaction kinds and their gateway service tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Product family a transaction kind belongs to.
///
/// The family decides which code table translates the body response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Credit card transactions; issuer table.
    Credit,
    /// Reports and batch management; no body translation.
    Report,
    /// Gift and loyalty cards; gift table.
    Gift,
    /// ACH checks; check rejections.
    Check,
    /// Electronic benefits transfer; issuer table.
    Ebt,
    /// PIN debit; issuer table.
    Debit,
}

/// Closed set of transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Authorize without capture.
    Authorize,
    /// Authorize and capture.
    Charge,
    /// Add an authorization to the open batch.
    Capture,
    /// Return funds to a card.
    Refund,
    /// Reverse an authorization.
    Reverse,
    /// Zero-amount account verification.
    Verify,
    /// Void a transaction in the open batch.
    Void,
    /// Edit amount or gratuity of an open transaction.
    Edit,
    /// Attach commercial card data to a transaction.
    CpcEdit,
    /// Activity report over a date range.
    List,
    /// Detail report for one transaction.
    Get,
    /// Close the open batch.
    BatchClose,
    /// Activate a gift card.
    GiftActivate,
    /// Load value onto a gift card.
    GiftAddValue,
    /// Manage a gift card alias.
    GiftAlias,
    /// Gift card balance inquiry.
    GiftBalance,
    /// Deactivate a gift card.
    GiftDeactivate,
    /// Move a balance to a replacement gift card.
    GiftReplace,
    /// Loyalty reward.
    GiftReward,
    /// Gift card purchase.
    GiftSale,
    /// Void a gift card transaction.
    GiftVoid,
    /// Reverse a gift card transaction.
    GiftReversal,
    /// Check purchase.
    CheckSale,
    /// Check return.
    CheckReturn,
    /// Override a previously declined check.
    CheckOverride,
    /// Void a check transaction.
    CheckVoid,
    /// Food stamp purchase.
    EbtPurchase,
    /// Food stamp return.
    EbtRefund,
    /// Cash benefit purchase with cash back.
    EbtCashBack,
    /// Cash benefit withdrawal.
    EbtCashBenefitWithdrawal,
    /// Benefit balance inquiry.
    EbtBalance,
    /// Paper voucher purchase.
    EbtVoucherPurchase,
    /// PIN debit purchase.
    DebitSale,
    /// PIN debit return.
    DebitReturn,
    /// Reverse a PIN debit transaction.
    DebitReversal,
    /// Load value onto a debit card.
    DebitAddValue,
    /// Debit balance inquiry.
    DebitBalance,
}

impl TransactionKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 37] = [
        Self::Authorize,
        Self::Charge,
        Self::Capture,
        Self::Refund,
        Self::Reverse,
        Self::Verify,
        Self::Void,
        Self::Edit,
        Self::CpcEdit,
        Self::List,
        Self::Get,
        Self::BatchClose,
        Self::GiftActivate,
        Self::GiftAddValue,
        Self::GiftAlias,
        Self::GiftBalance,
        Self::GiftDeactivate,
        Self::GiftReplace,
        Self::GiftReward,
        Self::GiftSale,
        Self::GiftVoid,
        Self::GiftReversal,
        Self::CheckSale,
        Self::CheckReturn,
        Self::CheckOverride,
        Self::CheckVoid,
        Self::EbtPurchase,
        Self::EbtRefund,
        Self::EbtCashBack,
        Self::EbtCashBenefitWithdrawal,
        Self::EbtBalance,
        Self::EbtVoucherPurchase,
        Self::DebitSale,
        Self::DebitReturn,
        Self::DebitReversal,
        Self::DebitAddValue,
        Self::DebitBalance,
    ];

    /// Returns the gateway service tag.
    ///
    /// The tag names both the request's top-level element and the reply body
    /// key. Check sale, return and override share `CheckSale`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Authorize => "CreditAuth",
            Self::Charge => "CreditSale",
            Self::Capture => "CreditAddToBatch",
            Self::Refund => "CreditReturn",
            Self::Reverse => "CreditReversal",
            Self::Verify => "CreditAccountVerify",
            Self::Void => "CreditVoid",
            Self::Edit => "CreditTxnEdit",
            Self::CpcEdit => "CreditCPCEdit",
            Self::List => "ReportActivity",
            Self::Get => "ReportTxnDetail",
            Self::BatchClose => "BatchClose",
            Self::GiftActivate => "GiftCardActivate",
            Self::GiftAddValue => "GiftCardAddValue",
            Self::GiftAlias => "GiftCardAlias",
            Self::GiftBalance => "GiftCardBalance",
            Self::GiftDeactivate => "GiftCardDeactivate",
            Self::GiftReplace => "GiftCardReplace",
            Self::GiftReward => "GiftCardReward",
            Self::GiftSale => "GiftCardSale",
            Self::GiftVoid => "GiftCardVoid",
            Self::GiftReversal => "GiftCardReversal",
            Self::CheckSale | Self::CheckReturn | Self::CheckOverride => "CheckSale",
            Self::CheckVoid => "CheckVoid",
            Self::EbtPurchase => "EBTFSPurchase",
            Self::EbtRefund => "EBTFSReturn",
            Self::EbtCashBack => "EBTCashBackPurchase",
            Self::EbtCashBenefitWithdrawal => "EBTCashBenefitWithdrawal",
            Self::EbtBalance => "EBTBalanceInquiry",
            Self::EbtVoucherPurchase => "EBTVoucherPurchase",
            Self::DebitSale => "DebitSale",
            Self::DebitReturn => "DebitReturn",
            Self::DebitReversal => "DebitReversal",
            Self::DebitAddValue => "DebitAddValue",
            Self::DebitBalance => "DebitBalanceInquiry",
        }
    }

    /// Maps a report `ServiceName` back to a kind.
    ///
    /// Shared tags resolve to their primary kind (`CheckSale` → [`Self::CheckSale`]).
    #[must_use]
    pub fn from_service_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == name)
    }

    /// Returns the product family.
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::Authorize
            | Self::Charge
            | Self::Capture
            | Self::Refund
            | Self::Reverse
            | Self::Verify
            | Self::Void
            | Self::Edit
            | Self::CpcEdit => Family::Credit,
            Self::List | Self::Get | Self::BatchClose => Family::Report,
            Self::GiftActivate
            | Self::GiftAddValue
            | Self::GiftAlias
            | Self::GiftBalance
            | Self::GiftDeactivate
            | Self::GiftReplace
            | Self::GiftReward
            | Self::GiftSale
            | Self::GiftVoid
            | Self::GiftReversal => Family::Gift,
            Self::CheckSale | Self::CheckReturn | Self::CheckOverride | Self::CheckVoid => {
                Family::Check
            }
            Self::EbtPurchase
            | Self::EbtRefund
            | Self::EbtCashBack
            | Self::EbtCashBenefitWithdrawal
            | Self::EbtBalance
            | Self::EbtVoucherPurchase => Family::Ebt,
            Self::DebitSale
            | Self::DebitReturn
            | Self::DebitReversal
            | Self::DebitAddValue
            | Self::DebitBalance => Family::Debit,
        }
    }

    /// Returns `true` for kinds whose timeouts are compensated with a reversal:
    /// [`Self::Authorize`] and [`Self::Charge`].
    #[must_use]
    pub const fn is_reversible(&self) -> bool {
        matches!(self, Self::Authorize | Self::Charge)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_roundtrip() {
        for kind in TransactionKind::ALL {
            let back = TransactionKind::from_service_name(kind.tag()).unwrap();
            assert_eq!(back.tag(), kind.tag());
        }
        assert_eq!(
            TransactionKind::from_service_name("CreditAuth"),
            Some(TransactionKind::Authorize)
        );
        assert_eq!(
            TransactionKind::from_service_name("DebitSale"),
            Some(TransactionKind::DebitSale)
        );
        assert_eq!(TransactionKind::DebitSale.family(), Family::Debit);
        assert_eq!(TransactionKind::from_service_name("RecurringBilling"), None);
    }

    #[test]
    fn test_shared_check_tag() {
        assert_eq!(TransactionKind::CheckReturn.tag(), "CheckSale");
        assert_eq!(
            TransactionKind::from_service_name("CheckSale"),
            Some(TransactionKind::CheckSale)
        );
    }

    #[test]
    fn test_only_authorizations_are_reversible() {
        let reversible: Vec<_> = TransactionKind::ALL
            .into_iter()
            .filter(TransactionKind::is_reversible)
            .collect();
        assert_eq!(
            reversible,
            vec![TransactionKind::Authorize, TransactionKind::Charge]
        );
    }
}
