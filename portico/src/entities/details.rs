//! Optional request blocks shared across transaction kinds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province code.
    pub state: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    /// Country.
    pub country: Option<String>,
}

/// Card holder identity, used for AVS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHolder {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Billing address.
    pub address: Option<Address>,
    /// Phone number, digits only on the wire.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Additional transaction fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    /// Free-form description.
    pub memo: Option<String>,
    /// Merchant invoice number.
    pub invoice_number: Option<String>,
    /// Merchant customer id.
    pub customer_id: Option<String>,
}

/// Direct-market (mail/telephone order) data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMarketData {
    /// Invoice number.
    pub invoice_number: String,
    /// Ship day, 1-31.
    pub ship_day: u32,
    /// Ship month, 1-12.
    pub ship_month: u32,
}

/// One healthcare amount line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalAmount {
    /// Amount type, e.g. `TOTAL_HEALTHCARE_AMT` or `SUBTOTAL_PRESCRIPTION_AMT`.
    pub amount_type: String,
    /// Amount.
    pub amount: Decimal,
}

/// Healthcare auto-substantiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSubstantiation {
    /// Merchant verification value.
    pub merchant_verification_value: Option<String>,
    /// Real-time substantiation requested.
    pub real_time_substantiation: bool,
    /// Amount lines, at most four on the wire.
    pub additional_amounts: Vec<AdditionalAmount>,
}

impl AutoSubstantiation {
    /// Creates an empty block with its own amount list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an amount line.
    #[must_use]
    pub fn with_amount(mut self, amount_type: impl Into<String>, amount: Decimal) -> Self {
        self.additional_amounts.push(AdditionalAmount {
            amount_type: amount_type.into(),
            amount,
        });
        self
    }
}

/// Commercial card tax classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxType {
    /// No tax reported.
    #[default]
    NotUsed,
    /// Sales tax applied.
    SalesTax,
    /// Tax exempt purchase.
    TaxExempt,
}

impl TaxType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotUsed => "NOTUSED",
            Self::SalesTax => "SALESTAX",
            Self::TaxExempt => "TAXEXEMPT",
        }
    }
}

/// Commercial purchasing card data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpcData {
    /// Purchase order number.
    pub po_number: Option<String>,
    /// Tax classification.
    pub tax_type: TaxType,
    /// Tax amount.
    pub tax_amount: Option<Decimal>,
}

/// Check holder identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerInfo {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Business name, for corporate checks.
    pub check_name: Option<String>,
    /// Billing address.
    pub address: Option<Address>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Driver's license number.
    pub dl_number: Option<String>,
    /// Driver's license issuing state.
    pub dl_state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_auto_substantiation_instances_do_not_share_amounts() {
        let first = AutoSubstantiation::new().with_amount("TOTAL_HEALTHCARE_AMT", dec!(10));
        let second = AutoSubstantiation::new();
        assert_eq!(first.additional_amounts.len(), 1);
        assert!(second.additional_amounts.is_empty());
    }
}
