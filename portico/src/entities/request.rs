//! Transaction requests.
//!
//! Builders accumulate into these records; [`TransactionRequest`] is the
//! closed union consumed once by `PorticoClient::execute`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::details::{
    AutoSubstantiation, CardHolder, ConsumerInfo, CpcData, DirectMarketData, TransactionDetails,
};
use super::payment::{CheckAccount, GiftCard, PaymentSlots};
use crate::kind::TransactionKind;

/// Default currency for credit requests.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Authorization or sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Amount to authorize.
    pub amount: Decimal,
    /// ISO currency, lower case.
    pub currency: String,
    /// Payment method.
    pub payment: PaymentSlots,
    /// Card holder for AVS.
    pub card_holder: Option<CardHolder>,
    /// Additional transaction fields.
    pub details: Option<TransactionDetails>,
    /// Direct-market data.
    pub direct_market: Option<DirectMarketData>,
    /// Healthcare auto-substantiation.
    pub auto_substantiation: Option<AutoSubstantiation>,
    /// Ask the issuer for a CPC indicator.
    pub cpc_request: bool,
    /// Tip amount.
    pub gratuity: Option<Decimal>,
    /// Convenience fee.
    pub convenience_amount: Option<Decimal>,
    /// Shipping amount.
    pub shipping_amount: Option<Decimal>,
    /// Bypass duplicate checking.
    pub allow_duplicates: bool,
    /// Accept a partial approval.
    pub allow_partial_auth: bool,
    /// Request a multi-use token.
    pub request_token: bool,
    /// Soft descriptor printed on the statement.
    pub descriptor: Option<String>,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

impl AuthRequest {
    /// Creates a request in the default currency.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            payment: PaymentSlots::default(),
            card_holder: None,
            details: None,
            direct_market: None,
            auto_substantiation: None,
            cpc_request: false,
            gratuity: None,
            convenience_amount: None,
            shipping_amount: None,
            allow_duplicates: false,
            allow_partial_auth: false,
            request_token: false,
            descriptor: None,
            client_transaction_id: None,
        }
    }
}

/// Zero-amount account verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Payment method.
    pub payment: PaymentSlots,
    /// Card holder for AVS.
    pub card_holder: Option<CardHolder>,
    /// Request a multi-use token.
    pub request_token: bool,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

/// Add an authorization to the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Authorization to capture.
    pub transaction_id: Option<i64>,
    /// Final amount, when different from the authorization.
    pub amount: Option<Decimal>,
    /// Tip amount.
    pub gratuity: Option<Decimal>,
    /// Direct-market data.
    pub direct_market: Option<DirectMarketData>,
}

/// Return funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    /// Amount to return.
    pub amount: Decimal,
    /// ISO currency, lower case.
    pub currency: String,
    /// Payment method; exclusive with `transaction_id`.
    pub payment: PaymentSlots,
    /// Original transaction; exclusive with `payment`.
    pub transaction_id: Option<i64>,
    /// Card holder for AVS.
    pub card_holder: Option<CardHolder>,
    /// Additional transaction fields.
    pub details: Option<TransactionDetails>,
    /// Direct-market data.
    pub direct_market: Option<DirectMarketData>,
    /// Bypass duplicate checking.
    pub allow_duplicates: bool,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

impl RefundRequest {
    /// Creates a request in the default currency.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            payment: PaymentSlots::default(),
            transaction_id: None,
            card_holder: None,
            details: None,
            direct_market: None,
            allow_duplicates: false,
            client_transaction_id: None,
        }
    }
}

/// Reverse an authorization.
///
/// The original is referenced by exactly one of a payment method, a gateway
/// transaction id or the original client transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseRequest {
    /// Amount of the original authorization.
    pub amount: Decimal,
    /// ISO currency, lower case.
    pub currency: String,
    /// New authorized amount for a partial reversal.
    pub auth_amount: Option<Decimal>,
    /// Payment method used by the original.
    pub payment: PaymentSlots,
    /// Gateway transaction id of the original.
    pub transaction_id: Option<i64>,
    /// Client transaction id of the original.
    pub original_client_transaction_id: Option<i64>,
    /// Additional transaction fields.
    pub details: Option<TransactionDetails>,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

impl ReverseRequest {
    /// Creates a request in the default currency.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            auth_amount: None,
            payment: PaymentSlots::default(),
            transaction_id: None,
            original_client_transaction_id: None,
            details: None,
            client_transaction_id: None,
        }
    }

    /// Number of original-transaction references set.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.payment.count()
            + usize::from(self.transaction_id.is_some())
            + usize::from(self.original_client_transaction_id.is_some())
    }
}

/// Void a transaction in the open batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidRequest {
    /// Transaction to void.
    pub transaction_id: Option<i64>,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

/// Edit an open transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    /// Transaction to edit.
    pub transaction_id: Option<i64>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New tip amount.
    pub gratuity: Option<Decimal>,
}

/// Attach commercial card data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpcEditRequest {
    /// Transaction to edit.
    pub transaction_id: Option<i64>,
    /// Commercial card data.
    pub cpc: Option<CpcData>,
}

/// Activity report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    /// Range start, UTC.
    pub start: Option<DateTime<Utc>>,
    /// Range end, UTC.
    pub end: Option<DateTime<Utc>>,
    /// Keep only records of this kind.
    pub filter: Option<TransactionKind>,
}

/// Transaction detail report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    /// Transaction to fetch.
    pub transaction_id: Option<i64>,
}

/// Gift card value unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GiftCurrency {
    /// US dollars.
    #[default]
    Usd,
    /// Loyalty points.
    Points,
}

impl GiftCurrency {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Points => "POINTS",
        }
    }
}

/// Gift card operations sharing one request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GiftOperation {
    /// Activate with an initial value.
    Activate,
    /// Load value.
    AddValue,
    /// Balance inquiry.
    Balance,
    /// Deactivate.
    Deactivate,
    /// Loyalty reward.
    Reward,
    /// Purchase.
    Sale,
}

impl GiftOperation {
    /// The transaction kind.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Activate => TransactionKind::GiftActivate,
            Self::AddValue => TransactionKind::GiftAddValue,
            Self::Balance => TransactionKind::GiftBalance,
            Self::Deactivate => TransactionKind::GiftDeactivate,
            Self::Reward => TransactionKind::GiftReward,
            Self::Sale => TransactionKind::GiftSale,
        }
    }

    /// Returns `true` when the operation moves value and needs an amount.
    #[must_use]
    pub const fn requires_amount(&self) -> bool {
        matches!(self, Self::Activate | Self::AddValue | Self::Reward | Self::Sale)
    }
}

/// Activate, load, inquire, deactivate, reward or sell on a gift card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardRequest {
    /// Operation.
    pub operation: GiftOperation,
    /// Card reference.
    pub card: GiftCard,
    /// Amount, for value-moving operations.
    pub amount: Option<Decimal>,
    /// Value unit.
    pub currency: GiftCurrency,
    /// Tip amount, sale only.
    pub gratuity: Option<Decimal>,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

/// Move a balance to a replacement card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftReplaceRequest {
    /// Card being replaced.
    pub old_card: Option<GiftCard>,
    /// Replacement card.
    pub new_card: Option<GiftCard>,
}

/// Alias management action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasAction {
    /// Attach an alias to an existing card.
    Add,
    /// Remove an alias from a card.
    Delete,
    /// Issue a new card under an alias.
    Create,
}

impl AliasAction {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
        }
    }
}

/// Gift card alias management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftAliasRequest {
    /// Action.
    pub action: AliasAction,
    /// Alias value.
    pub alias: String,
    /// Card; required for add and delete.
    pub card: Option<GiftCard>,
}

/// Void a gift card transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftVoidRequest {
    /// Transaction to void.
    pub transaction_id: Option<i64>,
}

/// Reverse a gift card transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftReversalRequest {
    /// Amount of the original.
    pub amount: Decimal,
    /// Card used by the original; exclusive with `transaction_id`.
    pub card: Option<GiftCard>,
    /// Gateway transaction id of the original; exclusive with `card`.
    pub transaction_id: Option<i64>,
}

/// Check sale action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckAction {
    /// Purchase.
    Sale,
    /// Return.
    Return,
    /// Override a previous decline.
    Override,
}

impl CheckAction {
    /// Wire value of `CheckAction`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Return => "RETURN",
            Self::Override => "OVERRIDE",
        }
    }

    /// The transaction kind.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Sale => TransactionKind::CheckSale,
            Self::Return => TransactionKind::CheckReturn,
            Self::Override => TransactionKind::CheckOverride,
        }
    }
}

/// Check sale, return or override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Action.
    pub action: CheckAction,
    /// Amount.
    pub amount: Decimal,
    /// Bank account; exclusive with `token`.
    pub account: Option<CheckAccount>,
    /// Tokenized account; exclusive with `account`.
    pub token: Option<String>,
    /// Check holder.
    pub consumer: Option<ConsumerInfo>,
    /// Additional transaction fields.
    pub details: Option<TransactionDetails>,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

/// Void a check transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckVoidRequest {
    /// Gateway transaction id; exclusive with the client id.
    pub transaction_id: Option<i64>,
    /// Client transaction id of the original.
    pub original_client_transaction_id: Option<i64>,
}

/// EBT benefit type for balance inquiries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceType {
    /// Food stamp benefits.
    FoodStamp,
    /// Cash benefits.
    Cash,
}

impl BalanceType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FoodStamp => "FOODSTAMP",
            Self::Cash => "CASH",
        }
    }
}

/// Paper voucher data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbtVoucher {
    /// Voucher serial number.
    pub serial_number: String,
    /// Approval code obtained by phone.
    pub approval_code: String,
}

/// EBT operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EbtOperation {
    /// Food stamp purchase.
    Purchase,
    /// Food stamp return.
    Refund,
    /// Cash benefit purchase with cash back.
    CashBack,
    /// Cash benefit withdrawal.
    CashBenefitWithdrawal,
    /// Balance inquiry.
    Balance,
    /// Paper voucher purchase.
    VoucherPurchase,
}

impl EbtOperation {
    /// The transaction kind.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Purchase => TransactionKind::EbtPurchase,
            Self::Refund => TransactionKind::EbtRefund,
            Self::CashBack => TransactionKind::EbtCashBack,
            Self::CashBenefitWithdrawal => TransactionKind::EbtCashBenefitWithdrawal,
            Self::Balance => TransactionKind::EbtBalance,
            Self::VoucherPurchase => TransactionKind::EbtVoucherPurchase,
        }
    }
}

/// Electronic benefits transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbtRequest {
    /// Operation.
    pub operation: EbtOperation,
    /// Amount; absent for balance inquiries.
    pub amount: Option<Decimal>,
    /// Card, track or token. Wallets and stored keys are rejected.
    pub payment: PaymentSlots,
    /// Encrypted PIN block.
    pub pin_block: Option<String>,
    /// Cash back amount.
    pub cash_back: Option<Decimal>,
    /// Benefit type for balance inquiries.
    pub balance_type: Option<BalanceType>,
    /// Voucher data for voucher purchases.
    pub voucher: Option<EbtVoucher>,
    /// Card holder.
    pub card_holder: Option<CardHolder>,
    /// Bypass duplicate checking.
    pub allow_duplicates: bool,
    /// Request a multi-use token.
    pub request_token: bool,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

impl EbtRequest {
    /// Creates a request for the operation.
    #[must_use]
    pub fn new(operation: EbtOperation, amount: Option<Decimal>) -> Self {
        Self {
            operation,
            amount,
            payment: PaymentSlots::default(),
            pin_block: None,
            cash_back: None,
            balance_type: None,
            voucher: None,
            card_holder: None,
            allow_duplicates: false,
            request_token: false,
            client_transaction_id: None,
        }
    }
}

/// PIN debit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebitOperation {
    /// Purchase, optionally with cash back.
    Sale,
    /// Return to the card.
    Return,
    /// Reverse a previous debit transaction.
    Reversal,
    /// Load value onto the card.
    AddValue,
    /// Balance inquiry.
    Balance,
}

impl DebitOperation {
    /// The transaction kind.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Sale => TransactionKind::DebitSale,
            Self::Return => TransactionKind::DebitReturn,
            Self::Reversal => TransactionKind::DebitReversal,
            Self::AddValue => TransactionKind::DebitAddValue,
            Self::Balance => TransactionKind::DebitBalance,
        }
    }

    /// Returns `true` when the cardholder must enter a PIN.
    #[must_use]
    pub const fn requires_pin(&self) -> bool {
        !matches!(self, Self::Reversal)
    }
}

/// PIN debit transaction.
///
/// The card is referenced by track data or a token. A reversal may instead
/// reference the original by gateway transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitRequest {
    /// Operation.
    pub operation: DebitOperation,
    /// Amount; absent for balance inquiries.
    pub amount: Option<Decimal>,
    /// Track data or token. Cards, wallets and stored keys are rejected.
    pub payment: PaymentSlots,
    /// Encrypted PIN block.
    pub pin_block: Option<String>,
    /// Cash back amount, sale only.
    pub cash_back: Option<Decimal>,
    /// Original transaction for returns and reversals.
    pub transaction_id: Option<i64>,
    /// New authorized amount for a partial reversal.
    pub auth_amount: Option<Decimal>,
    /// Card holder.
    pub card_holder: Option<CardHolder>,
    /// Additional transaction fields.
    pub details: Option<TransactionDetails>,
    /// Bypass duplicate checking.
    pub allow_duplicates: bool,
    /// Accept a partial approval, sale only.
    pub allow_partial_auth: bool,
    /// Request a multi-use token.
    pub request_token: bool,
    /// Caller-assigned id echoed by the gateway.
    pub client_transaction_id: Option<i64>,
}

impl DebitRequest {
    /// Creates a request for the operation.
    #[must_use]
    pub fn new(operation: DebitOperation, amount: Option<Decimal>) -> Self {
        Self {
            operation,
            amount,
            payment: PaymentSlots::default(),
            pin_block: None,
            cash_back: None,
            transaction_id: None,
            auth_amount: None,
            card_holder: None,
            details: None,
            allow_duplicates: false,
            allow_partial_auth: false,
            request_token: false,
            client_transaction_id: None,
        }
    }

    /// Number of card references set, counting a reversal's original id.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        let original = self.operation == DebitOperation::Reversal && self.transaction_id.is_some();
        self.payment.count() + usize::from(original)
    }
}

/// Closed union of every request `execute()` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionRequest {
    /// Authorize without capture.
    Authorize(AuthRequest),
    /// Authorize and capture.
    Charge(AuthRequest),
    /// Add to batch.
    Capture(CaptureRequest),
    /// Return funds.
    Refund(RefundRequest),
    /// Reverse an authorization.
    Reverse(ReverseRequest),
    /// Account verification.
    Verify(VerifyRequest),
    /// Void.
    Void(VoidRequest),
    /// Edit amount or gratuity.
    Edit(EditRequest),
    /// Attach CPC data.
    CpcEdit(CpcEditRequest),
    /// Activity report.
    List(ListRequest),
    /// Detail report.
    Get(GetRequest),
    /// Close the batch.
    BatchClose,
    /// Gift card value operation.
    GiftCard(GiftCardRequest),
    /// Gift card replacement.
    GiftReplace(GiftReplaceRequest),
    /// Gift card alias management.
    GiftAlias(GiftAliasRequest),
    /// Gift card void.
    GiftVoid(GiftVoidRequest),
    /// Gift card reversal.
    GiftReversal(GiftReversalRequest),
    /// Check sale, return or override.
    Check(CheckRequest),
    /// Check void.
    CheckVoid(CheckVoidRequest),
    /// EBT operation.
    Ebt(EbtRequest),
    /// PIN debit operation.
    Debit(DebitRequest),
}

impl TransactionRequest {
    /// The transaction kind.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Authorize(_) => TransactionKind::Authorize,
            Self::Charge(_) => TransactionKind::Charge,
            Self::Capture(_) => TransactionKind::Capture,
            Self::Refund(_) => TransactionKind::Refund,
            Self::Reverse(_) => TransactionKind::Reverse,
            Self::Verify(_) => TransactionKind::Verify,
            Self::Void(_) => TransactionKind::Void,
            Self::Edit(_) => TransactionKind::Edit,
            Self::CpcEdit(_) => TransactionKind::CpcEdit,
            Self::List(_) => TransactionKind::List,
            Self::Get(_) => TransactionKind::Get,
            Self::BatchClose => TransactionKind::BatchClose,
            Self::GiftCard(r) => r.operation.kind(),
            Self::GiftReplace(_) => TransactionKind::GiftReplace,
            Self::GiftAlias(_) => TransactionKind::GiftAlias,
            Self::GiftVoid(_) => TransactionKind::GiftVoid,
            Self::GiftReversal(_) => TransactionKind::GiftReversal,
            Self::Check(r) => r.action.kind(),
            Self::CheckVoid(_) => TransactionKind::CheckVoid,
            Self::Ebt(r) => r.operation.kind(),
            Self::Debit(r) => r.operation.kind(),
        }
    }

    /// Caller-assigned id sent in the request header.
    #[must_use]
    pub const fn client_transaction_id(&self) -> Option<i64> {
        match self {
            Self::Authorize(r) | Self::Charge(r) => r.client_transaction_id,
            Self::Refund(r) => r.client_transaction_id,
            Self::Reverse(r) => r.client_transaction_id,
            Self::Verify(r) => r.client_transaction_id,
            Self::Void(r) => r.client_transaction_id,
            Self::GiftCard(r) => r.client_transaction_id,
            Self::Check(r) => r.client_transaction_id,
            Self::Ebt(r) => r.client_transaction_id,
            Self::Debit(r) => r.client_transaction_id,
            _ => None,
        }
    }

    /// Filter applied by the response mapper to activity reports.
    #[must_use]
    pub const fn report_filter(&self) -> Option<TransactionKind> {
        match self {
            Self::List(r) => r.filter,
            _ => None,
        }
    }
}
