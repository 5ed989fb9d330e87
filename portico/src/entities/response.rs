//! Typed transaction responses.
//!
//! Built fresh by the response mapper for every reply and never mutated
//! afterwards. Fields are `None` when the reply did not carry them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::details::TransactionDetails;
use super::payment::GiftCard;
use crate::error::{CheckRejection, ErrorCode, ExceptionRecord, GatewayError, PorticoError};
use crate::kind::TransactionKind;

/// Token type the gateway issues when a token is requested.
pub const MULTI_USE_TOKEN: &str = "multi_use";

/// Tokenization outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    /// Token value; absent when tokenization failed.
    pub value: Option<String>,
    /// Token type.
    pub token_type: String,
    /// Tokenization response code.
    pub rsp_code: Option<String>,
    /// Tokenization response message.
    pub rsp_msg: Option<String>,
}

/// Fields every response carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBase {
    /// Kind of the request that produced this response.
    pub kind: TransactionKind,
    /// Gateway transaction id.
    pub transaction_id: Option<i64>,
    /// Echo of the caller's client transaction id.
    pub client_transaction_id: Option<i64>,
    /// Gateway response code.
    pub gateway_response_code: String,
    /// Gateway response message.
    pub gateway_response_message: Option<String>,
    /// Body response code; `"00"` for kinds without a body.
    pub response_code: Option<String>,
    /// Body response text.
    pub response_text: Option<String>,
    /// Retrieval reference number.
    pub reference_number: Option<String>,
    /// Gateway response timestamp.
    pub response_date: Option<DateTime<Utc>>,
    /// Token outcome, when a token was requested.
    pub token_data: Option<TokenData>,
}

/// Authorize, charge and verify outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Issuer authorization code.
    pub authorization_code: Option<String>,
    /// Address verification result code.
    pub avs_result_code: Option<String>,
    /// Address verification result text.
    pub avs_result_text: Option<String>,
    /// Card verification result code.
    pub cvv_result_code: Option<String>,
    /// Card verification result text.
    pub cvv_result_text: Option<String>,
    /// Commercial card indicator.
    pub cpc_indicator: Option<String>,
    /// Amount actually authorized; lower on partial approval.
    pub authorized_amount: Option<Decimal>,
    /// Card brand.
    pub card_type: Option<String>,
    /// Soft descriptor echoed by the gateway.
    pub descriptor: Option<String>,
}

/// Reversal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Address verification result code.
    pub avs_result_code: Option<String>,
    /// Address verification result text.
    pub avs_result_text: Option<String>,
    /// Card verification result code.
    pub cvv_result_code: Option<String>,
    /// Card verification result text.
    pub cvv_result_text: Option<String>,
    /// Commercial card indicator.
    pub cpc_indicator: Option<String>,
}

/// Batch close outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Closed batch id.
    pub batch_id: Option<i64>,
    /// Number of transactions in the batch.
    pub transaction_count: Option<i64>,
    /// Batch total.
    pub total_amount: Option<Decimal>,
    /// Batch sequence number.
    pub sequence_number: Option<i64>,
}

/// Detail report for one past transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// Common fields of the report call itself.
    pub base: TransactionBase,
    /// Original transaction this one refers to.
    pub original_transaction_id: Option<i64>,
    /// Gateway service name of the reported transaction.
    pub service_name: Option<String>,
    /// Kind of the reported transaction, when known.
    pub reported_kind: Option<TransactionKind>,
    /// Masked card number.
    pub masked_card_number: Option<String>,
    /// Transaction timestamp.
    pub transaction_date: Option<DateTime<Utc>>,
    /// Authorized amount.
    pub authorized_amount: Option<Decimal>,
    /// Settlement amount.
    pub settlement_amount: Option<Decimal>,
    /// Tip amount.
    pub gratuity_amount: Option<Decimal>,
    /// Issuer authorization code.
    pub authorization_code: Option<String>,
    /// Address verification result code.
    pub avs_result_code: Option<String>,
    /// Card verification result code.
    pub cvv_result_code: Option<String>,
    /// Commercial card indicator.
    pub cpc_indicator: Option<String>,
    /// Issuer response code of the reported transaction.
    pub issuer_response_code: Option<String>,
    /// Issuer response text of the reported transaction.
    pub issuer_response_text: Option<String>,
    /// Additional transaction fields sent with the reported transaction.
    pub details: Option<TransactionDetails>,
    /// Failure of the reported transaction, if it failed.
    pub exception: Option<ExceptionRecord>,
}

/// One record of an activity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Gateway transaction id.
    pub transaction_id: Option<i64>,
    /// Original transaction this one refers to.
    pub original_transaction_id: Option<i64>,
    /// Client transaction id.
    pub client_transaction_id: Option<i64>,
    /// Gateway service name.
    pub service_name: Option<String>,
    /// Kind, when the service name is known.
    pub kind: Option<TransactionKind>,
    /// Masked card number.
    pub masked_card_number: Option<String>,
    /// Transaction timestamp.
    pub transaction_date: Option<DateTime<Utc>>,
    /// Authorized amount.
    pub amount: Option<Decimal>,
    /// Settlement amount.
    pub settlement_amount: Option<Decimal>,
    /// Issuer authorization code.
    pub authorization_code: Option<String>,
    /// Gateway response code.
    pub gateway_response_code: Option<String>,
    /// Gateway response message.
    pub gateway_response_message: Option<String>,
    /// Issuer response code.
    pub issuer_response_code: Option<String>,
    /// Issuer response text.
    pub issuer_response_text: Option<String>,
    /// Transaction status (`A` active, `C` closed, `V` voided, ...).
    pub status: Option<String>,
    /// Failure of the reported transaction, if it failed.
    pub exception: Option<ExceptionRecord>,
}

/// Activity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    /// Common fields of the report call itself.
    pub base: TransactionBase,
    /// Records in reply order, after filtering.
    pub records: Vec<TransactionSummary>,
}

/// Gift card outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Authorization code.
    pub authorization_code: Option<String>,
    /// Remaining dollar balance.
    pub balance_amount: Option<Decimal>,
    /// Remaining points balance.
    pub points_balance_amount: Option<Decimal>,
    /// Rewards earned.
    pub rewards: Option<String>,
    /// Processor notes.
    pub notes: Option<String>,
    /// Amount charged to the card on a partial approval.
    pub split_tender_card_amount: Option<Decimal>,
    /// Amount still due on a partial approval.
    pub split_tender_balance_due: Option<Decimal>,
}

/// Gift card alias outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftAliasResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Card bound to the alias.
    pub card: Option<GiftCard>,
}

/// Check outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Authorization code.
    pub authorization_code: Option<String>,
    /// Processor messages attached to an accepted check.
    pub details: Vec<CheckRejection>,
}

/// EBT outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbtResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Authorization code.
    pub authorization_code: Option<String>,
    /// Remaining benefit balance.
    pub balance_amount: Option<Decimal>,
}

/// PIN debit outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitResponse {
    /// Common fields.
    pub base: TransactionBase,
    /// Authorization code.
    pub authorization_code: Option<String>,
    /// Amount approved; lower than requested on a partial approval.
    pub authorized_amount: Option<Decimal>,
    /// Available balance reported by the issuer.
    pub available_balance: Option<Decimal>,
}

/// Closed union of response shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionResponse {
    /// Authorize, charge, verify.
    Authorization(AuthorizationResponse),
    /// Capture, refund, void, edit, CPC edit: header only.
    Basic(TransactionBase),
    /// Reverse.
    Reversal(ReversalResponse),
    /// Batch close.
    Batch(BatchResponse),
    /// Detail report.
    Detail(Box<TransactionDetail>),
    /// Activity report.
    Activity(ActivityReport),
    /// Gift card operations other than alias.
    GiftCard(GiftCardResponse),
    /// Gift card alias.
    GiftAlias(GiftAliasResponse),
    /// Check operations.
    Check(CheckResponse),
    /// EBT operations.
    Ebt(EbtResponse),
    /// PIN debit operations.
    Debit(DebitResponse),
}

impl TransactionResponse {
    /// Common fields.
    #[must_use]
    pub fn base(&self) -> &TransactionBase {
        match self {
            Self::Authorization(r) => &r.base,
            Self::Basic(base) => base,
            Self::Reversal(r) => &r.base,
            Self::Batch(r) => &r.base,
            Self::Detail(r) => &r.base,
            Self::Activity(r) => &r.base,
            Self::GiftCard(r) => &r.base,
            Self::GiftAlias(r) => &r.base,
            Self::Check(r) => &r.base,
            Self::Ebt(r) => &r.base,
            Self::Debit(r) => &r.base,
        }
    }

    /// Gateway transaction id.
    #[must_use]
    pub fn transaction_id(&self) -> Option<i64> {
        self.base().transaction_id
    }

    /// Body response code.
    #[must_use]
    pub fn response_code(&self) -> Option<&str> {
        self.base().response_code.as_deref()
    }
}

fn shape_mismatch(kind: TransactionKind) -> PorticoError {
    GatewayError::new(
        ErrorCode::UnexpectedGatewayResponse,
        format!("Unexpected response shape for {kind}."),
    )
    .into()
}

macro_rules! response_shape {
    ($variant:ident => $ty:ty) => {
        impl TryFrom<TransactionResponse> for $ty {
            type Error = PorticoError;

            fn try_from(response: TransactionResponse) -> Result<Self, Self::Error> {
                match response {
                    TransactionResponse::$variant(inner) => Ok(inner),
                    other => Err(shape_mismatch(other.base().kind)),
                }
            }
        }
    };
}

response_shape!(Authorization => AuthorizationResponse);
response_shape!(Basic => TransactionBase);
response_shape!(Reversal => ReversalResponse);
response_shape!(Batch => BatchResponse);
response_shape!(Activity => ActivityReport);
response_shape!(GiftCard => GiftCardResponse);
response_shape!(GiftAlias => GiftAliasResponse);
response_shape!(Check => CheckResponse);
response_shape!(Ebt => EbtResponse);
response_shape!(Debit => DebitResponse);

impl TryFrom<TransactionResponse> for TransactionDetail {
    type Error = PorticoError;

    fn try_from(response: TransactionResponse) -> Result<Self, Self::Error> {
        match response {
            TransactionResponse::Detail(inner) => Ok(*inner),
            other => Err(shape_mismatch(other.base().kind)),
        }
    }
}
