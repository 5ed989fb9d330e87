//! Validation rules.
//!
//! Pure predicates over request state, run by `execute()` before anything is
//! serialized. Each request evaluates its rules in a fixed order and stops at
//! the first violation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::{
    AliasAction, AuthRequest, CaptureRequest, CheckAccount, CheckRequest, CheckVoidRequest,
    CpcEditRequest, DebitOperation, DebitRequest, EbtOperation, EbtRequest, EditRequest,
    GiftAliasRequest, GiftCard, GiftCardRequest, GiftReplaceRequest, GiftReversalRequest,
    ListRequest, RefundRequest, ReverseRequest, TransactionRequest, VerifyRequest,
};
use crate::error::{ArgumentError, ErrorCode, InvalidRequestError, PorticoError};
use crate::kind::TransactionKind;
use crate::serializer::MAX_ADDITIONAL_AMOUNTS;

/// Message of the exactly-one payment method rule.
pub const ONE_PAYMENT_METHOD: &str = "can only use one payment method";

/// Inputs the rules need besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Currencies accepted for credit requests, lower case.
    pub allowed_currencies: &'a [String],
    /// Reference instant for date rules.
    pub now: DateTime<Utc>,
}

/// `value >= 0`.
///
/// # Errors
///
/// Returns [`ErrorCode::InvalidAmount`] naming `param`.
pub fn non_negative(value: Decimal, param: &str) -> Result<(), InvalidRequestError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InvalidRequestError::new(
            ErrorCode::InvalidAmount,
            param,
            "Must be greater than or equal to 0.",
        ));
    }
    Ok(())
}

fn non_negative_opt(value: Option<Decimal>, param: &str) -> Result<(), InvalidRequestError> {
    value.map_or(Ok(()), |v| non_negative(v, param))
}

/// Currency is non-empty and allowed. Comparison ignores case.
///
/// # Errors
///
/// Returns [`ErrorCode::MissingCurrency`] for an empty value and
/// [`ErrorCode::InvalidCurrency`] for one outside `allowed`.
pub fn currency(value: &str, allowed: &[String]) -> Result<(), InvalidRequestError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InvalidRequestError::new(
            ErrorCode::MissingCurrency,
            "currency",
            "Currency cannot be empty.",
        ));
    }
    if !allowed.iter().any(|c| c.eq_ignore_ascii_case(value)) {
        return Err(InvalidRequestError::new(
            ErrorCode::InvalidCurrency,
            "currency",
            format!("'{value}' is not a supported currency."),
        ));
    }
    Ok(())
}

/// `value <= now`.
///
/// # Errors
///
/// Returns [`ErrorCode::InvalidDate`] naming `param`.
pub fn not_in_future(
    value: DateTime<Utc>,
    now: DateTime<Utc>,
    param: &str,
) -> Result<(), InvalidRequestError> {
    if value > now {
        return Err(InvalidRequestError::new(
            ErrorCode::InvalidDate,
            param,
            "Date cannot be in the future.",
        ));
    }
    Ok(())
}

/// Exactly one payment method reference is set.
///
/// # Errors
///
/// Returns [`ErrorCode::MultiplePaymentMethods`] for zero or several.
pub fn one_payment_method(count: usize) -> Result<(), ArgumentError> {
    if count == 1 {
        Ok(())
    } else {
        Err(ArgumentError::new(
            ErrorCode::MultiplePaymentMethods,
            ONE_PAYMENT_METHOD,
        ))
    }
}

/// A required field is present.
///
/// # Errors
///
/// Returns [`ErrorCode::MissingArgument`] naming the field and kind.
pub fn required<T>(value: Option<T>, field: &str, kind: TransactionKind) -> Result<T, ArgumentError> {
    value.ok_or_else(|| ArgumentError::missing(field, kind.tag()))
}

fn gift_card(card: &GiftCard) -> Result<(), ArgumentError> {
    one_payment_method(card.reference_count())
}

/// Request types that can check themselves before submission.
pub trait Validate {
    /// Runs every rule in order and returns the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`PorticoError::Argument`] for missing or conflicting fields
    /// and [`PorticoError::InvalidRequest`] for bad domain values.
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), PorticoError>;
}

impl Validate for TransactionRequest {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        match self {
            Self::Authorize(r) | Self::Charge(r) => r.validate(ctx),
            Self::Capture(r) => r.validate(ctx),
            Self::Refund(r) => r.validate(ctx),
            Self::Reverse(r) => r.validate(ctx),
            Self::Verify(r) => r.validate(ctx),
            Self::Void(r) => {
                required(r.transaction_id, "transaction_id", TransactionKind::Void)?;
                Ok(())
            }
            Self::Edit(r) => r.validate(ctx),
            Self::CpcEdit(r) => r.validate(ctx),
            Self::List(r) => r.validate(ctx),
            Self::Get(r) => {
                required(r.transaction_id, "transaction_id", TransactionKind::Get)?;
                Ok(())
            }
            Self::BatchClose => Ok(()),
            Self::GiftCard(r) => r.validate(ctx),
            Self::GiftReplace(r) => r.validate(ctx),
            Self::GiftAlias(r) => r.validate(ctx),
            Self::GiftVoid(r) => {
                required(r.transaction_id, "transaction_id", TransactionKind::GiftVoid)?;
                Ok(())
            }
            Self::GiftReversal(r) => r.validate(ctx),
            Self::Check(r) => r.validate(ctx),
            Self::CheckVoid(r) => r.validate(ctx),
            Self::Ebt(r) => r.validate(ctx),
            Self::Debit(r) => r.validate(ctx),
        }
    }
}

impl Validate for AuthRequest {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        non_negative(self.amount, "amount")?;
        currency(&self.currency, ctx.allowed_currencies)?;
        one_payment_method(self.payment.count())?;
        non_negative_opt(self.gratuity, "gratuity")?;
        non_negative_opt(self.convenience_amount, "convenience_amount")?;
        non_negative_opt(self.shipping_amount, "shipping_amount")?;
        if let Some(auto) = &self.auto_substantiation {
            if auto.additional_amounts.len() > MAX_ADDITIONAL_AMOUNTS {
                return Err(ArgumentError::new(
                    ErrorCode::InvalidArgument,
                    format!("at most {MAX_ADDITIONAL_AMOUNTS} additional amounts are allowed"),
                )
                .into());
            }
            for line in &auto.additional_amounts {
                non_negative(line.amount, "additional_amounts")?;
            }
        }
        Ok(())
    }
}

impl Validate for VerifyRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        one_payment_method(self.payment.count())?;
        Ok(())
    }
}

impl Validate for CaptureRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        required(self.transaction_id, "transaction_id", TransactionKind::Capture)?;
        non_negative_opt(self.amount, "amount")?;
        non_negative_opt(self.gratuity, "gratuity")?;
        Ok(())
    }
}

impl Validate for RefundRequest {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        non_negative(self.amount, "amount")?;
        currency(&self.currency, ctx.allowed_currencies)?;
        one_payment_method(self.payment.count() + usize::from(self.transaction_id.is_some()))?;
        Ok(())
    }
}

impl Validate for ReverseRequest {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        non_negative(self.amount, "amount")?;
        currency(&self.currency, ctx.allowed_currencies)?;
        non_negative_opt(self.auth_amount, "auth_amount")?;
        one_payment_method(self.reference_count())?;
        Ok(())
    }
}

impl Validate for EditRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        required(self.transaction_id, "transaction_id", TransactionKind::Edit)?;
        non_negative_opt(self.amount, "amount")?;
        non_negative_opt(self.gratuity, "gratuity")?;
        Ok(())
    }
}

impl Validate for CpcEditRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        required(self.transaction_id, "transaction_id", TransactionKind::CpcEdit)?;
        let cpc = required(self.cpc.as_ref(), "cpc_data", TransactionKind::CpcEdit)?;
        non_negative_opt(cpc.tax_amount, "tax_amount")?;
        Ok(())
    }
}

impl Validate for ListRequest {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        let start = required(self.start, "start_date", TransactionKind::List)?;
        let end = required(self.end, "end_date", TransactionKind::List)?;
        not_in_future(start, ctx.now, "start_date")?;
        not_in_future(end, ctx.now, "end_date")?;
        if start > end {
            return Err(InvalidRequestError::new(
                ErrorCode::InvalidDate,
                "start_date",
                "Start date must not be after end date.",
            )
            .into());
        }
        Ok(())
    }
}

impl Validate for GiftCardRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        gift_card(&self.card)?;
        if self.operation.requires_amount() {
            let amount = required(self.amount, "amount", self.operation.kind())?;
            non_negative(amount, "amount")?;
        }
        non_negative_opt(self.gratuity, "gratuity")?;
        Ok(())
    }
}

impl Validate for GiftReplaceRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        let kind = TransactionKind::GiftReplace;
        gift_card(required(self.old_card.as_ref(), "old_card", kind)?)?;
        gift_card(required(self.new_card.as_ref(), "new_card", kind)?)?;
        Ok(())
    }
}

impl Validate for GiftAliasRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        let kind = TransactionKind::GiftAlias;
        if self.alias.trim().is_empty() {
            return Err(ArgumentError::missing("alias", kind.tag()).into());
        }
        match (self.action, &self.card) {
            (AliasAction::Add | AliasAction::Delete, None) => {
                Err(ArgumentError::missing("card", kind.tag()).into())
            }
            (_, Some(card)) => gift_card(card).map_err(PorticoError::from),
            (AliasAction::Create, None) => Ok(()),
        }
    }
}

impl Validate for GiftReversalRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        non_negative(self.amount, "amount")?;
        one_payment_method(
            usize::from(self.card.is_some()) + usize::from(self.transaction_id.is_some()),
        )?;
        if let Some(card) = &self.card {
            gift_card(card)?;
        }
        Ok(())
    }
}

fn check_account(account: &CheckAccount, kind: TransactionKind) -> Result<(), ArgumentError> {
    if account.micr_data.is_none() {
        required(account.routing_number.as_ref(), "routing_number", kind)?;
        required(account.account_number.as_ref(), "account_number", kind)?;
    }
    if account.sec_code.trim().is_empty() {
        return Err(ArgumentError::missing("sec_code", kind.tag()));
    }
    Ok(())
}

impl Validate for CheckRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        non_negative(self.amount, "amount")?;
        one_payment_method(
            usize::from(self.account.is_some()) + usize::from(self.token.is_some()),
        )?;
        if let Some(account) = &self.account {
            check_account(account, self.action.kind())?;
        }
        Ok(())
    }
}

impl Validate for CheckVoidRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        let refs = usize::from(self.transaction_id.is_some())
            + usize::from(self.original_client_transaction_id.is_some());
        if refs != 1 {
            return Err(ArgumentError::new(
                ErrorCode::InvalidArgument,
                "exactly one of transaction_id or client_transaction_id is required for CheckVoid",
            )
            .into());
        }
        Ok(())
    }
}

impl Validate for EbtRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        let kind = self.operation.kind();
        if self.payment.wallet.is_some() || self.payment.method_key.is_some() {
            return Err(ArgumentError::new(
                ErrorCode::InvalidArgument,
                format!("{kind} accepts only a card, track data or a token"),
            )
            .into());
        }
        one_payment_method(self.payment.count())?;
        if self.operation == EbtOperation::Balance {
            required(self.balance_type, "balance_type", kind)?;
        } else {
            non_negative(required(self.amount, "amount", kind)?, "amount")?;
        }
        if self.operation == EbtOperation::VoucherPurchase {
            required(self.voucher.as_ref(), "voucher", kind)?;
        } else {
            required(self.pin_block.as_ref(), "pin_block", kind)?;
        }
        if self.operation == EbtOperation::CashBack {
            non_negative(required(self.cash_back, "cash_back", kind)?, "cash_back")?;
        }
        Ok(())
    }
}

impl Validate for DebitRequest {
    fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<(), PorticoError> {
        let kind = self.operation.kind();
        let slots = &self.payment;
        if slots.card.is_some() || slots.wallet.is_some() || slots.method_key.is_some() {
            return Err(ArgumentError::new(
                ErrorCode::InvalidArgument,
                format!("{kind} accepts only track data or a token"),
            )
            .into());
        }
        one_payment_method(self.reference_count())?;
        if self.operation != DebitOperation::Balance {
            non_negative(required(self.amount, "amount", kind)?, "amount")?;
        }
        if self.operation.requires_pin() {
            required(self.pin_block.as_ref(), "pin_block", kind)?;
        }
        non_negative_opt(self.cash_back, "cash_back")?;
        non_negative_opt(self.auth_amount, "auth_amount")?;
        Ok(())
    }
}
