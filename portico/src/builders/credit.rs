use rust_decimal::Decimal;

use super::run;
use crate::client::PorticoClient;
use crate::entities::{
    AuthRequest, AuthorizationResponse, AutoSubstantiation, CaptureRequest, CardHolder,
    CpcData, CpcEditRequest, DirectMarketData, EditRequest, RefundRequest, ReversalResponse,
    ReverseRequest, TransactionBase, TransactionDetails, TransactionRequest, VerifyRequest,
    VoidRequest,
};
use crate::error::PorticoError;
use crate::kind::TransactionKind;

/// Authorize or charge.
#[derive(Debug, Clone)]
pub struct CreditAuthBuilder<'a> {
    client: &'a PorticoClient,
    capture: bool,
    request: AuthRequest,
}

impl<'a> CreditAuthBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient, kind: TransactionKind, amount: Decimal) -> Self {
        Self {
            client,
            capture: kind == TransactionKind::Charge,
            request: AuthRequest::new(amount),
        }
    }

    payment_setters!();

    /// ISO currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.request.currency = currency.into();
        self
    }

    /// Card holder for AVS.
    #[must_use]
    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.request.card_holder = Some(holder);
        self
    }

    /// Memo, invoice number and customer id.
    #[must_use]
    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.request.details = Some(details);
        self
    }

    /// Direct-market invoice and shipping date.
    #[must_use]
    pub fn with_direct_market(mut self, data: DirectMarketData) -> Self {
        self.request.direct_market = Some(data);
        self
    }

    /// Healthcare auto-substantiation amounts.
    #[must_use]
    pub fn with_auto_substantiation(mut self, data: AutoSubstantiation) -> Self {
        self.request.auto_substantiation = Some(data);
        self
    }

    /// Asks the issuer for a commercial card indicator.
    #[must_use]
    pub const fn with_cpc_request(mut self, value: bool) -> Self {
        self.request.cpc_request = value;
        self
    }

    /// Tip amount.
    #[must_use]
    pub const fn with_gratuity(mut self, amount: Decimal) -> Self {
        self.request.gratuity = Some(amount);
        self
    }

    /// Convenience fee.
    #[must_use]
    pub const fn with_convenience_amount(mut self, amount: Decimal) -> Self {
        self.request.convenience_amount = Some(amount);
        self
    }

    /// Shipping amount.
    #[must_use]
    pub const fn with_shipping_amount(mut self, amount: Decimal) -> Self {
        self.request.shipping_amount = Some(amount);
        self
    }

    /// Bypasses the gateway duplicate check.
    #[must_use]
    pub const fn with_allow_duplicates(mut self, value: bool) -> Self {
        self.request.allow_duplicates = value;
        self
    }

    /// Accepts a partial approval.
    #[must_use]
    pub const fn with_allow_partial_auth(mut self, value: bool) -> Self {
        self.request.allow_partial_auth = value;
        self
    }

    /// Requests a multi-use token for the payment method.
    #[must_use]
    pub const fn with_request_multi_use_token(mut self, value: bool) -> Self {
        self.request.request_token = value;
        self
    }

    /// Soft descriptor.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.request.descriptor = Some(descriptor.into());
        self
    }

    /// Caller-assigned client transaction id.
    #[must_use]
    pub const fn with_client_transaction_id(mut self, id: i64) -> Self {
        self.request.client_transaction_id = Some(id);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        if self.capture {
            TransactionRequest::Charge(self.request.clone())
        } else {
            TransactionRequest::Authorize(self.request.clone())
        }
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<AuthorizationResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Zero-amount account verification.
#[derive(Debug, Clone)]
pub struct VerifyBuilder<'a> {
    client: &'a PorticoClient,
    request: VerifyRequest,
}

impl<'a> VerifyBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient) -> Self {
        Self {
            client,
            request: VerifyRequest::default(),
        }
    }

    payment_setters!();

    /// Card holder for AVS.
    #[must_use]
    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.request.card_holder = Some(holder);
        self
    }

    /// Requests a multi-use token for the payment method.
    #[must_use]
    pub const fn with_request_multi_use_token(mut self, value: bool) -> Self {
        self.request.request_token = value;
        self
    }

    /// Caller-assigned client transaction id.
    #[must_use]
    pub const fn with_client_transaction_id(mut self, id: i64) -> Self {
        self.request.client_transaction_id = Some(id);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Verify(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<AuthorizationResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Capture of an authorization.
#[derive(Debug, Clone)]
pub struct CaptureBuilder<'a> {
    client: &'a PorticoClient,
    request: CaptureRequest,
}

impl<'a> CaptureBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient, transaction_id: i64) -> Self {
        Self {
            client,
            request: CaptureRequest {
                transaction_id: Some(transaction_id),
                ..CaptureRequest::default()
            },
        }
    }

    /// Final amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: Decimal) -> Self {
        self.request.amount = Some(amount);
        self
    }

    /// Tip amount.
    #[must_use]
    pub const fn with_gratuity(mut self, amount: Decimal) -> Self {
        self.request.gratuity = Some(amount);
        self
    }

    /// Direct-market invoice and shipping date.
    #[must_use]
    pub fn with_direct_market(mut self, data: DirectMarketData) -> Self {
        self.request.direct_market = Some(data);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Capture(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<TransactionBase, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Refund by payment method or by original transaction.
#[derive(Debug, Clone)]
pub struct RefundBuilder<'a> {
    client: &'a PorticoClient,
    request: RefundRequest,
}

impl<'a> RefundBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient, amount: Decimal) -> Self {
        Self {
            client,
            request: RefundRequest::new(amount),
        }
    }

    payment_setters!();

    /// Refunds against an original transaction instead of a payment method.
    #[must_use]
    pub const fn with_transaction_id(mut self, id: i64) -> Self {
        self.request.transaction_id = Some(id);
        self
    }

    /// ISO currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.request.currency = currency.into();
        self
    }

    /// Card holder for AVS.
    #[must_use]
    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.request.card_holder = Some(holder);
        self
    }

    /// Memo, invoice number and customer id.
    #[must_use]
    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.request.details = Some(details);
        self
    }

    /// Direct-market invoice and shipping date.
    #[must_use]
    pub fn with_direct_market(mut self, data: DirectMarketData) -> Self {
        self.request.direct_market = Some(data);
        self
    }

    /// Bypasses the gateway duplicate check.
    #[must_use]
    pub const fn with_allow_duplicates(mut self, value: bool) -> Self {
        self.request.allow_duplicates = value;
        self
    }

    /// Caller-assigned client transaction id.
    #[must_use]
    pub const fn with_client_transaction_id(mut self, id: i64) -> Self {
        self.request.client_transaction_id = Some(id);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Refund(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<TransactionBase, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Reversal by payment method, gateway transaction id or client
/// transaction id.
#[derive(Debug, Clone)]
pub struct ReverseBuilder<'a> {
    client: &'a PorticoClient,
    request: ReverseRequest,
}

impl<'a> ReverseBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient, amount: Decimal) -> Self {
        Self {
            client,
            request: ReverseRequest::new(amount),
        }
    }

    payment_setters!();

    /// References the original by gateway transaction id.
    #[must_use]
    pub const fn with_transaction_id(mut self, id: i64) -> Self {
        self.request.transaction_id = Some(id);
        self
    }

    /// References the original by its client transaction id.
    #[must_use]
    pub const fn with_original_client_transaction_id(mut self, id: i64) -> Self {
        self.request.original_client_transaction_id = Some(id);
        self
    }

    /// New authorized amount for a partial reversal.
    #[must_use]
    pub const fn with_auth_amount(mut self, amount: Decimal) -> Self {
        self.request.auth_amount = Some(amount);
        self
    }

    /// ISO currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.request.currency = currency.into();
        self
    }

    /// Memo, invoice number and customer id.
    #[must_use]
    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.request.details = Some(details);
        self
    }

    /// Caller-assigned client transaction id.
    #[must_use]
    pub const fn with_client_transaction_id(mut self, id: i64) -> Self {
        self.request.client_transaction_id = Some(id);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Reverse(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<ReversalResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Void of an open-batch transaction.
#[derive(Debug, Clone)]
pub struct VoidBuilder<'a> {
    client: &'a PorticoClient,
    request: VoidRequest,
}

impl<'a> VoidBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, transaction_id: i64) -> Self {
        Self {
            client,
            request: VoidRequest {
                transaction_id: Some(transaction_id),
                client_transaction_id: None,
            },
        }
    }

    /// Caller-assigned client transaction id.
    #[must_use]
    pub const fn with_client_transaction_id(mut self, id: i64) -> Self {
        self.request.client_transaction_id = Some(id);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Void(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<TransactionBase, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Amount or gratuity edit.
#[derive(Debug, Clone)]
pub struct EditBuilder<'a> {
    client: &'a PorticoClient,
    request: EditRequest,
}

impl<'a> EditBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient, transaction_id: i64) -> Self {
        Self {
            client,
            request: EditRequest {
                transaction_id: Some(transaction_id),
                ..EditRequest::default()
            },
        }
    }

    /// New amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: Decimal) -> Self {
        self.request.amount = Some(amount);
        self
    }

    /// New tip amount.
    #[must_use]
    pub const fn with_gratuity(mut self, amount: Decimal) -> Self {
        self.request.gratuity = Some(amount);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Edit(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<TransactionBase, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Commercial card data edit.
#[derive(Debug, Clone)]
pub struct CpcEditBuilder<'a> {
    client: &'a PorticoClient,
    request: CpcEditRequest,
}

impl<'a> CpcEditBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, transaction_id: i64) -> Self {
        Self {
            client,
            request: CpcEditRequest {
                transaction_id: Some(transaction_id),
                cpc: None,
            },
        }
    }

    /// PO number and tax data.
    #[must_use]
    pub fn with_cpc_data(mut self, cpc: CpcData) -> Self {
        self.request.cpc = Some(cpc);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::CpcEdit(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<TransactionBase, PorticoError> {
        run(self.client, &self.build()).await
    }
}
