use rust_decimal::Decimal;

use super::run;
use crate::client::PorticoClient;
use crate::entities::{
    AliasAction, GiftAliasRequest, GiftAliasResponse, GiftCard, GiftCardRequest,
    GiftCardResponse, GiftCurrency, GiftOperation, GiftReplaceRequest, GiftReversalRequest,
    GiftVoidRequest, TransactionRequest,
};
use crate::error::PorticoError;

/// Activate, add value, balance, deactivate, reward or sale.
#[derive(Debug, Clone)]
pub struct GiftCardBuilder<'a> {
    client: &'a PorticoClient,
    request: GiftCardRequest,
}

impl<'a> GiftCardBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, operation: GiftOperation, card: GiftCard) -> Self {
        Self {
            client,
            request: GiftCardRequest {
                operation,
                card,
                amount: None,
                currency: GiftCurrency::Usd,
                gratuity: None,
                client_transaction_id: None,
            },
        }
    }

    /// Amount; required for value-moving operations.
    #[must_use]
    pub const fn with_amount(mut self, amount: Decimal) -> Self {
        self.request.amount = Some(amount);
        self
    }

    /// Value unit.
    #[must_use]
    pub const fn with_currency(mut self, currency: GiftCurrency) -> Self {
        self.request.currency = currency;
        self
    }

    /// Tip amount, sale only.
    #[must_use]
    pub const fn with_gratuity(mut self, amount: Decimal) -> Self {
        self.request.gratuity = Some(amount);
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
        TransactionRequest::GiftCard(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<GiftCardResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Balance transfer to a replacement card.
#[derive(Debug, Clone)]
pub struct GiftReplaceBuilder<'a> {
    client: &'a PorticoClient,
    request: GiftReplaceRequest,
}

impl<'a> GiftReplaceBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient) -> Self {
        Self {
            client,
            request: GiftReplaceRequest::default(),
        }
    }

    /// Card being replaced.
    #[must_use]
    pub fn with_old_card(mut self, card: GiftCard) -> Self {
        self.request.old_card = Some(card);
        self
    }

    /// Replacement card.
    #[must_use]
    pub fn with_new_card(mut self, card: GiftCard) -> Self {
        self.request.new_card = Some(card);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::GiftReplace(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<GiftCardResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Alias add, delete or create.
#[derive(Debug, Clone)]
pub struct GiftAliasBuilder<'a> {
    client: &'a PorticoClient,
    request: GiftAliasRequest,
}

impl<'a> GiftAliasBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, action: AliasAction, alias: String) -> Self {
        Self {
            client,
            request: GiftAliasRequest {
                action,
                alias,
                card: None,
            },
        }
    }

    /// Card the alias is attached to or removed from.
    #[must_use]
    pub fn with_card(mut self, card: GiftCard) -> Self {
        self.request.card = Some(card);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::GiftAlias(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<GiftAliasResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Gift card void.
#[derive(Debug, Clone)]
pub struct GiftVoidBuilder<'a> {
    client: &'a PorticoClient,
    request: GiftVoidRequest,
}

impl<'a> GiftVoidBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, transaction_id: i64) -> Self {
        Self {
            client,
            request: GiftVoidRequest {
                transaction_id: Some(transaction_id),
            },
        }
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::GiftVoid(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<GiftCardResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Gift card reversal by card or by transaction id.
#[derive(Debug, Clone)]
pub struct GiftReversalBuilder<'a> {
    client: &'a PorticoClient,
    request: GiftReversalRequest,
}

impl<'a> GiftReversalBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, amount: Decimal) -> Self {
        Self {
            client,
            request: GiftReversalRequest {
                amount,
                card: None,
                transaction_id: None,
            },
        }
    }

    /// Card used by the original.
    #[must_use]
    pub fn with_card(mut self, card: GiftCard) -> Self {
        self.request.card = Some(card);
        self
    }

    /// Gateway transaction id of the original.
    #[must_use]
    pub const fn with_transaction_id(mut self, id: i64) -> Self {
        self.request.transaction_id = Some(id);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::GiftReversal(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<GiftCardResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}
