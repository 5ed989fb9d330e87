use rust_decimal::Decimal;

use super::run;
use crate::client::PorticoClient;
use crate::entities::{
    CheckAccount, CheckAction, CheckRequest, CheckResponse, CheckVoidRequest, ConsumerInfo,
    TransactionDetails, TransactionRequest,
};
use crate::error::PorticoError;

/// Check sale, return or override.
#[derive(Debug, Clone)]
pub struct CheckBuilder<'a> {
    client: &'a PorticoClient,
    request: CheckRequest,
}

impl<'a> CheckBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, action: CheckAction, amount: Decimal) -> Self {
        Self {
            client,
            request: CheckRequest {
                action,
                amount,
                account: None,
                token: None,
                consumer: None,
                details: None,
                client_transaction_id: None,
            },
        }
    }

    /// Bank account.
    #[must_use]
    pub fn with_account(mut self, account: CheckAccount) -> Self {
        self.request.account = Some(account);
        self
    }

    /// Tokenized account.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.request.token = Some(token.into());
        self
    }

    /// Check holder.
    #[must_use]
    pub fn with_consumer(mut self, consumer: ConsumerInfo) -> Self {
        self.request.consumer = Some(consumer);
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
        TransactionRequest::Check(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`]. A declined check is a
    /// [`PorticoError::Check`] carrying the processor's rejection details.
    pub async fn execute(&self) -> Result<CheckResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Check void by gateway or client transaction id.
#[derive(Debug, Clone)]
pub struct CheckVoidBuilder<'a> {
    client: &'a PorticoClient,
    request: CheckVoidRequest,
}

impl<'a> CheckVoidBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient) -> Self {
        Self {
            client,
            request: CheckVoidRequest::default(),
        }
    }

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

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::CheckVoid(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<CheckResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}
