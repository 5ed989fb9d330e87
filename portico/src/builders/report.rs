use chrono::{DateTime, Utc};

use super::run;
use crate::client::PorticoClient;
use crate::entities::{
    ActivityReport, BatchResponse, GetRequest, ListRequest, TransactionDetail, TransactionRequest,
};
use crate::error::PorticoError;
use crate::kind::TransactionKind;

/// Activity report over a UTC date range.
#[derive(Debug, Clone)]
pub struct ListBuilder<'a> {
    client: &'a PorticoClient,
    request: ListRequest,
}

impl<'a> ListBuilder<'a> {
    pub(crate) fn new(client: &'a PorticoClient) -> Self {
        Self {
            client,
            request: ListRequest::default(),
        }
    }

    /// Range start.
    #[must_use]
    pub const fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.request.start = Some(start);
        self
    }

    /// Range end.
    #[must_use]
    pub const fn with_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.request.end = Some(end);
        self
    }

    /// Keeps only records of `kind`, in reply order.
    #[must_use]
    pub const fn with_transaction_type(mut self, kind: TransactionKind) -> Self {
        self.request.filter = Some(kind);
        self
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::List(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<ActivityReport, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Detail report for one transaction.
#[derive(Debug, Clone)]
pub struct GetBuilder<'a> {
    client: &'a PorticoClient,
    request: GetRequest,
}

impl<'a> GetBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient, transaction_id: i64) -> Self {
        Self {
            client,
            request: GetRequest {
                transaction_id: Some(transaction_id),
            },
        }
    }

    /// The accumulated request.
    #[must_use]
    pub fn build(&self) -> TransactionRequest {
        TransactionRequest::Get(self.request.clone())
    }

    /// Validates and submits. Past failures come back as embedded exception
    /// records, not errors.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<TransactionDetail, PorticoError> {
        run(self.client, &self.build()).await
    }
}

/// Closes the open batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchCloseBuilder<'a> {
    client: &'a PorticoClient,
}

impl<'a> BatchCloseBuilder<'a> {
    pub(crate) const fn new(client: &'a PorticoClient) -> Self {
        Self { client }
    }

    /// Submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<BatchResponse, PorticoError> {
        run(self.client, &TransactionRequest::BatchClose).await
    }
}
