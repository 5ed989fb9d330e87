use rust_decimal::Decimal;

use super::run;
use crate::client::PorticoClient;
use crate::entities::{
    CardHolder, CardToken, DebitOperation, DebitRequest, DebitResponse, TrackData,
    TransactionDetails, TransactionRequest,
};
use crate::error::PorticoError;

/// PIN debit sale, return, reversal, add value or balance inquiry.
///
/// The card is read from track data or a token; debit never accepts a
/// manually keyed number.
#[derive(Debug, Clone)]
pub struct DebitBuilder<'a> {
    client: &'a PorticoClient,
    request: DebitRequest,
}

impl<'a> DebitBuilder<'a> {
    pub(crate) fn new(
        client: &'a PorticoClient,
        operation: DebitOperation,
        amount: Option<Decimal>,
    ) -> Self {
        Self {
            client,
            request: DebitRequest::new(operation, amount),
        }
    }

    /// Pays with swiped or contactless track data.
    #[must_use]
    pub fn with_track(mut self, track: TrackData) -> Self {
        self.request.payment.track = Some(track);
        self
    }

    /// Pays with a multi-use token.
    #[must_use]
    pub fn with_token(mut self, token: CardToken) -> Self {
        self.request.payment.token = Some(token);
        self
    }

    /// Encrypted PIN block.
    #[must_use]
    pub fn with_pin_block(mut self, pin_block: impl Into<String>) -> Self {
        self.request.pin_block = Some(pin_block.into());
        self
    }

    /// Cash back amount.
    #[must_use]
    pub const fn with_cash_back(mut self, amount: Decimal) -> Self {
        self.request.cash_back = Some(amount);
        self
    }

    /// Original transaction of a return or reversal.
    #[must_use]
    pub const fn with_transaction_id(mut self, id: i64) -> Self {
        self.request.transaction_id = Some(id);
        self
    }

    /// New authorized amount for a partial reversal.
    #[must_use]
    pub const fn with_auth_amount(mut self, amount: Decimal) -> Self {
        self.request.auth_amount = Some(amount);
        self
    }

    /// Card holder.
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

    /// Requests a multi-use token for the card.
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
        TransactionRequest::Debit(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<DebitResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}
