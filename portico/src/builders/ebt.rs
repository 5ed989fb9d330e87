use rust_decimal::Decimal;

use super::run;
use crate::client::PorticoClient;
use crate::entities::{
    BalanceType, CardHolder, EbtOperation, EbtRequest, EbtResponse, EbtVoucher,
    TransactionRequest,
};
use crate::error::PorticoError;

/// EBT purchase, refund, cash back, withdrawal, balance or voucher.
#[derive(Debug, Clone)]
pub struct EbtBuilder<'a> {
    client: &'a PorticoClient,
    request: EbtRequest,
}

impl<'a> EbtBuilder<'a> {
    pub(crate) fn new(
        client: &'a PorticoClient,
        operation: EbtOperation,
        amount: Option<Decimal>,
    ) -> Self {
        Self {
            client,
            request: EbtRequest::new(operation, amount),
        }
    }

    payment_setters!();

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

    /// Benefit type for balance inquiries.
    #[must_use]
    pub const fn with_balance_type(mut self, balance_type: BalanceType) -> Self {
        self.request.balance_type = Some(balance_type);
        self
    }

    /// Paper voucher data.
    #[must_use]
    pub fn with_voucher(mut self, voucher: EbtVoucher) -> Self {
        self.request.voucher = Some(voucher);
        self
    }

    /// Card holder.
    #[must_use]
    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.request.card_holder = Some(holder);
        self
    }

    /// Bypasses the gateway duplicate check.
    #[must_use]
    pub const fn with_allow_duplicates(mut self, value: bool) -> Self {
        self.request.allow_duplicates = value;
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
        TransactionRequest::Ebt(self.request.clone())
    }

    /// Validates and submits.
    ///
    /// # Errors
    ///
    /// See [`PorticoClient::execute`].
    pub async fn execute(&self) -> Result<EbtResponse, PorticoError> {
        run(self.client, &self.build()).await
    }
}
