//! Typed transaction builders.
//!
//! One builder per transaction kind. Setters only record values; every rule
//! runs at `execute()` time, so a builder can be filled in any order and
//! executed more than once. Each `execute()` is an independent submission.
//!
//! ```rust,no_run
//! # async fn run(client: &portico::PorticoClient) -> Result<(), portico::PorticoError> {
//! use portico::entities::CreditCard;
//! use rust_decimal::Decimal;
//!
//! let response = client
//!     .charge(Decimal::new(1000, 2))
//!     .with_card(CreditCard::new("4111111111111111", 12, 2030).with_cvv("123"))
//!     .with_allow_duplicates(true)
//!     .execute()
//!     .await?;
//! println!("{:?}", response.authorization_code);
//! # Ok(())
//! # }
//! ```

/// Generates the five payment method setters over `self.request.payment`.
macro_rules! payment_setters {
    () => {
        /// Pays with a manually entered card.
        #[must_use]
        pub fn with_card(mut self, card: $crate::entities::CreditCard) -> Self {
            self.request.payment.card = Some(card);
            self
        }

        /// Pays with swiped or contactless track data.
        #[must_use]
        pub fn with_track(mut self, track: $crate::entities::TrackData) -> Self {
            self.request.payment.track = Some(track);
            self
        }

        /// Pays with a multi-use token.
        #[must_use]
        pub fn with_token(mut self, token: $crate::entities::CardToken) -> Self {
            self.request.payment.token = Some(token);
            self
        }

        /// Pays with a decrypted wallet payment.
        #[must_use]
        pub fn with_wallet(mut self, wallet: $crate::entities::WalletPayment) -> Self {
            self.request.payment.wallet = Some(wallet);
            self
        }

        /// Pays with a stored payment method key.
        #[must_use]
        pub fn with_payment_method_key(mut self, key: impl Into<String>) -> Self {
            self.request.payment.method_key = Some(key.into());
            self
        }
    };
}

mod check;
mod credit;
mod debit;
mod ebt;
mod gift;
mod report;

pub use check::{CheckBuilder, CheckVoidBuilder};
pub use credit::{
    CaptureBuilder, CpcEditBuilder, CreditAuthBuilder, EditBuilder, RefundBuilder, ReverseBuilder,
    VerifyBuilder, VoidBuilder,
};
pub use debit::DebitBuilder;
pub use ebt::EbtBuilder;
pub use gift::{
    GiftAliasBuilder, GiftCardBuilder, GiftReplaceBuilder, GiftReversalBuilder, GiftVoidBuilder,
};
pub use report::{BatchCloseBuilder, GetBuilder, ListBuilder};

use crate::client::PorticoClient;
use crate::entities::{TransactionRequest, TransactionResponse};
use crate::error::PorticoError;

/// Executes `request` and narrows the response to the builder's shape.
async fn run<T>(client: &PorticoClient, request: &TransactionRequest) -> Result<T, PorticoError>
where
    T: TryFrom<TransactionResponse, Error = PorticoError>,
{
    client.execute(request).await?.try_into()
}
