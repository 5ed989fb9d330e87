//! The transaction pipeline.
//!
//! [`PorticoClient`] owns the configuration and the transport and runs one
//! request through configuration check, validation, serialization,
//! submission, response mapping and recovery. Builders are thin typed
//! fronts over [`PorticoClient::execute`].

use std::fmt;
use std::sync::Arc;

use portico_proto::Reply;

use crate::builders::{
    BatchCloseBuilder, CaptureBuilder, CheckBuilder, CheckVoidBuilder, CpcEditBuilder,
    CreditAuthBuilder, DebitBuilder, EbtBuilder, EditBuilder, GetBuilder, GiftAliasBuilder,
    GiftCardBuilder, GiftReplaceBuilder, GiftReversalBuilder, GiftVoidBuilder, ListBuilder,
    RefundBuilder, ReverseBuilder, VerifyBuilder, VoidBuilder,
};
use crate::config::ServicesConfig;
use crate::entities::{
    AliasAction, CheckAction, DebitOperation, EbtOperation, GiftCard, GiftOperation,
    TransactionRequest, TransactionResponse,
};
use crate::error::{ArgumentError, ErrorCode, GatewayError, PorticoError};
use crate::kind::TransactionKind;
use crate::mapper::map_response;
use crate::recovery::{
    Assessment, assess, resolve_gateway_timeout, resolve_issuer_timeout, reversal_for,
};
use crate::serializer::serialize;
use crate::transport::{GatewayRequest, Transport};
use crate::validation::Validate;

use rust_decimal::Decimal;

macro_rules! traced {
    ($fut:expr, $span:expr) => {{
        #[cfg(feature = "telemetry")]
        {
            use tracing::Instrument;
            $fut.instrument($span).await
        }
        #[cfg(not(feature = "telemetry"))]
        {
            $fut.await
        }
    }};
}

/// Gateway client shared by every builder.
///
/// Constructed once by the host with a configuration and a transport.
/// Holds no per-request state; concurrent `execute` calls are independent
/// submissions.
#[derive(Clone)]
pub struct PorticoClient {
    config: ServicesConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for PorticoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PorticoClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PorticoClient {
    /// Creates a client.
    #[must_use]
    pub fn new(config: ServicesConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ServicesConfig {
        &self.config
    }

    /// Runs a request through the full pipeline.
    ///
    /// Every call is an independent submission. A gateway or issuer timeout
    /// on an authorization or sale triggers exactly one reversal before the
    /// timeout is raised.
    ///
    /// # Errors
    ///
    /// - [`PorticoError::Authentication`] when the configuration is invalid,
    ///   before anything is serialized;
    /// - [`PorticoError::Argument`] or [`PorticoError::InvalidRequest`] when
    ///   a validation rule fails, before anything is submitted;
    /// - [`PorticoError::Gateway`], [`PorticoError::Credit`] or
    ///   [`PorticoError::Check`] for transport failures and translated
    ///   response codes.
    pub async fn execute(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, PorticoError> {
        traced!(
            self.process(request),
            tracing::info_span!("portico.execute", kind = %request.kind())
        )
    }

    async fn process(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionResponse, PorticoError> {
        let kind = request.kind();
        self.config.validate()?;
        request.validate(&self.config.validation_context())?;

        let reply = self.submit(request).await?;
        let response = map_response(kind, &reply, request.report_filter())?;

        match assess(kind, &reply) {
            Assessment::Accepted => Ok(response),
            Assessment::Rejected(err) => Err(err),
            Assessment::GatewayTimeout(header) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(
                    %kind,
                    gateway_txn_id = ?header.gateway_txn_id,
                    "gateway timeout, reversing"
                );
                let reversal = self.reverse(request).await;
                Err(resolve_gateway_timeout(&header, reversal))
            }
            Assessment::IssuerTimeout { header, rsp_text } => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(
                    %kind,
                    gateway_txn_id = ?header.gateway_txn_id,
                    "issuer timeout, reversing"
                );
                let reversal = self.reverse(request).await;
                Err(resolve_issuer_timeout(&header, rsp_text, reversal))
            }
        }
    }

    async fn submit(&self, request: &TransactionRequest) -> Result<Reply, PorticoError> {
        let gateway_request = GatewayRequest {
            header: self.config.request_header(request.client_transaction_id()),
            transaction: serialize(request),
        };
        self.transport.submit(&gateway_request).await.map_err(|e| {
            #[cfg(feature = "telemetry")]
            tracing::error!(error = %e, "transport failure");
            GatewayError::new(
                ErrorCode::UnknownGatewayError,
                format!("Error occurred while communicating with the gateway: {e}"),
            )
            .into()
        })
    }

    /// Submits the compensating reversal for `original`. Never recovers.
    async fn reverse(&self, original: &TransactionRequest) -> Result<(), PorticoError> {
        let reversal = reversal_for(original).ok_or_else(|| {
            ArgumentError::new(
                ErrorCode::InvalidArgument,
                format!("{} cannot be reversed", original.kind()),
            )
        })?;
        let request = TransactionRequest::Reverse(reversal);
        let outcome = match self.submit(&request).await {
            Ok(reply) => assess(TransactionKind::Reverse, &reply).into_result(),
            Err(err) => Err(err),
        };
        #[cfg(feature = "telemetry")]
        if let Err(err) = &outcome {
            tracing::error!(code = %err.code(), error = %err, "reversal failed");
        }
        outcome
    }

    /// Authorization without capture.
    #[must_use]
    pub fn authorize(&self, amount: Decimal) -> CreditAuthBuilder<'_> {
        CreditAuthBuilder::new(self, TransactionKind::Authorize, amount)
    }

    /// Authorization with capture.
    #[must_use]
    pub fn charge(&self, amount: Decimal) -> CreditAuthBuilder<'_> {
        CreditAuthBuilder::new(self, TransactionKind::Charge, amount)
    }

    /// Account verification.
    #[must_use]
    pub fn verify(&self) -> VerifyBuilder<'_> {
        VerifyBuilder::new(self)
    }

    /// Adds an authorization to the batch.
    #[must_use]
    pub fn capture(&self, transaction_id: i64) -> CaptureBuilder<'_> {
        CaptureBuilder::new(self, transaction_id)
    }

    /// Returns funds.
    #[must_use]
    pub fn refund(&self, amount: Decimal) -> RefundBuilder<'_> {
        RefundBuilder::new(self, amount)
    }

    /// Reverses an authorization.
    #[must_use]
    pub fn reverse_authorization(&self, amount: Decimal) -> ReverseBuilder<'_> {
        ReverseBuilder::new(self, amount)
    }

    /// Voids a transaction in the open batch.
    #[must_use]
    pub fn void(&self, transaction_id: i64) -> VoidBuilder<'_> {
        VoidBuilder::new(self, transaction_id)
    }

    /// Edits amount or gratuity of an open transaction.
    #[must_use]
    pub fn edit(&self, transaction_id: i64) -> EditBuilder<'_> {
        EditBuilder::new(self, transaction_id)
    }

    /// Attaches commercial card data.
    #[must_use]
    pub fn cpc_edit(&self, transaction_id: i64) -> CpcEditBuilder<'_> {
        CpcEditBuilder::new(self, transaction_id)
    }

    /// Activity report.
    #[must_use]
    pub fn list_transactions(&self) -> ListBuilder<'_> {
        ListBuilder::new(self)
    }

    /// Transaction detail report.
    #[must_use]
    pub fn get(&self, transaction_id: i64) -> GetBuilder<'_> {
        GetBuilder::new(self, transaction_id)
    }

    /// Closes the open batch.
    #[must_use]
    pub fn close_batch(&self) -> BatchCloseBuilder<'_> {
        BatchCloseBuilder::new(self)
    }

    /// Gift card value operation.
    #[must_use]
    pub fn gift_card(&self, operation: GiftOperation, card: GiftCard) -> GiftCardBuilder<'_> {
        GiftCardBuilder::new(self, operation, card)
    }

    /// Moves a gift card balance to a replacement card.
    #[must_use]
    pub fn gift_replace(&self) -> GiftReplaceBuilder<'_> {
        GiftReplaceBuilder::new(self)
    }

    /// Gift card alias management.
    #[must_use]
    pub fn gift_alias(&self, action: AliasAction, alias: impl Into<String>) -> GiftAliasBuilder<'_> {
        GiftAliasBuilder::new(self, action, alias.into())
    }

    /// Voids a gift card transaction.
    #[must_use]
    pub fn gift_void(&self, transaction_id: i64) -> GiftVoidBuilder<'_> {
        GiftVoidBuilder::new(self, transaction_id)
    }

    /// Reverses a gift card transaction.
    #[must_use]
    pub fn gift_reversal(&self, amount: Decimal) -> GiftReversalBuilder<'_> {
        GiftReversalBuilder::new(self, amount)
    }

    /// Check sale, return or override.
    #[must_use]
    pub fn check(&self, action: CheckAction, amount: Decimal) -> CheckBuilder<'_> {
        CheckBuilder::new(self, action, amount)
    }

    /// Voids a check transaction.
    #[must_use]
    pub fn check_void(&self) -> CheckVoidBuilder<'_> {
        CheckVoidBuilder::new(self)
    }

    /// PIN debit operation.
    #[must_use]
    pub fn debit(&self, operation: DebitOperation, amount: Option<Decimal>) -> DebitBuilder<'_> {
        DebitBuilder::new(self, operation, amount)
    }

    /// EBT operation.
    #[must_use]
    pub fn ebt(&self, operation: EbtOperation, amount: Option<Decimal>) -> EbtBuilder<'_> {
        EbtBuilder::new(self, operation, amount)
    }
}
