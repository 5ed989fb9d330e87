//! Error types for Portico gateway operations.
//!
//! Every failed `execute()` surfaces exactly one [`PorticoError`]. The variant
//! tells the caller who is at fault: the program ([`ArgumentError`]), the
//! domain input ([`InvalidRequestError`]), the configuration
//! ([`AuthenticationError`]), the gateway ([`GatewayError`]), the card issuer
//! ([`CreditError`]) or the ACH processor ([`CheckError`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum PorticoError {
    /// Programmer misuse: missing or conflicting builder fields.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Bad domain input: negative amount, unsupported currency, future date.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Missing or invalid service configuration.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// Gateway-level failure, possibly after a compensating reversal.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Issuer-level failure, possibly after a compensating reversal.
    #[error(transparent)]
    Credit(#[from] CreditError),

    /// ACH/check rejection.
    #[error(transparent)]
    Check(#[from] CheckError),
}

impl PorticoError {
    /// Returns the taxonomy kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Gateway(_) => ErrorKind::Gateway,
            Self::Credit(_) => ErrorKind::Credit,
            Self::Check(_) => ErrorKind::Check,
        }
    }

    /// Returns the machine-readable code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Argument(e) => e.code,
            Self::InvalidRequest(e) => e.code,
            Self::Authentication(e) => e.code,
            Self::Gateway(e) => e.code,
            Self::Credit(e) => e.code,
            Self::Check(e) => e.code,
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Argument(e) => &e.message,
            Self::InvalidRequest(e) => &e.message,
            Self::Authentication(e) => &e.message,
            Self::Gateway(e) => &e.message,
            Self::Credit(e) => &e.message,
            Self::Check(e) => &e.message,
        }
    }

    /// Returns the gateway transaction id the failure refers to, if known.
    #[must_use]
    pub const fn transaction_id(&self) -> Option<i64> {
        match self {
            Self::Credit(e) => e.transaction_id,
            Self::Check(e) => e.transaction_id,
            _ => None,
        }
    }

    /// Takes a plain snapshot of this error.
    #[must_use]
    pub fn record(&self) -> ExceptionRecord {
        let details = match self {
            Self::Gateway(e) => e.gateway_code.clone().map(|code| ErrorDetails::Gateway {
                code,
                message: e.gateway_message.clone(),
            }),
            Self::Credit(e) => e.issuer_code.clone().map(|code| ErrorDetails::Issuer {
                code,
                message: e.issuer_message.clone(),
            }),
            Self::Check(e) => Some(ErrorDetails::Check {
                rejections: e.details.clone(),
            }),
            _ => None,
        };
        ExceptionRecord {
            kind: self.kind(),
            code: self.code(),
            message: self.message().to_owned(),
            details,
            transaction_id: self.transaction_id(),
        }
    }
}

/// Taxonomy kind of a [`PorticoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ArgumentError`].
    Argument,
    /// See [`InvalidRequestError`].
    InvalidRequest,
    /// See [`AuthenticationError`].
    Authentication,
    /// See [`GatewayError`].
    Gateway,
    /// See [`CreditError`].
    Credit,
    /// See [`CheckError`].
    Check,
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    // Input and configuration
    /// A required builder field is absent.
    MissingArgument,
    /// A builder field has a value the operation cannot use.
    InvalidArgument,
    /// Zero or several payment methods were supplied.
    MultiplePaymentMethods,
    /// Amount is negative.
    InvalidAmount,
    /// Currency is not in the allowed set.
    InvalidCurrency,
    /// Currency is empty.
    MissingCurrency,
    /// A report date lies in the future or the range is inverted.
    InvalidDate,
    /// Neither a secret key nor a full credential tuple is configured.
    InvalidConfiguration,

    // Gateway
    /// The gateway rejected the credentials.
    AuthenticationError,
    /// Unclassified gateway failure, including transport errors.
    UnknownGatewayError,
    /// The referenced original transaction does not exist.
    InvalidOriginalTransaction,
    /// No batch is open to close.
    NoOpenBatch,
    /// Commercial card data was rejected.
    InvalidCpcData,
    /// Card data was rejected.
    InvalidCardData,
    /// The card number is not valid.
    InvalidNumber,
    /// The gateway timed out reaching the processor.
    GatewayTimeout,
    /// The reply could not be interpreted.
    UnexpectedGatewayResponse,
    /// A reversal was issued after a gateway timeout.
    GatewayTimeoutReversalError,

    // Issuer
    /// The card number is incorrect.
    IncorrectNumber,
    /// The expiry date is invalid.
    InvalidExpiry,
    /// The PIN is invalid.
    InvalidPin,
    /// Too many PIN attempts.
    PinEntriesExceeded,
    /// The PIN could not be verified.
    PinVerification,
    /// The issuer declined.
    CardDeclined,
    /// The issuer could not process the card.
    ProcessingError,
    /// The issuer timed out.
    IssuerTimeout,
    /// A reversal was issued after an issuer timeout.
    IssuerTimeoutReversalError,
    /// Unclassified issuer failure.
    UnknownCreditError,
    /// The security code is incorrect.
    IncorrectCvc,
    /// The card has expired.
    ExpiredCard,
    /// The issuer flagged the transaction.
    PossibleFraudDetected,
    /// Unclassified gift card failure.
    UnknownGiftError,

    // Check
    /// The ACH processor rejected the check.
    CheckRejected,
}

impl ErrorCode {
    /// Returns the `snake_case` name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingArgument => "missing_argument",
            Self::InvalidArgument => "invalid_argument",
            Self::MultiplePaymentMethods => "multiple_payment_methods",
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidCurrency => "invalid_currency",
            Self::MissingCurrency => "missing_currency",
            Self::InvalidDate => "invalid_date",
            Self::InvalidConfiguration => "invalid_configuration",
            Self::AuthenticationError => "authentication_error",
            Self::UnknownGatewayError => "unknown_gateway_error",
            Self::InvalidOriginalTransaction => "invalid_original_transaction",
            Self::NoOpenBatch => "no_open_batch",
            Self::InvalidCpcData => "invalid_cpc_data",
            Self::InvalidCardData => "invalid_card_data",
            Self::InvalidNumber => "invalid_number",
            Self::GatewayTimeout => "gateway_timeout",
            Self::UnexpectedGatewayResponse => "unexpected_gateway_response",
            Self::GatewayTimeoutReversalError => "gateway_timeout_reversal_error",
            Self::IncorrectNumber => "incorrect_number",
            Self::InvalidExpiry => "invalid_expiry",
            Self::InvalidPin => "invalid_pin",
            Self::PinEntriesExceeded => "pin_entries_exceeded",
            Self::PinVerification => "pin_verification",
            Self::CardDeclined => "card_declined",
            Self::ProcessingError => "processing_error",
            Self::IssuerTimeout => "issuer_timeout",
            Self::IssuerTimeoutReversalError => "issuer_timeout_reversal_error",
            Self::UnknownCreditError => "unknown_credit_error",
            Self::IncorrectCvc => "incorrect_cvc",
            Self::ExpiredCard => "expired_card",
            Self::PossibleFraudDetected => "possible_fraud_detected",
            Self::UnknownGiftError => "unknown_gift_error",
            Self::CheckRejected => "check_rejected",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejection reason reported by the ACH processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRejection {
    /// Rejection category (e.g. `"Error"`, `"Warning"`).
    pub category: Option<String>,
    /// Processor code.
    pub code: Option<String>,
    /// Processor message.
    pub message: Option<String>,
    /// Number of the offending request field.
    pub field_number: Option<String>,
    /// Name of the offending request field.
    pub field_name: Option<String>,
}

/// Origin-specific diagnostic data attached to an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ErrorDetails {
    /// Raw gateway response.
    Gateway {
        /// Gateway response code.
        code: String,
        /// Gateway response message.
        message: Option<String>,
    },
    /// Raw issuer response.
    Issuer {
        /// Issuer response code.
        code: String,
        /// Issuer response text.
        message: Option<String>,
    },
    /// ACH rejection reasons.
    Check {
        /// Rejections in reply order.
        rejections: Vec<CheckRejection>,
    },
}

/// Plain, cloneable snapshot of a [`PorticoError`].
///
/// Report responses embed these for past transactions that failed, since
/// reading a report must never raise on the reported outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    /// Taxonomy kind.
    pub kind: ErrorKind,
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Raw gateway, issuer or check diagnostics.
    pub details: Option<ErrorDetails>,
    /// Transaction the failure refers to.
    pub transaction_id: Option<i64>,
}

/// Programmer misuse of a builder or configuration.
#[derive(Debug, Clone)]
pub struct ArgumentError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ArgumentError {
    /// Creates a new argument error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A required field is absent.
    #[must_use]
    pub fn missing(field: &str, operation: &str) -> Self {
        Self::new(
            ErrorCode::MissingArgument,
            format!("{field} is required for {operation}"),
        )
    }

    /// A property name is not recognised by the target type.
    #[must_use]
    pub fn unknown_property(property: &str, owner: &str) -> Self {
        Self::new(
            ErrorCode::InvalidArgument,
            format!("Unknown property '{property}' for {owner}"),
        )
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ArgumentError {}

/// Bad domain input, naming the offending parameter.
#[derive(Debug, Clone)]
pub struct InvalidRequestError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Name of the offending parameter.
    pub param: String,
    /// Human-readable message.
    pub message: String,
}

impl InvalidRequestError {
    /// Creates a new invalid-request error.
    #[must_use]
    pub fn new(code: ErrorCode, param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            param: param.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.param)
    }
}

impl std::error::Error for InvalidRequestError {}

/// Missing or invalid service configuration.
#[derive(Debug, Clone)]
pub struct AuthenticationError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl AuthenticationError {
    /// Creates a new authentication error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AuthenticationError {}

/// Gateway-level failure.
#[derive(Debug)]
pub struct GatewayError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Raw gateway response code.
    pub gateway_code: Option<String>,
    /// Raw gateway response message.
    pub gateway_message: Option<String>,
    /// The failure this error wraps, e.g. a failed reversal.
    pub inner: Option<Box<PorticoError>>,
}

impl GatewayError {
    /// Creates a new gateway error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            gateway_code: None,
            gateway_message: None,
            inner: None,
        }
    }

    /// Attaches the raw gateway response.
    #[must_use]
    pub fn with_gateway(mut self, code: impl Into<String>, message: Option<String>) -> Self {
        self.gateway_code = Some(code.into());
        self.gateway_message = message;
        self
    }

    /// Attaches the wrapped failure.
    #[must_use]
    pub fn with_inner(mut self, inner: PorticoError) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.gateway_code {
            Some(code) => write!(f, "{} (gateway code {code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Issuer-level failure.
#[derive(Debug)]
pub struct CreditError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Gateway transaction id of the failed transaction.
    pub transaction_id: Option<i64>,
    /// Raw issuer response code.
    pub issuer_code: Option<String>,
    /// Raw issuer response text.
    pub issuer_message: Option<String>,
    /// The failure this error wraps, e.g. a failed reversal.
    pub inner: Option<Box<PorticoError>>,
}

impl CreditError {
    /// Creates a new credit error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            transaction_id: None,
            issuer_code: None,
            issuer_message: None,
            inner: None,
        }
    }

    /// Sets the transaction id.
    #[must_use]
    pub const fn with_transaction_id(mut self, transaction_id: Option<i64>) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    /// Attaches the raw issuer response.
    #[must_use]
    pub fn with_issuer(mut self, code: impl Into<String>, message: Option<String>) -> Self {
        self.issuer_code = Some(code.into());
        self.issuer_message = message;
        self
    }

    /// Attaches the wrapped failure.
    #[must_use]
    pub fn with_inner(mut self, inner: PorticoError) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}

impl fmt::Display for CreditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issuer_code {
            Some(code) => write!(f, "{} (issuer code {code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CreditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// ACH/check rejection.
#[derive(Debug, Clone)]
pub struct CheckError {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Gateway transaction id of the rejected check.
    pub transaction_id: Option<i64>,
    /// Raw processor response code.
    pub response_code: Option<String>,
    /// Rejection reasons in reply order.
    pub details: Vec<CheckRejection>,
}

impl CheckError {
    /// Creates a new check error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            transaction_id: None,
            response_code: None,
            details: Vec::new(),
        }
    }

    /// Sets the transaction id.
    #[must_use]
    pub const fn with_transaction_id(mut self, transaction_id: Option<i64>) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    /// Sets the raw processor response code.
    #[must_use]
    pub fn with_response_code(mut self, code: impl Into<String>) -> Self {
        self.response_code = Some(code.into());
        self
    }

    /// Sets the rejection reasons.
    #[must_use]
    pub fn with_details(mut self, details: Vec<CheckRejection>) -> Self {
        self.details = details;
        self
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(first) = self.details.first().and_then(|d| d.message.as_deref()) {
            write!(f, ": {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CheckError {}
