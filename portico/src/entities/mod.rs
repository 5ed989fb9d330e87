//! Entity model: plain request and response records.

pub mod details;
pub mod payment;
pub mod request;
pub mod response;

pub use details::{
    AdditionalAmount, Address, AutoSubstantiation, CardHolder, ConsumerInfo, CpcData,
    DirectMarketData, TaxType, TransactionDetails,
};
pub use payment::{
    AccountType, CardToken, CheckAccount, CheckType, CreditCard, DataEntryMode, EncryptionData,
    EntryMethod, GiftCard, PaymentMethod, PaymentSlots, TrackData, WalletPayment, WalletSource,
};
pub use request::{
    AliasAction, AuthRequest, BalanceType, CaptureRequest, CheckAction, CheckRequest,
    CheckVoidRequest, CpcEditRequest, DEFAULT_CURRENCY, DebitOperation, DebitRequest,
    EbtOperation, EbtRequest, EbtVoucher, EditRequest, GetRequest, GiftAliasRequest,
    GiftCardRequest, GiftCurrency, GiftOperation, GiftReplaceRequest, GiftReversalRequest,
    GiftVoidRequest, ListRequest, RefundRequest, ReverseRequest, TransactionRequest,
    VerifyRequest, VoidRequest,
};
pub use response::{
    ActivityReport, AuthorizationResponse, BatchResponse, CheckResponse, DebitResponse,
    EbtResponse, GiftAliasResponse, GiftCardResponse, ReversalResponse, TokenData,
    TransactionBase, TransactionDetail, TransactionResponse, TransactionSummary,
};
