//! Payment method references.
//!
//! A request that accepts a payment method keeps one slot per variant in
//! [`PaymentSlots`]. Setters fill slots independently; the exactly-one rule
//! is checked at `execute()` time, not when a slot is filled.

use serde::{Deserialize, Serialize};

/// Manually keyed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    /// Primary account number.
    pub number: String,
    /// Expiry month, 1-12.
    pub exp_month: u32,
    /// Four-digit expiry year.
    pub exp_year: u32,
    /// Card security code.
    pub cvv: Option<String>,
    /// The card was physically present.
    pub card_present: bool,
    /// A card reader was present.
    pub reader_present: bool,
    /// End-to-end encryption block for an encrypted PAN.
    pub encryption: Option<EncryptionData>,
}

impl CreditCard {
    /// Creates a card-not-present manual entry.
    #[must_use]
    pub fn new(number: impl Into<String>, exp_month: u32, exp_year: u32) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            cvv: None,
            card_present: false,
            reader_present: false,
            encryption: None,
        }
    }

    /// Sets the security code.
    #[must_use]
    pub fn with_cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    /// Sets the card-present and reader-present flags.
    #[must_use]
    pub const fn with_presence(mut self, card_present: bool, reader_present: bool) -> Self {
        self.card_present = card_present;
        self.reader_present = reader_present;
        self
    }

    /// Attaches encryption data.
    #[must_use]
    pub fn with_encryption(mut self, encryption: EncryptionData) -> Self {
        self.encryption = Some(encryption);
        self
    }
}

/// How track data was captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMethod {
    /// Magnetic stripe.
    #[default]
    Swipe,
    /// Contactless.
    Proximity,
}

impl EntryMethod {
    /// Wire value of the `method` attribute.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Swipe => "swipe",
            Self::Proximity => "proximity",
        }
    }
}

/// Raw magnetic stripe data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackData {
    /// Raw track 1 or track 2 value.
    pub value: String,
    /// Capture method.
    pub method: EntryMethod,
    /// End-to-end encryption block for encrypted tracks.
    pub encryption: Option<EncryptionData>,
}

impl TrackData {
    /// Creates swiped track data.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            method: EntryMethod::Swipe,
            encryption: None,
        }
    }

    /// Sets the capture method.
    #[must_use]
    pub const fn with_method(mut self, method: EntryMethod) -> Self {
        self.method = method;
        self
    }

    /// Attaches encryption data.
    #[must_use]
    pub fn with_encryption(mut self, encryption: EncryptionData) -> Self {
        self.encryption = Some(encryption);
        self
    }
}

/// End-to-end encryption parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionData {
    /// Encryption version (`"01"`, `"02"`, ...).
    pub version: String,
    /// Which track was encrypted.
    pub encrypted_track_number: Option<String>,
    /// Key transmission block.
    pub ktb: Option<String>,
    /// Key serial number.
    pub ksn: Option<String>,
}

impl EncryptionData {
    /// Creates encryption data for the given version.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            encrypted_track_number: None,
            ktb: None,
            ksn: None,
        }
    }
}

/// Single- or multi-use token standing in for card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    /// Opaque token value.
    pub value: String,
    /// Updated expiry month.
    pub exp_month: Option<u32>,
    /// Updated expiry year.
    pub exp_year: Option<u32>,
    /// The card was physically present.
    pub card_present: bool,
    /// A card reader was present.
    pub reader_present: bool,
}

impl CardToken {
    /// Creates a card-not-present token reference.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            exp_month: None,
            exp_year: None,
            card_present: false,
            reader_present: false,
        }
    }

    /// Overrides the expiry stored with the token.
    #[must_use]
    pub const fn with_expiry(mut self, exp_month: u32, exp_year: u32) -> Self {
        self.exp_month = Some(exp_month);
        self.exp_year = Some(exp_year);
        self
    }
}

/// Wallet that produced a decrypted payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletSource {
    /// Apple Pay.
    #[default]
    ApplePay,
    /// Google Pay.
    GooglePay,
}

impl WalletSource {
    /// Wire value of `PaymentDataSource`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApplePay => "ApplePay",
            Self::GooglePay => "GooglePay",
        }
    }
}

/// Decrypted digital wallet payment.
///
/// Serialized as a manual entry built from the device account number plus a
/// secure e-commerce block carrying the cryptogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPayment {
    /// Device primary account number.
    pub number: String,
    /// Expiry month, 1-12.
    pub exp_month: u32,
    /// Four-digit expiry year.
    pub exp_year: u32,
    /// Online payment cryptogram.
    pub cryptogram: String,
    /// E-commerce indicator.
    pub eci: Option<String>,
    /// Originating wallet.
    pub source: WalletSource,
}

impl WalletPayment {
    /// Builds a wallet payment from the `YYMMDD` expiration date found in
    /// decrypted wallet payloads.
    ///
    /// Returns `None` when the date is not six digits or the month is out of
    /// range.
    #[must_use]
    pub fn from_payload(
        number: impl Into<String>,
        expiration_yymmdd: &str,
        cryptogram: impl Into<String>,
    ) -> Option<Self> {
        if expiration_yymmdd.len() != 6 || !expiration_yymmdd.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: u32 = expiration_yymmdd[0..2].parse().ok()?;
        let month: u32 = expiration_yymmdd[2..4].parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            number: number.into(),
            exp_month: month,
            exp_year: 2000 + year,
            cryptogram: cryptogram.into(),
            eci: None,
            source: WalletSource::ApplePay,
        })
    }

    /// Sets the e-commerce indicator.
    #[must_use]
    pub fn with_eci(mut self, eci: impl Into<String>) -> Self {
        self.eci = Some(eci.into());
        self
    }

    /// Sets the originating wallet.
    #[must_use]
    pub const fn with_source(mut self, source: WalletSource) -> Self {
        self.source = source;
        self
    }
}

/// A resolved payment method reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod<'a> {
    /// Manual entry.
    Card(&'a CreditCard),
    /// Swipe or contactless.
    Track(&'a TrackData),
    /// Token.
    Token(&'a CardToken),
    /// Decrypted wallet payment.
    Wallet(&'a WalletPayment),
    /// Stored payment method key.
    StoredKey(&'a str),
}

/// One slot per payment method variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSlots {
    /// Manual entry.
    pub card: Option<CreditCard>,
    /// Swipe or contactless.
    pub track: Option<TrackData>,
    /// Token.
    pub token: Option<CardToken>,
    /// Decrypted wallet payment.
    pub wallet: Option<WalletPayment>,
    /// Stored payment method key.
    pub method_key: Option<String>,
}

impl PaymentSlots {
    /// Number of filled slots.
    #[must_use]
    pub fn count(&self) -> usize {
        [
            self.card.is_some(),
            self.track.is_some(),
            self.token.is_some(),
            self.wallet.is_some(),
            self.method_key.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Returns the single filled slot, or `None` when zero or several are set.
    #[must_use]
    pub fn selected(&self) -> Option<PaymentMethod<'_>> {
        if self.count() != 1 {
            return None;
        }
        self.card
            .as_ref()
            .map(PaymentMethod::Card)
            .or_else(|| self.track.as_ref().map(PaymentMethod::Track))
            .or_else(|| self.token.as_ref().map(PaymentMethod::Token))
            .or_else(|| self.wallet.as_ref().map(PaymentMethod::Wallet))
            .or_else(|| self.method_key.as_deref().map(PaymentMethod::StoredKey))
    }
}

/// Gift or loyalty card reference.
///
/// Exactly one of number, track data, token or alias must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    /// Card number.
    pub number: Option<String>,
    /// Raw track data.
    pub track_data: Option<String>,
    /// Token value.
    pub token: Option<String>,
    /// Alias, usually a phone number.
    pub alias: Option<String>,
    /// Card PIN.
    pub pin: Option<String>,
    /// End-to-end encryption block.
    pub encryption: Option<EncryptionData>,
}

impl GiftCard {
    /// References a card by number.
    #[must_use]
    pub fn number(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            ..Self::default()
        }
    }

    /// References a card by track data.
    #[must_use]
    pub fn track(track_data: impl Into<String>) -> Self {
        Self {
            track_data: Some(track_data.into()),
            ..Self::default()
        }
    }

    /// References a card by token.
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// References a card by alias.
    #[must_use]
    pub fn alias(alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::default()
        }
    }

    /// Sets the PIN.
    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    /// Number of card references set.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        [
            self.number.is_some(),
            self.track_data.is_some(),
            self.token.is_some(),
            self.alias.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// Bank account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Checking account.
    Checking,
    /// Savings account.
    Savings,
}

impl AccountType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "CHECKING",
            Self::Savings => "SAVINGS",
        }
    }
}

/// Check ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckType {
    /// Personal check.
    Personal,
    /// Business check.
    Business,
    /// Payroll check.
    Payroll,
}

impl CheckType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Business => "BUSINESS",
            Self::Payroll => "PAYROLL",
        }
    }
}

/// How the check data was captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataEntryMode {
    /// Keyed by hand.
    #[default]
    Manual,
    /// Read by a check scanner.
    Swipe,
}

impl DataEntryMode {
    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Swipe => "SWIPE",
        }
    }
}

/// Bank account drawn on by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAccount {
    /// Bank routing number.
    pub routing_number: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// Check number.
    pub check_number: Option<String>,
    /// Raw MICR line from a scanner.
    pub micr_data: Option<String>,
    /// Account type.
    pub account_type: Option<AccountType>,
    /// Check ownership.
    pub check_type: Option<CheckType>,
    /// Standard entry class code (`PPD`, `CCD`, `WEB`, ...).
    pub sec_code: String,
    /// Capture mode.
    pub entry_mode: DataEntryMode,
    /// Check verification requested.
    pub verify: bool,
}

impl CheckAccount {
    /// Creates a manually keyed account reference.
    #[must_use]
    pub fn new(
        routing_number: impl Into<String>,
        account_number: impl Into<String>,
        sec_code: impl Into<String>,
    ) -> Self {
        Self {
            routing_number: Some(routing_number.into()),
            account_number: Some(account_number.into()),
            check_number: None,
            micr_data: None,
            account_type: None,
            check_type: None,
            sec_code: sec_code.into(),
            entry_mode: DataEntryMode::Manual,
            verify: false,
        }
    }

    /// Sets account and check types.
    #[must_use]
    pub const fn with_types(mut self, account_type: AccountType, check_type: CheckType) -> Self {
        self.account_type = Some(account_type);
        self.check_type = Some(check_type);
        self
    }

    /// Sets the check number.
    #[must_use]
    pub fn with_check_number(mut self, check_number: impl Into<String>) -> Self {
        self.check_number = Some(check_number.into());
        self
    }
}
