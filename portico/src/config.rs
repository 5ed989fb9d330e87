//! Service configuration.
//!
//! [`ServicesConfig`] carries the credentials and routing values every
//! request needs. It is read-mostly and shared by reference across builders.
//! Credentials come either as a bearer secret key or as the
//! site/device/license/user/password tuple.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ArgumentError, AuthenticationError, ErrorCode};
use crate::transport::RequestHeader;
use crate::validation::ValidationContext;

/// Production gateway endpoint.
pub const PRODUCTION_URL: &str =
    "https://api2.heartlandportico.com/Hps.Exchange.PosGateway/PosGatewayService.asmx";

/// Certification gateway endpoint, selected by `_cert_` secret keys.
pub const CERTIFICATION_URL: &str =
    "https://cert.api2.heartlandportico.com/Hps.Exchange.PosGateway/PosGatewayService.asmx";

/// UAT gateway endpoint, selected by `_uat_` secret keys.
pub const UAT_URL: &str =
    "https://posgateway.uat.secureexchange.net/Hps.Exchange.PosGateway/PosGatewayService.asmx";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 65_000;

/// Prefix of environment variables read by [`ServicesConfig::from_env`].
pub const ENV_PREFIX: &str = "PORTICO_";

/// Property names accepted by [`ServicesConfig::set`].
pub const PROPERTIES: &[&str] = &[
    "secret_api_key",
    "site_id",
    "device_id",
    "license_id",
    "user_name",
    "password",
    "developer_id",
    "version_number",
    "site_trace",
    "service_url",
    "timeout_ms",
    "allowed_currencies",
];

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_currencies() -> Vec<String> {
    vec![crate::entities::DEFAULT_CURRENCY.to_owned()]
}

/// Credentials and routing for the gateway.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Bearer secret API key (`skapi_...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_api_key: Option<String>,
    /// Site id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Device id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// License id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_id: Option<String>,
    /// User name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Developer id assigned at certification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<String>,
    /// Version number assigned at certification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<String>,
    /// Free-form trace value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_trace: Option<String>,
    /// Explicit endpoint; overrides the key-derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<Url>,
    /// Transport timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Currencies accepted by the currency rule, lower case.
    #[serde(default = "default_currencies")]
    pub allowed_currencies: Vec<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            secret_api_key: None,
            site_id: None,
            device_id: None,
            license_id: None,
            user_name: None,
            password: None,
            developer_id: None,
            version_number: None,
            site_trace: None,
            service_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            allowed_currencies: default_currencies(),
        }
    }
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl ServicesConfig {
    /// Creates a configuration authenticated by a secret API key.
    #[must_use]
    pub fn with_secret_api_key(key: impl Into<String>) -> Self {
        Self {
            secret_api_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Creates a configuration authenticated by the credential tuple.
    #[must_use]
    pub fn with_credentials(
        site_id: impl Into<String>,
        device_id: impl Into<String>,
        license_id: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            site_id: Some(site_id.into()),
            device_id: Some(device_id.into()),
            license_id: Some(license_id.into()),
            user_name: Some(user_name.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Sets an explicit endpoint.
    #[must_use]
    pub fn with_service_url(mut self, url: Url) -> Self {
        self.service_url = Some(url);
        self
    }

    /// Sets the developer id and version number.
    #[must_use]
    pub fn with_developer(mut self, developer_id: impl Into<String>, version: impl Into<String>) -> Self {
        self.developer_id = Some(developer_id.into());
        self.version_number = Some(version.into());
        self
    }

    /// Sets the transport timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns `true` when every member of the credential tuple is set.
    #[must_use]
    pub fn has_credential_tuple(&self) -> bool {
        [
            &self.site_id,
            &self.device_id,
            &self.license_id,
            &self.user_name,
            &self.password,
        ]
        .into_iter()
        .all(|v| present(v.as_ref()))
    }

    /// Checks that some form of credentials is configured.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_configuration` [`AuthenticationError`] when
    /// neither a secret key nor the full credential tuple is set.
    pub fn validate(&self) -> Result<(), AuthenticationError> {
        if present(self.secret_api_key.as_ref()) || self.has_credential_tuple() {
            return Ok(());
        }
        Err(AuthenticationError::new(
            ErrorCode::InvalidConfiguration,
            "Site, device, license, username and password OR secret API key are required.",
        ))
    }

    /// Resolves the gateway endpoint.
    ///
    /// An explicit `service_url` wins. Otherwise the secret key shape picks
    /// the environment (`_uat_`, `_cert_`, else production).
    #[must_use]
    pub fn endpoint(&self) -> &str {
        if let Some(url) = &self.service_url {
            return url.as_str();
        }
        match self.secret_api_key.as_deref() {
            Some(key) if key.contains("_uat_") => UAT_URL,
            Some(key) if key.contains("_cert_") => CERTIFICATION_URL,
            _ => PRODUCTION_URL,
        }
    }

    /// Transport timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sets one property from untyped input.
    ///
    /// `allowed_currencies` takes a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] naming the property when it is not in
    /// [`PROPERTIES`] or its value cannot be parsed.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ArgumentError> {
        let text = Some(value.to_owned());
        match name {
            "secret_api_key" => self.secret_api_key = text,
            "site_id" => self.site_id = text,
            "device_id" => self.device_id = text,
            "license_id" => self.license_id = text,
            "user_name" => self.user_name = text,
            "password" => self.password = text,
            "developer_id" => self.developer_id = text,
            "version_number" => self.version_number = text,
            "site_trace" => self.site_trace = text,
            "service_url" => {
                let url = Url::parse(value).map_err(|e| {
                    ArgumentError::new(ErrorCode::InvalidArgument, format!("service_url: {e}"))
                })?;
                self.service_url = Some(url);
            }
            "timeout_ms" => {
                self.timeout_ms = value.trim().parse().map_err(|_| {
                    ArgumentError::new(
                        ErrorCode::InvalidArgument,
                        format!("timeout_ms must be a whole number of milliseconds, got '{value}'"),
                    )
                })?;
            }
            "allowed_currencies" => {
                self.allowed_currencies = value
                    .split(',')
                    .map(|c| c.trim().to_ascii_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            other => return Err(ArgumentError::unknown_property(other, "ServicesConfig")),
        }
        Ok(())
    }

    /// Builds a configuration from name/value pairs.
    ///
    /// # Errors
    ///
    /// Fails on the first pair [`Self::set`] rejects.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (name, value) in pairs {
            config.set(name, value)?;
        }
        Ok(config)
    }

    /// Builds a configuration from `PORTICO_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// Variable names are the upper-cased property names, e.g.
    /// `PORTICO_SECRET_API_KEY`.
    ///
    /// # Errors
    ///
    /// Fails when a variable holds a value [`Self::set`] rejects.
    pub fn from_env() -> Result<Self, ArgumentError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        for name in PROPERTIES {
            let var = format!("{ENV_PREFIX}{}", name.to_ascii_uppercase());
            if let Ok(value) = std::env::var(&var) {
                config.set(name, &value)?;
            }
        }
        Ok(config)
    }

    /// Request header for one submission.
    #[must_use]
    pub fn request_header(&self, client_txn_id: Option<i64>) -> RequestHeader {
        let secret = self.secret_api_key.clone().filter(|k| !k.trim().is_empty());
        let tuple = |v: &Option<String>| if secret.is_some() { None } else { v.clone() };
        RequestHeader {
            site_id: tuple(&self.site_id),
            device_id: tuple(&self.device_id),
            license_id: tuple(&self.license_id),
            user_name: tuple(&self.user_name),
            password: tuple(&self.password),
            secret_api_key: secret,
            developer_id: self.developer_id.clone(),
            version_number: self.version_number.clone(),
            site_trace: self.site_trace.clone(),
            client_txn_id,
        }
    }

    /// Context for the validation rules, evaluated now.
    #[must_use]
    pub fn validation_context(&self) -> ValidationContext<'_> {
        ValidationContext {
            allowed_currencies: &self.allowed_currencies,
            now: Utc::now(),
        }
    }
}

impl fmt::Debug for ServicesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicesConfig")
            .field("has_secret_api_key", &self.secret_api_key.is_some())
            .field("site_id", &self.site_id)
            .field("device_id", &self.device_id)
            .field("license_id", &self.license_id)
            .field("user_name", &self.user_name)
            .field("has_password", &self.password.is_some())
            .field("developer_id", &self.developer_id)
            .field("version_number", &self.version_number)
            .field("service_url", &self.service_url.as_ref().map(Url::as_str))
            .field("timeout_ms", &self.timeout_ms)
            .field("allowed_currencies", &self.allowed_currencies)
            .finish_non_exhaustive()
    }
}
