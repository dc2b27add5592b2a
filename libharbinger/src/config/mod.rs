//! Application configuration.
//!
//! Configuration is layered: serialized defaults first, then a YAML file,
//! then `HARBINGER__`-prefixed environment variables (`__` separates nested
//! keys, e.g. `HARBINGER__GRPC__AUTHORITY`).

use crate::error::{HarbingerError, Result};
use config::{Config as ConfigRs, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;


/// Default address of the inventory gRPC service.
pub const DEFAULT_GRPC_AUTHORITY: &str = "127.0.0.1:42286";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub grpc: GrpcConfig,
    #[serde(default)]
    pub notif: NotifConfig,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = ConfigRs::builder()
            .add_source(ConfigRs::try_from(&Config::default())?)
            .add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// When `path` is `None` only defaults and environment overrides apply.
    /// A path that is given must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            ConfigRs::builder().add_source(ConfigRs::try_from(&Config::default())?);

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("HARBINGER").separator("__"));

        Self::from_builder(builder, path)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        let config: Config = builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                HarbingerError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.grpc.authority.trim().is_empty() {
            return Err(HarbingerError::config("grpc.authority cannot be empty", None));
        }
        if let Some(webhook) = &self.notif.webhook {
            if webhook.endpoint.trim().is_empty() {
                return Err(HarbingerError::config(
                    "notif.webhook.endpoint cannot be empty",
                    None,
                ));
            }
            if webhook.timeout.is_zero() {
                return Err(HarbingerError::config(
                    "notif.webhook.timeout must be greater than zero",
                    None,
                ));
            }
        }
        Ok(())
    }
}

/// Inventory service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrpcConfig {
    /// Network address of the inventory service, `host:port`
    #[serde(default = "default_grpc_authority")]
    pub authority: String,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            authority: default_grpc_authority(),
        }
    }
}

fn default_grpc_authority() -> String {
    DEFAULT_GRPC_AUTHORITY.to_string()
}

/// Notification backends. Each configured section enables one notifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NotifConfig {
    #[serde(default)]
    pub webhook: Option<DeliveryConfig>,
}

impl NotifConfig {
    /// Returns true if no backend is configured.
    pub fn is_empty(&self) -> bool {
        self.webhook.is_none()
    }
}

/// Delivery settings for the webhook backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Target URI
    pub endpoint: String,
    /// Extra request headers, applied before `User-Agent`
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Delivery deadline, in (possibly fractional) seconds
    #[serde(default = "default_delivery_timeout", with = "seconds")]
    pub timeout: Duration,
}

impl DeliveryConfig {
    /// Creates a delivery config with no extra headers and the default timeout.
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            timeout: default_delivery_timeout(),
        }
    }

    /// Adds a custom header.
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the delivery deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_delivery_timeout() -> Duration {
    Duration::from_secs(10)
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
