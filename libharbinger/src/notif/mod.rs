//! Outbound notifications.
//!
//! Every delivery backend implements [`Notifier`]. [`from_config`] builds the
//! backends enabled in [`NotifConfig`], and [`Notif`] fans one event out to
//! all of them.

use crate::config::NotifConfig;
use crate::error::Result;
use crate::model::NotificationEvent;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub mod render;
pub mod webhook;


pub use render::{JsonRenderer, Render};

/// A notification delivery backend.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable lowercase identifier of the backend.
    fn name(&self) -> &str;

    /// Delivers `event`, aborting if `cancel` fires first.
    ///
    /// Delivery is attempted at most once.
    async fn send_with_cancel(
        &self,
        event: NotificationEvent,
        cancel: CancellationToken,
    ) -> Result<()>;

    /// Delivers `event`.
    async fn send(&self, event: NotificationEvent) -> Result<()> {
        self.send_with_cancel(event, CancellationToken::new()).await
    }
}

/// Builds every notifier enabled in `config`.
pub fn from_config(config: &NotifConfig) -> Vec<Box<dyn Notifier>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if let Some(cfg) = &config.webhook {
        notifiers.push(Box::new(webhook::Webhook::new(cfg.clone())));
    }
    notifiers
}

/// Outcome of one notifier in a fan-out.
#[derive(Debug)]
pub struct Delivery {
    pub notifier: String,
    pub result: Result<()>,
}

/// The set of configured notifiers.
#[derive(Default)]
pub struct Notif {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Notif {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Builds the notifiers enabled in `config`.
    pub fn from_config(config: &NotifConfig) -> Self {
        Self::new(from_config(config))
    }

    /// Names of the configured notifiers, in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Sends `event` to every notifier in turn.
    ///
    /// A failing notifier does not stop the others; each outcome is returned.
    pub async fn send_all(&self, event: &NotificationEvent) -> Vec<Delivery> {
        self.send_all_with_cancel(event, CancellationToken::new())
            .await
    }

    /// Like [`Notif::send_all`], with every delivery scoped under `cancel`.
    pub async fn send_all_with_cancel(
        &self,
        event: &NotificationEvent,
        cancel: CancellationToken,
    ) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            let result = notifier
                .send_with_cancel(event.clone(), cancel.clone())
                .await;
            match &result {
                Ok(()) => debug!(notifier = notifier.name(), image = %event.entry.image, "notification sent"),
                Err(e) => warn!(notifier = notifier.name(), image = %event.entry.image, error = %e, "notification failed"),
            }
            deliveries.push(Delivery {
                notifier: notifier.name().to_string(),
                result,
            });
        }
        deliveries
    }
}
