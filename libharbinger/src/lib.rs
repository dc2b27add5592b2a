//! Harbinger - container image change notifications
//!
//! `libharbinger` provides the client side of an image-tracking service:
//! outbound notification delivery and a management client for the remote
//! manifest inventory.
//!
//! # Quick Start
//!
//! ```no_run
//! use libharbinger::{GrpcImageService, Inventory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to the inventory service
//!     let service = GrpcImageService::connect("127.0.0.1:42286")?;
//!     let inventory = Inventory::new(service);
//!
//!     // List tracked images, sorted by name
//!     let list = inventory.list().await?;
//!     for image in list.images {
//!         println!("{} ({} manifests)", image.name, image.manifests_count);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Notifier`] - Capability implemented by every delivery backend
//! - [`Webhook`] - HTTP webhook backend
//! - [`Notif`] - Fan-out over the configured notifiers
//! - [`Inventory`] - List, inspect, remove and prune tracked images
//! - [`ImageService`] - Remote inventory contract, implemented over gRPC by
//!   [`GrpcImageService`]
//! - [`Config`] - Application configuration

#![warn(clippy::all)]

/// Returns the libharbinger crate version.
///
/// # Examples
///
/// ```
/// let version = libharbinger::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use config::{Config, DeliveryConfig, GrpcConfig, NotifConfig};
pub use error::{HarbingerError, Result};
pub use inventory::{GrpcImageService, ImageService, Inventory};
pub use model::{
    EntryStatus, ImageInspect, ImageList, ImageManifests, ImageRecord, ManifestRecord, Meta,
    NotifEntry, NotificationEvent, PruneRequest, PruneResult, RemovalResult,
};
pub use notif::webhook::Webhook;
pub use notif::{Notif, Notifier};

pub mod config;
pub mod error;
pub mod format;
pub mod inventory;
pub mod model;
pub mod notif;
#[doc(hidden)]
pub mod rpc;
